//! Note data model.

mod attachment;
mod model;

pub use attachment::{Attachment, AttachmentPayload};
pub use model::{Classification, Note, TextFormat};
