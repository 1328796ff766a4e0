//! # notewrap
//!
//! Wraps structured notes in MIME messages and recovers them losslessly.
//!
//! A [`Note`] carries a title, plain or rich text, a uid, a classification,
//! an author, creation and modification dates, ordered attachments (by URL
//! or inline) and custom key/value fields. [`serialize`] turns it into a
//! standards-compliant [`Message`]; [`parse`] turns the message back into an
//! equal note.
//!
//! ## Example
//!
//! ```ignore
//! use notewrap::{Attachment, Classification, Note, TextFormat};
//!
//! let note = Note::new()
//!     .with_title("Groceries")
//!     .with_text("<p>milk</p>", TextFormat::Rich)
//!     .with_classification(Classification::Private)
//!     .with_attachment(Attachment::from_url("file:///tmp/list.pdf", "application/pdf"))
//!     .with_custom("color", "yellow");
//!
//! let message = notewrap::serialize(&note)?;
//! let parsed = notewrap::parse(&message)?;
//! assert_eq!(parsed.title, note.title);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod codec;
mod error;
pub mod note;

pub use codec::{CodecConfig, CodecConfigBuilder, NoteCodec, TextEncoding, parse, serialize};
pub use error::{Error, Result};
pub use note::{Attachment, AttachmentPayload, Classification, Note, TextFormat};
pub use notewrap_mime::Message;
