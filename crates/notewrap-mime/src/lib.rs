//! # notewrap-mime
//!
//! MIME message parsing and generation primitives used by `notewrap`.
//!
//! ## Features
//!
//! - **Message parsing**: Parse MIME messages with multipart support
//! - **Message generation**: Build single-part or `multipart/mixed` messages
//! - **Encoding/Decoding**: Base64, Quoted-Printable, RFC 2047 header encoding
//! - **Content types**: Content types, dispositions and `message/external-body` references
//!
//! ## Quick Start
//!
//! ### Parsing MIME Messages
//!
//! ```ignore
//! use notewrap_mime::Message;
//!
//! let raw_message = "From: sender@example.com\r\n\
//!                    Subject: Test\r\n\
//!                    Content-Type: text/plain\r\n\
//!                    \r\n\
//!                    Hello, World!";
//!
//! let message = Message::parse(raw_message)?;
//! println!("Subject: {}", message.subject().unwrap_or("(no subject)"));
//! println!("Body: {}", message.body_text()?);
//! ```
//!
//! ### Building MIME Messages
//!
//! ```ignore
//! use notewrap_mime::{ContentType, MessageBuilder, Part, TransferEncoding};
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .subject("Test Message")
//!     .part(Part::encoded(
//!         &ContentType::text_plain(),
//!         b"Hello, World!",
//!         TransferEncoding::QuotedPrintable,
//!     ))
//!     .build()?;
//!
//! println!("{message}");
//! ```
//!
//! ### Encoding/Decoding
//!
//! ```ignore
//! use notewrap_mime::encoding::{decode_base64, encode_base64, encode_quoted_printable};
//!
//! let encoded = encode_base64(b"Hello, World!");
//! let decoded = decode_base64(&encoded)?;
//!
//! let encoded = encode_quoted_printable("Héllo, Wørld!".as_bytes());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub mod date;
pub mod encoding;

pub use content_type::{ContentDisposition, ContentType, DispositionKind};
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, MessageBuilder, Part, TransferEncoding};
