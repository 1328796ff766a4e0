//! Message to note conversion.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use notewrap_mime::date::parse_date;
use notewrap_mime::{ContentType, DispositionKind, Headers, Message, Part};
use tracing::{debug, trace, warn};

use super::{
    CLASSIFICATION_HEADER, LAST_MODIFIED_HEADER, PART_ATTACHMENT, PART_CUSTOM, PART_HEADER,
    UID_HEADER,
};
use crate::error::{Error, Result};
use crate::note::{Attachment, Classification, Note, TextFormat};

pub(super) fn parse(message: &Message) -> Result<Note> {
    let headers = &message.headers;
    let mut note = Note::new();

    note.title = headers.get_decoded("Subject")?.unwrap_or_default();
    note.from = headers.get_decoded("From")?.unwrap_or_default();
    note.uid = match headers.get_decoded(UID_HEADER)? {
        Some(uid) => uid,
        None => message.message_id().unwrap_or_default().to_string(),
    };
    note.creation_date = date_header(headers, "Date");
    note.last_modified_date = date_header(headers, LAST_MODIFIED_HEADER);
    note.classification = headers
        .get(CLASSIFICATION_HEADER)
        .map_or_else(Classification::default, |value| {
            Classification::parse(value).unwrap_or_else(|| {
                warn!(value, "Unknown classification, using default");
                Classification::default()
            })
        });

    if let Some(body) = message.body_part() {
        read_text(&mut note, &body)?;
    } else {
        read_parts(&mut note, &message.parts)?;
    }

    debug!(
        uid = %note.uid,
        attachments = note.attachments.len(),
        custom = note.custom.len(),
        "Parsed note"
    );
    Ok(note)
}

fn read_parts(note: &mut Note, parts: &[Part]) -> Result<()> {
    let mut has_text = false;

    for part in parts {
        match part.headers.get(PART_HEADER) {
            Some(kind) if kind.eq_ignore_ascii_case(PART_CUSTOM) => {
                note.custom.extend(read_custom(part)?);
            }
            Some(kind) if kind.eq_ignore_ascii_case(PART_ATTACHMENT) => {
                note.attachments.push(read_attachment(part)?);
            }
            Some(kind) => warn!(kind, "Skipping unknown note part"),
            // Untagged parts come from other mail clients: the first textual
            // one is the note text, the rest become attachments.
            None => {
                if !has_text && read_foreign_text(note, part)? {
                    has_text = true;
                } else {
                    trace!("Treating untagged part as attachment");
                    note.attachments.push(read_attachment(part)?);
                }
            }
        }
    }

    if has_text { Ok(()) } else { Err(Error::MissingText) }
}

/// Reads the text from an untagged part if it can hold one.
///
/// Parts the sender marked as attachments never become the text.
fn read_foreign_text(note: &mut Note, part: &Part) -> Result<bool> {
    if part
        .content_disposition()?
        .is_some_and(|d| d.kind == DispositionKind::Attachment)
    {
        return Ok(false);
    }

    let content_type = part.content_type()?;
    if content_type.is_text() {
        read_text(note, part)?;
        return Ok(true);
    }

    if content_type.is("multipart", "alternative") {
        let alternatives = part.subparts()?;
        let preferred = alternatives
            .iter()
            .find(|p| p.content_type().is_ok_and(|ct| ct.is("text", "html")))
            .or_else(|| {
                alternatives
                    .iter()
                    .find(|p| p.content_type().is_ok_and(|ct| ct.is_text()))
            });
        if let Some(alternative) = preferred {
            read_text(note, alternative)?;
            return Ok(true);
        }
    }

    Ok(false)
}

fn read_text(note: &mut Note, part: &Part) -> Result<()> {
    let format = if part.content_type()?.is("text", "html") {
        TextFormat::Rich
    } else {
        TextFormat::Plain
    };
    note.set_text_with_format(part.body_text()?, format);
    Ok(())
}

fn read_custom(part: &Part) -> Result<BTreeMap<String, String>> {
    let body = part.decode_body()?;
    Ok(serde_json::from_slice(&body)?)
}

fn read_attachment(part: &Part) -> Result<Attachment> {
    let raw_type = part.headers.get("content-type").unwrap_or_default();
    let external = ContentType::parse(raw_type)
        .ok()
        .filter(|ct| ct.is("message", "external-body"));

    let mut attachment = if let Some(content_type) = external {
        let url = content_type.parameter("url").ok_or_else(|| {
            Error::InvalidAttachment(format!("external body without URL: {raw_type}"))
        })?;
        let inner = part.external_headers()?;
        Attachment::from_url(url, inner.get("content-type").unwrap_or_default())
    } else {
        Attachment::from_data(part.decode_body()?, raw_type)
    };

    attachment.label = part.content_disposition()?.and_then(|d| d.filename);
    attachment.content_id = part.content_id().map(str::to_string);
    Ok(attachment)
}

/// Reads a date header, ignoring values that do not parse.
fn date_header(headers: &Headers, name: &str) -> Option<DateTime<Utc>> {
    let value = headers.get(name)?;
    parse_date(value)
        .inspect_err(|e| warn!(header = name, error = %e, "Ignoring unparsable date"))
        .ok()
}
