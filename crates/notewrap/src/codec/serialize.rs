//! Note to message conversion.

use std::collections::BTreeMap;

use chrono::{SubsecRound, Utc};
use notewrap_mime::date::format_date;
use notewrap_mime::{
    ContentDisposition, ContentType, Headers, Message, MessageBuilder, Part, TransferEncoding,
};
use tracing::debug;

use super::{
    CLASSIFICATION_HEADER, CodecConfig, LAST_MODIFIED_HEADER, PART_ATTACHMENT, PART_CUSTOM,
    PART_HEADER, UID_HEADER,
};
use crate::error::{Error, Result};
use crate::note::{Attachment, AttachmentPayload, Note, TextFormat};

/// A MIME type without spaces cannot be folded; keep it below the hard line limit.
const MAX_MIME_TYPE_LEN: usize = 900;
const MAX_MESSAGE_ID_LEN: usize = 64;

pub(super) fn serialize(config: &CodecConfig, note: &Note) -> Result<Message> {
    let now = Utc::now().trunc_subsecs(0);
    let populate = config.populate_defaults;

    let uid = if note.uid.is_empty() && populate {
        uuid::Uuid::new_v4().to_string()
    } else {
        note.uid.clone()
    };
    let creation_date = note.creation_date.or(populate.then_some(now));
    let last_modified_date = note.last_modified_date.or(populate.then_some(now));

    let mut builder = MessageBuilder::new().subject(&note.title);
    if !note.from.is_empty() {
        builder = builder.from(&note.from);
    }
    if let Some(date) = creation_date {
        builder = builder.header("Date", format_date(&date)?);
    }
    if is_message_id(&uid) {
        builder = builder.message_id(&uid);
    }
    if !uid.is_empty() {
        builder = builder.header(UID_HEADER, Headers::encode_value(&uid));
    }
    if let Some(date) = last_modified_date {
        builder = builder.header(LAST_MODIFIED_HEADER, format_date(&date)?);
    }
    builder = builder.header(CLASSIFICATION_HEADER, note.classification.as_str());
    if let Some(agent) = &config.user_agent {
        builder = builder.header("User-Agent", Headers::encode_value(agent));
    }

    builder = builder.part(text_part(config, note));
    if !note.custom.is_empty() {
        builder = builder.part(custom_part(config, &note.custom)?);
    }
    for attachment in &note.attachments {
        builder = builder.part(attachment_part(attachment)?);
    }

    let message = builder.build()?;
    debug!(
        uid = %uid,
        attachments = note.attachments.len(),
        custom = note.custom.len(),
        "Serialized note"
    );
    Ok(message)
}

fn text_part(config: &CodecConfig, note: &Note) -> Part {
    let content_type = match note.text_format {
        TextFormat::Plain => ContentType::text_plain(),
        TextFormat::Rich => ContentType::text_html(),
    };
    let mut part = Part::encoded(
        &content_type,
        note.text.as_bytes(),
        config.text_encoding.into(),
    );
    part.headers
        .add("Content-Disposition", ContentDisposition::inline().to_string());
    part
}

fn custom_part(config: &CodecConfig, custom: &BTreeMap<String, String>) -> Result<Part> {
    let json = serde_json::to_vec(custom)?;
    let content_type = ContentType::new("application", "json").with_parameter("charset", "utf-8");
    let mut part = Part::encoded(&content_type, &json, config.text_encoding.into());
    part.headers.add(PART_HEADER, PART_CUSTOM);
    Ok(part)
}

fn attachment_part(attachment: &Attachment) -> Result<Part> {
    check_attachment(attachment)?;

    // The MIME type is written verbatim so it survives even if it is not a
    // well-formed content type.
    let mut part = match &attachment.payload {
        AttachmentPayload::Inline(data) => {
            let mut headers = Headers::new();
            headers.add("Content-Type", attachment.mime_type.clone());
            headers.add(
                "Content-Transfer-Encoding",
                TransferEncoding::Base64.to_string(),
            );
            Part::new(headers, TransferEncoding::Base64.encode(data))
        }
        AttachmentPayload::Url(url) => {
            let mut inner = Headers::new();
            inner.add("Content-Type", attachment.mime_type.clone());
            Part::external_body(url, &inner)
        }
    };

    part.headers.add(PART_HEADER, PART_ATTACHMENT);
    let disposition = attachment
        .label
        .as_ref()
        .map_or_else(ContentDisposition::attachment, |label| {
            ContentDisposition::attachment().with_filename(label)
        });
    part.headers
        .add("Content-Disposition", disposition.to_string());
    if let Some(id) = &attachment.content_id {
        part.headers.add("Content-ID", format!("<{id}>"));
    }

    Ok(part)
}

/// Rejects attachment fields that cannot be written into a header unchanged.
fn check_attachment(attachment: &Attachment) -> Result<()> {
    let mime_type = attachment.mime_type.as_str();
    if mime_type.contains(char::is_control) {
        return Err(invalid("MIME type contains control characters", mime_type));
    }
    if mime_type.trim() != mime_type {
        return Err(invalid("MIME type has surrounding whitespace", mime_type));
    }
    if mime_type.len() > MAX_MIME_TYPE_LEN {
        return Err(invalid("MIME type is too long", mime_type));
    }
    if let Some(url) = attachment.url()
        && url.contains(char::is_control)
    {
        return Err(invalid("URL contains control characters", url));
    }
    if let Some(id) = &attachment.content_id
        && id.contains(char::is_control)
    {
        return Err(invalid("Content-ID contains control characters", id));
    }
    Ok(())
}

fn invalid(reason: &str, value: &str) -> Error {
    Error::InvalidAttachment(format!("{reason}: {value:?}"))
}

/// Whether `uid` can be written as `Message-ID: <uid>` on one short line.
fn is_message_id(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= MAX_MESSAGE_ID_LEN
        && uid
            .bytes()
            .all(|b| b.is_ascii_graphic() && b != b'<' && b != b'>')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plain_note_is_single_part() {
        let note = Note::new().with_title("Shopping").with_uid("u1");
        let message = serialize(&CodecConfig::default(), &note).unwrap();

        assert!(message.parts.is_empty());
        assert_eq!(message.subject(), Some("Shopping"));
        assert_eq!(message.headers.get(UID_HEADER), Some("u1"));
        assert_eq!(message.message_id(), Some("u1"));
        assert_eq!(message.headers.get(CLASSIFICATION_HEADER), Some("Public"));
        assert!(message.content_type().unwrap().is("text", "plain"));
        assert_eq!(message.from(), None);
    }

    #[test]
    fn test_rich_note_uses_html() {
        let note = Note::new().with_text("<p>x</p>", TextFormat::Rich);
        let message = serialize(&CodecConfig::default(), &note).unwrap();
        assert!(message.content_type().unwrap().is("text", "html"));
    }

    #[test]
    fn test_dates_are_written() {
        let created = Utc.with_ymd_and_hms(2012, 3, 3, 3, 3, 3).unwrap();
        let modified = Utc.with_ymd_and_hms(2012, 3, 3, 4, 4, 4).unwrap();
        let note = Note::new()
            .with_creation_date(created)
            .with_last_modified_date(modified);
        let message = serialize(&CodecConfig::default(), &note).unwrap();

        assert_eq!(message.date(), Some("Sat, 3 Mar 2012 03:03:03 +0000"));
        assert_eq!(
            message.headers.get(LAST_MODIFIED_HEADER),
            Some("Sat, 3 Mar 2012 04:04:04 +0000")
        );
    }

    #[test]
    fn test_populate_defaults_disabled() {
        let config = CodecConfig::builder().populate_defaults(false).build();
        let message = serialize(&config, &Note::new()).unwrap();

        assert!(!message.headers.contains(UID_HEADER));
        assert!(!message.headers.contains("Message-ID"));
        assert!(message.date().is_none());
        assert!(!message.headers.contains(LAST_MODIFIED_HEADER));
    }

    #[test]
    fn test_serialize_does_not_touch_input() {
        let note = Note::new();
        let before = note.clone();
        let _ = serialize(&CodecConfig::default(), &note).unwrap();
        assert_eq!(note, before);
    }

    #[test]
    fn test_user_agent_header() {
        let config = CodecConfig::builder().user_agent("notewrap/0.1").build();
        let message = serialize(&config, &Note::new()).unwrap();
        assert_eq!(message.headers.get("user-agent"), Some("notewrap/0.1"));
    }

    #[test]
    fn test_date_out_of_range_is_an_error() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let note = Note::new().with_uid("u").with_creation_date(far);
        assert!(matches!(
            serialize(&CodecConfig::default(), &note),
            Err(Error::Mime(notewrap_mime::Error::InvalidDate(_)))
        ));

        let note = Note::new().with_uid("u").with_last_modified_date(far);
        assert!(serialize(&CodecConfig::default(), &note).is_err());
    }

    #[test]
    fn test_attachment_control_characters_rejected() {
        let cases = [
            Attachment::from_url("file:///a b\r\nX: y", "text/plain"),
            Attachment::from_data("d", "text/plain\r\nX-Injected: 1"),
            Attachment::from_data("d", "text/plain").with_content_id("a\nb"),
        ];
        for attachment in cases {
            let note = Note::new().with_attachment(attachment);
            assert!(matches!(
                serialize(&CodecConfig::default(), &note),
                Err(Error::InvalidAttachment(_))
            ));
        }
    }

    #[test]
    fn test_mime_type_surrounding_whitespace_rejected() {
        let note = Note::new().with_attachment(Attachment::from_data("d", " image/png "));
        assert!(matches!(
            serialize(&CodecConfig::default(), &note),
            Err(Error::InvalidAttachment(_))
        ));

        let note = Note::new().with_attachment(Attachment::from_data("d", "image/png;  x=1"));
        assert!(serialize(&CodecConfig::default(), &note).is_ok());
    }

    #[test]
    fn test_message_id_only_for_plain_uids() {
        let message = serialize(&CodecConfig::default(), &Note::new().with_uid("a b")).unwrap();
        assert!(!message.headers.contains("Message-ID"));
        assert_eq!(message.headers.get_decoded(UID_HEADER).unwrap().as_deref(), Some("a b"));

        let long = "x".repeat(200);
        let message = serialize(&CodecConfig::default(), &Note::new().with_uid(&long)).unwrap();
        assert!(!message.headers.contains("Message-ID"));
    }

    #[test]
    fn test_text_part_is_inline() {
        let note = Note::new().with_custom("k", "v");
        let message = serialize(&CodecConfig::default(), &note).unwrap();
        let disposition = message.parts[0].content_disposition().unwrap().unwrap();
        assert_eq!(disposition.kind, notewrap_mime::DispositionKind::Inline);
    }

    #[test]
    fn test_part_layout() {
        let note = Note::new()
            .with_custom("key", "value")
            .with_attachment(Attachment::from_url("file://a", "text/x-a"))
            .with_attachment(
                Attachment::from_data("data", "text/x-b")
                    .with_label("b.txt")
                    .with_content_id("b@note"),
            );
        let message = serialize(&CodecConfig::default(), &note).unwrap();

        assert!(message.is_multipart().unwrap());
        assert_eq!(message.parts.len(), 4);

        let text = &message.parts[0];
        assert!(!text.headers.contains(PART_HEADER));

        let custom = &message.parts[1];
        assert_eq!(custom.headers.get(PART_HEADER), Some(PART_CUSTOM));
        assert_eq!(custom.body_text().unwrap(), r#"{"key":"value"}"#);

        let url = &message.parts[2];
        assert!(url.content_type().unwrap().is("message", "external-body"));
        assert_eq!(url.headers.get("content-disposition"), Some("attachment"));

        let inline = &message.parts[3];
        assert_eq!(inline.headers.get("content-type"), Some("text/x-b"));
        assert_eq!(inline.decode_body().unwrap(), b"data");
        assert_eq!(inline.content_id(), Some("b@note"));
        assert_eq!(
            inline.content_disposition().unwrap().unwrap().filename.as_deref(),
            Some("b.txt")
        );
    }
}
