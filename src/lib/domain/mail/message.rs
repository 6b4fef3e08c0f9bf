//! Composed email message

use lettre::message::{
    header::{ContentTransferEncoding, ContentType},
    Attachment, Body, MultiPart, SinglePart,
};

use super::{
    email_address::EmailAddress,
    errors::{AttachmentWarning, DeliveryError},
    request::BodyFormat,
};

/// MIME type every attachment is sent as
pub const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// The text or HTML part of a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyPart {
    /// Plain text or HTML
    pub format: BodyFormat,

    /// The body content
    pub content: String,
}

/// A file attached to a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentPart {
    /// Base name of the source file
    pub filename: String,

    /// Raw file contents, base64 encoded on the wire
    pub data: Vec<u8>,
}

/// A transport-ready email message.
///
/// Holds no Date or Message-ID, so two messages composed from the same request
/// compare equal. Those headers are added by [`ComposedMessage::to_message`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedMessage {
    /// The sender
    pub from: EmailAddress,

    /// The primary recipient
    pub to: EmailAddress,

    /// The subject
    pub subject: String,

    /// Visible carbon-copy recipients
    pub cc: Vec<EmailAddress>,

    /// The single text or HTML part
    pub body: BodyPart,

    /// Attachments that could be read
    pub attachments: Vec<AttachmentPart>,

    /// Attachments that were skipped
    pub warnings: Vec<AttachmentWarning>,
}

impl ComposedMessage {
    /// The `Cc` header value, if there are any CC recipients
    pub fn cc_header(&self) -> Option<String> {
        if self.cc.is_empty() {
            return None;
        }

        Some(
            self.cc
                .iter()
                .map(EmailAddress::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// The visible headers, in the order they are written
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("From", self.from.to_string()),
            ("To", self.to.to_string()),
            ("Subject", self.subject.clone()),
        ];

        if let Some(cc) = self.cc_header() {
            headers.push(("Cc", cc));
        }

        headers
    }

    /// Build the lettre message: a `multipart/mixed` body holding the text part
    /// followed by one part per attachment
    pub fn to_message(&self) -> Result<lettre::Message, DeliveryError> {
        let mut builder = lettre::Message::builder()
            .from(self.from.mailbox().clone())
            .to(self.to.mailbox().clone())
            .subject(self.subject.clone());

        for cc in &self.cc {
            builder = builder.cc(cc.mailbox().clone());
        }

        let body = match self.body.format {
            BodyFormat::Plain => SinglePart::plain(self.body.content.clone()),
            BodyFormat::Html => SinglePart::html(self.body.content.clone()),
        };

        let mut multipart = MultiPart::mixed().singlepart(body);

        for attachment in &self.attachments {
            multipart = multipart.singlepart(attachment.to_part()?);
        }

        Ok(builder.multipart(multipart)?)
    }

    /// Serialize the message to the bytes sent in the SMTP `DATA` command
    pub fn formatted(&self) -> Result<Vec<u8>, DeliveryError> {
        Ok(self.to_message()?.formatted())
    }
}

impl AttachmentPart {
    fn to_part(&self) -> Result<SinglePart, DeliveryError> {
        let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
            .map_err(|err| DeliveryError::Unclassified(err.to_string()))?;

        let body = Body::new_with_encoding(self.data.clone(), ContentTransferEncoding::Base64)
            .map_err(|_| {
                DeliveryError::Unclassified(format!("could not encode {}", self.filename))
            })?;

        Ok(Attachment::new(self.filename.clone()).body(body, content_type))
    }
}
