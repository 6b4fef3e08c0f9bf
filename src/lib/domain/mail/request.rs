//! Message request

use std::path::PathBuf;

use super::{email_address::EmailAddress, identity::SenderIdentity};

/// Format of the message body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyFormat {
    /// `text/plain`
    #[default]
    Plain,

    /// `text/html`
    Html,
}

impl BodyFormat {
    /// Pick the format from an "is HTML" flag
    pub fn from_html_flag(is_html: bool) -> Self {
        if is_html {
            Self::Html
        } else {
            Self::Plain
        }
    }
}

/// Everything needed to compose and deliver a single message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRequest {
    /// Who the message is sent from
    pub sender: SenderIdentity,

    /// The primary recipient (`To`)
    pub recipient: EmailAddress,

    /// The subject line, used verbatim
    pub subject: String,

    /// The message body
    pub body: String,

    /// Whether the body is plain text or HTML
    pub body_format: BodyFormat,

    /// Visible carbon-copy recipients
    pub cc: Vec<EmailAddress>,

    /// Blind carbon-copy recipients, only ever used in the envelope
    pub bcc: Vec<EmailAddress>,

    /// Files to attach
    pub attachments: Vec<PathBuf>,
}

impl MessageRequest {
    /// Create a plain text request with no extra recipients or attachments
    pub fn new(
        sender: SenderIdentity,
        recipient: EmailAddress,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            recipient,
            subject: subject.into(),
            body: body.into(),
            body_format: BodyFormat::Plain,
            cc: Vec::new(),
            bcc: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Set the body format
    pub fn with_format(mut self, body_format: BodyFormat) -> Self {
        self.body_format = body_format;
        self
    }

    /// Set the CC recipients
    pub fn with_cc(mut self, cc: Vec<EmailAddress>) -> Self {
        self.cc = cc;
        self
    }

    /// Set the BCC recipients
    pub fn with_bcc(mut self, bcc: Vec<EmailAddress>) -> Self {
        self.bcc = bcc;
        self
    }

    /// Set the attachment paths
    pub fn with_attachments<P: Into<PathBuf>>(
        mut self,
        attachments: impl IntoIterator<Item = P>,
    ) -> Self {
        self.attachments = attachments.into_iter().map(Into::into).collect();
        self
    }
}
