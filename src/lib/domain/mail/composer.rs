//! Message composition

use std::{fs, io, path::Path};

use tracing::{info, warn};

use super::{
    email_address::EmailAddress,
    errors::AttachmentWarning,
    message::{AttachmentPart, BodyPart, ComposedMessage},
    request::MessageRequest,
};

/// Compose a message from a request.
///
/// Never fails: attachments that cannot be read are left out and reported in
/// [`ComposedMessage::warnings`]. Bcc recipients are not part of the message.
pub fn compose(request: &MessageRequest) -> ComposedMessage {
    let mut attachments = Vec::with_capacity(request.attachments.len());
    let mut warnings = Vec::new();

    for path in &request.attachments {
        match read_attachment(path) {
            Ok(attachment) => {
                info!("Attached: {}", attachment.filename);

                attachments.push(attachment);
            }
            Err(warning) => {
                warn!("{warning}");

                warnings.push(warning);
            }
        }
    }

    ComposedMessage {
        from: request.sender.address().clone(),
        to: request.recipient.clone(),
        subject: request.subject.clone(),
        cc: request.cc.clone(),
        body: BodyPart {
            format: request.body_format,
            content: request.body.clone(),
        },
        attachments,
        warnings,
    }
}

/// Every address the message is delivered to: the recipient, then cc, then bcc,
/// without duplicate bare addresses
pub fn recipient_envelope(request: &MessageRequest) -> Vec<EmailAddress> {
    let mut envelope: Vec<EmailAddress> = Vec::new();

    for address in std::iter::once(&request.recipient)
        .chain(&request.cc)
        .chain(&request.bcc)
    {
        let bare = address.address();

        if !envelope.iter().any(|seen| seen.address() == bare) {
            envelope.push(address.clone());
        }
    }

    envelope
}

fn read_attachment(path: &Path) -> Result<AttachmentPart, AttachmentWarning> {
    let unavailable = |reason: String| AttachmentWarning {
        path: path.to_path_buf(),
        reason,
    };

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| unavailable("path has no file name".to_string()))?;

    let data = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => unavailable("file not found".to_string()),
        _ => unavailable(err.to_string()),
    })?;

    Ok(AttachmentPart { filename, data })
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write, path::PathBuf};

    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::domain::mail::{
        errors::FailureKind, identity::SenderIdentity, request::BodyFormat,
    };

    use super::*;

    fn request() -> TestResult<MessageRequest> {
        Ok(MessageRequest::new(
            SenderIdentity::new("me@gmail.com", "secret")?,
            EmailAddress::new("r@x.com")?,
            "Test",
            "Hello",
        ))
    }

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> TestResult<PathBuf> {
        let path = dir.path().join(name);
        File::create(&path)?.write_all(contents)?;

        Ok(path)
    }

    #[test]
    fn test_compose_plain_message() -> TestResult {
        let message = compose(&request()?);

        assert_eq!(message.from.as_str(), "me@gmail.com");
        assert_eq!(message.to.as_str(), "r@x.com");
        assert_eq!(message.subject, "Test");
        assert_eq!(message.body.format, BodyFormat::Plain);
        assert_eq!(message.body.content, "Hello");
        assert!(message.attachments.is_empty());
        assert!(message.warnings.is_empty());

        Ok(())
    }

    #[test]
    fn test_compose_html_message() -> TestResult {
        let message = compose(&request()?.with_format(BodyFormat::Html));

        assert_eq!(message.body.format, BodyFormat::Html);

        Ok(())
    }

    #[test]
    fn test_compose_with_cc() -> TestResult {
        let cc = EmailAddress::parse_all(&["a@x.com", "b@x.com"])?;
        let request = request()?.with_cc(cc);

        let message = compose(&request);

        assert_eq!(message.cc_header(), Some("a@x.com, b@x.com".to_string()));
        assert_eq!(
            recipient_envelope(&request),
            EmailAddress::parse_all(&["r@x.com", "a@x.com", "b@x.com"])?
        );

        Ok(())
    }

    #[test]
    fn test_bcc_is_hidden_from_headers_but_in_envelope() -> TestResult {
        let request = request()?.with_bcc(EmailAddress::parse_all(&["s@x.com"])?);

        let message = compose(&request);

        assert_eq!(message.cc_header(), None);
        assert!(message
            .headers()
            .iter()
            .all(|(name, value)| *name != "Bcc" && !value.contains("s@x.com")));

        let formatted = String::from_utf8(message.formatted()?)?;
        assert!(!formatted.contains("Bcc"));
        assert!(!formatted.contains("s@x.com"));

        assert!(recipient_envelope(&request).contains(&EmailAddress::new("s@x.com")?));

        Ok(())
    }

    #[test]
    fn test_envelope_removes_duplicates() -> TestResult {
        let request = request()?
            .with_cc(EmailAddress::parse_all(&["a@x.com", "r@x.com"])?)
            .with_bcc(EmailAddress::parse_all(&["a@x.com", "s@x.com"])?);

        assert_eq!(
            recipient_envelope(&request),
            EmailAddress::parse_all(&["r@x.com", "a@x.com", "s@x.com"])?
        );

        Ok(())
    }

    #[test]
    fn test_envelope_compares_bare_addresses() -> TestResult {
        let request =
            request()?.with_cc(EmailAddress::parse_all(&["Rita <r@x.com>", "a@x.com"])?);

        assert_eq!(
            recipient_envelope(&request),
            EmailAddress::parse_all(&["r@x.com", "a@x.com"])?
        );

        Ok(())
    }

    #[test]
    fn test_compose_attachments_named_by_basename() -> TestResult {
        let dir = tempfile::tempdir()?;
        let report = write_file(&dir, "report.pdf", b"%PDF-1.4")?;
        let notes = write_file(&dir, "notes.txt", b"notes")?;

        let message = compose(&request()?.with_attachments([report, notes]));

        assert_eq!(
            message.attachments,
            vec![
                AttachmentPart {
                    filename: "report.pdf".to_string(),
                    data: b"%PDF-1.4".to_vec(),
                },
                AttachmentPart {
                    filename: "notes.txt".to_string(),
                    data: b"notes".to_vec(),
                },
            ]
        );
        assert!(message.warnings.is_empty());

        Ok(())
    }

    #[test]
    fn test_unreadable_attachment_is_skipped_with_warning() -> TestResult {
        let dir = tempfile::tempdir()?;
        let report = write_file(&dir, "report.pdf", b"%PDF-1.4")?;

        let message = compose(
            &request()?.with_attachments([PathBuf::from("/nonexistent/path"), report]),
        );

        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].filename, "report.pdf");
        assert_eq!(
            message.warnings,
            vec![AttachmentWarning {
                path: PathBuf::from("/nonexistent/path"),
                reason: "file not found".to_string(),
            }]
        );
        assert_eq!(message.warnings[0].kind(), FailureKind::AttachmentUnavailable);

        Ok(())
    }

    #[test]
    fn test_directory_attachment_is_skipped() -> TestResult {
        let dir = tempfile::tempdir()?;

        let message = compose(&request()?.with_attachments([dir.path()]));

        assert!(message.attachments.is_empty());
        assert_eq!(message.warnings.len(), 1);

        Ok(())
    }

    #[test]
    fn test_compose_is_idempotent() -> TestResult {
        let dir = tempfile::tempdir()?;
        let report = write_file(&dir, "report.pdf", b"%PDF-1.4")?;

        let request = request()?
            .with_cc(EmailAddress::parse_all(&["a@x.com"])?)
            .with_attachments([report]);

        assert_eq!(compose(&request), compose(&request));

        Ok(())
    }
}
