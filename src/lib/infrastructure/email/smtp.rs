//! SMTP relay implementation

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use clap::{ArgAction, Parser};
use lettre::{
    address::{Address, Envelope},
    transport::smtp::{
        authentication::{Credentials, DEFAULT_MECHANISMS},
        client::{SmtpConnection, TlsParameters},
        extension::ClientId,
        Error,
    },
};
use tracing::debug;

use crate::domain::mail::{
    BodyFormat, DeliveryError, DeliveryOutcome, Dispatcher, EmailAddress, IdentityError, Mailer,
    MessageRequest, RelayConnection, RelayEndpoint, RelayError, SenderIdentity, SubmissionRelay,
    DEFAULT_HOST, DEFAULT_PORT,
};

/// SMTP configuration
#[derive(Clone, Debug, Parser)]
pub struct SMTPConfig {
    /// The address to send from, also used as the SMTP username
    #[clap(long, env = "GMAIL_SENDER")]
    pub sender: Option<String>,

    /// The app password for the sender account
    #[clap(long, env = "GMAIL_APP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// The SMTP host
    #[clap(long, env = "SMTP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// The SMTP submission port
    #[clap(long, env = "SMTP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Network timeout for each SMTP command, in seconds
    #[clap(long, env = "SMTP_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value = "true", action = ArgAction::Set)]
    pub verify_tls: bool,
}

impl Default for SMTPConfig {
    fn default() -> Self {
        Self {
            sender: None,
            password: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_secs: 60,
            verify_tls: true,
        }
    }
}

impl SMTPConfig {
    /// The sender identity described by this configuration
    pub fn identity(&self) -> Result<SenderIdentity, IdentityError> {
        SenderIdentity::new(
            self.sender.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }

    /// Whether both the sender and its password are set and non-empty
    pub fn has_credentials(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

        present(&self.sender) && present(&self.password)
    }

    /// The relay endpoint described by this configuration
    pub fn endpoint(&self) -> RelayEndpoint {
        RelayEndpoint {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

/// Opens blocking SMTP sessions with lettre
#[derive(Clone, Debug)]
pub struct SmtpRelay {
    timeout: Option<Duration>,
    verify_tls: bool,
    hello_name: ClientId,
}

impl Default for SmtpRelay {
    fn default() -> Self {
        Self::new(&SMTPConfig::default())
    }
}

impl SmtpRelay {
    /// Create a new relay from the configuration
    pub fn new(config: &SMTPConfig) -> Self {
        Self {
            timeout: Some(Duration::from_secs(config.timeout_secs)),
            verify_tls: config.verify_tls,
            hello_name: ClientId::default(),
        }
    }
}

impl SubmissionRelay for SmtpRelay {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn RelayConnection>, RelayError> {
        let connection = SmtpConnection::connect(
            (host, port),
            self.timeout,
            &self.hello_name,
            None,
            None,
        )
        .map_err(protocol)?;

        Ok(Box::new(SmtpSession {
            connection,
            host: host.to_string(),
            verify_tls: self.verify_tls,
            hello_name: self.hello_name.clone(),
        }))
    }
}

struct SmtpSession {
    connection: SmtpConnection,
    host: String,
    verify_tls: bool,
    hello_name: ClientId,
}

impl RelayConnection for SmtpSession {
    fn upgrade_to_tls(&mut self) -> Result<(), RelayError> {
        let parameters = TlsParameters::builder(self.host.clone())
            .dangerous_accept_invalid_certs(!self.verify_tls)
            .build()
            .map_err(protocol)?;

        self.connection
            .starttls(&parameters, &self.hello_name)
            .map_err(protocol)
    }

    fn authenticate(&mut self, identity: &SenderIdentity) -> Result<(), RelayError> {
        let credentials = Credentials::new(
            identity.address().to_string(),
            identity.credential().expose().to_string(),
        );

        self.connection
            .auth(DEFAULT_MECHANISMS, &credentials)
            .map(|_| ())
            .map_err(|err| {
                if err.is_permanent() || err.is_transient() {
                    RelayError::Authentication(err.to_string())
                } else {
                    protocol(err)
                }
            })
    }

    fn transmit(
        &mut self,
        sender: &EmailAddress,
        recipients: &[EmailAddress],
        message: &[u8],
    ) -> Result<(), RelayError> {
        let envelope = envelope(sender, recipients)?;

        self.connection
            .send(&envelope, message)
            .map(|_| ())
            .map_err(protocol)
    }

    fn close(&mut self) {
        if let Err(err) = self.connection.quit() {
            debug!("QUIT failed: {err}");
        }

        self.connection.abort();
    }
}

/// Anything lettre reports during a session, including a missing STARTTLS or
/// AUTH extension, is an SMTP failure
fn protocol(err: Error) -> RelayError {
    RelayError::Transport(err.to_string())
}

fn envelope(sender: &EmailAddress, recipients: &[EmailAddress]) -> Result<Envelope, RelayError> {
    let to = recipients
        .iter()
        .map(|recipient| recipient.mailbox().email.clone())
        .collect::<Vec<Address>>();

    Envelope::new(Some(sender.mailbox().email.clone()), to)
        .map_err(|err| RelayError::Client(err.to_string()))
}

/// SMTP mailer
#[derive(Debug, Clone)]
pub struct SMTPMailer {
    dispatcher: Dispatcher<SmtpRelay>,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: &SMTPConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::new(SmtpRelay::new(config)), config.endpoint()),
        }
    }

    /// Send an email, blocking the current thread
    pub fn send_blocking(&self, request: &MessageRequest) -> DeliveryOutcome {
        self.dispatcher.send(request)
    }
}

impl Default for SMTPMailer {
    fn default() -> Self {
        Self::new(&SMTPConfig::default())
    }
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send_email(&self, request: MessageRequest) -> DeliveryOutcome {
        self.dispatcher.send_email(request).await
    }
}

/// Send a single plain text or HTML email through Gmail, with no copies or
/// attachments
pub fn send_simple_email(
    sender: &str,
    password: &str,
    recipient: &str,
    subject: &str,
    body: &str,
    is_html: bool,
) -> DeliveryOutcome {
    let request = || -> Result<MessageRequest, DeliveryError> {
        Ok(MessageRequest::new(
            SenderIdentity::new(sender, password)?,
            EmailAddress::new(recipient)?,
            subject,
            body,
        )
        .with_format(BodyFormat::from_html_flag(is_html)))
    };

    match request() {
        Ok(request) => SMTPMailer::default().send_blocking(&request),
        Err(err) => DeliveryOutcome::failed(recipient, err, Vec::new()),
    }
}
