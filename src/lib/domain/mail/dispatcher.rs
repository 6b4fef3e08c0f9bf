//! Message delivery

use std::sync::Arc;

use tracing::{error, info};

use super::{
    composer::{compose, recipient_envelope},
    errors::DeliveryError,
    message::ComposedMessage,
    outcome::DeliveryOutcome,
    relay::{ScopedConnection, SubmissionRelay},
    request::MessageRequest,
};

/// Gmail's SMTP relay
pub const DEFAULT_HOST: &str = "smtp.gmail.com";

/// The SMTP submission port (STARTTLS)
pub const DEFAULT_PORT: u16 = 587;

/// Where messages are submitted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayEndpoint {
    /// The relay host name
    pub host: String,

    /// The submission port
    pub port: u16,
}

impl Default for RelayEndpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Composes messages and submits them to a relay.
///
/// Holds no per-send state, so one dispatcher can serve any number of
/// sequential or concurrent sends.
#[derive(Debug)]
pub struct Dispatcher<R>
where
    R: SubmissionRelay,
{
    relay: Arc<R>,
    endpoint: RelayEndpoint,
}

impl<R> Clone for Dispatcher<R>
where
    R: SubmissionRelay,
{
    fn clone(&self) -> Self {
        Self {
            relay: self.relay.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

impl<R> Dispatcher<R>
where
    R: SubmissionRelay,
{
    /// Create a new dispatcher
    pub fn new(relay: Arc<R>, endpoint: RelayEndpoint) -> Self {
        Self { relay, endpoint }
    }

    /// Compose and deliver a message.
    ///
    /// Blocks until the relay session is over. The connection is closed before
    /// this returns, whatever the outcome. Failures are reported in the
    /// returned [`DeliveryOutcome`], never as a panic or an `Err`.
    pub fn send(&self, request: &MessageRequest) -> DeliveryOutcome {
        let message = compose(request);
        let warnings = message.warnings.clone();
        let recipient = request.recipient.to_string();

        match self.deliver(request, &message) {
            Ok(()) => {
                info!("Email sent successfully to {recipient}");

                DeliveryOutcome::delivered(recipient, warnings)
            }
            Err(err) => {
                error!(kind = ?err.kind(), "{err}");

                DeliveryOutcome::failed(recipient, err, warnings)
            }
        }
    }

    fn deliver(
        &self,
        request: &MessageRequest,
        message: &ComposedMessage,
    ) -> Result<(), DeliveryError> {
        let formatted = message.formatted()?;
        let envelope = recipient_envelope(request);
        let RelayEndpoint { host, port } = &self.endpoint;

        info!("Connecting to {host}:{port}...");
        let mut connection = ScopedConnection::open(self.relay.as_ref(), host, *port)?;

        info!("Starting TLS encryption...");
        connection.upgrade_to_tls()?;

        info!("Logging in...");
        connection.authenticate(&request.sender)?;

        info!("Sending email...");
        connection.transmit(request.sender.address(), &envelope, &formatted)?;

        Ok(())
    }
}
