//! Mailer service module

use async_trait::async_trait;
use tracing::error;

#[cfg(test)]
use mockall::mock;

use super::{
    dispatcher::Dispatcher, errors::DeliveryError, outcome::DeliveryOutcome,
    relay::SubmissionRelay, request::MessageRequest,
};

/// Mailer service for callers running on a tokio runtime
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `request` - The [`MessageRequest`] describing the message and its sender.
    ///
    /// # Returns
    /// A [`DeliveryOutcome`]. Failures are reported in the outcome, never as a panic.
    async fn send_email(&self, request: MessageRequest) -> DeliveryOutcome;
}

#[async_trait]
impl<R> Mailer for Dispatcher<R>
where
    R: SubmissionRelay,
{
    async fn send_email(&self, request: MessageRequest) -> DeliveryOutcome {
        let dispatcher = self.clone();
        let recipient = request.recipient.to_string();

        match tokio::task::spawn_blocking(move || dispatcher.send(&request)).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("send task failed: {err}");

                DeliveryOutcome::failed(
                    recipient,
                    DeliveryError::Unclassified(err.to_string()),
                    Vec::new(),
                )
            }
        }
    }
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, request: MessageRequest) -> DeliveryOutcome;
    }
}
