//! Mail composition and delivery.
//!
//! A [`MessageRequest`] is turned into a [`ComposedMessage`] by [`compose`], then
//! submitted to a relay by a [`Dispatcher`], which reports a [`DeliveryOutcome`].

mod composer;
mod dispatcher;
mod email_address;
mod errors;
mod identity;
mod mailer;
mod message;
mod outcome;
mod relay;
mod request;

pub use composer::{compose, recipient_envelope};
pub use dispatcher::{Dispatcher, RelayEndpoint, DEFAULT_HOST, DEFAULT_PORT};
pub use email_address::{EmailAddress, EmailAddressError};
pub use errors::{AttachmentWarning, DeliveryError, FailureKind, RelayError};
pub use identity::{Credential, IdentityError, SenderIdentity};
pub use mailer::Mailer;
pub use message::{AttachmentPart, BodyPart, ComposedMessage, ATTACHMENT_CONTENT_TYPE};
pub use outcome::DeliveryOutcome;
pub use relay::{RelayConnection, ScopedConnection, SubmissionRelay};
pub use request::{BodyFormat, MessageRequest};

