//! Mail relay abstraction

use std::ops::{Deref, DerefMut};

#[cfg(test)]
use mockall::mock;

use super::{email_address::EmailAddress, errors::RelayError, identity::SenderIdentity};

/// Opens connections to an SMTP submission relay
pub trait SubmissionRelay: Send + Sync + 'static {
    /// Connect to the relay
    ///
    /// # Arguments
    /// * `host` - The relay host name.
    /// * `port` - The submission port.
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn RelayConnection>, RelayError>;
}

/// An open session with a relay
pub trait RelayConnection: Send {
    /// Upgrade the session to TLS (`STARTTLS`)
    fn upgrade_to_tls(&mut self) -> Result<(), RelayError>;

    /// Authenticate as `identity`
    fn authenticate(&mut self, identity: &SenderIdentity) -> Result<(), RelayError>;

    /// Send a serialized message to every address in `recipients`
    fn transmit(
        &mut self,
        sender: &EmailAddress,
        recipients: &[EmailAddress],
        message: &[u8],
    ) -> Result<(), RelayError>;

    /// End the session. Must tolerate a session that already failed.
    fn close(&mut self);
}

/// A relay connection that is closed when dropped
pub struct ScopedConnection {
    inner: Box<dyn RelayConnection>,
}

impl ScopedConnection {
    /// Open a scoped connection through `relay`
    pub fn open<R: SubmissionRelay + ?Sized>(
        relay: &R,
        host: &str,
        port: u16,
    ) -> Result<Self, RelayError> {
        Ok(Self {
            inner: relay.connect(host, port)?,
        })
    }
}

impl Deref for ScopedConnection {
    type Target = dyn RelayConnection;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DerefMut for ScopedConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.as_mut()
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        self.inner.close();
    }
}

impl std::fmt::Debug for ScopedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedConnection").finish_non_exhaustive()
    }
}

#[cfg(test)]
mock! {
    pub SubmissionRelay {}

    impl SubmissionRelay for SubmissionRelay {
        fn connect(&self, host: &str, port: u16) -> Result<Box<dyn RelayConnection>, RelayError>;
    }
}

#[cfg(test)]
mock! {
    pub RelayConnection {}

    impl RelayConnection for RelayConnection {
        fn upgrade_to_tls(&mut self) -> Result<(), RelayError>;
        fn authenticate(&mut self, identity: &SenderIdentity) -> Result<(), RelayError>;
        fn transmit(
            &mut self,
            sender: &EmailAddress,
            recipients: &[EmailAddress],
            message: &[u8],
        ) -> Result<(), RelayError>;
        fn close(&mut self);
    }
}
