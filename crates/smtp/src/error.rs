use std::io;

use thiserror::Error;

/// Errors raised while executing the SMTP submission dialog.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TCP connection to the relay could not be opened.
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// An I/O failure while reading or writing the established session.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The relay closed the connection before completing a reply.
    #[error("relay closed the connection unexpectedly")]
    ConnectionClosed,

    /// The relay sent a line that is not a valid SMTP reply.
    #[error("malformed reply from relay: {0:?}")]
    MalformedReply(String),

    /// The relay answered a step with a non-accepted reply code.
    #[error("relay rejected {command}: {code} {message}")]
    Rejected {
        command: &'static str,
        code: u16,
        message: String,
    },
}

impl TransportError {
    /// Returns `true` if the failure is transient and a later attempt may
    /// succeed. SMTP 4yz replies are transient, 5yz are permanent; anything
    /// at the connection level is worth another try.
    ///
    /// Courier never retries itself; this is advice for whatever sits above.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connect { .. } | Self::Io(_) | Self::ConnectionClosed => true,
            Self::Rejected { code, .. } => (400..500).contains(code),
            Self::MalformedReply(_) => false,
        }
    }
}

/// Errors raised by an [`EmailSender`](crate::sender::EmailSender).
#[derive(Debug, Error)]
pub enum SendError {
    /// The request carried no recipients; no transaction was attempted.
    #[error("no recipients given")]
    NoRecipients,

    /// The transport failed; the underlying error is surfaced unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors raised while loading SMTP configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration variable was unset or empty.
    #[error("{0} is required")]
    MissingVar(&'static str),
}
