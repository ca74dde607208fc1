//! Message composition and SMTP relay transport for Courier.
//!
//! This crate holds the delivery half of the adapter: [`compose`] builds the
//! raw message bytes, [`SmtpTransport`] runs the submission dialog against a
//! relay, and [`SmtpSender`] ties the two together behind the [`EmailSender`]
//! capability trait consumed by the command handler.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use courier_smtp::{EmailSender, SmtpConfig, SmtpSender};
//!
//! # async fn send() -> Result<(), courier_smtp::SendError> {
//! let sender = SmtpSender::new(SmtpConfig::new("mail.example.com:25"));
//! sender
//!     .send(
//!         "noreply@example.com",
//!         &["user@example.com".to_owned()],
//!         "Hello",
//!         "Welcome aboard",
//!         false,
//!     )
//!     .await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod sender;
pub mod transport;

pub use config::SmtpConfig;
pub use error::{ConfigError, SendError, TransportError};
pub use message::{ComposedMessage, compose};
pub use sender::{EmailSender, SmtpSender};
pub use transport::{SmtpConnection, SmtpTransport};
