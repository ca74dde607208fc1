//! The `SendEmail` command handler for the Courier email adapter.
//!
//! The embedding host registers [`SendEmailHandler`] under
//! [`COMMAND_NAME`](handler::COMMAND_NAME), routes raw command payloads to
//! [`handle`](handler::SendEmailHandler::handle), and publishes whatever
//! outcome comes back. The handler itself never panics and never produces
//! more than one outcome per invocation.

pub mod handler;

pub use handler::{COMMAND_NAME, SendEmailHandler};
