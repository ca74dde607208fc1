use serde::{Deserialize, Serialize};

use crate::command::SendRequest;

/// Payload of an `EmailSent` event: the originating request echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSentPayload {
    #[serde(flatten)]
    pub request: SendRequest,
}

/// Payload of a `SendEmailFailed` event: the originating request plus the
/// stringified failure reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailFailedPayload {
    #[serde(flatten)]
    pub request: SendRequest,

    /// Why the send failed.
    pub err: String,
}

/// Terminal result of a successfully decoded `SendEmail` command.
///
/// Every decoded command produces exactly one of these; both variants echo
/// the request fields so the host can correlate the event with its command
/// without keeping state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultEvent {
    /// The relay accepted the message.
    EmailSent(EmailSentPayload),
    /// The send failed at some step; the payload carries the reason.
    SendEmailFailed(SendEmailFailedPayload),
}

impl ResultEvent {
    /// Build an `EmailSent` event from the request it completes.
    #[must_use]
    pub fn sent(request: SendRequest) -> Self {
        Self::EmailSent(EmailSentPayload { request })
    }

    /// Build a `SendEmailFailed` event from the request and failure reason.
    #[must_use]
    pub fn failed(request: SendRequest, err: impl Into<String>) -> Self {
        Self::SendEmailFailed(SendEmailFailedPayload {
            request,
            err: err.into(),
        })
    }

    /// Host-facing event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::EmailSent(_) => "EmailSent",
            Self::SendEmailFailed(_) => "SendEmailFailed",
        }
    }
}

/// Outcome of one command invocation.
///
/// A decodable command always yields an [`Event`](Self::Event); input that
/// cannot be parsed yields [`Fatal`](Self::Fatal) instead, a separate channel
/// so a malformed command is never mistaken for a delivery failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// One of the two terminal result events.
    Event(ResultEvent),
    /// The inbound payload could not be decoded.
    Fatal { message: String },
}

impl CommandOutcome {
    /// Build a fatal outcome from a decode-error message.
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SendRequest {
        SendRequest {
            from: "flyte@email.com".to_owned(),
            to: vec!["dude@email.com".to_owned()],
            subject: "Welcome".to_owned(),
            body: "Yo!!!".to_owned(),
            is_html: true,
        }
    }

    #[test]
    fn event_names() {
        assert_eq!(ResultEvent::sent(request()).name(), "EmailSent");
        assert_eq!(ResultEvent::failed(request(), "boom").name(), "SendEmailFailed");
    }

    #[test]
    fn sent_payload_flattens_request_fields() {
        let ResultEvent::EmailSent(payload) = ResultEvent::sent(request()) else {
            panic!("expected EmailSent");
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "flyte@email.com",
                "to": ["dude@email.com"],
                "subject": "Welcome",
                "body": "Yo!!!",
                "isHtmlEmail": true
            })
        );
    }

    #[test]
    fn failed_payload_adds_err_field() {
        let ResultEvent::SendEmailFailed(payload) = ResultEvent::failed(request(), "boom") else {
            panic!("expected SendEmailFailed");
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["err"], serde_json::json!("boom"));
        assert_eq!(json["from"], serde_json::json!("flyte@email.com"));
        assert_eq!(json["isHtmlEmail"], serde_json::json!(true));
    }

    #[test]
    fn fatal_outcome_carries_message() {
        let outcome = CommandOutcome::fatal("could not decode");
        assert_eq!(
            outcome,
            CommandOutcome::Fatal {
                message: "could not decode".to_owned()
            }
        );
    }
}
