use courier_core::{CommandOutcome, ResultEvent, SendRequest};
use courier_smtp::EmailSender;
use tracing::{error, info, instrument};

/// Name the host registers this command under.
pub const COMMAND_NAME: &str = "SendEmail";

/// Handles `SendEmail` commands: decodes the inbound payload, invokes the
/// injected [`EmailSender`], and maps the result onto exactly one
/// [`CommandOutcome`].
pub struct SendEmailHandler {
    sender: Box<dyn EmailSender>,
}

impl SendEmailHandler {
    /// Create a handler dispatching through the given sender.
    pub fn new(sender: Box<dyn EmailSender>) -> Self {
        Self { sender }
    }

    /// Handle one raw command payload.
    ///
    /// Undecodable input yields [`CommandOutcome::Fatal`]; a decoded request
    /// always yields either an `EmailSent` or a `SendEmailFailed` event
    /// echoing the request fields.
    #[instrument(skip_all, fields(command = COMMAND_NAME))]
    pub async fn handle(&self, raw: &[u8]) -> CommandOutcome {
        let request: SendRequest = match serde_json::from_slice(raw) {
            Ok(request) => request,
            Err(err) => {
                let message = format!("could not decode '{COMMAND_NAME}' command input: {err}");
                error!("{message}");
                return CommandOutcome::fatal(message);
            }
        };

        match self
            .sender
            .send(
                &request.from,
                &request.to,
                &request.subject,
                &request.body,
                request.is_html,
            )
            .await
        {
            Ok(()) => {
                info!(from = %request.from, recipients = request.to.len(), "email sent");
                CommandOutcome::Event(ResultEvent::sent(request))
            }
            Err(err) => {
                error!(error = %err, from = %request.from, "send failed");
                CommandOutcome::Event(ResultEvent::failed(request, err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use courier_smtp::{SendError, TransportError};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct RecordedSend {
        from: String,
        to: Vec<String>,
        subject: String,
        body: String,
        is_html: bool,
    }

    type Recorder = Arc<Mutex<Option<RecordedSend>>>;

    /// Sender double that records its arguments and fails on demand. The
    /// recorder handle outlives the handler that owns the boxed mock.
    struct MockSender {
        fail_with: Option<String>,
        seen: Recorder,
    }

    impl MockSender {
        fn succeeding() -> (Self, Recorder) {
            let seen = Recorder::default();
            (
                Self {
                    fail_with: None,
                    seen: Arc::clone(&seen),
                },
                seen,
            )
        }

        fn failing(reason: &str) -> Self {
            Self {
                fail_with: Some(reason.to_owned()),
                seen: Recorder::default(),
            }
        }
    }

    #[async_trait]
    impl EmailSender for MockSender {
        async fn send(
            &self,
            from: &str,
            to: &[String],
            subject: &str,
            body: &str,
            is_html: bool,
        ) -> Result<(), SendError> {
            *self.seen.lock().unwrap() = Some(RecordedSend {
                from: from.to_owned(),
                to: to.to_vec(),
                subject: subject.to_owned(),
                body: body.to_owned(),
                is_html,
            });
            match &self.fail_with {
                Some(reason) => Err(SendError::Transport(TransportError::Io(io::Error::other(
                    reason.clone(),
                )))),
                None => Ok(()),
            }
        }
    }

    fn input() -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "from": "flyte@email.com",
            "to": ["dude@email.com"],
            "subject": "Welcome",
            "body": "Yo!!!",
            "isHtmlEmail": true
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn successful_send_emits_email_sent_event() {
        let (mock, _seen) = MockSender::succeeding();
        let handler = SendEmailHandler::new(Box::new(mock));

        let outcome = handler.handle(&input()).await;
        let CommandOutcome::Event(event) = outcome else {
            panic!("expected an event, got {outcome:?}");
        };
        assert_eq!(event.name(), "EmailSent");
        let payload = serde_json::to_value(&event).unwrap()["EmailSent"].clone();
        assert_eq!(
            payload,
            serde_json::json!({
                "from": "flyte@email.com",
                "to": ["dude@email.com"],
                "subject": "Welcome",
                "body": "Yo!!!",
                "isHtmlEmail": true
            })
        );
    }

    #[tokio::test]
    async fn decoded_fields_reach_the_sender() {
        let (mock, seen) = MockSender::succeeding();
        let handler = SendEmailHandler::new(Box::new(mock));
        handler.handle(&input()).await;

        let recorded = seen.lock().unwrap().clone().expect("sender never invoked");
        assert_eq!(
            recorded,
            RecordedSend {
                from: "flyte@email.com".to_owned(),
                to: vec!["dude@email.com".to_owned()],
                subject: "Welcome".to_owned(),
                body: "Yo!!!".to_owned(),
                is_html: true,
            }
        );
    }

    #[tokio::test]
    async fn failed_send_emits_send_email_failed_event() {
        let handler = SendEmailHandler::new(Box::new(MockSender::failing("boom")));

        let outcome = handler.handle(&input()).await;
        let CommandOutcome::Event(event) = outcome else {
            panic!("expected an event, got {outcome:?}");
        };
        assert_eq!(event.name(), "SendEmailFailed");
        let payload = serde_json::to_value(&event).unwrap()["SendEmailFailed"].clone();
        assert_eq!(payload["err"], serde_json::json!("boom"));
        assert_eq!(payload["from"], serde_json::json!("flyte@email.com"));
        assert_eq!(payload["to"], serde_json::json!(["dude@email.com"]));
        assert_eq!(payload["subject"], serde_json::json!("Welcome"));
        assert_eq!(payload["body"], serde_json::json!("Yo!!!"));
        assert_eq!(payload["isHtmlEmail"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn malformed_input_is_fatal_and_never_reaches_the_sender() {
        let (mock, seen) = MockSender::succeeding();
        let handler = SendEmailHandler::new(Box::new(mock));

        let outcome = handler.handle(br#"{"dodgy-json}"#).await;
        let CommandOutcome::Fatal { message } = outcome else {
            panic!("expected Fatal, got {outcome:?}");
        };
        assert!(message.contains("SendEmail"));
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn omitted_html_flag_defaults_to_plain_text() {
        let raw = serde_json::to_vec(&serde_json::json!({
            "from": "flyte@email.com",
            "to": ["dude@email.com"],
            "subject": "Welcome",
            "body": "Yo!!!"
        }))
        .unwrap();

        let (mock, seen) = MockSender::succeeding();
        let handler = SendEmailHandler::new(Box::new(mock));
        let outcome = handler.handle(&raw).await;
        let CommandOutcome::Event(event) = outcome else {
            panic!("expected an event, got {outcome:?}");
        };
        let payload = serde_json::to_value(&event).unwrap()["EmailSent"].clone();
        assert_eq!(payload["isHtmlEmail"], serde_json::json!(false));
        let recorded = seen.lock().unwrap().clone().expect("sender never invoked");
        assert!(!recorded.is_html);
    }
}
