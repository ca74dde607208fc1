const CRLF: &str = "\r\n";

/// A fully headered email message, ready for the transport's data step.
///
/// Built once per request by [`compose`] and consumed once by
/// [`SmtpTransport::deliver`](crate::transport::SmtpTransport::deliver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage(Vec<u8>);

impl ComposedMessage {
    /// The raw message bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the message, yielding its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Build the raw message for a send request.
///
/// Headers are emitted in a fixed order, each CRLF-terminated, followed by a
/// blank separator line and the body verbatim. The trailing semicolons on the
/// `MIME-version` and `Content-Type` values are part of the wire shape
/// downstream readers expect; do not "fix" them.
pub fn compose(from: &str, to: &[String], subject: &str, body: &str, is_html: bool) -> ComposedMessage {
    let content_type = if is_html {
        "text/html; charset=\"UTF-8\";"
    } else {
        "text/plain; charset=\"UTF-8\";"
    };

    let mut msg = String::new();
    push_header(&mut msg, "MIME-version", "1.0;");
    push_header(&mut msg, "Content-Type", content_type);
    push_header(&mut msg, "From", from);
    push_header(&mut msg, "To", &to.join(", "));
    push_header(&mut msg, "Subject", subject);
    msg.push_str(CRLF);

    let mut bytes = msg.into_bytes();
    bytes.extend_from_slice(body.as_bytes());
    ComposedMessage(bytes)
}

fn push_header(msg: &mut String, name: &str, value: &str) {
    msg.push_str(name);
    msg.push_str(": ");
    msg.push_str(value);
    msg.push_str(CRLF);
}
