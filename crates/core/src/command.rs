use serde::{Deserialize, Serialize};

/// Decoded payload of a `SendEmail` command.
///
/// Field names on the wire follow the host contract: `from`, `to`, `subject`,
/// `body`, `isHtmlEmail`. The `isHtmlEmail` flag is optional and defaults to
/// `false` (plain text).
///
/// # Examples
///
/// ```
/// use courier_core::SendRequest;
///
/// let json = serde_json::json!({
///     "from": "noreply@example.com",
///     "to": ["user@example.com"],
///     "subject": "Hello",
///     "body": "Welcome aboard"
/// });
/// let request: SendRequest = serde_json::from_value(json).unwrap();
/// assert!(!request.is_html);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    /// Sender email address.
    pub from: String,

    /// Recipient email addresses, in the order they appear in the `To`
    /// header and the RCPT sequence.
    pub to: Vec<String>,

    /// Email subject line.
    pub subject: String,

    /// Email body, sent verbatim.
    pub body: String,

    /// Send the body as `text/html` instead of `text/plain`.
    #[serde(rename = "isHtmlEmail", default)]
    pub is_html: bool,
}
