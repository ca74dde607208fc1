use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::config::SmtpConfig;
use crate::error::TransportError;
use crate::message::ComposedMessage;

/// One parsed relay reply: the final code and the joined reply text.
#[derive(Debug)]
struct SmtpReply {
    code: u16,
    message: String,
}

/// An SMTP submission session over an established byte stream.
///
/// Generic over the stream so tests can drive the dialog through an
/// in-memory pipe; production use goes through [`SmtpTransport`], which dials
/// a [`TcpStream`]. The session owns the stream, so dropping the session on
/// any exit path closes the connection.
#[derive(Debug)]
pub struct SmtpConnection<S> {
    stream: BufStream<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> SmtpConnection<S> {
    /// Take over a freshly opened stream: consume the `220` greeting and
    /// introduce ourselves with `EHLO`.
    pub async fn open(stream: S, hello_name: &str) -> Result<Self, TransportError> {
        let mut session = Self {
            stream: BufStream::new(stream),
        };
        session.expect("greeting", &[220]).await?;
        session.send_line(&format!("EHLO {hello_name}")).await?;
        session.expect("EHLO", &[250]).await?;
        Ok(session)
    }

    /// Declare the envelope sender.
    pub async fn mail_from(&mut self, from: &str) -> Result<(), TransportError> {
        self.send_line(&format!("MAIL FROM:<{from}>")).await?;
        self.expect("MAIL FROM", &[250]).await?;
        Ok(())
    }

    /// Declare one envelope recipient. `251` (user not local, will forward)
    /// counts as acceptance.
    pub async fn rcpt_to(&mut self, recipient: &str) -> Result<(), TransportError> {
        self.send_line(&format!("RCPT TO:<{recipient}>")).await?;
        self.expect("RCPT TO", &[250, 251]).await?;
        Ok(())
    }

    /// Transmit the message: open the data channel, write the payload
    /// dot-stuffed, and close the channel with the `.` end-of-data marker.
    pub async fn data(&mut self, message: &[u8]) -> Result<(), TransportError> {
        self.send_line("DATA").await?;
        self.expect("DATA", &[354]).await?;
        self.stream.write_all(&dot_stuff(message)).await?;
        self.stream.write_all(b".\r\n").await?;
        self.stream.flush().await?;
        self.expect("end of data", &[250]).await?;
        Ok(())
    }

    /// Terminate the session. Consumes the connection either way.
    pub async fn quit(mut self) -> Result<(), TransportError> {
        self.send_line("QUIT").await?;
        self.expect("QUIT", &[221]).await?;
        Ok(())
    }

    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        trace!(%line, "client");
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn expect(
        &mut self,
        command: &'static str,
        accepted: &[u16],
    ) -> Result<SmtpReply, TransportError> {
        let reply = self.read_reply().await?;
        if accepted.contains(&reply.code) {
            Ok(reply)
        } else {
            Err(TransportError::Rejected {
                command,
                code: reply.code,
                message: reply.message,
            })
        }
    }

    /// Read one reply, following `250-`-style continuation lines until the
    /// final line (code followed by a space, or a bare code).
    async fn read_reply(&mut self) -> Result<SmtpReply, TransportError> {
        let mut message = String::new();
        loop {
            let mut line = String::new();
            if self.stream.read_line(&mut line).await? == 0 {
                return Err(TransportError::ConnectionClosed);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            let code: u16 = line
                .get(..3)
                .and_then(|digits| digits.parse().ok())
                .ok_or_else(|| TransportError::MalformedReply(line.to_owned()))?;
            let text = line.get(4..).unwrap_or("");
            trace!(code, %text, "relay");
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(text);
            if line.as_bytes().get(3) != Some(&b'-') {
                return Ok(SmtpReply { code, message });
            }
        }
    }
}

/// Prepare a message payload for the data channel: double any `.` at the
/// start of a line, normalize bare `\n` to CRLF, and make sure the payload
/// ends with CRLF so the `.` end-of-data marker lands on its own line.
fn dot_stuff(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.len() + 4);
    let mut at_line_start = true;
    let mut prev = 0u8;
    for &byte in message {
        if at_line_start && byte == b'.' {
            out.push(b'.');
        }
        if byte == b'\n' && prev != b'\r' {
            out.push(b'\r');
        }
        out.push(byte);
        at_line_start = byte == b'\n';
        prev = byte;
    }
    if !out.ends_with(b"\r\n") {
        out.extend_from_slice(b"\r\n");
    }
    out
}

/// SMTP transport client: runs one full submission transaction per call
/// against the relay fixed in its configuration.
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    /// Create a transport dialing the configured relay.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// The configured relay address.
    pub fn relay_addr(&self) -> &str {
        &self.config.relay_addr
    }

    /// Deliver a composed message to the given recipients.
    ///
    /// The connection is scoped to this call: dialed here, dropped (and so
    /// closed) on every exit path. Each protocol step short-circuits the
    /// rest on failure; there is no partial-success state, and a recipient
    /// rejection aborts the transaction before the data channel opens.
    pub async fn deliver(
        &self,
        from: &str,
        to: &[String],
        message: &ComposedMessage,
    ) -> Result<(), TransportError> {
        debug!(relay = %self.config.relay_addr, "dialing relay");
        let stream = TcpStream::connect(&self.config.relay_addr)
            .await
            .map_err(|source| TransportError::Connect {
                addr: self.config.relay_addr.clone(),
                source,
            })?;

        let mut session = SmtpConnection::open(stream, &self.config.hello_name).await?;
        session.mail_from(from).await?;
        for recipient in to {
            session.rcpt_to(recipient).await?;
        }
        session.data(message.as_bytes()).await?;
        session.quit().await
    }
}
