use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{error::NotifyError, services::traits::Notifier};

const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends alert emails as HTML through an authenticated SMTP relay.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Result<Self, NotifyError> {
        let builder = if port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let transport = builder
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        let from = parse_mailbox(username)?;

        Ok(Self { transport, from })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse::<Mailbox>().map_err(|e| NotifyError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| NotifyError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(())
    }
}
