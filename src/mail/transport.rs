//! SMTP delivery

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        response::Response,
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::types::{OutgoingMail, TransportError, TransportReceipt};
use crate::config::{MailConfig, TlsMode};

/// Something that can deliver one plain-text message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<TransportReceipt, TransportError>;
}

/// Relay built once from configuration and shared by every request.
#[derive(Clone)]
pub struct SmtpTransport {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    host: String,
    port: u16,
    tls: TlsMode,
}

impl SmtpTransport {
    pub fn new(config: &MailConfig) -> Result<Self, TransportError> {
        // Fail at startup rather than on the first send
        config.from.parse::<Mailbox>()?;

        let builder = match config.tls {
            TlsMode::Opportunistic => {
                let tls = TlsParameters::new(config.host.clone())?;
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                    .tls(Tls::Opportunistic(tls))
            }
            TlsMode::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .timeout(Some(Duration::from_secs(config.timeout_seconds)))
            .build();

        tracing::info!(
            host = %config.host,
            port = config.port,
            tls = ?config.tls,
            "SMTP transport configured"
        );

        Ok(Self {
            transport: Arc::new(transport),
            host: config.host.clone(),
            port: config.port,
            tls: config.tls,
        })
    }
}

/// Build the plain-text message for `mail`
pub fn build_message(mail: &OutgoingMail) -> Result<Message, TransportError> {
    let from: Mailbox = mail.from.parse()?;
    let to: Mailbox = mail.to.parse()?;

    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.text.clone())?)
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<TransportReceipt, TransportError> {
        let message = build_message(mail)?;

        let response = self.transport.send(message).await.map_err(|e| {
            TransportError::Smtp(format!(
                "{} (host: {}:{}, tls: {:?})",
                e, self.host, self.port, self.tls
            ))
        })?;

        Ok(receipt(&response))
    }
}

fn receipt(response: &Response) -> TransportReceipt {
    TransportReceipt {
        code: response.code().to_string(),
        message: response.message().map(str::to_string).collect(),
    }
}
