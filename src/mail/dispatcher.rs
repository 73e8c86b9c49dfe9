//! Send/preview dispatch

use std::sync::Arc;

use serde_json::Value;

use super::compose::gmail_compose_url;
use super::transport::MailTransport;
use super::types::{ComposedMail, DispatchError, DispatchOutcome, EmailRequest, OutgoingMail};
use super::validator::{validate, AddressPolicy};
use crate::error::{AppError, FieldError};
use crate::metrics::MailMetrics;
use crate::template::{placeholders, TemplateError, TemplateStore, VariableBindings};

/// Turns a validated request into either a delivered message or a compose link.
pub struct MailDispatcher {
    templates: Arc<TemplateStore>,
    transport: Arc<dyn MailTransport>,
    policy: AddressPolicy,
    sender: String,
}

impl MailDispatcher {
    pub fn new(
        templates: Arc<TemplateStore>,
        transport: Arc<dyn MailTransport>,
        policy: AddressPolicy,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            transport,
            policy,
            sender: sender.into(),
        }
    }

    /// Validate and render a request without any I/O
    pub fn compose(&self, request: &EmailRequest) -> Result<ComposedMail, DispatchError> {
        validate(request, &self.policy).map_err(DispatchError::Validation)?;

        let to = request.recipient().to_string();
        let Some(name) = request.template_name() else {
            return Ok(ComposedMail {
                to,
                subject: request.subject.clone().unwrap_or_default(),
                body: request.text.clone().unwrap_or_default(),
            });
        };

        let empty = VariableBindings::new();
        let bindings = request.variables.as_ref().unwrap_or(&empty);
        let document = self
            .templates
            .render(name, bindings)
            .map_err(|e| match e {
                TemplateError::NotFound(name) => DispatchError::TemplateNotFound(name),
                TemplateError::InvalidName(name) => DispatchError::Validation(vec![
                    FieldError::body("template", &format!("invalid template name: {}", name)),
                ]),
                other => DispatchError::InvalidTemplate(other.to_string()),
            })?;

        let unbound = placeholders(&Value::Array(vec![
            Value::String(document.subject.clone()),
            Value::String(document.message.clone()),
        ]));
        if !unbound.is_empty() {
            tracing::debug!(template = %name, unbound = ?unbound, "Template rendered with unbound placeholders");
        }

        Ok(ComposedMail {
            to,
            subject: document.subject,
            body: document.message,
        })
    }

    /// Compose the request, then either deliver it once or return a compose link.
    pub async fn dispatch(&self, request: &EmailRequest) -> Result<DispatchOutcome, DispatchError> {
        let composed = self.compose(request)?;

        if request.wants_preview() {
            MailMetrics::record_preview();
            return Ok(DispatchOutcome::Preview {
                gmail_url: gmail_compose_url(&composed.to, &composed.subject, &composed.body),
            });
        }

        let mail = OutgoingMail {
            from: self.sender.clone(),
            to: composed.to,
            subject: composed.subject,
            text: composed.body,
        };

        match self.transport.send(&mail).await {
            Ok(receipt) => {
                MailMetrics::record_sent();
                tracing::info!(to = %mail.to, code = %receipt.code, "Email sent");
                Ok(DispatchOutcome::Sent(receipt))
            }
            Err(e) => {
                MailMetrics::record_failed();
                Err(DispatchError::SendFailed(e.to_string()))
            }
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Validation(errors) => AppError::Validation(errors),
            DispatchError::TemplateNotFound(_) => AppError::NotFound("Template not found".into()),
            DispatchError::InvalidTemplate(reason) => AppError::Internal(reason),
            DispatchError::SendFailed(message) => AppError::Dependency {
                context: "Error sending email",
                message,
            },
        }
    }
}
