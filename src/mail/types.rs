//! Mail request and result types

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::FieldError;
use crate::template::VariableBindings;

/// Body of `POST /send-email`.
///
/// Every field is optional on the wire so that missing values are reported by
/// the validator rather than rejected by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub text: Option<String>,
    /// Template filename; when set, `subject` and `text` are ignored
    pub template: Option<String>,
    pub variables: Option<VariableBindings>,
    /// Return a compose link instead of sending
    pub open_in_gmail: Option<bool>,
}

impl EmailRequest {
    /// Read a request body field by field.
    ///
    /// A wrongly typed field becomes a validation error instead of rejecting the
    /// whole body. A non-string `to` is reported alone, like any unusable recipient.
    pub fn from_json(body: Value) -> Result<Self, Vec<FieldError>> {
        let fields = match body {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        let mut errors = Vec::new();
        let to = read_field(&fields, "to", "invalid email address", &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }

        let request = Self {
            to,
            subject: read_field(&fields, "subject", "Subject must be a string", &mut errors),
            text: read_field(&fields, "text", "Email content must be a string", &mut errors),
            template: read_field(&fields, "template", "Template must be a string", &mut errors),
            variables: read_field(&fields, "variables", "Variables must be an object", &mut errors),
            open_in_gmail: read_field(
                &fields,
                "openInGmail",
                "openInGmail must be a boolean",
                &mut errors,
            ),
        };

        if errors.is_empty() {
            Ok(request)
        } else {
            Err(errors)
        }
    }

    pub fn recipient(&self) -> &str {
        self.to.as_deref().unwrap_or_default()
    }

    /// Template filename, treating an empty string as absent
    pub fn template_name(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.is_empty())
    }

    pub fn wants_preview(&self) -> bool {
        self.open_in_gmail.unwrap_or(false)
    }
}

/// `null` and absent read as `None`; anything else must deserialize as `T`
fn read_field<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    name: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match fields.get(name) {
        None | Some(Value::Null) => None,
        Some(value) => match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.push(FieldError::body(name, message));
                None
            }
        },
    }
}

/// Final subject and body after template rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Envelope handed to the mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// What the SMTP server answered when it accepted a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportReceipt {
    pub code: String,
    pub message: Vec<String>,
}

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent(TransportReceipt),
    Preview { gmail_url: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

impl From<lettre::transport::smtp::Error> for TransportError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        TransportError::Smtp(err.to_string())
    }
}

impl From<lettre::error::Error> for TransportError {
    fn from(err: lettre::error::Error) -> Self {
        TransportError::Message(err.to_string())
    }
}

impl From<lettre::address::AddressError> for TransportError {
    fn from(err: lettre::address::AddressError) -> Self {
        TransportError::InvalidAddress(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Request validation failed")]
    Validation(Vec<FieldError>),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template unusable: {0}")]
    InvalidTemplate(String),

    #[error("{0}")]
    SendFailed(String),
}
