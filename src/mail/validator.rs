//! Request checks for `/send-email`

use lettre::Address;

use super::types::EmailRequest;
use crate::config::PolicyConfig;
use crate::error::FieldError;

/// Which recipient domains the gateway will send to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPolicy {
    /// Lowercase domains; empty accepts every domain
    allowed_domains: Vec<String>,
}

impl AddressPolicy {
    /// Accept any syntactically valid address
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(&config.allowed_domains)
    }

    /// Address grammar first, then the domain allow-list
    pub fn permits(&self, address: &str) -> bool {
        let Ok(parsed) = address.parse::<Address>() else {
            return false;
        };

        self.allowed_domains.is_empty()
            || self
                .allowed_domains
                .iter()
                .any(|d| parsed.domain().eq_ignore_ascii_case(d))
    }
}

/// Validate a send request.
///
/// A bad recipient is reported alone; body checks only run for a usable address
/// and report every missing field at once.
pub fn validate(request: &EmailRequest, policy: &AddressPolicy) -> Result<(), Vec<FieldError>> {
    if !policy.permits(request.recipient()) {
        return Err(vec![FieldError::body("to", "invalid email address")]);
    }

    let mut errors = Vec::new();
    if request.template_name().is_none() {
        if is_blank(&request.subject) {
            errors.push(FieldError::body("subject", "Subject is required"));
        }
        if is_blank(&request.text) {
            errors.push(FieldError::body("text", "Email content is required"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gmail_only() -> AddressPolicy {
        AddressPolicy::new(["gmail.com"])
    }

    fn request(to: &str) -> EmailRequest {
        EmailRequest {
            to: Some(to.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_policy_checks_grammar_and_domain() {
        let policy = gmail_only();
        assert!(policy.permits("someone@gmail.com"));
        assert!(policy.permits("Some.One+tag@GMAIL.com"));
        assert!(!policy.permits("someone@example.com"));
        assert!(!policy.permits("not-an-email"));
        assert!(!policy.permits(""));

        let open = AddressPolicy::any();
        assert!(open.permits("someone@example.com"));
        assert!(!open.permits("missing-at.example.com"));
    }

    #[test]
    fn test_bad_address_short_circuits() {
        let errors = validate(&request("not-an-email"), &gmail_only()).unwrap_err();
        assert_eq!(errors, vec![FieldError::body("to", "invalid email address")]);
    }

    #[test]
    fn test_missing_recipient_is_address_error() {
        let errors = validate(&EmailRequest::default(), &AddressPolicy::any()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "to");
    }

    #[test]
    fn test_direct_body_reports_all_missing_fields() {
        let errors = validate(&request("a@gmail.com"), &gmail_only()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["subject", "text"]);
        assert_eq!(errors[1].message, "Email content is required");
    }

    #[test]
    fn test_empty_subject_counts_as_missing() {
        let mut req = request("a@gmail.com");
        req.subject = Some(String::new());
        req.text = Some("body".to_string());

        let errors = validate(&req, &gmail_only()).unwrap_err();
        assert_eq!(errors, vec![FieldError::body("subject", "Subject is required")]);
    }

    #[test]
    fn test_template_makes_subject_and_text_optional() {
        let mut req = request("a@gmail.com");
        req.template = Some("x.json".to_string());
        assert!(validate(&req, &gmail_only()).is_ok());
    }

    #[test]
    fn test_complete_direct_request_passes() {
        let mut req = request("a@gmail.com");
        req.subject = Some("Hello".to_string());
        req.text = Some("This is a test email.".to_string());
        assert!(validate(&req, &gmail_only()).is_ok());
    }
}
