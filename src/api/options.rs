//! Static endpoint manifest.

use axum::Json;
use serde_json::{json, Value};

fn manifest() -> Value {
    json!({
        "options": [
            {
                "id": 1,
                "type": "Email Verification",
                "endpoint": "/verify-email/:email",
                "method": "GET",
                "description": "Verify email address validity and safety using Hunter.io.",
                "example": "/verify-email/test@example.com",
                "responseFormat": {
                    "isValid": "boolean",
                    "score": "number (0-100)",
                    "status": "string",
                    "safe_to_send": "boolean",
                    "details": {
                        "disposable": "boolean",
                        "webmail": "boolean",
                        "smtp_check": "boolean",
                        "mx_records": "boolean"
                    }
                }
            },
            {
                "id": 2,
                "type": "Send Email",
                "endpoint": "/send-email",
                "method": "POST",
                "description": "Send a basic or template-based email. If a template is provided, variables will be replaced.",
                "requiredFields": {
                    "to": "Recipient email address",
                    "subject": "Email subject (ignored if template is used)",
                    "text": "Email content (ignored if template is used)",
                    "template": "Template filename (optional)",
                    "variables": "Object with template variables (optional)"
                },
                "example": {
                    "to": "recipient@example.com",
                    "subject": "Hello",
                    "text": "This is a test email.",
                    "template": "event_followup.json",
                    "variables": {
                        "user_name": "Harsh",
                        "user_email": "harsh@example.com",
                        "first_name": "John",
                        "event_name": "Tech Summit",
                        "learning_point": "your insights on AI",
                        "availability": "next week"
                    }
                }
            },
            {
                "id": 3,
                "type": "List Email Templates",
                "endpoint": "/email-templates",
                "method": "GET",
                "description": "List all available email templates in a hierarchical structure.",
                "responseFormat": {
                    "templates": {
                        "Follow-up": "object",
                        "Networking": "object"
                    }
                }
            },
            {
                "id": 4,
                "type": "Get Template Content",
                "endpoint": "/email-templates/:filename",
                "method": "GET",
                "description": "Get the content of a specific template JSON file by filename.",
                "example": "/email-templates/event_followup.json",
                "responseFormat": {
                    "template_name": "string",
                    "from": "object",
                    "subject": "string",
                    "message": "string",
                    "variables": "array",
                    "category": "string"
                }
            },
            {
                "id": 5,
                "type": "AI Email Generator",
                "endpoint": "/generate-email-content",
                "method": "POST",
                "description": "Generate personalized email content using AI.",
                "requiredFields": {
                    "prompt": "Description of the email you want to generate"
                },
                "example": {
                    "prompt": "Write a professional email to schedule a team meeting"
                },
                "responseFormat": {
                    "success": "boolean",
                    "generatedContent": "AI generated email content"
                }
            }
        ]
    })
}

/// GET /email-options - What this service can do
pub async fn email_options() -> Json<Value> {
    Json(manifest())
}
