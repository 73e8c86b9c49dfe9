use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::env;

use crate::ratelimit::RateLimitConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub verification: VerificationConfig,
    pub generation: GenerationConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// SMTP transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    /// Sender mailbox, e.g. `Gateway <noreply@example.com>`
    pub from: String,
    #[serde(default)]
    pub tls: TlsMode,
    #[serde(default = "default_mail_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// Upgrade with STARTTLS when the server offers it
    #[default]
    Opportunistic,
    /// Require STARTTLS
    Starttls,
    /// TLS from the first byte (port 465)
    Implicit,
    /// Plain text, local relays only
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    pub api_key: String,
    #[serde(default = "default_verification_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub api_key: String,
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Directory holding one sub-directory per category
    #[serde(default = "default_templates_root")]
    pub root: String,
    /// Category search order; the first category wins on duplicate filenames
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Recipient domains accepted by `/send-email`; empty accepts any domain
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_mail_timeout() -> u64 {
    30
}

fn default_verification_base_url() -> String {
    "https://api.hunter.io/v2".to_string()
}

fn default_generation_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generation_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_pool_size() -> u32 {
    5
}

fn default_connect_timeout() -> u32 {
    10
}

fn default_idle_timeout() -> u32 {
    300
}

fn default_templates_root() -> String {
    "templates".to_string()
}

fn default_categories() -> Vec<String> {
    vec!["Follow-up".to_string(), "Networking".to_string()]
}

fn default_allowed_domains() -> Vec<String> {
    vec!["gmail.com".to_string()]
}

/// Flat variable names mapped to their config keys. These win over every other source.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("MAIL_SERVICE_HOST", "mail.host"),
    ("MAIL_SERVICE_PORT", "mail.port"),
    ("MAIL_SERVICE_USER", "mail.user"),
    ("MAIL_SERVICE_PASS", "mail.pass"),
    ("MAIL_SERVICE_FROM", "mail.from"),
    ("HUNTER_API_KEY", "verification.api_key"),
    ("GEMINI_API_KEY", "generation.api_key"),
    ("MONGO_URI", "database.url"),
    ("DATABASE_URL", "database.url"),
    ("PORT", "server.port"),
];

/// Settings that must be present before the server starts.
const REQUIRED: &[(&str, &str)] = &[
    ("MAIL_SERVICE_HOST", "mail.host"),
    ("MAIL_SERVICE_PORT", "mail.port"),
    ("MAIL_SERVICE_USER", "mail.user"),
    ("MAIL_SERVICE_PASS", "mail.pass"),
    ("MAIL_SERVICE_FROM", "mail.from"),
    ("HUNTER_API_KEY", "verification.api_key"),
    ("GEMINI_API_KEY", "generation.api_key"),
    ("DATABASE_URL", "database.url"),
];

fn missing(var: &str) -> ConfigError {
    ConfigError::Message(format!("Missing required environment variable: {}", var))
}

impl Settings {
    /// Load from `.env`, config files and the process environment
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        Self::from_vars(env::vars().collect())
    }

    /// Load from config files and an explicit set of environment variables
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".into());

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("templates.root", default_templates_root())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SERVER__PORT, RATE_LIMIT__ENABLED, TEMPLATES__CATEGORIES=a,b ...
            .add_source(
                Environment::default()
                    .source(Some(vars.clone()))
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("templates.categories")
                    .with_list_parse_key("policy.allowed_domains"),
            );

        // Later entries win, so DATABASE_URL beats MONGO_URI
        for (var, key) in LEGACY_ENV {
            if let Some(value) = vars.get(*var).filter(|v| !v.is_empty()) {
                builder = builder.set_override(*key, value.as_str())?;
            }
        }

        let config = builder.build()?;
        for (var, key) in REQUIRED {
            let present = config
                .get_string(key)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false);
            if !present {
                return Err(missing(var));
            }
        }

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject blank required values; an empty credential is as fatal as a missing one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("MAIL_SERVICE_HOST", self.mail.host.as_str()),
            ("MAIL_SERVICE_USER", self.mail.user.as_str()),
            ("MAIL_SERVICE_PASS", self.mail.pass.as_str()),
            ("MAIL_SERVICE_FROM", self.mail.from.as_str()),
            ("HUNTER_API_KEY", self.verification.api_key.as_str()),
            ("GEMINI_API_KEY", self.generation.api_key.as_str()),
            ("DATABASE_URL", self.database.url.as_str()),
        ];

        for (var, value) in required {
            if value.trim().is_empty() {
                return Err(missing(var));
            }
        }

        if self.mail.port == 0 {
            return Err(missing("MAIL_SERVICE_PORT"));
        }

        if self.templates.categories.is_empty() {
            return Err(ConfigError::Message(
                "templates.categories must name at least one category".to_string(),
            ));
        }

        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            root: default_templates_root(),
            categories: default_categories(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_domains: default_allowed_domains(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        server: ServerConfig::default(),
        mail: MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: "mailer".to_string(),
            pass: "secret".to_string(),
            from: "Gateway <noreply@example.com>".to_string(),
            tls: TlsMode::Opportunistic,
            timeout_seconds: 5,
        },
        verification: VerificationConfig {
            api_key: "hunter-key".to_string(),
            base_url: default_verification_base_url(),
            http_timeout_seconds: 5,
        },
        generation: GenerationConfig {
            api_key: "gemini-key".to_string(),
            base_url: default_generation_base_url(),
            model: default_generation_model(),
            http_timeout_seconds: 5,
        },
        database: DatabaseConfig {
            url: "postgres://gateway:pw@localhost:5432/gateway".to_string(),
            pool_size: default_pool_size(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        },
        templates: TemplatesConfig::default(),
        policy: PolicyConfig::default(),
        rate_limit: RateLimitConfig::default(),
        log: LogConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3000);

        let templates = TemplatesConfig::default();
        assert_eq!(templates.categories, vec!["Follow-up", "Networking"]);

        assert_eq!(PolicyConfig::default().allowed_domains, vec!["gmail.com"]);
    }

    #[test]
    fn test_validate_accepts_complete_settings() {
        assert!(test_settings().validate().is_ok());
    }

    #[test]
    fn test_validate_names_missing_variable() {
        let mut settings = test_settings();
        settings.generation.api_key = "   ".to_string();

        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_validate_rejects_empty_category_list() {
        let mut settings = test_settings();
        settings.templates.categories.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_tls_mode_deserializes_snake_case() {
        let mode: TlsMode = serde_json::from_str("\"implicit\"").unwrap();
        assert_eq!(mode, TlsMode::Implicit);
        assert_eq!(TlsMode::default(), TlsMode::Opportunistic);
    }

    #[test]
    fn test_server_addr() {
        let settings = test_settings();
        assert_eq!(settings.server_addr(), "0.0.0.0:3000");
    }

    fn complete_vars() -> Map<String, String> {
        [
            ("MAIL_SERVICE_HOST", "smtp.example.com"),
            ("MAIL_SERVICE_PORT", "2525"),
            ("MAIL_SERVICE_USER", "mailer"),
            ("MAIL_SERVICE_PASS", "secret"),
            ("MAIL_SERVICE_FROM", "Gateway <noreply@example.com>"),
            ("HUNTER_API_KEY", "hunter-key"),
            ("GEMINI_API_KEY", "gemini-key"),
            ("DATABASE_URL", "postgres://gateway:pw@localhost:5432/gateway"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_from_vars_maps_flat_variables() {
        let settings = Settings::from_vars(complete_vars()).unwrap();

        assert_eq!(settings.mail.host, "smtp.example.com");
        assert_eq!(settings.mail.port, 2525);
        assert_eq!(settings.mail.user, "mailer");
        assert_eq!(settings.mail.pass, "secret");
        assert_eq!(settings.mail.from, "Gateway <noreply@example.com>");
        assert_eq!(settings.verification.api_key, "hunter-key");
        assert_eq!(settings.generation.api_key, "gemini-key");
        assert_eq!(
            settings.database.url,
            "postgres://gateway:pw@localhost:5432/gateway"
        );
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.templates.categories, vec!["Follow-up", "Networking"]);
    }

    #[test]
    fn test_from_vars_port_override() {
        let mut vars = complete_vars();
        vars.insert("PORT".to_string(), "8080".to_string());

        let settings = Settings::from_vars(vars).unwrap();
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_from_vars_accepts_mongo_uri_alias() {
        let mut vars = complete_vars();
        vars.remove("DATABASE_URL");
        vars.insert("MONGO_URI".to_string(), "postgres://legacy@db/history".to_string());

        let settings = Settings::from_vars(vars).unwrap();
        assert_eq!(settings.database.url, "postgres://legacy@db/history");
    }

    #[test]
    fn test_from_vars_database_url_beats_mongo_uri() {
        let mut vars = complete_vars();
        vars.insert("MONGO_URI".to_string(), "postgres://legacy@db/history".to_string());

        let settings = Settings::from_vars(vars).unwrap();
        assert_eq!(
            settings.database.url,
            "postgres://gateway:pw@localhost:5432/gateway"
        );
    }

    #[test]
    fn test_from_vars_missing_variable_is_fatal() {
        for var in ["MAIL_SERVICE_HOST", "MAIL_SERVICE_PORT", "HUNTER_API_KEY", "DATABASE_URL"] {
            let mut vars = complete_vars();
            vars.remove(var);

            let err = Settings::from_vars(vars).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Missing required environment variable: {}", var)
            );
        }
    }

    #[test]
    fn test_from_vars_empty_variable_counts_as_missing() {
        let mut vars = complete_vars();
        vars.insert("GEMINI_API_KEY".to_string(), String::new());

        let err = Settings::from_vars(vars).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: GEMINI_API_KEY"
        );
    }
}
