use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::config::Settings;
use crate::generation::{
    GeminiClient, GenerativeModel, MessageLog, MessageLogError, MessageService, ModelError,
    PostgresMessageLog,
};
use crate::mail::{AddressPolicy, MailDispatcher, MailTransport, SmtpTransport, TransportError};
use crate::metrics::TEMPLATES_LOADED;
use crate::postgres::{PostgresPool, PostgresPoolError};
use crate::ratelimit::RateLimiter;
use crate::template::{create_template_store, TemplateError, TemplateStore};
use crate::verification::{EmailVerifier, HunterClient, VerificationError};

/// Failures while wiring the application together; all are fatal.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to load templates: {0}")]
    Templates(#[from] TemplateError),

    #[error("Failed to configure mail transport: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to configure verification client: {0}")]
    Verification(#[from] VerificationError),

    #[error("Failed to configure generation client: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to connect to PostgreSQL: {0}")]
    Postgres(#[from] PostgresPoolError),

    #[error("Failed to prepare message log: {0}")]
    MessageLog(#[from] MessageLogError),
}

/// External collaborators the handlers depend on
pub struct Components {
    pub templates: Arc<TemplateStore>,
    pub transport: Arc<dyn MailTransport>,
    pub verifier: Arc<dyn EmailVerifier>,
    pub model: Arc<dyn GenerativeModel>,
    pub message_log: Arc<dyn MessageLog>,
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub templates: Arc<TemplateStore>,
    pub dispatcher: Arc<MailDispatcher>,
    pub verifier: Arc<dyn EmailVerifier>,
    pub messages: Arc<MessageService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub postgres_pool: Option<PostgresPool>,
    pub start_time: Instant,
}

impl AppState {
    /// Connect every collaborator described by `settings`
    pub async fn build(settings: Settings) -> Result<Self, StartupError> {
        let templates = create_template_store(&settings.templates.root, &settings.templates.categories)?;
        let transport = Arc::new(SmtpTransport::new(&settings.mail)?);
        let verifier = Arc::new(HunterClient::new(&settings.verification)?);
        let model = Arc::new(GeminiClient::new(&settings.generation)?);

        let pool = PostgresPool::new(&settings.database).await?;
        let message_log = PostgresMessageLog::new(pool.pool().clone());
        message_log.ensure_schema().await?;

        let components = Components {
            templates,
            transport,
            verifier,
            model,
            message_log: Arc::new(message_log),
        };

        let mut state = Self::with_components(settings, components);
        state.postgres_pool = Some(pool);
        Ok(state)
    }

    /// Assemble state from ready-made collaborators
    pub fn with_components(settings: Settings, components: Components) -> Self {
        let dispatcher = Arc::new(MailDispatcher::new(
            components.templates.clone(),
            components.transport,
            AddressPolicy::from_config(&settings.policy),
            settings.mail.from.clone(),
        ));
        let messages = Arc::new(MessageService::new(components.model, components.message_log));
        let rate_limiter = Arc::new(RateLimiter::new(settings.rate_limit.clone()));

        TEMPLATES_LOADED.set(components.templates.count() as i64);

        Self {
            settings: Arc::new(settings),
            templates: components.templates,
            dispatcher,
            verifier: components.verifier,
            messages,
            rate_limiter,
            postgres_pool: None,
            start_time: Instant::now(),
        }
    }
}
