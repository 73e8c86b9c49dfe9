mod settings;

pub use settings::{
    DatabaseConfig, GenerationConfig, LogConfig, LogFormat, MailConfig, PolicyConfig,
    ServerConfig, Settings, TemplatesConfig, TlsMode, VerificationConfig,
};

#[cfg(test)]
pub(crate) use settings::test_settings;
