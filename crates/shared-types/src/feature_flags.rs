use serde::{Deserialize, Serialize};

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}

/// Optional integrations, toggled at startup. All default to off so a bare
/// checkout runs without any external accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Outbound email through Mailgun (magic links, invoice delivery).
    #[serde(default)]
    pub mailgun: bool,
    /// Structured tracing output.
    #[serde(default)]
    pub telemetry: bool,
}
