use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// The authenticated identity used as the reply sender. Gmail accepts the
/// "me" sentinel; tests and multi-account setups inject a real address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub sender: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            sender: "me".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub credentials_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_path: "credentials.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub in_progress_label: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            in_progress_label: "IN_PROGRESS".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        use std::fs;
        if let Ok(content) = fs::read_to_string("settings.toml") {
            if let Ok(config) = toml::from_str(&content) {
                return config;
            }
            tracing::warn!("settings.toml is malformed, falling back to defaults");
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config = Config::default();
        assert_eq!(config.account.sender, "me");
        assert_eq!(config.auth.credentials_path, "credentials.json");
        assert_eq!(config.workflow.in_progress_label, "IN_PROGRESS");
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let config: Config = toml::from_str(
            r#"
            [account]
            sender = "support@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.account.sender, "support@example.com");
        assert_eq!(config.workflow.in_progress_label, "IN_PROGRESS");
    }
}
