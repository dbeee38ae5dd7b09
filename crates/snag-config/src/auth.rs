//! Authentication configuration.

use serde::{Deserialize, Serialize};

const fn default_session_ttl_hours() -> i64 {
    72
}

fn default_bootstrap_email() -> String {
    "admin@example.com".to_string()
}

fn default_bootstrap_password() -> String {
    "admin123".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// How long a login session stays valid.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Email for the default manager created by `GET /setup`.
    #[serde(default = "default_bootstrap_email")]
    pub bootstrap_email: String,

    /// Password for the default manager. Override in any real deployment.
    #[serde(default = "default_bootstrap_password")]
    pub bootstrap_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            bootstrap_email: default_bootstrap_email(),
            bootstrap_password: default_bootstrap_password(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl_hours, 72);
        assert_eq!(config.bootstrap_email, "admin@example.com");
    }
}
