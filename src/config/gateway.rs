//! Payment gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway environment mode
    #[serde(default)]
    pub environment: GatewayEnvironment,

    /// Gateway application id
    #[serde(default)]
    pub app_id: String,

    /// Gateway application secret, used to verify webhook signatures
    #[serde(default = "empty_secret")]
    pub app_secret: SecretString,
}

/// Gateway environment mode
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl GatewayConfig {
    /// Check if pointing at the gateway sandbox
    pub fn is_sandbox(&self) -> bool {
        self.environment == GatewayEnvironment::Sandbox
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.app_id.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_APP_ID"));
        }
        if self.app_secret.expose_secret().is_empty() {
            return Err(ValidationError::EmptyGatewaySecret);
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            environment: GatewayEnvironment::default(),
            app_id: String::new(),
            app_secret: empty_secret(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}
