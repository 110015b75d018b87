//! EIP-6963 provider announcement payload.
//!
//! The page injector emits `eip6963:announceProvider` with this info so dapps
//! list the mock next to real extensions.

use serde::{Deserialize, Serialize};

const DEFAULT_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCAzMiAzMiI+PHJlY3Qgd2lkdGg9IjMyIiBoZWlnaHQ9IjMyIiByeD0iNiIgZmlsbD0iIzZiNzI4MCIvPjwvc3ZnPg==";

/// Identity announced to dapps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderInfo {
    /// Per-session v4 UUID.
    pub uuid: String,
    /// Display name.
    pub name: String,
    /// Data URI of the icon.
    pub icon: String,
    /// Reverse-DNS identifier.
    pub rdns: String,
}

impl Default for ProviderInfo {
    fn default() -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            name: "Mock Wallet".to_owned(),
            icon: DEFAULT_ICON.to_owned(),
            rdns: "com.example.mock-wallet".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_announce_mock_wallet() {
        let info = ProviderInfo::default();
        assert_eq!(info.name, "Mock Wallet");
        assert!(info.icon.starts_with("data:image/"));
        assert!(uuid::Uuid::parse_str(&info.uuid).is_ok());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let info: ProviderInfo = toml::from_str(r#"name = "Other Wallet""#).unwrap();
        assert_eq!(info.name, "Other Wallet");
        assert_eq!(info.rdns, "com.example.mock-wallet");
    }
}
