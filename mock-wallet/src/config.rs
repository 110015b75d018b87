//! Configuration loading and default template generation.
//!
//! This module provides:
//!
//! - [`Config`] — server bind address, signer, provider info and per-chain
//!   RPC overrides.
//! - [`load_config`] — Reads and parses a TOML configuration file.
//! - [`generate_default_config`] — Produces a commented TOML template.
//!
//! # Configuration File Format
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 8545
//!
//! [signer]
//! private_key = "$PRIVATE_KEY"
//!
//! [chains."eip155:1"]
//! rpc = "https://eth.llamarpc.com"
//! ```

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::announce::ProviderInfo;
use crate::error::Error;
use crate::signers::SignerConfig;
use crate::transport::TransportRegistry;

/// CAIP-2 namespace for EVM chains.
pub const EIP155_NAMESPACE: &str = "eip155";

const DEFAULT_PORT: u16 = 8545;

/// Mock wallet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address; falls back to `HOST`, then `127.0.0.1`.
    #[serde(default = "default_host")]
    host: IpAddr,
    /// Bind port; falls back to `PORT`, then `8545`.
    #[serde(default = "default_port")]
    port: u16,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default)]
    log_level: Option<String>,
    /// Signing credential source.
    #[serde(default)]
    signer: SignerConfig,
    /// EIP-6963 announcement overrides.
    #[serde(default)]
    provider: ProviderInfo,
    /// Per-chain RPC overrides.
    #[serde(default)]
    chains: ChainsConfig,
}

fn default_host() -> IpAddr {
    std::env::var("HOST")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

impl Config {
    /// Bind address.
    #[must_use]
    pub const fn host(&self) -> IpAddr {
        self.host
    }

    /// Bind port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Configured log filter, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    /// `[signer]` section.
    #[must_use]
    pub const fn signer(&self) -> &SignerConfig {
        &self.signer
    }

    /// `[provider]` section.
    #[must_use]
    pub const fn provider(&self) -> &ProviderInfo {
        &self.provider
    }

    /// `[chains]` section.
    #[must_use]
    pub const fn chains(&self) -> &ChainsConfig {
        &self.chains
    }

    /// Transport registry built from the `[chains]` overrides.
    #[must_use]
    pub fn transports(&self) -> TransportRegistry {
        TransportRegistry::from_urls(self.chains.iter().map(|(id, entry)| (*id, entry.rpc.clone())))
    }
}

/// Single `[chains."eip155:<id>"]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// HTTP(S) RPC URL.
    pub rpc: Url,
}

/// Chain entries keyed by numeric chain id.
///
/// Serialised as a TOML map keyed by CAIP-2 chain identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainsConfig(pub BTreeMap<u64, ChainEntry>);

impl Deref for ChainsConfig {
    type Target = BTreeMap<u64, ChainEntry>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Parses a CAIP-2 `eip155:<id>` identifier.
///
/// # Errors
///
/// Returns a message if the namespace is not `eip155` or the reference is not
/// a decimal chain id.
pub fn parse_caip2(key: &str) -> Result<u64, String> {
    let (namespace, reference) = key
        .split_once(':')
        .ok_or_else(|| format!("invalid chain identifier '{key}', expected 'eip155:<id>'"))?;
    if namespace != EIP155_NAMESPACE {
        return Err(format!("Unexpected namespace: {namespace}"));
    }
    reference
        .parse()
        .map_err(|e| format!("invalid eip155 chain reference '{reference}': {e}"))
}

impl Serialize for ChainsConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, entry) in &self.0 {
            map.serialize_entry(&format!("{EIP155_NAMESPACE}:{id}"), entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChainsConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::fmt;

        use serde::de::{MapAccess, Visitor};

        struct ChainsVisitor;

        impl<'de> Visitor<'de> for ChainsVisitor {
            type Value = ChainsConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of chain identifiers to chain configurations")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut chains = BTreeMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    let id = parse_caip2(&key).map_err(serde::de::Error::custom)?;
                    let entry: ChainEntry = access.next_value()?;
                    if chains.insert(id, entry).is_some() {
                        return Err(serde::de::Error::custom(format!("duplicate chain {key}")));
                    }
                }
                Ok(ChainsConfig(chains))
            }
        }

        deserializer.deserialize_map(ChainsVisitor)
    }
}

/// Load configuration from a TOML file at the given path.
///
/// Values not present in the file fall back to environment variables
/// (`PORT`, `HOST`) and then to hardcoded defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be resolved, read, or parsed.
pub fn load_config(path: &Path) -> Result<Config, Error> {
    let config_path = path.canonicalize().map_err(|e| {
        Error::config_with(format!("Failed to resolve config path '{}'", path.display()), e)
    })?;
    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        Error::config_with(
            format!("Failed to read config file '{}'", config_path.display()),
            e,
        )
    })?;
    toml::from_str(&content).map_err(|e| {
        Error::config_with(
            format!("Failed to parse TOML config '{}'", config_path.display()),
            e,
        )
    })
}

/// Generate a default TOML configuration template.
#[must_use]
pub fn generate_default_config() -> String {
    String::from(
        r#"# Mock Wallet Configuration

# Server bind address and port.
# Can also be set via HOST / PORT environment variables.
host = "127.0.0.1"
port = 8545

# Log filter used when RUST_LOG is not set.
log_level = "info"

# ── Signer ──────────────────────────────────────────────────────────
# Values support environment variable references: "$VAR" or "${VAR}".
# private_key wins over mnemonic when both are set.

[signer]
private_key = "$PRIVATE_KEY"
# mnemonic = "$MNEMONIC"
# passphrase = ""
# derivation_path = "m/44'/60'/0'/0/0"

# ── EIP-6963 announcement ───────────────────────────────────────────
# uuid is random per start unless pinned here.

[provider]
name = "Mock Wallet"
rdns = "com.example.mock-wallet"

# ── RPC overrides ───────────────────────────────────────────────────
# Key format: "eip155:<chain_id>"
# Chains without an entry use their default public endpoint.

[chains."eip155:1"]
rpc = "https://eth.llamarpc.com"

[chains."eip155:31337"]
rpc = "http://127.0.0.1:8546"
"#,
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_template_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.port(), 8545);
        assert_eq!(config.log_level(), Some("info"));
        assert_eq!(config.provider().name, "Mock Wallet");
        assert_eq!(config.chains().len(), 2);
        assert_eq!(
            config.chains()[&31337].rpc.as_str(),
            "http://127.0.0.1:8546/"
        );
        assert_eq!(config.signer().private_key.as_deref(), Some("$PRIVATE_KEY"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.chains().is_empty());
        assert!(config.transports().is_empty());
        assert_eq!(config.provider().name, "Mock Wallet");
    }

    #[test]
    fn chains_become_transports() {
        let config: Config = toml::from_str(
            r#"
            [chains."eip155:10"]
            rpc = "http://optimism.local"
            "#,
        )
        .unwrap();
        let transports = config.transports();
        assert!(transports.contains(10));
        assert!(!transports.contains(1));
    }

    #[test]
    fn non_evm_namespace_is_rejected() {
        let err = toml::from_str::<Config>(
            r#"
            [chains."solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1"]
            rpc = "https://api.devnet.solana.com"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unexpected namespace"));
    }

    #[test]
    fn caip2_parsing() {
        assert_eq!(parse_caip2("eip155:8453"), Ok(8453));
        assert!(parse_caip2("eip155:0x1").is_err());
        assert!(parse_caip2("8453").is_err());
    }

    #[test]
    fn chains_round_trip_through_caip2_keys() {
        let mut chains = BTreeMap::new();
        chains.insert(
            137,
            ChainEntry {
                rpc: Url::parse("https://polygon-rpc.com").unwrap(),
            },
        );
        let serialized = toml::to_string(&ChainsConfig(chains.clone())).unwrap();
        assert!(serialized.contains("eip155:137"));
        let parsed: ChainsConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.0, chains);
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9000").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.port(), 9000);
    }

    #[test]
    fn load_config_names_missing_path() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
