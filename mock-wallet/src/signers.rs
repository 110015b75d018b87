//! Signer configuration and mnemonic-based key derivation.
//!
//! Handles the `[signer]` section of the TOML config:
//!
//! - **Direct key** — `private_key`, a 0x-prefixed hex secp256k1 key.
//! - **Mnemonic** — BIP-39 phrase plus optional passphrase and BIP-44 path.
//!
//! Every value may be an environment-variable reference (`$VAR` or `${VAR}`)
//! so test suites can keep keys out of the file.
//!
//! # Priority
//!
//! 1. `private_key` — highest.
//! 2. `mnemonic` — lowest.

use std::str::FromStr;

use alloy_signer_local::coins_bip39::English;
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default EVM BIP-44 derivation path (`MetaMask` / Trezor compatible).
pub const DEFAULT_EVM_PATH: &str = "m/44'/60'/0'/0/0";

/// `[signer]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Hex private key or env reference.
    #[serde(default)]
    pub private_key: Option<String>,
    /// BIP-39 phrase or env reference.
    #[serde(default)]
    pub mnemonic: Option<String>,
    /// Optional BIP-39 passphrase.
    #[serde(default)]
    pub passphrase: Option<String>,
    /// BIP-44 path, defaults to [`DEFAULT_EVM_PATH`].
    #[serde(default)]
    pub derivation_path: Option<String>,
}

impl SignerConfig {
    /// Resolves env references and builds the signing key.
    ///
    /// # Errors
    ///
    /// Returns an error if no key source is configured, an environment
    /// variable is missing, or the key or mnemonic is invalid.
    pub fn resolve(&self) -> Result<PrivateKeySigner, Error> {
        if let Some(raw) = &self.private_key {
            let key = resolve_env(raw)?;
            return PrivateKeySigner::from_str(key.trim())
                .map_err(|e| Error::signer(format!("failed to parse private key: {e}")));
        }
        if let Some(raw) = &self.mnemonic {
            let mnemonic = resolve_env(raw)?;
            let passphrase = self.passphrase.as_deref().map(resolve_env).transpose()?;
            return derive_evm_key(&mnemonic, passphrase.as_deref(), self.derivation_path.as_deref());
        }
        Err(Error::signer(
            "no signer configured, set [signer] private_key or mnemonic",
        ))
    }
}

/// Resolve an environment-variable reference (`$VAR` or `${VAR}`), returning
/// the literal string unchanged if it does not match either pattern.
///
/// # Errors
///
/// Returns an error if the referenced variable is not set.
pub fn resolve_env(value: &str) -> Result<String, Error> {
    let var_name = if let Some(name) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        Some(name)
    } else {
        value
            .strip_prefix('$')
            .filter(|name| !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_'))
    };
    match var_name {
        Some(name) => std::env::var(name).map_err(|_| {
            Error::signer(format!("env var '{name}' not found (referenced as '{value}')"))
        }),
        None => Ok(value.to_owned()),
    }
}

/// Derive an EVM signing key from a mnemonic phrase.
fn derive_evm_key(
    mnemonic: &str,
    passphrase: Option<&str>,
    path: Option<&str>,
) -> Result<PrivateKeySigner, Error> {
    let mut builder = MnemonicBuilder::<English>::default()
        .phrase(mnemonic.trim())
        .derivation_path(path.unwrap_or(DEFAULT_EVM_PATH))
        .map_err(|e| Error::signer(format!("invalid derivation path: {e}")))?;
    if let Some(passphrase) = passphrase {
        builder = builder.password(passphrase);
    }
    builder
        .build()
        .map_err(|e| Error::signer(format!("EVM key derivation error: {e}")))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, address};

    use super::*;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    #[test]
    fn literal_values_pass_through() {
        assert_eq!(resolve_env("0xabc").unwrap(), "0xabc");
        assert_eq!(resolve_env("$").unwrap(), "$");
        assert_eq!(resolve_env("$not-a-var").unwrap(), "$not-a-var");
    }

    #[test]
    fn env_references_resolve() {
        let expected = env!("CARGO_MANIFEST_DIR");
        assert_eq!(resolve_env("$CARGO_MANIFEST_DIR").unwrap(), expected);
        assert_eq!(resolve_env("${CARGO_MANIFEST_DIR}").unwrap(), expected);
    }

    #[test]
    fn missing_env_reference_is_an_error() {
        let err = resolve_env("${MOCK_WALLET_SURELY_UNSET_VAR}").unwrap_err();
        assert!(err.to_string().contains("MOCK_WALLET_SURELY_UNSET_VAR"));
    }

    #[test]
    fn private_key_takes_priority() {
        let config = SignerConfig {
            private_key: Some(TEST_KEY.into()),
            mnemonic: Some("invalid words".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve().unwrap().address(), TEST_ADDRESS);
    }

    #[test]
    fn mnemonic_derives_first_account() {
        let config = SignerConfig {
            mnemonic: Some(TEST_MNEMONIC.into()),
            ..Default::default()
        };
        assert_eq!(config.resolve().unwrap().address(), TEST_ADDRESS);
    }

    #[test]
    fn mnemonic_honours_derivation_path() {
        let config = SignerConfig {
            mnemonic: Some(TEST_MNEMONIC.into()),
            derivation_path: Some("m/44'/60'/0'/0/1".into()),
            ..Default::default()
        };
        assert_eq!(
            config.resolve().unwrap().address(),
            address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn empty_config_is_rejected() {
        assert!(SignerConfig::default().resolve().is_err());
    }

    #[test]
    fn bad_key_is_rejected() {
        let config = SignerConfig {
            private_key: Some("0x1234".into()),
            ..Default::default()
        };
        assert!(matches!(config.resolve(), Err(Error::Signer(_))));
    }
}
