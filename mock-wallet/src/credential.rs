//! Signing credential seam.
//!
//! The dispatcher never owns key material. It talks to a [`Credential`], which
//! may or may not support each signing capability; missing capabilities
//! surface as [`WalletError::UnsupportedMethod`].

use alloy_dyn_abi::TypedData;
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Signature};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::error::WalletError;

/// Identity the mock wallet signs with.
#[async_trait]
pub trait Credential: Send + Sync {
    /// The single account address this credential controls.
    fn address(&self) -> Address;

    /// Signs `message` with the EIP-191 personal-message prefix.
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        let _ = message;
        Err(WalletError::UnsupportedMethod("personal_sign".into()))
    }

    /// Signs an EIP-712 payload.
    async fn sign_typed_data(&self, payload: &TypedData) -> Result<Signature, WalletError> {
        let _ = payload;
        Err(WalletError::UnsupportedMethod("eth_signTypedData".into()))
    }

    /// Transaction signer attached to network clients.
    fn wallet(&self) -> EthereumWallet;
}

#[async_trait]
impl Credential for PrivateKeySigner {
    fn address(&self) -> Address {
        Signer::address(self)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        Ok(Signer::sign_message(self, message).await?)
    }

    async fn sign_typed_data(&self, payload: &TypedData) -> Result<Signature, WalletError> {
        Ok(self.sign_dynamic_typed_data(payload).await?)
    }

    fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Address-only credential, as a hardware or remote signer without
    /// message support would look.
    struct WatchOnly(PrivateKeySigner);

    #[async_trait]
    impl Credential for WatchOnly {
        fn address(&self) -> Address {
            Signer::address(&self.0)
        }

        fn wallet(&self) -> EthereumWallet {
            EthereumWallet::from(self.0.clone())
        }
    }

    #[tokio::test]
    async fn private_key_signs_recoverable_messages() {
        let signer = PrivateKeySigner::random();
        let sig = Credential::sign_message(&signer, b"hello").await.expect("sign");
        let recovered = sig.recover_address_from_msg(b"hello").expect("recover");
        assert_eq!(recovered, Credential::address(&signer));
    }

    #[tokio::test]
    async fn missing_capabilities_are_unsupported() {
        let cred = WatchOnly(PrivateKeySigner::random());
        let err = cred.sign_message(b"hello").await.unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedMethod(m) if m == "personal_sign"));
    }

    #[test]
    fn wallet_uses_same_address() {
        use alloy_network::NetworkWallet;

        let signer = PrivateKeySigner::random();
        let wallet = Credential::wallet(&signer);
        let default = NetworkWallet::<alloy_network::Ethereum>::default_signer_address(&wallet);
        assert_eq!(default, Credential::address(&signer));
    }
}
