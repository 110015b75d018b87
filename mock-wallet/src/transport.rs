//! Network transports and the per-request network client.
//!
//! - [`NetworkClient`] — the operations the dispatcher needs from a chain:
//!   address lookup, transaction submission and generic JSON-RPC forwarding.
//! - [`Transport`] — connects a [`NetworkClient`] for one chain and credential.
//!   [`HttpTransport`] does so with an alloy provider over JSON-RPC/HTTP.
//! - [`TransportRegistry`] — chain id keyed transports with a fallback.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionRequest;
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::chain::ChainDescriptor;
use crate::credential::Credential;
use crate::error::WalletError;

/// Chain-bound client built fresh for every provider request.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Addresses this client can sign for.
    async fn addresses(&self) -> Result<Vec<Address>, WalletError>;

    /// Fills, signs and broadcasts `tx`, returning its hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError>;

    /// Broadcasts an already signed, EIP-2718 encoded transaction.
    async fn send_raw_transaction(&self, encoded: &[u8]) -> Result<TxHash, WalletError>;

    /// Forwards an arbitrary JSON-RPC call.
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError>;
}

/// Factory for [`NetworkClient`]s.
pub trait Transport: fmt::Debug + Send + Sync {
    /// Connects a client for `chain` that signs with `credential`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot address `chain`.
    fn connect(
        &self,
        chain: &ChainDescriptor,
        credential: &dyn Credential,
    ) -> Result<Box<dyn NetworkClient>, WalletError>;
}

/// JSON-RPC over HTTP.
///
/// Without an explicit URL the chain's default public endpoint is used.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    url: Option<Url>,
}

impl HttpTransport {
    /// Transport pinned to `url` regardless of chain.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self { url: Some(url) }
    }

    /// Transport that uses each chain's default RPC endpoint.
    #[must_use]
    pub const fn chain_default() -> Self {
        Self { url: None }
    }

    fn endpoint(&self, chain: &ChainDescriptor) -> Result<Url, WalletError> {
        match &self.url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(chain.rpc_url).map_err(|e| {
                WalletError::upstream(format!("invalid default rpc url for {}: {e}", chain.name))
            }),
        }
    }
}

impl Transport for HttpTransport {
    fn connect(
        &self,
        chain: &ChainDescriptor,
        credential: &dyn Credential,
    ) -> Result<Box<dyn NetworkClient>, WalletError> {
        let url = self.endpoint(chain)?;
        tracing::trace!(chain = chain.id, %url, "connecting rpc client");
        let provider = ProviderBuilder::new()
            .wallet(credential.wallet())
            .connect_http(url)
            .erased();
        Ok(Box::new(RpcClient {
            provider,
            accounts: vec![credential.address()],
        }))
    }
}

/// [`NetworkClient`] backed by an alloy provider with the credential's wallet
/// attached, so nonce, gas and chain id are filled before signing.
struct RpcClient {
    provider: DynProvider,
    accounts: Vec<Address>,
}

#[async_trait]
impl NetworkClient for RpcClient {
    async fn addresses(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.accounts.clone())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(WalletError::upstream)?;
        Ok(*pending.tx_hash())
    }

    async fn send_raw_transaction(&self, encoded: &[u8]) -> Result<TxHash, WalletError> {
        let pending = self
            .provider
            .send_raw_transaction(encoded)
            .await
            .map_err(WalletError::upstream)?;
        Ok(*pending.tx_hash())
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        self.provider
            .raw_request::<Value, Value>(Cow::Owned(method.to_owned()), params)
            .await
            .map_err(WalletError::upstream)
    }
}

/// Transports keyed by numeric chain id.
#[derive(Debug, Clone)]
pub struct TransportRegistry {
    transports: HashMap<u64, Arc<dyn Transport>>,
    fallback: Arc<dyn Transport>,
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::with_fallback(HttpTransport::chain_default())
    }
}

impl TransportRegistry {
    /// Empty registry falling back to [`HttpTransport::chain_default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry falling back to `fallback` for unmapped chains.
    #[must_use]
    pub fn with_fallback(fallback: impl Transport + 'static) -> Self {
        Self {
            transports: HashMap::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// Registry of [`HttpTransport`]s from `(chain id, url)` pairs.
    pub fn from_urls(urls: impl IntoIterator<Item = (u64, Url)>) -> Self {
        let mut registry = Self::new();
        for (chain_id, url) in urls {
            registry.insert(chain_id, HttpTransport::new(url));
        }
        registry
    }

    /// Maps `chain_id` to `transport`, returning the previous mapping.
    pub fn insert(
        &mut self,
        chain_id: u64,
        transport: impl Transport + 'static,
    ) -> Option<Arc<dyn Transport>> {
        self.transports.insert(chain_id, Arc::new(transport))
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, chain_id: u64, transport: impl Transport + 'static) -> Self {
        self.insert(chain_id, transport);
        self
    }

    /// Transport for `chain_id`, or the fallback when none is registered.
    #[must_use]
    pub fn get(&self, chain_id: u64) -> &dyn Transport {
        self.transports
            .get(&chain_id)
            .map_or(&*self.fallback, |transport| &**transport)
    }

    /// Whether `chain_id` has an explicit transport.
    #[must_use]
    pub fn contains(&self, chain_id: u64) -> bool {
        self.transports.contains_key(&chain_id)
    }

    /// Number of explicit transports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transports.len()
    }

    /// Whether no explicit transport is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{self, MAINNET};

    #[test]
    fn default_transport_uses_chain_endpoint() {
        let url = HttpTransport::chain_default().endpoint(&MAINNET).expect("url");
        assert_eq!(url.as_str(), "https://eth.merkle.io/");
    }

    #[test]
    fn pinned_transport_ignores_chain() {
        let pinned = Url::parse("http://localhost:8545").expect("url");
        let transport = HttpTransport::new(pinned.clone());
        let base = chain::by_id(8453).expect("base");
        assert_eq!(transport.endpoint(base).expect("url"), pinned);
    }

    #[test]
    fn registry_falls_back_for_unmapped_chain() {
        let registry = TransportRegistry::from_urls([(
            10,
            Url::parse("http://optimism.local").expect("url"),
        )]);
        assert!(registry.contains(10));
        assert!(!registry.contains(1));
        assert_eq!(registry.len(), 1);
        assert!(format!("{:?}", registry.get(10)).contains("optimism.local"));
        assert!(format!("{:?}", registry.get(1)).contains("None"));
    }

    #[test]
    fn insert_replaces_previous_mapping() {
        let mut registry = TransportRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.insert(1, HttpTransport::chain_default()).is_none());
        assert!(registry.insert(1, HttpTransport::chain_default()).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn http_transport_connects_without_network() {
        let signer = alloy_signer_local::PrivateKeySigner::random();
        assert!(HttpTransport::chain_default().connect(&MAINNET, &signer).is_ok());
    }
}
