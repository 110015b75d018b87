//! The EIP-1193 request dispatcher.
//!
//! [`Wallet`] answers provider calls the way a browser wallet extension would,
//! backed by a single [`Credential`] and a [`TransportRegistry`]. Its only
//! mutable state is the chain selected through `wallet_switchEthereumChain`.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::{Address, Signature, hex};
use serde::Deserialize as _;
use serde_json::{Value, json};

use crate::chain::{self, ChainDescriptor};
use crate::credential::Credential;
use crate::error::WalletError;
use crate::method::Method;
use crate::params::{self, SwitchChain, TransactionParams};
use crate::transport::{NetworkClient, TransportRegistry};

/// Scriptable wallet provider.
///
/// Shareable across tasks. Each call snapshots the active chain on entry, so a
/// concurrent chain switch is observed either entirely before or entirely
/// after a given call.
pub struct Wallet {
    credential: Arc<dyn Credential>,
    transports: TransportRegistry,
    chain_id: RwLock<Option<String>>,
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("chain_id", &self.active_chain_id())
            .field("transports", &self.transports)
            .finish()
    }
}

impl Wallet {
    /// Creates a wallet on the default network.
    #[must_use]
    pub fn new(credential: Arc<dyn Credential>, transports: TransportRegistry) -> Self {
        Self {
            credential,
            transports,
            chain_id: RwLock::new(None),
        }
    }

    /// Address of the signing credential.
    #[must_use]
    pub fn address(&self) -> Address {
        self.credential.address()
    }

    /// Chain id last set by `wallet_switchEthereumChain`, verbatim.
    #[must_use]
    pub fn active_chain_id(&self) -> Option<String> {
        self.chain_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Network the next request will run against.
    #[must_use]
    pub fn active_chain(&self) -> &'static ChainDescriptor {
        chain::resolve(self.active_chain_id().as_deref())
    }

    fn switch_chain(&self, chain_id: String) {
        tracing::info!(chain_id = %chain_id, "switching chain");
        *self.chain_id.write().unwrap_or_else(PoisonError::into_inner) = Some(chain_id);
    }

    /// Handles a provider request, returning `null` on any failure.
    ///
    /// Failures are logged; use [`try_request`](Self::try_request) to observe
    /// the cause.
    pub async fn request(&self, method: &str, params: Option<Vec<Value>>) -> Value {
        let session = self.active_chain_id();
        let chain = chain::resolve(session.as_deref());
        match self.dispatch(session, chain, method, params).await {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(method, chain = chain.id, %error, "request failed within mock wallet");
                Value::Null
            }
        }
    }

    /// Handles a provider request, surfacing failures as [`WalletError`].
    ///
    /// # Errors
    ///
    /// Returns an error if parameters are malformed, the sender is not the
    /// credential, the credential cannot sign, or the network client fails.
    pub async fn try_request(
        &self,
        method: &str,
        params: Option<Vec<Value>>,
    ) -> Result<Value, WalletError> {
        let session = self.active_chain_id();
        let chain = chain::resolve(session.as_deref());
        self.dispatch(session, chain, method, params).await
    }

    /// Runs one request against the session snapshot taken by the caller.
    async fn dispatch(
        &self,
        session: Option<String>,
        chain: &'static ChainDescriptor,
        name: &str,
        params: Option<Vec<Value>>,
    ) -> Result<Value, WalletError> {
        let client = self
            .transports
            .get(chain.id)
            .connect(chain, self.credential.as_ref())?;
        let params = params.unwrap_or_default();
        let method = Method::parse(name);
        tracing::debug!(
            method = name,
            chain = chain.id,
            testnet = chain.is_testnet,
            "handling request"
        );

        match method {
            Method::Accounts => {
                let addresses = client.addresses().await?;
                Ok(addresses
                    .iter()
                    .map(|address| Value::String(address.to_checksum(None)))
                    .collect())
            }
            Method::Permissions => Ok(json!([{ "parentCapability": "eth_accounts" }])),
            Method::SwitchChain => {
                let SwitchChain { chain_id } =
                    SwitchChain::deserialize(params::positional(&params, 0)?)
                        .map_err(|e| WalletError::params(format!("invalid switch request: {e}")))?;
                self.switch_chain(chain_id);
                Ok(Value::Null)
            }
            Method::PersonalSign => {
                let message = params::hex_bytes(params::positional(&params, 0)?)?;
                let signature = self.credential.sign_message(&message).await?;
                Ok(signature_value(&signature))
            }
            Method::ChainId => {
                let chain_id = session.unwrap_or_else(|| chain::MAINNET.hex_id());
                tracing::debug!(%chain_id, "returning eth_chainId");
                Ok(Value::String(chain_id))
            }
            Method::SendRawTransaction => {
                let encoded = params::hex_bytes(params::positional(&params, 0)?)?;
                let hash = client.send_raw_transaction(&encoded).await?;
                Ok(json!(hash))
            }
            Method::SignTypedData => self.sign_typed_data(chain, &params).await,
            Method::SendTransaction => self.send_transaction(chain, client.as_ref(), &params).await,
            Method::Forward(name) => client.request(&name, Value::Array(params)).await,
        }
    }

    async fn sign_typed_data(
        &self,
        chain: &ChainDescriptor,
        params: &[Value],
    ) -> Result<Value, WalletError> {
        let from = params::positional(params, 0)?;
        self.check_sender(from.as_str().unwrap_or_default(), from)?;
        let payload = params::typed_data(params::positional(params, 1)?, chain.id)?;
        let signature = self.credential.sign_typed_data(&payload).await?;
        Ok(signature_value(&signature))
    }

    async fn send_transaction(
        &self,
        chain: &ChainDescriptor,
        client: &dyn NetworkClient,
        params: &[Value],
    ) -> Result<Value, WalletError> {
        let raw = params::positional(params, 0)?;
        let from = raw.get("from").unwrap_or(&Value::Null);
        self.check_sender(from.as_str().unwrap_or_default(), from)?;
        let request = TransactionParams::from_value(raw)?.into_request(self.address(), chain.id)?;
        let hash = client.send_transaction(request).await?;
        Ok(json!(hash))
    }

    /// Fails unless `from` parses to the credential address. `raw` is what
    /// the dapp sent, kept for the error.
    fn check_sender(&self, from: &str, raw: &Value) -> Result<(), WalletError> {
        let expected = self.address();
        match Address::from_str(from) {
            Ok(address) if address == expected => Ok(()),
            _ => Err(WalletError::InvalidSender {
                expected,
                got: raw.as_str().map_or_else(|| raw.to_string(), str::to_owned),
            }),
        }
    }
}

fn signature_value(signature: &Signature) -> Value {
    Value::String(hex::encode_prefixed(signature.as_bytes()))
}
