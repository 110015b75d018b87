//! Scriptable EIP-1193 wallet provider for dapp end-to-end tests.
//!
//! [`Wallet`] stands in for a browser wallet extension: it answers provider
//! calls such as `eth_requestAccounts`, `wallet_switchEthereumChain`,
//! `personal_sign`, `eth_signTypedData_v4` and `eth_sendTransaction` with a
//! single pre-supplied key, and forwards everything else to the chain's RPC.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alloy_signer_local::PrivateKeySigner;
//! use mock_wallet::{TransportRegistry, Wallet};
//! use serde_json::json;
//!
//! # async fn demo() {
//! let wallet = Wallet::new(Arc::new(PrivateKeySigner::random()), TransportRegistry::new());
//! wallet
//!     .request("wallet_switchEthereumChain", Some(vec![json!({ "chainId": "0xa" })]))
//!     .await;
//! assert_eq!(wallet.request("eth_chainId", None).await, json!("0xa"));
//! # }
//! ```

pub mod announce;
pub mod chain;
pub mod config;
pub mod credential;
pub mod error;
pub mod method;
pub mod params;
pub mod routes;
pub mod signers;
pub mod transport;
pub mod wallet;

pub use chain::ChainDescriptor;
pub use credential::Credential;
pub use error::{Error, WalletError};
pub use transport::{HttpTransport, NetworkClient, Transport, TransportRegistry};
pub use wallet::Wallet;
