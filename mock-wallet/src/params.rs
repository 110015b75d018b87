//! Decoding of provider request parameters.
//!
//! Dapps send numbers across the JSON boundary as hex or decimal strings.
//! Everything that feeds a signature or a transaction is restored to integer
//! form here, before it reaches the signer or the network client.

use std::str::FromStr;

use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, Bytes, TxKind, U256, hex};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::WalletError;

/// Returns positional parameter `index`, failing when it is absent.
///
/// # Errors
///
/// Returns [`WalletError::InvalidParams`] if fewer than `index + 1` parameters
/// were supplied.
pub fn positional(params: &[Value], index: usize) -> Result<&Value, WalletError> {
    params
        .get(index)
        .ok_or_else(|| WalletError::params(format!("missing parameter at position {index}")))
}

/// Decodes a `0x`-prefixed hex string into raw bytes.
///
/// # Errors
///
/// Returns [`WalletError::InvalidParams`] if `value` is not a hex string.
pub fn hex_bytes(value: &Value) -> Result<Bytes, WalletError> {
    let s = value
        .as_str()
        .ok_or_else(|| WalletError::params(format!("expected hex string, got {value}")))?;
    hex::decode(s)
        .map(Bytes::from)
        .map_err(|e| WalletError::params(format!("invalid hex '{s}': {e}")))
}

/// Coerces a JSON quantity (hex string, decimal string or integer) to [`U256`].
///
/// # Errors
///
/// Returns [`WalletError::InvalidParams`] for fractional, negative or
/// non-numeric input.
pub fn quantity(value: &Value) -> Result<U256, WalletError> {
    match value {
        Value::String(s) => U256::from_str(s.trim())
            .map_err(|e| WalletError::params(format!("invalid quantity '{s}': {e}"))),
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(int), _) => Ok(U256::from(int)),
            // integers past u64 are held as f64
            (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 => U256::try_from(f)
                .map_err(|e| WalletError::params(format!("invalid quantity {n}: {e}"))),
            _ => Err(WalletError::params(format!("invalid quantity {n}"))),
        },
        other => Err(WalletError::params(format!("invalid quantity {other}"))),
    }
}

fn optional_quantity(value: Option<&Value>) -> Result<Option<U256>, WalletError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => quantity(v).map(Some),
    }
}

/// `wallet_switchEthereumChain` parameter object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChain {
    /// Hex chain id the dapp wants to switch to.
    pub chain_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    from: Option<String>,
    to: Option<Address>,
    data: Option<Bytes>,
    value: Option<Value>,
    gas: Option<Value>,
    gas_price: Option<Value>,
    max_fee_per_gas: Option<Value>,
    max_priority_fee_per_gas: Option<Value>,
}

/// `eth_sendTransaction` parameter object with numeric fields coerced.
///
/// Absent fields stay `None`. Zero and unset differ for fee-market versus
/// legacy typing, so nothing is defaulted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionParams {
    /// Sender as supplied by the dapp.
    pub from: String,
    /// Recipient; `None` deploys a contract.
    pub to: Option<Address>,
    /// Calldata.
    pub data: Option<Bytes>,
    /// Wei transferred.
    pub value: Option<U256>,
    /// Gas limit.
    pub gas: Option<U256>,
    /// Legacy gas price.
    pub gas_price: Option<U256>,
    /// EIP-1559 fee cap.
    pub max_fee_per_gas: Option<U256>,
    /// EIP-1559 priority fee.
    pub max_priority_fee_per_gas: Option<U256>,
}

impl TransactionParams {
    /// Decodes the first `eth_sendTransaction` parameter.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidParams`] if the object is malformed or a
    /// numeric field cannot be coerced.
    pub fn from_value(value: &Value) -> Result<Self, WalletError> {
        let raw = RawTransaction::deserialize(value)
            .map_err(|e| WalletError::params(format!("invalid transaction object: {e}")))?;
        Ok(Self {
            from: raw.from.unwrap_or_default(),
            to: raw.to,
            data: raw.data,
            value: optional_quantity(raw.value.as_ref())?,
            gas: optional_quantity(raw.gas.as_ref())?,
            gas_price: optional_quantity(raw.gas_price.as_ref())?,
            max_fee_per_gas: optional_quantity(raw.max_fee_per_gas.as_ref())?,
            max_priority_fee_per_gas: optional_quantity(raw.max_priority_fee_per_gas.as_ref())?,
        })
    }

    /// Builds the request submitted to the network client, bound to `from`
    /// and `chain_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidParams`] if gas does not fit `u64` or a
    /// fee does not fit `u128`.
    pub fn into_request(self, from: Address, chain_id: u64) -> Result<TransactionRequest, WalletError> {
        Ok(TransactionRequest {
            from: Some(from),
            to: Some(self.to.map_or(TxKind::Create, TxKind::Call)),
            input: self.data.map(TransactionInput::new).unwrap_or_default(),
            value: self.value,
            gas: self.gas.map(|v| narrow::<u64>(v, "gas")).transpose()?,
            gas_price: self.gas_price.map(|v| narrow::<u128>(v, "gasPrice")).transpose()?,
            max_fee_per_gas: self
                .max_fee_per_gas
                .map(|v| narrow::<u128>(v, "maxFeePerGas"))
                .transpose()?,
            max_priority_fee_per_gas: self
                .max_priority_fee_per_gas
                .map(|v| narrow::<u128>(v, "maxPriorityFeePerGas"))
                .transpose()?,
            chain_id: Some(chain_id),
            ..Default::default()
        })
    }
}

fn narrow<T: TryFrom<U256>>(value: U256, field: &str) -> Result<T, WalletError> {
    T::try_from(value).map_err(|_| WalletError::params(format!("{field} {value} out of range")))
}

/// Decodes the typed-data parameter of `eth_signTypedData*`.
///
/// Accepts a JSON-encoded string or an object. A truthy `message.amount` is
/// coerced to an integer, and `domain.chainId` is replaced by `chain_id`
/// whatever the dapp sent.
///
/// # Errors
///
/// Returns [`WalletError::InvalidParams`] if the payload is not valid typed
/// data or `message.amount` is not an integer.
pub fn typed_data(value: &Value, chain_id: u64) -> Result<TypedData, WalletError> {
    let mut payload = match value {
        Value::String(s) => serde_json::from_str::<Value>(s)
            .map_err(|e| WalletError::params(format!("typed data is not JSON: {e}")))?,
        Value::Object(_) => value.clone(),
        other => return Err(WalletError::params(format!("invalid typed data {other}"))),
    };
    let fields = payload
        .as_object_mut()
        .ok_or_else(|| WalletError::params("typed data must be an object"))?;

    if let Some(amount) = fields
        .get_mut("message")
        .and_then(Value::as_object_mut)
        .and_then(|message| message.get_mut("amount"))
        && is_truthy(amount)
    {
        *amount = Value::String(quantity(amount)?.to_string());
    }

    let mut domain = match fields.remove("domain") {
        Some(Value::Object(domain)) => domain,
        None | Some(Value::Null) => Map::new(),
        Some(other) => return Err(WalletError::params(format!("invalid domain {other}"))),
    };
    domain.insert("chainId".into(), Value::String(format!("{chain_id:#x}")));

    let mut normalized = Map::new();
    normalized.insert("domain".into(), Value::Object(domain));
    for key in ["types", "primaryType", "message"] {
        if let Some(v) = fields.remove(key) {
            normalized.insert(key.into(), v);
        }
    }
    serde_json::from_value(Value::Object(normalized))
        .map_err(|e| WalletError::params(format!("invalid typed data: {e}")))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
