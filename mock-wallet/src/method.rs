//! Provider method table.

/// EIP-1193 methods the mock wallet handles itself.
///
/// Anything else is carried as [`Method::Forward`] and passed to the network
/// client untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// `eth_accounts` / `eth_requestAccounts`.
    Accounts,
    /// `wallet_requestPermissions` / `wallet_revokePermissions`.
    Permissions,
    /// `wallet_switchEthereumChain`.
    SwitchChain,
    /// `personal_sign`.
    PersonalSign,
    /// `eth_chainId`.
    ChainId,
    /// `eth_sendRawTransaction`.
    SendRawTransaction,
    /// `eth_signTypedData`, `eth_signTypedData_v3`, `eth_signTypedData_v4`.
    SignTypedData,
    /// `eth_sendTransaction`.
    SendTransaction,
    /// Any other method name.
    Forward(String),
}

impl Method {
    /// Classifies a method name. Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "eth_accounts" | "eth_requestAccounts" => Self::Accounts,
            "wallet_requestPermissions" | "wallet_revokePermissions" => Self::Permissions,
            "wallet_switchEthereumChain" => Self::SwitchChain,
            "personal_sign" => Self::PersonalSign,
            "eth_chainId" => Self::ChainId,
            "eth_sendRawTransaction" => Self::SendRawTransaction,
            "eth_signTypedData" | "eth_signTypedData_v3" | "eth_signTypedData_v4" => {
                Self::SignTypedData
            }
            "eth_sendTransaction" => Self::SendTransaction,
            other => Self::Forward(other.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_share_a_handler() {
        assert_eq!(Method::parse("eth_requestAccounts"), Method::Accounts);
        assert_eq!(Method::parse("wallet_revokePermissions"), Method::Permissions);
        for name in ["eth_signTypedData", "eth_signTypedData_v3", "eth_signTypedData_v4"] {
            assert_eq!(Method::parse(name), Method::SignTypedData, "{name}");
        }
    }

    #[test]
    fn unknown_methods_are_forwarded() {
        let method = Method::parse("eth_getBalance");
        assert_eq!(method, Method::Forward("eth_getBalance".to_owned()));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(matches!(Method::parse("ETH_CHAINID"), Method::Forward(_)));
        assert!(matches!(Method::parse("eth_signTypedData_v1"), Method::Forward(_)));
    }
}
