//! Static registry of known EVM networks.
//!
//! [`resolve`] maps the wallet's session chain id (a hex string, as dapps send
//! it through `wallet_switchEthereumChain`) to a [`ChainDescriptor`]. Lookup is
//! lenient: an absent, malformed or unknown id resolves to [`MAINNET`].

use serde::Serialize;

/// Definition of an EVM-compatible network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainDescriptor {
    /// EIP-155 chain id.
    pub id: u64,
    /// Display name.
    pub name: &'static str,
    /// Default public JSON-RPC endpoint.
    pub rpc_url: &'static str,
    /// Whether the network is a testnet or local devnet.
    pub is_testnet: bool,
}

impl ChainDescriptor {
    /// Chain id as a `0x`-prefixed hex quantity, e.g. `0xa` for Optimism.
    #[must_use]
    pub fn hex_id(&self) -> String {
        format!("{:#x}", self.id)
    }
}

/// Ethereum mainnet, the default network.
pub const MAINNET: ChainDescriptor = ChainDescriptor {
    id: 1,
    name: "Ethereum",
    rpc_url: "https://eth.merkle.io",
    is_testnet: false,
};

const KNOWN_CHAINS: &[ChainDescriptor] = &[
    MAINNET,
    ChainDescriptor {
        id: 10,
        name: "OP Mainnet",
        rpc_url: "https://mainnet.optimism.io",
        is_testnet: false,
    },
    ChainDescriptor {
        id: 56,
        name: "BNB Smart Chain",
        rpc_url: "https://bsc-dataseed.binance.org",
        is_testnet: false,
    },
    ChainDescriptor {
        id: 100,
        name: "Gnosis",
        rpc_url: "https://rpc.gnosischain.com",
        is_testnet: false,
    },
    ChainDescriptor {
        id: 137,
        name: "Polygon",
        rpc_url: "https://polygon-rpc.com",
        is_testnet: false,
    },
    ChainDescriptor {
        id: 8453,
        name: "Base",
        rpc_url: "https://mainnet.base.org",
        is_testnet: false,
    },
    ChainDescriptor {
        id: 42161,
        name: "Arbitrum One",
        rpc_url: "https://arb1.arbitrum.io/rpc",
        is_testnet: false,
    },
    ChainDescriptor {
        id: 43114,
        name: "Avalanche",
        rpc_url: "https://api.avax.network/ext/bc/C/rpc",
        is_testnet: false,
    },
    ChainDescriptor {
        id: 59144,
        name: "Linea Mainnet",
        rpc_url: "https://rpc.linea.build",
        is_testnet: false,
    },
    ChainDescriptor {
        id: 11_155_111,
        name: "Sepolia",
        rpc_url: "https://sepolia.drpc.org",
        is_testnet: true,
    },
    ChainDescriptor {
        id: 17000,
        name: "Holesky",
        rpc_url: "https://ethereum-holesky-rpc.publicnode.com",
        is_testnet: true,
    },
    ChainDescriptor {
        id: 84532,
        name: "Base Sepolia",
        rpc_url: "https://sepolia.base.org",
        is_testnet: true,
    },
    ChainDescriptor {
        id: 31337,
        name: "Anvil",
        rpc_url: "http://127.0.0.1:8545",
        is_testnet: true,
    },
];

/// Resolves an optional hex chain id to a known network.
///
/// Falls back to [`MAINNET`] when `chain_id_hex` is `None`, cannot be decoded,
/// or names a chain the registry does not know.
#[must_use]
pub fn resolve(chain_id_hex: Option<&str>) -> &'static ChainDescriptor {
    chain_id_hex
        .and_then(parse_hex_id)
        .and_then(by_id)
        .unwrap_or(&MAINNET)
}

/// Returns the descriptor for `id`, or `None` if the network is unknown.
#[must_use]
pub fn by_id(id: u64) -> Option<&'static ChainDescriptor> {
    KNOWN_CHAINS.iter().find(|c| c.id == id)
}

/// All known network descriptors.
#[must_use]
pub const fn known_chains() -> &'static [ChainDescriptor] {
    KNOWN_CHAINS
}

/// Decodes a hex quantity such as `0xa` or `0X2105` into a chain id.
#[must_use]
pub fn parse_hex_id(value: &str) -> Option<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
