//! Reference data for supported lending protocols and chains.

/// Static description of a known protocol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtocolInfo {
    pub name: &'static str,
    pub short_name: &'static str,
    /// Risk rating, 0 to 10.
    pub safety_score: f64,
}

pub const KNOWN_PROTOCOLS: &[ProtocolInfo] = &[
    ProtocolInfo {
        name: "Aave V3",
        short_name: "Aave",
        safety_score: 9.0,
    },
    ProtocolInfo {
        name: "Compound V3",
        short_name: "Compound",
        safety_score: 8.5,
    },
    ProtocolInfo {
        name: "Curve Finance",
        short_name: "Curve",
        safety_score: 8.8,
    },
];

/// Safety score given to protocols we have no rating for.
pub const UNKNOWN_PROTOCOL_SAFETY_SCORE: f64 = 7.0;

/// Find a known protocol whose short name appears in `protocol`
/// (case-insensitive), so `aave-v3` and `Aave V3` both resolve.
pub fn lookup_protocol(protocol: &str) -> Option<&'static ProtocolInfo> {
    let needle = protocol.to_lowercase();
    KNOWN_PROTOCOLS
        .iter()
        .find(|p| needle.contains(&p.short_name.to_lowercase()))
}

pub fn safety_score_for(protocol: &str) -> f64 {
    lookup_protocol(protocol)
        .map(|p| p.safety_score)
        .unwrap_or(UNKNOWN_PROTOCOL_SAFETY_SCORE)
}

/// EVM chain id for a chain name. Unknown chains map to mainnet.
pub fn chain_id(chain: &str) -> u64 {
    match chain.to_lowercase().as_str() {
        "base" => 8453,
        "arbitrum" => 42161,
        _ => 1,
    }
}
