//! Constants shared by the ENScope crates.
//!
//! Service hosts are only defaults; every crate takes its base URLs from
//! configuration.

// ═══════════════════════════════════════════════════════════════════════════════
// EXTERNAL SERVICES
// ═══════════════════════════════════════════════════════════════════════════════

/// Default base URL of the name-resolution gateway.
///
/// Serves `/resolve-name/{name}` and `/resolve-text/{name}`.
pub const DEFAULT_RESOLVER_BASE_URL: &str = "https://cloudflare-eth.com";

/// Default base URL of the on-chain indexer (Dune Sim EVM API).
pub const DEFAULT_INDEXER_BASE_URL: &str = "https://api.sim.dune.com/v1/evm";

/// Header carrying the indexer API key.
pub const INDEXER_API_KEY_HEADER: &str = "X-Sim-Api-Key";

/// Chain identifier queried for enrichment (Ethereum mainnet).
pub const ENRICHMENT_CHAIN_ID: u64 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// NAMES & ADDRESSES
// ═══════════════════════════════════════════════════════════════════════════════

/// Accepted ENS name shape, matched case-insensitively after trimming.
pub const ENS_NAME_PATTERN: &str = r"^([a-z0-9-]+\.)*eth$";

/// Address returned by resolvers for names without an address record.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

// ═══════════════════════════════════════════════════════════════════════════════
// CLIENT DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default number of names resolved concurrently in a batch.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

// ═══════════════════════════════════════════════════════════════════════════════
// PROFILE RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Well-known profile text records and their display labels, in display order.
///
/// Each entry lists the record keys that carry the field, most common first.
pub const WELL_KNOWN_RECORDS: &[(&[&str], &str)] = &[
    (&["avatar"], "Avatar"),
    (&["display"], "Display Name"),
    (&["description"], "Bio/Description"),
    (&["url"], "Website"),
    (&["email"], "Email"),
    (&["com.twitter", "twitter"], "Twitter"),
    (&["com.github", "github"], "GitHub"),
    (&["com.discord", "discord"], "Discord"),
    (&["org.telegram", "telegram"], "Telegram"),
    (&["com.reddit", "reddit"], "Reddit"),
];
