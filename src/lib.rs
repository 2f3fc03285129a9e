//! eCash block digest engine.
//!
//! Pipeline: decode payload outputs into stack arrays, interpret them
//! against the protocol registry, aggregate per-transaction monetary flow,
//! and render length-bounded block digests in priced and price-unavailable
//! variants. The decoder/interpreter/aggregator/formatter core is pure and
//! synchronous; the feeds tree owns all I/O.

pub mod block;
pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod errors;
pub mod feeds;
pub mod flow;
pub mod format;
pub mod protocols;
pub mod types;
