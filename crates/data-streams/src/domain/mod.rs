//! Domain Layer - Pure pathway logic
//!
//! This layer contains:
//! - Node and pathway hashing (FNV-1a)
//! - The immutable `Pathway` value and its checkpoint operation
//! - Uniform merge sampling for converging branches
//! - The request-scoped `Carrier`
//! - The `StatsPoint` latency record
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Nothing here blocks

pub mod carrier;
pub mod hashing;
pub mod merge;
pub mod pathway;
pub mod stats;

pub use carrier::Carrier;
pub use hashing::{node_hash, pathway_hash};
pub use merge::{merge, merge_with_rng};
pub use pathway::Pathway;
pub use stats::{from_unix_millis, unix_millis, unix_nanos, StatsPoint};
