//! Node and pathway hashing
//!
//! Both hashes are 64-bit FNV-1a with the standard offset basis. No salt and
//! no per-process randomness: two services computing the same node
//! independently must agree on the value.

use fnv::FnvHasher;
use std::hash::Hasher;

/// Hash a node's identity: the service name followed by its edge tags in
/// lexicographic order.
///
/// The input is a plain concatenation with no separator, so `("foo", ["bar"])`
/// and `("foob", ["ar"])` collide. Adding a delimiter would change every hash
/// already computed by other services, so the layout is kept as is.
pub fn node_hash<S: AsRef<str>>(service: &str, edge_tags: &[S]) -> u64 {
    let mut sorted: Vec<&str> = edge_tags.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let mut hasher = FnvHasher::default();
    hasher.write(service.as_bytes());
    for tag in sorted {
        hasher.write(tag.as_bytes());
    }
    hasher.finish()
}

/// Chain a node hash onto its parent's chain hash.
///
/// Hashes the 16-byte little-endian concatenation `node_hash || parent_hash`.
pub fn pathway_hash(node_hash: u64, parent_hash: u64) -> u64 {
    let mut buf = [0u8; 16];
    buf[..8].copy_from_slice(&node_hash.to_le_bytes());
    buf[8..].copy_from_slice(&parent_hash.to_le_bytes());

    let mut hasher = FnvHasher::default();
    hasher.write(&buf);
    hasher.finish()
}
