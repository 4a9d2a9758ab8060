//! Merging converging pathways
//!
//! A single chain hash cannot represent several divergent histories, so a
//! join point keeps one incoming branch chosen uniformly at random and
//! discards the others. This is an approximation on purpose: over many
//! payloads every branch is represented in proportion to its traffic.

use pathway_telemetry::{metric_inc, MERGES};
use rand::Rng;

use super::pathway::Pathway;

/// Collapse converging pathways into one, sampled uniformly.
///
/// Empty input yields the zero-value pathway; a single input is returned as is.
pub fn merge(pathways: &[Pathway]) -> Pathway {
    merge_with_rng(pathways, &mut rand::thread_rng())
}

/// [`merge`] with an explicit random source.
pub fn merge_with_rng<R: Rng + ?Sized>(pathways: &[Pathway], rng: &mut R) -> Pathway {
    match pathways {
        [] => Pathway::default(),
        [only] => only.clone(),
        _ => {
            metric_inc!(MERGES);
            pathways[rng.gen_range(0..pathways.len())].clone()
        }
    }
}
