//! Structured log helpers.
//!
//! Pathway log lines carry a consistent set of fields so they can be joined
//! with the exported latency statistics:
//! - `service`: the local node identity
//! - `chain_hash`: the pathway hash, rendered as 16 hex digits
//! - additional context fields

/// Log a pathway-related event with standard fields.
///
/// # Example
///
/// ```rust,ignore
/// log_pathway_event!(debug, "billing-worker", pathway.chain_hash(), "Checkpoint set", partition = 3);
/// ```
#[macro_export]
macro_rules! log_pathway_event {
    ($level:ident, $service:expr, $chain_hash:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            service = %$service,
            chain_hash = %format!("{:016x}", $chain_hash),
            $($($field)*,)?
            $msg
        )
    };
}
