//! Request-scoped carrier threading the current pathway through a call chain.

use super::pathway::Pathway;

/// Holds the pathway of the payload currently being processed, if any.
///
/// Carriers are values: binding a pathway returns a new carrier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carrier {
    pathway: Option<Pathway>,
}

impl Carrier {
    /// An empty carrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a carrier bound to `pathway`.
    #[must_use]
    pub fn with_pathway(self, pathway: Pathway) -> Self {
        Self {
            pathway: Some(pathway),
        }
    }

    pub fn pathway(&self) -> Option<&Pathway> {
        self.pathway.as_ref()
    }

    pub fn into_pathway(self) -> Option<Pathway> {
        self.pathway
    }
}
