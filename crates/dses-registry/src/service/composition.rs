//! # Composition Resolver
//!
//! Validates the services a mashup references and collects their developers.
//! Read-only.

use crate::adapters::EntityRepository;
use crate::domain::invariants::check_composition_invariant;
use crate::domain::RegistryResult;
use crate::ports::WorldState;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Outcome of resolving a mashup's references.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedComposition {
    /// Referenced service name to count. Duplicates collapse to 1.
    pub composition: BTreeMap<String, u32>,
    /// Unique developer names, in lexicographic order.
    pub developers: BTreeSet<String>,
}

/// Resolves referenced services against the ledger.
pub struct CompositionResolver<'a, S: ?Sized> {
    repo: EntityRepository<'a, S>,
}

impl<'a, S: WorldState + ?Sized> CompositionResolver<'a, S> {
    /// Create a resolver over the invocation's world state.
    pub fn new(repo: EntityRepository<'a, S>) -> Self {
        Self { repo }
    }

    /// Fail on the first missing service; otherwise return the deduplicated
    /// composition and developer set.
    #[instrument(skip_all, fields(references = referenced.len()))]
    pub async fn resolve(&self, referenced: &[String]) -> RegistryResult<ResolvedComposition> {
        let mut resolved = ResolvedComposition::default();

        for name in referenced {
            let service = self.repo.service(name).await?;
            resolved.composition.insert(name.clone(), 1);
            resolved.developers.insert(service.developer);
        }

        debug_assert!(check_composition_invariant(resolved.composition.values()));
        debug!(
            services = resolved.composition.len(),
            developers = resolved.developers.len(),
            "composition resolved"
        );
        Ok(resolved)
    }
}
