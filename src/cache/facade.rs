//! Named Cache Facade Module
//!
//! Combines an organization-wide and a session-scoped cache, with the
//! session shadowing the organization on lookup.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{
    BackingPartition, BucketedCache, MemoryPartition, Namespace, PackingStats, PartitionScope,
};

// == Facade Stats ==
/// Packing statistics for both scopes.
#[derive(Debug, Clone, Serialize)]
pub struct FacadeStats {
    pub org: PackingStats,
    pub session: PackingStats,
}

// == Named Cache Facade ==
#[derive(Debug)]
pub struct NamedCacheFacade<P> {
    org: BucketedCache<P>,
    session: BucketedCache<P>,
}

impl<P: BackingPartition> NamedCacheFacade<P> {
    pub fn new(org: BucketedCache<P>, session: BucketedCache<P>) -> Self {
        Self { org, session }
    }

    /// Returns true if either scope holds `key`, session first.
    pub fn contains(&self, key: &str) -> bool {
        self.session.contains(key) || self.org.contains(key)
    }

    /// Returns the session value for `key`, else the org value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.session.get(key).or_else(|| self.org.get(key))
    }

    /// Returns the cache bound to `scope`.
    pub fn scope(&self, scope: PartitionScope) -> &BucketedCache<P> {
        match scope {
            PartitionScope::Org => &self.org,
            PartitionScope::Session => &self.session,
        }
    }

    pub fn scope_mut(&mut self, scope: PartitionScope) -> &mut BucketedCache<P> {
        match scope {
            PartitionScope::Org => &mut self.org,
            PartitionScope::Session => &mut self.session,
        }
    }

    pub fn org(&self) -> &BucketedCache<P> {
        &self.org
    }

    pub fn org_mut(&mut self) -> &mut BucketedCache<P> {
        &mut self.org
    }

    pub fn session(&self) -> &BucketedCache<P> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut BucketedCache<P> {
        &mut self.session
    }

    /// Reloads both scopes from their partitions.
    pub fn reload(&mut self) {
        self.org.reload();
        self.session.reload();
    }

    pub fn stats(&self) -> FacadeStats {
        FacadeStats {
            org: self.org.stats(),
            session: self.session.stats(),
        }
    }
}

impl NamedCacheFacade<MemoryPartition> {
    /// Builds both scopes over fresh in-memory partitions named under
    /// `namespace`.
    ///
    /// # Arguments
    /// * `namespace` - Resolved namespace prefix
    /// * `partition` - Base partition name
    /// * `item_size_limit` - Per-item limit of both partitions, in bytes
    pub fn in_memory(namespace: &Namespace, partition: &str, item_size_limit: usize) -> Self {
        let open = |scope: PartitionScope| {
            BucketedCache::new(MemoryPartition::new(
                namespace.qualify(scope, partition),
                item_size_limit,
            ))
        };
        Self::new(open(PartitionScope::Org), open(PartitionScope::Session))
    }
}
