//! Namespace Module
//!
//! Qualifies partition names with a deployment namespace so that several
//! deployments can share one backing store without colliding.

use std::fmt;

use serde::Serialize;

use crate::cache::DEFAULT_NAMESPACE;

// == Namespace Resolver ==
/// Source of the namespace prefix, consulted once when a `Namespace` is built.
pub trait NamespaceResolver {
    /// Returns the configured prefix, or None when there is none.
    fn resolve_prefix(&self) -> Option<String>;
}

/// Resolver returning a fixed prefix.
#[derive(Debug, Clone, Default)]
pub struct StaticNamespace(pub Option<String>);

impl NamespaceResolver for StaticNamespace {
    fn resolve_prefix(&self) -> Option<String> {
        self.0.clone()
    }
}

// == Partition Scope ==
/// Lifetime scope a partition is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionScope {
    /// Shared by the whole organization
    Org,
    /// Private to one user session
    Session,
}

impl PartitionScope {
    /// Suffix appended to the partition name for this scope.
    pub fn suffix(&self) -> &'static str {
        match self {
            PartitionScope::Org => "Org",
            PartitionScope::Session => "Session",
        }
    }
}

impl fmt::Display for PartitionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionScope::Org => write!(f, "org"),
            PartitionScope::Session => write!(f, "session"),
        }
    }
}

// == Namespace ==
/// A resolved namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    /// Resolves the prefix once, falling back to `"local"` when the resolver
    /// has none or returns a blank string.
    pub fn resolve(resolver: &dyn NamespaceResolver) -> Self {
        let prefix = resolver
            .resolve_prefix()
            .map(|prefix| prefix.trim().to_string())
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Builds the qualified partition name, e.g. `local.bucketsOrg`.
    pub fn qualify(&self, scope: PartitionScope, partition: &str) -> String {
        format!("{}.{}{}", self.prefix, partition, scope.suffix())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::resolve(&StaticNamespace(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix() {
        assert_eq!(Namespace::default().prefix(), "local");
    }

    #[test]
    fn test_blank_prefix_falls_back() {
        let namespace = Namespace::resolve(&StaticNamespace(Some("  ".to_string())));
        assert_eq!(namespace.prefix(), "local");
    }

    #[test]
    fn test_qualify() {
        let namespace = Namespace::resolve(&StaticNamespace(Some("acme".to_string())));

        assert_eq!(namespace.qualify(PartitionScope::Org, "buckets"), "acme.bucketsOrg");
        assert_eq!(
            namespace.qualify(PartitionScope::Session, "buckets"),
            "acme.bucketsSession"
        );
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(PartitionScope::Org.to_string(), "org");
        assert_eq!(PartitionScope::Session.to_string(), "session");
    }
}
