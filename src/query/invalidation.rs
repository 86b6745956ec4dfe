//! Declared write-to-read invalidation table
//!
//! Every write operation is a [`WriteOp`] variant, and the table maps each
//! one to the read keys its success makes stale. Wiring invalidation at each
//! mutation call site invites drift (a forgotten key silently serves stale
//! data), so the coupling is declared once here and checked for completeness
//! when a console is built.

use super::cache::QueryCache;
use super::key::QueryKey;
use super::keys::{self, resource};
use std::collections::HashMap;

/// Every write operation the console performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOp {
    ConnectCluster,
    RemoveCluster,
    CreateDeployment,
    UpdateDeployment,
    DeleteDeployment,
    CreateProject,
    DeleteProject,
    UpdateProjectToken,
    InviteMember,
    RemoveMember,
    ChangeMemberRole,
    Login,
    Signup,
}

impl WriteOp {
    /// Every variant; the completeness check walks this
    pub const ALL: [WriteOp; 13] = [
        WriteOp::ConnectCluster,
        WriteOp::RemoveCluster,
        WriteOp::CreateDeployment,
        WriteOp::UpdateDeployment,
        WriteOp::DeleteDeployment,
        WriteOp::CreateProject,
        WriteOp::DeleteProject,
        WriteOp::UpdateProjectToken,
        WriteOp::InviteMember,
        WriteOp::RemoveMember,
        WriteOp::ChangeMemberRole,
        WriteOp::Login,
        WriteOp::Signup,
    ];
}

/// One read target a write makes stale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationTarget {
    /// A single key (must come from the key registry, never a literal)
    Exact(QueryKey),
    /// Every key of a resource: its listing and all entity/status keys
    Resource(&'static str),
}

/// The write-op → stale-read-keys table
pub struct InvalidationMap {
    entries: HashMap<WriteOp, Vec<InvalidationTarget>>,
}

impl InvalidationMap {
    /// The declared table for the console's operations
    ///
    /// An op that affects no read cache still gets an explicit empty entry;
    /// absence means "forgot to decide", and the completeness check treats it
    /// as an error.
    #[must_use]
    pub fn declared() -> Self {
        let mut entries: HashMap<WriteOp, Vec<InvalidationTarget>> = HashMap::new();

        entries.insert(
            WriteOp::ConnectCluster,
            vec![InvalidationTarget::Resource(resource::CLUSTERS)],
        );
        entries.insert(
            WriteOp::RemoveCluster,
            vec![InvalidationTarget::Resource(resource::CLUSTERS)],
        );

        entries.insert(
            WriteOp::CreateDeployment,
            vec![InvalidationTarget::Resource(resource::DEPLOYMENTS)],
        );
        entries.insert(
            WriteOp::UpdateDeployment,
            vec![InvalidationTarget::Resource(resource::DEPLOYMENTS)],
        );
        entries.insert(
            WriteOp::DeleteDeployment,
            vec![InvalidationTarget::Resource(resource::DEPLOYMENTS)],
        );

        entries.insert(
            WriteOp::CreateProject,
            vec![InvalidationTarget::Exact(keys::projects())],
        );
        entries.insert(
            WriteOp::DeleteProject,
            vec![InvalidationTarget::Exact(keys::projects())],
        );
        entries.insert(
            WriteOp::UpdateProjectToken,
            vec![InvalidationTarget::Exact(keys::projects())],
        );

        entries.insert(
            WriteOp::InviteMember,
            vec![InvalidationTarget::Exact(keys::members())],
        );
        entries.insert(
            WriteOp::RemoveMember,
            vec![InvalidationTarget::Exact(keys::members())],
        );
        entries.insert(
            WriteOp::ChangeMemberRole,
            vec![
                InvalidationTarget::Exact(keys::members()),
                InvalidationTarget::Exact(keys::roles()),
            ],
        );

        // Auth writes touch no cached listing; the token side effect is the
        // mutation's own on-success hook.
        entries.insert(WriteOp::Login, vec![]);
        entries.insert(WriteOp::Signup, vec![]);

        Self { entries }
    }

    /// Targets declared for one op (empty when the op declares none)
    #[must_use]
    pub fn targets(&self, op: WriteOp) -> &[InvalidationTarget] {
        self.entries.get(&op).map_or(&[], Vec::as_slice)
    }

    /// Ops with no entry at all - a completeness hole
    #[must_use]
    pub fn missing_ops(&self) -> Vec<WriteOp> {
        WriteOp::ALL
            .into_iter()
            .filter(|op| !self.entries.contains_key(op))
            .collect()
    }

    /// Apply one op's declared invalidations to the cache
    pub fn apply(&self, op: WriteOp, cache: &QueryCache) {
        for target in self.targets(op) {
            match target {
                InvalidationTarget::Exact(key) => cache.invalidate(key),
                InvalidationTarget::Resource(name) => cache.invalidate_resource(name),
            }
        }
    }
}

impl Default for InvalidationMap {
    fn default() -> Self {
        Self::declared()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_table_is_complete() {
        let map = InvalidationMap::declared();
        assert!(
            map.missing_ops().is_empty(),
            "every write op must declare its invalidations (even an empty set): {:?}",
            map.missing_ops()
        );
    }

    #[test]
    fn test_delete_deployment_targets_deployments() {
        let map = InvalidationMap::declared();
        assert_eq!(
            map.targets(WriteOp::DeleteDeployment),
            &[InvalidationTarget::Resource(resource::DEPLOYMENTS)]
        );
    }

    #[test]
    fn test_auth_ops_declare_empty_sets() {
        let map = InvalidationMap::declared();
        assert!(map.targets(WriteOp::Login).is_empty());
        assert!(map.targets(WriteOp::Signup).is_empty());
        assert!(map.missing_ops().is_empty());
    }
}
