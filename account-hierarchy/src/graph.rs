use crate::models::AccountRecord;
use access_control::{Actor, Role};
use tracing::debug;

/// Permission rules over the creator/parent/child account graph.
///
/// Pure decision functions; the edges themselves live on the account
/// records and are maintained by the repository.
#[derive(Debug, Clone, Default)]
pub struct UserHierarchyGraph {
    _private: (),
}

impl UserHierarchyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `actor` may edit or deactivate `target`.
    ///
    /// Admins and super_admins manage anyone; everyone else only manages
    /// accounts they created, regardless of rank.
    pub fn can_modify(&self, actor: &Actor, target: &AccountRecord) -> bool {
        if actor.role.is_administrative() {
            return true;
        }
        let is_creator = target.hierarchy.created_by.as_deref() == Some(actor.id.as_str());
        if !is_creator {
            debug!(
                actor = %actor.id,
                target = %target.id,
                "hierarchy modification denied: not creator"
            );
        }
        is_creator
    }

    /// Whether `actor` may remove `target` through the standard path.
    ///
    /// super_admin accounts can never be deleted this way; admin accounts
    /// only by a super_admin, never by a peer admin. Everything else
    /// follows the modification rule (and is deactivated, not hard
    /// deleted).
    pub fn can_delete(&self, actor: &Actor, target: &AccountRecord) -> bool {
        match target.role {
            Role::SuperAdmin => false,
            Role::Admin => actor.role == Role::SuperAdmin,
            _ => self.can_modify(actor, target),
        }
    }
}
