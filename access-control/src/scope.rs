use crate::models::Actor;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

/// Resource families a tenant scope can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Study,
    User,
    Lab,
}

/// The base tenant restriction for one request.
///
/// Always combined (logical AND) with resource-specific filters built by
/// the caller; status, search and date-range filtering live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantScope {
    /// See-all. Only an unscoped super_admin gets this.
    Unrestricted,
    /// Restricted to one organization identifier.
    Organization(String),
    /// Matches nothing. Produced when tenant context is missing; a request
    /// that cannot be scoped must not be left unscoped.
    DenyAll,
}

impl TenantScope {
    /// Renders the scope as a document-store filter fragment.
    pub fn to_filter(&self) -> Value {
        match self {
            TenantScope::Unrestricted => json!({}),
            TenantScope::Organization(identifier) => {
                json!({ "organizationIdentifier": identifier })
            }
            TenantScope::DenyAll => json!({ "organizationIdentifier": { "$in": [] } }),
        }
    }

    /// Whether a record carrying `organization_identifier` falls inside
    /// this scope.
    pub fn covers(&self, organization_identifier: Option<&str>) -> bool {
        match self {
            TenantScope::Unrestricted => true,
            TenantScope::Organization(own) => {
                organization_identifier.is_some_and(|other| other == own)
            }
            TenantScope::DenyAll => false,
        }
    }
}

/// Builds the per-request tenant restriction.
///
/// Tenant isolation invariant: no role other than an unscoped super_admin
/// ever sees cross-tenant data, regardless of any other permission.
#[derive(Debug, Clone, Default)]
pub struct TenantScopeBuilder {
    _private: (),
}

impl TenantScopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The base filter for `actor` querying `resource`.
    ///
    /// Every resource kind scopes the same way today; the parameter keeps
    /// the call sites honest about what they are fetching.
    pub fn scope_for(&self, actor: &Actor, resource: ResourceKind) -> TenantScope {
        if actor.role == Role::SuperAdmin {
            // A super_admin "viewing as" a tenant is pinned to it.
            return match &actor.organization_context {
                Some(context) => {
                    TenantScope::Organization(context.organization_identifier.clone())
                }
                None => TenantScope::Unrestricted,
            };
        }

        match &actor.organization_identifier {
            Some(identifier) => TenantScope::Organization(identifier.clone()),
            None => {
                warn!(
                    actor = %actor.id,
                    role = %actor.role,
                    ?resource,
                    "actor without tenant context, scoping query to nothing"
                );
                TenantScope::DenyAll
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrganizationContext;

    #[test]
    fn test_non_super_admin_is_pinned_to_own_organization() {
        let builder = TenantScopeBuilder::new();
        for role in Role::ALL {
            if role == Role::SuperAdmin {
                continue;
            }
            let actor = Actor::new("u1", role, Some("ORG1"));
            for resource in [ResourceKind::Study, ResourceKind::User, ResourceKind::Lab] {
                assert_eq!(
                    builder.scope_for(&actor, resource),
                    TenantScope::Organization("ORG1".to_string())
                );
            }
        }
    }

    #[test]
    fn test_unscoped_super_admin_sees_all() {
        let builder = TenantScopeBuilder::new();
        let actor = Actor::new("root", Role::SuperAdmin, None);
        let scope = builder.scope_for(&actor, ResourceKind::Study);
        assert_eq!(scope, TenantScope::Unrestricted);
        assert_eq!(scope.to_filter(), serde_json::json!({}));
    }

    #[test]
    fn test_super_admin_view_as_tenant_is_pinned() {
        let builder = TenantScopeBuilder::new();
        let mut actor = Actor::new("root", Role::SuperAdmin, None);
        actor.organization_context = Some(OrganizationContext {
            organization_identifier: "ORG2".to_string(),
        });
        assert_eq!(
            builder.scope_for(&actor, ResourceKind::Lab),
            TenantScope::Organization("ORG2".to_string())
        );
    }

    #[test]
    fn test_missing_tenant_context_fails_closed() {
        let builder = TenantScopeBuilder::new();
        let actor = Actor::new("u1", Role::Radiologist, None);
        let scope = builder.scope_for(&actor, ResourceKind::Study);
        assert_eq!(scope, TenantScope::DenyAll);
        assert!(!scope.covers(Some("ORG1")));
        assert!(!scope.covers(None));
    }

    #[test]
    fn test_filter_carries_equality_constraint() {
        let builder = TenantScopeBuilder::new();
        let actor = Actor::new("u1", Role::Billing, Some("ORG1"));
        let filter = builder.scope_for(&actor, ResourceKind::Study).to_filter();
        assert_eq!(filter["organizationIdentifier"], "ORG1");
    }

    #[test]
    fn test_scope_coverage() {
        assert!(TenantScope::Unrestricted.covers(Some("ORG9")));
        assert!(TenantScope::Organization("ORG1".to_string()).covers(Some("ORG1")));
        assert!(!TenantScope::Organization("ORG1".to_string()).covers(Some("ORG2")));
        assert!(!TenantScope::Organization("ORG1".to_string()).covers(None));
    }
}
