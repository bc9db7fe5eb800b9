use crate::error::{HierarchyError, Result};
use crate::graph::UserHierarchyGraph;
use crate::models::{AccountRecord, Hierarchy, NewAccountRequest};
use crate::repository::AccountRepository;
use access_control::{
    Actor, PrimaryRoleResolver, Role, RoleCreationAuthorizer, RoleConfigSanitizer, RoleRegistry,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Account provisioning and lifecycle over the repository seam.
///
/// Ties the pure evaluators together in the order that keeps the stored
/// invariants: authorization first, config sanitization before anything is
/// persisted, capabilities materialized from the registry at the moment of
/// the write, and the hierarchy edge recorded atomically with the insert.
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    registry: RoleRegistry,
    authorizer: RoleCreationAuthorizer,
    sanitizer: RoleConfigSanitizer,
    graph: UserHierarchyGraph,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self {
            repository,
            registry: RoleRegistry::new(),
            authorizer: RoleCreationAuthorizer::new(),
            sanitizer: RoleConfigSanitizer::new(),
            graph: UserHierarchyGraph::new(),
        }
    }

    pub fn graph(&self) -> &UserHierarchyGraph {
        &self.graph
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Provision a new account on behalf of `actor`.
    ///
    /// Fails before any persistence attempt when the creation hierarchy
    /// denies the pairing or the role config misses a hard requirement.
    pub async fn create_account(
        &self,
        actor: &Actor,
        request: NewAccountRequest,
    ) -> Result<AccountRecord> {
        let decision = self.authorizer.can_create(actor.role, request.role);
        if !decision.allowed {
            return Err(HierarchyError::CreationDenied(
                decision
                    .reason
                    .unwrap_or_else(|| "creation not permitted".to_string()),
            ));
        }

        let organization_identifier = self.resolve_tenant(&request)?;
        let primary_role = self.resolve_primary_role(&request)?;

        let role_config = self.sanitizer.sanitize(
            &request.role_config,
            request.role,
            &request.account_roles,
            request.linked_labs.as_deref(),
        )?;

        let now = Utc::now();
        let account = AccountRecord {
            id: request.id,
            role: request.role,
            organization_identifier,
            account_roles: request.account_roles,
            primary_role,
            role_config,
            // Materialized at write time, never hand-edited afterwards.
            permissions: self.registry.capabilities_of(request.role),
            hierarchy: Hierarchy::default(),
            linked_labs: request.linked_labs.unwrap_or_default(),
            visible_columns: request.visible_columns,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        // Insert and creator edge land together or not at all.
        self.repository
            .insert_with_parent(account.clone(), &actor.id)
            .await?;

        info!(
            account = %account.id,
            role = %account.role,
            created_by = %actor.id,
            "account provisioned"
        );
        self.repository
            .find_account(&account.id)
            .await?
            .ok_or_else(|| HierarchyError::AccountNotFound(account.id))
    }

    /// Switch `target_id` to `new_role`.
    ///
    /// Clears the role config (it is keyed by the old role) and recomputes
    /// the materialized capability set from the registry.
    pub async fn switch_role(
        &self,
        actor: &Actor,
        target_id: &str,
        new_role: Role,
    ) -> Result<AccountRecord> {
        let mut target = self.fetch(target_id).await?;

        if !self.graph.can_modify(actor, &target) {
            return Err(HierarchyError::ModificationDenied(format!(
                "{} may not modify account {target_id}",
                actor.id
            )));
        }
        // Switching someone onto a role the actor could not provision
        // would be an escalation through the back door.
        let decision = self.authorizer.can_create(actor.role, new_role);
        if !decision.allowed {
            return Err(HierarchyError::CreationDenied(
                decision
                    .reason
                    .unwrap_or_else(|| "role switch not permitted".to_string()),
            ));
        }

        target.role = new_role;
        target.role_config = None;
        target.permissions = self.registry.capabilities_of(new_role);
        target.updated_at = Utc::now();
        self.repository.update_account(target.clone()).await?;

        info!(account = %target.id, role = %new_role, by = %actor.id, "role switched");
        Ok(target)
    }

    /// Deactivate `target_id` (accounts are never hard-deleted here).
    pub async fn deactivate(&self, actor: &Actor, target_id: &str) -> Result<()> {
        let target = self.fetch(target_id).await?;

        match target.role {
            Role::SuperAdmin => {
                return Err(HierarchyError::ProtectedAccount(
                    "super_admin accounts cannot be removed".to_string(),
                ));
            }
            Role::Admin if actor.role != Role::SuperAdmin => {
                return Err(HierarchyError::ProtectedAccount(
                    "admin accounts can only be removed by a super_admin".to_string(),
                ));
            }
            _ => {}
        }
        if !self.graph.can_delete(actor, &target) {
            return Err(HierarchyError::ModificationDenied(format!(
                "{} may not deactivate account {target_id}",
                actor.id
            )));
        }

        self.repository.set_active(target_id, false).await?;
        info!(account = %target_id, by = %actor.id, "account deactivated");
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<AccountRecord> {
        self.repository
            .find_account(id)
            .await?
            .ok_or_else(|| HierarchyError::AccountNotFound(id.to_string()))
    }

    fn resolve_tenant(&self, request: &NewAccountRequest) -> Result<Option<String>> {
        if request.role == Role::SuperAdmin {
            // super_admin carries no tenant key, ever.
            return Ok(None);
        }
        match &request.organization_identifier {
            Some(identifier) if !identifier.is_empty() => Ok(Some(identifier.clone())),
            _ => Err(HierarchyError::Validation(format!(
                "{} account requires an organization identifier",
                request.role
            ))),
        }
    }

    fn resolve_primary_role(&self, request: &NewAccountRequest) -> Result<Option<Role>> {
        if request.account_roles.len() <= 1 {
            return Ok(request.primary_role);
        }
        match request.primary_role {
            Some(primary) if request.account_roles.contains(&primary) => Ok(Some(primary)),
            Some(primary) => Err(HierarchyError::Validation(format!(
                "primary role {primary} is not one of the account roles"
            ))),
            None => Ok(PrimaryRoleResolver::new(&self.registry).resolve(&request.account_roles)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryAccountRepository;
    use access_control::CapabilitySet;
    use serde_json::json;

    async fn service_with_admin() -> (AccountService, Actor) {
        let repository = Arc::new(InMemoryAccountRepository::new());
        let service = AccountService::new(repository.clone());
        let admin = AccountRecord {
            id: "A1".to_string(),
            role: Role::Admin,
            organization_identifier: Some("ORG1".to_string()),
            account_roles: Vec::new(),
            primary_role: None,
            role_config: None,
            permissions: service.registry.capabilities_of(Role::Admin),
            hierarchy: Hierarchy::default(),
            linked_labs: Vec::new(),
            visible_columns: Vec::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repository.insert_account(admin.clone()).await.unwrap();
        (service, admin.to_actor())
    }

    #[tokio::test]
    async fn test_create_account_records_hierarchy_edge() {
        let (service, admin) = service_with_admin().await;
        let created = service
            .create_account(
                &admin,
                NewAccountRequest::new("R1", Role::Radiologist, Some("ORG1")),
            )
            .await
            .unwrap();
        assert_eq!(created.hierarchy.created_by.as_deref(), Some("A1"));
        assert!(created.permissions.can_create_reports);

        let parent = service.repository.find_account("A1").await.unwrap().unwrap();
        assert_eq!(parent.hierarchy.child_users, vec!["R1"]);
    }

    #[tokio::test]
    async fn test_typist_without_link_fails_before_persistence() {
        let (service, admin) = service_with_admin().await;
        let result = service
            .create_account(&admin, NewAccountRequest::new("T1", Role::Typist, Some("ORG1")))
            .await;
        assert!(matches!(result, Err(HierarchyError::Config(_))));
        assert!(service.repository.find_account("T1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_creation_hierarchy_is_enforced() {
        let (service, admin) = service_with_admin().await;
        let result = service
            .create_account(&admin, NewAccountRequest::new("A2", Role::Admin, Some("ORG1")))
            .await;
        assert!(matches!(result, Err(HierarchyError::CreationDenied(_))));
    }

    #[tokio::test]
    async fn test_tenant_key_is_required() {
        let (service, admin) = service_with_admin().await;
        let result = service
            .create_account(&admin, NewAccountRequest::new("R1", Role::Radiologist, None))
            .await;
        assert!(matches!(result, Err(HierarchyError::Validation(_))));
    }

    #[tokio::test]
    async fn test_primary_role_must_be_held() {
        let (service, admin) = service_with_admin().await;
        let mut request = NewAccountRequest::new("R1", Role::Radiologist, Some("ORG1"));
        request.account_roles = vec![Role::Radiologist, Role::Assignor];
        request.primary_role = Some(Role::Verifier);
        let result = service.create_account(&admin, request).await;
        assert!(matches!(result, Err(HierarchyError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_primary_role_is_resolved_by_rank() {
        let (service, admin) = service_with_admin().await;
        let mut request = NewAccountRequest::new("R1", Role::Radiologist, Some("ORG1"));
        request.account_roles = vec![Role::Typist, Role::Radiologist];
        request.role_config = json!({ "linkedRadiologist": "R9" });
        let created = service.create_account(&admin, request).await.unwrap();
        // Typist and radiologist tie on rank; first-listed wins.
        assert_eq!(created.primary_role, Some(Role::Typist));
    }

    #[tokio::test]
    async fn test_switch_role_clears_config_and_recomputes_permissions() {
        let (service, admin) = service_with_admin().await;
        let mut request = NewAccountRequest::new("T1", Role::Typist, Some("ORG1"));
        request.role_config = json!({ "linkedRadiologist": "R9" });
        let created = service.create_account(&admin, request).await.unwrap();
        assert!(created.role_config.is_some());

        let switched = service
            .switch_role(&admin, "T1", Role::Receptionist)
            .await
            .unwrap();
        assert_eq!(switched.role, Role::Receptionist);
        assert!(switched.role_config.is_none());
        assert!(switched.permissions.can_register_patients);
        assert!(!switched.permissions.can_create_reports);
    }

    #[tokio::test]
    async fn test_switch_role_cannot_escalate() {
        let (service, admin) = service_with_admin().await;
        service
            .create_account(
                &admin,
                NewAccountRequest::new("R1", Role::Radiologist, Some("ORG1")),
            )
            .await
            .unwrap();
        let result = service.switch_role(&admin, "R1", Role::Admin).await;
        assert!(matches!(result, Err(HierarchyError::CreationDenied(_))));
    }

    #[tokio::test]
    async fn test_deactivate_is_soft() {
        let (service, admin) = service_with_admin().await;
        service
            .create_account(
                &admin,
                NewAccountRequest::new("R1", Role::Radiologist, Some("ORG1")),
            )
            .await
            .unwrap();
        service.deactivate(&admin, "R1").await.unwrap();
        let record = service.repository.find_account("R1").await.unwrap().unwrap();
        assert!(!record.is_active);
    }

    #[tokio::test]
    async fn test_admin_cannot_deactivate_peer_admin() {
        let repository = Arc::new(InMemoryAccountRepository::new());
        let service = AccountService::new(repository.clone());
        for id in ["A1", "A2"] {
            repository
                .insert_account(AccountRecord {
                    id: id.to_string(),
                    role: Role::Admin,
                    organization_identifier: Some("ORG1".to_string()),
                    account_roles: Vec::new(),
                    primary_role: None,
                    role_config: None,
                    permissions: CapabilitySet::all(),
                    hierarchy: Hierarchy::default(),
                    linked_labs: Vec::new(),
                    visible_columns: Vec::new(),
                    is_active: true,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        let peer = Actor::new("A1", Role::Admin, Some("ORG1"));
        let result = service.deactivate(&peer, "A2").await;
        assert!(matches!(result, Err(HierarchyError::ProtectedAccount(_))));
    }
}
