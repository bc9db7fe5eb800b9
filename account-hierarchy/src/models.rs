use access_control::{Actor, CapabilitySet, LabLink, Role, RoleConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creator/parent/child block stored on every account.
///
/// `created_by` and `parent_user` point at the provisioning account;
/// `child_users` is the reverse edge. The two sides are always written
/// together (see `AccountRepository::record_child`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hierarchy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_user: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_users: Vec<String>,
}

/// A persisted account document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: String,
    pub role: Role,
    /// Tenant key; equals the owning organization's identifier for the
    /// account's entire lifetime. Absent only for super_admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_config: Option<RoleConfig>,
    /// Derived capability cache, recomputed on every role change and never
    /// hand-edited.
    pub permissions: CapabilitySet,
    #[serde(default)]
    pub hierarchy: Hierarchy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_labs: Vec<LabLink>,
    /// UI column allowlist, opaque to this core.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visible_columns: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    /// The actor shape the evaluators consume, built from this record.
    pub fn to_actor(&self) -> Actor {
        Actor {
            id: self.id.clone(),
            role: self.role,
            organization_identifier: self.organization_identifier.clone(),
            account_roles: self.account_roles.clone(),
            primary_role: self.primary_role,
            role_config: self.role_config.clone(),
            permissions: Some(self.permissions.clone()),
            organization_context: None,
        }
    }
}

/// Payload for provisioning a new account.
///
/// The identifier is minted by the persistence layer before this core is
/// invoked; the raw role-config blob is sanitized here before anything is
/// stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountRequest {
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_role: Option<Role>,
    #[serde(default)]
    pub role_config: serde_json::Value,
    /// Lab links supplied with the payload. `Some` (even when empty)
    /// triggers the assignor lab-scope re-derivation; absent leaves the
    /// sanitized blob alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_labs: Option<Vec<LabLink>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visible_columns: Vec<String>,
}

impl NewAccountRequest {
    pub fn new(id: impl Into<String>, role: Role, organization: Option<&str>) -> Self {
        Self {
            id: id.into(),
            role,
            organization_identifier: organization.map(str::to_string),
            account_roles: Vec::new(),
            primary_role: None,
            role_config: serde_json::Value::Null,
            linked_labs: None,
            visible_columns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_actor_carries_permissions() {
        let record = AccountRecord {
            id: "U1".to_string(),
            role: Role::Verifier,
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
        };
        let actor = record.to_actor();
        assert_eq!(actor.id, "U1");
        assert!(actor.permissions.unwrap().can_assign_cases);
    }
}
