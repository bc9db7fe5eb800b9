use crate::capabilities::CapabilitySet;
use crate::registry::RoleRegistry;
use crate::role::Role;
use crate::role_config::RoleConfig;
use serde::{Deserialize, Serialize};

/// The acting user attached to an inbound request.
///
/// This is the minimum shape every evaluator needs; the HTTP layer builds
/// it from the authenticated session. Identifiers are the opaque document
/// ids minted by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub role: Role,
    /// Tenant key. Absent only for super_admin accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_identifier: Option<String>,
    /// Additional roles for multi-hat accounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_config: Option<RoleConfig>,
    /// Materialized capability set, recomputed on every role change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<CapabilitySet>,
    /// Super_admin "view as tenant" override, sourced from a token claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_context: Option<OrganizationContext>,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role, organization: Option<&str>) -> Self {
        Self {
            id: id.into(),
            role,
            organization_identifier: organization.map(str::to_string),
            account_roles: Vec::new(),
            primary_role: None,
            role_config: None,
            permissions: None,
            organization_context: None,
        }
    }

    /// Whether the actor holds `role`, either as its canonical role or as
    /// one of its additional account roles.
    pub fn holds_role(&self, role: Role) -> bool {
        self.role == role || self.account_roles.contains(&role)
    }

    /// The capability set that governs this actor: the materialized block
    /// when present, otherwise freshly derived from the role.
    pub fn effective_capabilities(&self, registry: &RoleRegistry) -> CapabilitySet {
        self.permissions
            .clone()
            .unwrap_or_else(|| registry.capabilities_of(self.role))
    }
}

/// Opaque tenant override carried by a super_admin "viewing as" one
/// organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationContext {
    pub organization_identifier: String,
}

/// Study record shape consumed by the access evaluator.
///
/// Studies are owned by the study service; this core only evaluates access
/// against the fields below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRecord {
    pub organization_identifier: String,
    #[serde(default)]
    pub assignment: Vec<StudyAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referring_physician: Option<ReferringPhysician>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lab: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StudyStatus>,
}

impl StudyRecord {
    /// Whether any assignment entry delegates this study to `account_id`.
    pub fn is_assigned_to(&self, account_id: &str) -> bool {
        self.assignment
            .iter()
            .any(|entry| entry.assigned_to == account_id)
    }
}

/// One delegation entry on a study.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyAssignment {
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StudyAssignment {
    pub fn to_account(account_id: impl Into<String>) -> Self {
        Self {
            assigned_to: account_id.into(),
            assigned_by: None,
            priority: None,
            status: None,
        }
    }
}

/// Referring physician stamped on a study at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferringPhysician {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Status pipeline a study moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyStatus {
    Received,
    Assigned,
    Reported,
    Verified,
    Archived,
}

/// A lab reference attached to an account, with per-lab permission flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabLink {
    pub lab: String,
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_assign: bool,
    #[serde(default)]
    pub can_manage_staff: bool,
}

impl LabLink {
    pub fn view_only(lab: impl Into<String>) -> Self {
        Self {
            lab: lab.into(),
            can_view: true,
            can_assign: false,
            can_manage_staff: false,
        }
    }
}
