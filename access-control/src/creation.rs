use crate::role::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of a role-creation authorization check.
///
/// The reason is a user-facing message, not an internal code; it always
/// names both roles so denials are traceable in request logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CreationDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(acting: Role, target: Role) -> Self {
        Self {
            allowed: false,
            reason: Some(format!("{acting} cannot create {target} accounts")),
        }
    }
}

/// Decides which role may provision accounts of which other role.
///
/// This is a separate fixed table from the dominance ranks on purpose:
/// "who can dominate" and "who can provision" are different concerns. An
/// admin outranks a group_id but still may not mint another admin.
#[derive(Debug, Clone, Default)]
pub struct RoleCreationAuthorizer {
    _private: (),
}

impl RoleCreationAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The roles `acting` is allowed to provision. Empty for every role
    /// outside the three provisioning tiers.
    pub fn creatable_roles(&self, acting: Role) -> &'static [Role] {
        match acting {
            Role::SuperAdmin => &[
                Role::Admin,
                Role::GroupId,
                Role::Assignor,
                Role::Radiologist,
                Role::Verifier,
                Role::Physician,
                Role::Receptionist,
                Role::Billing,
                Role::Typist,
                Role::DashboardViewer,
                Role::LabStaff,
                Role::DoctorAccount,
                Role::Owner,
            ],
            // Never admin or super_admin: an admin cannot provision a peer
            // or a superior.
            Role::Admin => &[
                Role::GroupId,
                Role::Assignor,
                Role::Radiologist,
                Role::Verifier,
                Role::Physician,
                Role::Receptionist,
                Role::Billing,
                Role::Typist,
                Role::DashboardViewer,
            ],
            Role::GroupId => &[
                Role::Assignor,
                Role::Radiologist,
                Role::Verifier,
                Role::Typist,
                Role::Receptionist,
            ],
            _ => &[],
        }
    }

    /// Whether `acting` may create an account holding `target`.
    pub fn can_create(&self, acting: Role, target: Role) -> CreationDecision {
        if self.creatable_roles(acting).contains(&target) {
            CreationDecision::allow()
        } else {
            debug!(%acting, %target, "role creation denied");
            CreationDecision::deny(acting, target)
        }
    }
}
