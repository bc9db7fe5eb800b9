use crate::models::{Actor, StudyRecord};
use crate::registry::RoleRegistry;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-study permission summary returned to the HTTP layer alongside the
/// study payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPermissions {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_edit_clinical_history: bool,
    pub can_create_report: bool,
    pub can_download: bool,
    pub can_discuss: bool,
    pub can_assign: bool,
    pub is_assigned: bool,
}

/// Decides whether an acting user may see or touch a specific study.
pub struct StudyAccessEvaluator<'a> {
    registry: &'a RoleRegistry,
}

impl<'a> StudyAccessEvaluator<'a> {
    pub fn new(registry: &'a RoleRegistry) -> Self {
        Self { registry }
    }

    /// View access for `actor` on `study`.
    ///
    /// Evaluation order, short-circuiting:
    /// 1. super_admin and admin see everything, tenant check included.
    /// 2. Tenant mismatch denies every other role outright.
    /// 3. Role-specific rule, falling back to the canViewCases capability.
    pub fn can_access(&self, actor: &Actor, study: &StudyRecord) -> bool {
        if actor.role.is_administrative() {
            return true;
        }

        let same_tenant = actor
            .organization_identifier
            .as_deref()
            .is_some_and(|org| org == study.organization_identifier);
        if !same_tenant {
            debug!(
                actor = %actor.id,
                role = %actor.role,
                study_org = %study.organization_identifier,
                "study access denied: tenant mismatch"
            );
            return false;
        }

        match actor.role {
            Role::Radiologist => study.is_assigned_to(&actor.id),
            Role::Verifier => {
                let assigned = actor
                    .role_config
                    .as_ref()
                    .map(|config| config.assigned_radiologists())
                    .unwrap_or(&[]);
                study
                    .assignment
                    .iter()
                    .any(|entry| assigned.contains(&entry.assigned_to))
            }
            Role::Physician => study
                .referring_physician
                .as_ref()
                .is_some_and(|physician| physician.id == actor.id),
            // Organization-wide visibility within the tenant.
            Role::Assignor | Role::Receptionist | Role::Billing => true,
            // A typist only ever sees through its linked radiologist; its
            // own id is never checked against the assignment list.
            Role::Typist => actor
                .role_config
                .as_ref()
                .and_then(|config| config.linked_radiologist())
                .is_some_and(|radiologist| study.is_assigned_to(radiologist)),
            _ => actor.effective_capabilities(self.registry).can_view_cases,
        }
    }

    /// Full permission summary for `actor` on `study`.
    pub fn study_permissions(&self, actor: &Actor, study: &StudyRecord) -> StudyPermissions {
        let capabilities = actor.effective_capabilities(self.registry);
        let administrative = actor.role.is_administrative();
        let is_assigned = study.is_assigned_to(&actor.id);

        StudyPermissions {
            can_view: self.can_access(actor, study),
            can_edit: capabilities.can_edit_cases || administrative,
            can_edit_clinical_history: capabilities.can_edit_cases
                || administrative
                || matches!(actor.role, Role::Radiologist | Role::Assignor),
            can_create_report: (capabilities.can_create_reports && is_assigned) || administrative,
            can_download: capabilities.can_download_reports || administrative,
            can_discuss: capabilities.can_discuss_cases || administrative,
            can_assign: capabilities.can_assign_cases
                || administrative
                || actor.role == Role::Assignor,
            is_assigned,
        }
    }
}
