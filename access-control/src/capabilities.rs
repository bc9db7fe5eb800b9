use serde::{Deserialize, Serialize};

/// The named permission flags derived from a role.
///
/// This block is materialized onto account records whenever the role changes
/// and is otherwise never edited by hand; the registry is the only producer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapabilitySet {
    pub can_view_cases: bool,
    pub can_edit_cases: bool,
    pub can_assign_cases: bool,
    pub can_create_reports: bool,
    pub can_verify_reports: bool,
    pub can_finalize_reports: bool,
    pub can_download_reports: bool,
    pub can_print_reports: bool,
    pub can_discuss_cases: bool,
    pub can_create_users: bool,
    pub can_manage_users: bool,
    pub can_register_patients: bool,
    pub can_generate_bills: bool,
    pub can_view_dashboard: bool,
    pub can_use_dicom_viewer: bool,
    pub viewer_tools: ViewerTools,
    pub can_use_voice_dictation: bool,
    pub can_manage_organizations: bool,
}

impl CapabilitySet {
    /// The fail-closed set: every flag off. Unknown roles resolve to this.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every flag on. Reserved for super_admin.
    pub fn all() -> Self {
        Self {
            can_view_cases: true,
            can_edit_cases: true,
            can_assign_cases: true,
            can_create_reports: true,
            can_verify_reports: true,
            can_finalize_reports: true,
            can_download_reports: true,
            can_print_reports: true,
            can_discuss_cases: true,
            can_create_users: true,
            can_manage_users: true,
            can_register_patients: true,
            can_generate_bills: true,
            can_view_dashboard: true,
            can_use_dicom_viewer: true,
            viewer_tools: ViewerTools::all(),
            can_use_voice_dictation: true,
            can_manage_organizations: true,
        }
    }
}

/// Sub-flags gating individual DICOM viewer tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerTools {
    pub can_measure: bool,
    pub can_annotate: bool,
    pub can_adjust_window_level: bool,
    pub can_compare_studies: bool,
}

impl ViewerTools {
    pub fn all() -> Self {
        Self {
            can_measure: true,
            can_annotate: true,
            can_adjust_window_level: true,
            can_compare_studies: true,
        }
    }
}

/// Dashboard panel visibility for the dashboard_viewer role.
///
/// Defaults to all-false; panels are opted in per account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardAccess {
    pub view_workload: bool,
    #[serde(rename = "viewTAT")]
    pub view_tat: bool,
    pub view_revenue: bool,
    pub view_reports: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_false() {
        let set = CapabilitySet::none();
        assert!(!set.can_view_cases);
        assert!(!set.can_manage_organizations);
        assert!(!set.viewer_tools.can_measure);
    }

    #[test]
    fn test_missing_fields_deserialize_closed() {
        // Stored permission blocks may predate newer flags; absent flags
        // must come back as false, never as a parse error.
        let set: CapabilitySet = serde_json::from_str(r#"{"canViewCases":true}"#).unwrap();
        assert!(set.can_view_cases);
        assert!(!set.can_assign_cases);
    }
}
