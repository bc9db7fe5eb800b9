use crate::capabilities::{CapabilitySet, ViewerTools};
use crate::role::Role;

/// Immutable role table: dominance ranks and default capability sets.
///
/// This is the single source of truth consulted by every other component;
/// nothing else in the workspace declares rank or capability logic. It is
/// constructed once at process start and shared by reference.
///
/// Lookups fail closed: a role tag the registry does not recognize gets
/// rank 0 and an all-false capability set, never an error. A missing table
/// entry must not be able to grant elevated access.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    _private: (),
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dominance rank for a role. Higher is more senior.
    ///
    /// Ranks are used only to pick a primary role among several held by one
    /// account. Ties exist by design: radiologist and typist share rank 60,
    /// and the four front-office roles share rank 10.
    pub fn rank_of(&self, role: Role) -> u32 {
        match role {
            Role::SuperAdmin => 100,
            Role::Admin => 90,
            Role::GroupId => 80,
            Role::Owner => 70,
            Role::Assignor => 65,
            Role::Radiologist | Role::Typist => 60,
            Role::Verifier => 55,
            Role::Physician => 40,
            Role::DoctorAccount => 30,
            Role::Receptionist | Role::Billing | Role::LabStaff | Role::DashboardViewer => 10,
        }
    }

    /// Rank lookup over a raw stored tag. Unknown tags rank 0.
    pub fn rank_of_tag(&self, tag: &str) -> u32 {
        tag.parse::<Role>().map_or(0, |role| self.rank_of(role))
    }

    /// Default capability set for a role.
    ///
    /// The write path materializes this onto the account on every role
    /// change; consumers treat the stored block as a derived cache.
    pub fn capabilities_of(&self, role: Role) -> CapabilitySet {
        match role {
            Role::SuperAdmin => CapabilitySet::all(),
            Role::Admin => CapabilitySet {
                can_manage_organizations: false,
                ..CapabilitySet::all()
            },
            Role::GroupId => CapabilitySet {
                can_view_cases: true,
                can_assign_cases: true,
                can_download_reports: true,
                can_print_reports: true,
                can_create_users: true,
                can_manage_users: true,
                can_view_dashboard: true,
                ..CapabilitySet::none()
            },
            Role::Owner => CapabilitySet {
                can_view_cases: true,
                can_download_reports: true,
                can_print_reports: true,
                can_generate_bills: true,
                can_view_dashboard: true,
                ..CapabilitySet::none()
            },
            Role::Assignor => CapabilitySet {
                can_view_cases: true,
                can_assign_cases: true,
                can_download_reports: true,
                can_print_reports: true,
                can_view_dashboard: true,
                ..CapabilitySet::none()
            },
            Role::Radiologist => CapabilitySet {
                can_view_cases: true,
                can_edit_cases: true,
                can_create_reports: true,
                can_finalize_reports: true,
                can_download_reports: true,
                can_print_reports: true,
                can_discuss_cases: true,
                can_use_dicom_viewer: true,
                viewer_tools: ViewerTools::all(),
                can_use_voice_dictation: true,
                ..CapabilitySet::none()
            },
            Role::Typist => CapabilitySet {
                can_view_cases: true,
                can_create_reports: true,
                can_use_voice_dictation: true,
                ..CapabilitySet::none()
            },
            Role::Verifier => CapabilitySet {
                can_view_cases: true,
                can_verify_reports: true,
                can_finalize_reports: true,
                can_download_reports: true,
                can_print_reports: true,
                can_discuss_cases: true,
                ..CapabilitySet::none()
            },
            Role::Physician | Role::DoctorAccount => CapabilitySet {
                can_view_cases: true,
                can_download_reports: true,
                can_print_reports: true,
                can_discuss_cases: true,
                can_use_dicom_viewer: true,
                viewer_tools: ViewerTools {
                    can_measure: true,
                    can_adjust_window_level: true,
                    ..ViewerTools::default()
                },
                ..CapabilitySet::none()
            },
            Role::Receptionist => CapabilitySet {
                can_view_cases: true,
                can_register_patients: true,
                can_print_reports: true,
                ..CapabilitySet::none()
            },
            Role::Billing => CapabilitySet {
                can_view_cases: true,
                can_generate_bills: true,
                can_download_reports: true,
                can_print_reports: true,
                ..CapabilitySet::none()
            },
            Role::LabStaff => CapabilitySet {
                can_view_cases: true,
                can_register_patients: true,
                ..CapabilitySet::none()
            },
            Role::DashboardViewer => CapabilitySet {
                can_view_dashboard: true,
                ..CapabilitySet::none()
            },
        }
    }

    /// Capability lookup over a raw stored tag. Unknown tags get the
    /// all-false set.
    pub fn capabilities_of_tag(&self, tag: &str) -> CapabilitySet {
        match tag.parse::<Role>() {
            Ok(role) => self.capabilities_of(role),
            Err(_) => {
                tracing::warn!(tag, "unknown role tag, resolving to empty capability set");
                CapabilitySet::none()
            }
        }
    }
}
