use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every role an account can hold in the workflow backend.
///
/// The tag names are the wire values stored on account documents, so the
/// serde representation must stay snake_case forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    GroupId,
    Assignor,
    Radiologist,
    Typist,
    Verifier,
    Physician,
    Receptionist,
    Billing,
    DashboardViewer,
    LabStaff,
    DoctorAccount,
    Owner,
}

impl Role {
    /// All roles, in dominance order (most senior first).
    pub const ALL: [Role; 14] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::GroupId,
        Role::Owner,
        Role::Assignor,
        Role::Radiologist,
        Role::Typist,
        Role::Verifier,
        Role::Physician,
        Role::DoctorAccount,
        Role::Receptionist,
        Role::Billing,
        Role::LabStaff,
        Role::DashboardViewer,
    ];

    /// The stored wire tag for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::GroupId => "group_id",
            Role::Assignor => "assignor",
            Role::Radiologist => "radiologist",
            Role::Typist => "typist",
            Role::Verifier => "verifier",
            Role::Physician => "physician",
            Role::Receptionist => "receptionist",
            Role::Billing => "billing",
            Role::DashboardViewer => "dashboard_viewer",
            Role::LabStaff => "lab_staff",
            Role::DoctorAccount => "doctor_account",
            Role::Owner => "owner",
        }
    }

    /// Whether this role bypasses tenant isolation on study access checks.
    pub fn is_administrative(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "group_id" => Ok(Role::GroupId),
            "assignor" => Ok(Role::Assignor),
            "radiologist" => Ok(Role::Radiologist),
            "typist" => Ok(Role::Typist),
            "verifier" => Ok(Role::Verifier),
            "physician" => Ok(Role::Physician),
            "receptionist" => Ok(Role::Receptionist),
            "billing" => Ok(Role::Billing),
            "dashboard_viewer" => Ok(Role::DashboardViewer),
            "lab_staff" => Ok(Role::LabStaff),
            "doctor_account" => Ok(Role::DoctorAccount),
            "owner" => Ok(Role::Owner),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Returned when a stored role tag is not recognized.
///
/// Callers that look up ranks or capabilities should prefer the fail-closed
/// registry lookups over propagating this.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role tag: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_serde_tags_match_wire_values() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert!("superadmin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }
}
