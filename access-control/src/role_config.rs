use crate::capabilities::DashboardAccess;
use crate::error::{AccessError, AccessResult};
use crate::models::LabLink;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Role-specific structured settings attached to an account.
///
/// One variant per role that needs configuration; roles without a variant
/// store nothing. Keying the union by role means a radiologist's config can
/// never carry an assignor's lab-access fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleConfig {
    Typist {
        #[serde(rename = "linkedRadiologist")]
        linked_radiologist: String,
    },
    Assignor {
        #[serde(rename = "assignedLabs", default)]
        assigned_labs: Vec<String>,
        #[serde(rename = "labAccessMode")]
        lab_access_mode: LabAccessMode,
        #[serde(rename = "assignableUsers", default)]
        assignable_users: Vec<AssignableUser>,
    },
    Verifier {
        // No serde default: with an untagged enum the distinguishing field
        // of each variant must be present for round-tripping to stay
        // unambiguous.
        #[serde(rename = "assignedRadiologists")]
        assigned_radiologists: Vec<String>,
    },
    Physician {
        #[serde(rename = "allowedPatients")]
        allowed_patients: Vec<String>,
    },
    DashboardViewer {
        #[serde(rename = "dashboardAccess")]
        dashboard_access: DashboardAccess,
    },
}

impl RoleConfig {
    /// The radiologists whose studies a verifier may finalize, empty for
    /// every other variant.
    pub fn assigned_radiologists(&self) -> &[String] {
        match self {
            RoleConfig::Verifier {
                assigned_radiologists,
            } => assigned_radiologists,
            _ => &[],
        }
    }

    /// The typist's delegating radiologist, if this is a typist config.
    pub fn linked_radiologist(&self) -> Option<&str> {
        match self {
            RoleConfig::Typist { linked_radiologist } => Some(linked_radiologist),
            _ => None,
        }
    }
}

/// How an assignor's lab visibility is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabAccessMode {
    All,
    Selected,
    None,
}

impl LabAccessMode {
    fn parse(value: Option<&Value>) -> Option<Self> {
        match value.and_then(Value::as_str) {
            Some("all") => Some(LabAccessMode::All),
            Some("selected") => Some(LabAccessMode::Selected),
            Some("none") => Some(LabAccessMode::None),
            _ => None,
        }
    }
}

/// One user an assignor may delegate studies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignableUser {
    #[serde(rename = "user", alias = "userRef")]
    pub user: String,
    pub role: Role,
}

/// Reference-valued fields that must never be stored as empty strings.
const REFERENCE_FIELDS: [&str; 3] = ["linkedRadiologist", "parentUser", "supervisorId"];

/// Fields that are array-typed but tolerated as scalars on input.
const ARRAY_FIELDS: [&str; 4] = [
    "assignedRadiologists",
    "assignableUsers",
    "allowedPatients",
    "assignedLabs",
];

/// Normalizes the free-form per-role configuration blob before persistence.
///
/// Unknown and extra fields are dropped silently; the only hard failure is
/// a typist without a linked radiologist. The five processing steps run in
/// a fixed order because later steps deliberately overwrite earlier
/// defaults (explicit lab links at account-creation time take precedence
/// over a bare labAccessMode flag).
#[derive(Debug, Clone, Default)]
pub struct RoleConfigSanitizer {
    _private: (),
}

impl RoleConfigSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitizes `raw` for an account whose canonical role is `role`.
    ///
    /// `account_roles` covers multi-hat accounts and `linked_labs` is the
    /// lab-link list supplied alongside the account payload, when any.
    /// Returns `Ok(None)` for roles that carry no structured config.
    pub fn sanitize(
        &self,
        raw: &Value,
        role: Role,
        account_roles: &[Role],
        linked_labs: Option<&[LabLink]>,
    ) -> AccessResult<Option<RoleConfig>> {
        let mut fields = match raw {
            Value::Object(map) => map.clone(),
            // A missing or non-object blob sanitizes like an empty one.
            _ => Map::new(),
        };

        strip_empty_references(&mut fields);
        coerce_scalar_arrays(&mut fields);

        let holds_assignor = role == Role::Assignor || account_roles.contains(&Role::Assignor);
        if holds_assignor {
            normalize_lab_access_mode(&mut fields);
        }

        let mut config = self.build_variant(&fields, role)?;

        // An assignor hat held alongside a canonical role that carries no
        // config of its own still gets a lab scope. A canonical role with
        // its own variant (typist, verifier) keeps it; the account stores
        // one config and the canonical role's wins.
        if config.is_none() && holds_assignor {
            config = self.build_variant(&fields, Role::Assignor)?;
        }

        // Explicit lab links supplied at account-creation time overwrite
        // whatever labAccessMode the blob carried. The variant only exists
        // on accounts holding the assignor hat.
        if let Some(links) = linked_labs {
            if let Some(RoleConfig::Assignor {
                assigned_labs,
                lab_access_mode,
                ..
            }) = config.as_mut()
            {
                *assigned_labs = links.iter().map(|link| link.lab.clone()).collect();
                *lab_access_mode = if assigned_labs.is_empty() {
                    LabAccessMode::All
                } else {
                    LabAccessMode::Selected
                };
                debug!(
                    labs = assigned_labs.len(),
                    "assignor lab scope re-derived from linked labs"
                );
            }
        }

        Ok(config)
    }

    fn build_variant(&self, fields: &Map<String, Value>, role: Role) -> AccessResult<Option<RoleConfig>> {
        match role {
            Role::Typist => {
                let linked = fields
                    .get("linkedRadiologist")
                    .and_then(Value::as_str)
                    .filter(|value| !value.is_empty());
                match linked {
                    Some(radiologist) => Ok(Some(RoleConfig::Typist {
                        linked_radiologist: radiologist.to_string(),
                    })),
                    // A typist cannot exist unlinked; fail before anything
                    // reaches storage.
                    None => Err(AccessError::config(
                        "typist account requires a linked radiologist",
                    )),
                }
            }
            Role::Assignor => Ok(Some(RoleConfig::Assignor {
                assigned_labs: string_entries(fields.get("assignedLabs")),
                lab_access_mode: LabAccessMode::parse(fields.get("labAccessMode"))
                    .unwrap_or(LabAccessMode::All),
                assignable_users: assignable_entries(fields.get("assignableUsers")),
            })),
            Role::Verifier => Ok(Some(RoleConfig::Verifier {
                assigned_radiologists: string_entries(fields.get("assignedRadiologists")),
            })),
            Role::Physician => Ok(Some(RoleConfig::Physician {
                allowed_patients: string_entries(fields.get("allowedPatients")),
            })),
            Role::DashboardViewer => {
                let dashboard_access = fields
                    .get("dashboardAccess")
                    .and_then(|value| serde_json::from_value(value.clone()).ok())
                    .unwrap_or_default();
                Ok(Some(RoleConfig::DashboardViewer { dashboard_access }))
            }
            _ => Ok(None),
        }
    }
}

/// Step 1: an empty string is not a valid reference and must not reach
/// storage as one.
fn strip_empty_references(fields: &mut Map<String, Value>) {
    for field in REFERENCE_FIELDS {
        let empty = match fields.get(field) {
            Some(Value::Null) => true,
            Some(Value::String(value)) => value.is_empty(),
            _ => false,
        };
        if empty {
            fields.remove(field);
        }
    }
}

/// Step 2: array-typed fields supplied as a scalar wrap into a
/// single-element sequence.
fn coerce_scalar_arrays(fields: &mut Map<String, Value>) {
    for field in ARRAY_FIELDS {
        if let Some(value) = fields.get_mut(field) {
            if !value.is_array() && !value.is_null() {
                let scalar = value.take();
                *value = Value::Array(vec![scalar]);
            }
        }
    }
}

/// Step 3: force labAccessMode into its domain; a non-selected mode must
/// not carry stale lab references, and "selected" with nothing selected
/// falls back to "all".
fn normalize_lab_access_mode(fields: &mut Map<String, Value>) {
    let mut mode = LabAccessMode::parse(fields.get("labAccessMode")).unwrap_or(LabAccessMode::All);
    if mode == LabAccessMode::Selected {
        let has_labs =
            matches!(fields.get("assignedLabs"), Some(Value::Array(labs)) if !labs.is_empty());
        if !has_labs {
            mode = LabAccessMode::All;
        }
    }
    let tag = match mode {
        LabAccessMode::All => "all",
        LabAccessMode::Selected => "selected",
        LabAccessMode::None => "none",
    };
    fields.insert("labAccessMode".to_string(), Value::String(tag.to_string()));
    if mode != LabAccessMode::Selected {
        fields.insert("assignedLabs".to_string(), Value::Array(Vec::new()));
    }
}

fn string_entries(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            // Lab links sometimes arrive as embedded objects; keep the
            // reference and drop the rest.
            Value::Object(map) => map
                .get("lab")
                .or_else(|| map.get("_id"))
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

fn assignable_entries(value: Option<&Value>) -> Vec<AssignableUser> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<AssignableUser>(entry.clone()).ok())
        .filter(|entry| matches!(entry.role, Role::Radiologist | Role::Verifier))
        .collect()
}
