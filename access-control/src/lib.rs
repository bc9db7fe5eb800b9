//! Role-based access control and tenant scoping for RadFlow Engine
//!
//! This crate is the pure decision layer of the radiology workflow backend:
//! - Role table with dominance ranks and derived capability sets
//! - Primary-role resolution for multi-hat accounts
//! - Role-creation authorization (who may provision whom)
//! - Role-config sanitization before persistence
//! - Per-tenant query scoping and per-study access evaluation
//!
//! # Core Concepts
//!
//! - **Tenant**: one organization; every resource carries an
//!   organizationIdentifier that scopes visibility
//! - **Dominance rank**: integer used only to pick a primary role among
//!   several held by one account
//! - **Creation hierarchy**: separate rule set governing which role may
//!   provision which other role's accounts
//! - **Assignment**: a study's record of which accounts it is delegated to
//!
//! Every operation here is a synchronous pure function over data fetched by
//! the caller. Decisions are advisory at call time, not leases: accounts can
//! be deactivated or reassigned concurrently, so callers re-evaluate on
//! every request and never cache across requests.
//!
//! # Example
//!
//! ```rust
//! use access_control::{
//!     Actor, ResourceKind, Role, RoleRegistry, StudyAccessEvaluator,
//!     StudyAssignment, StudyRecord, TenantScopeBuilder,
//! };
//!
//! let registry = RoleRegistry::new();
//! let actor = Actor::new("R1", Role::Radiologist, Some("ORG1"));
//!
//! let study = StudyRecord {
//!     organization_identifier: "ORG1".to_string(),
//!     assignment: vec![StudyAssignment::to_account("R1")],
//!     referring_physician: None,
//!     source_lab: None,
//!     status: None,
//! };
//!
//! let evaluator = StudyAccessEvaluator::new(&registry);
//! assert!(evaluator.can_access(&actor, &study));
//!
//! // Base filter for any list query the actor makes.
//! let scope = TenantScopeBuilder::new().scope_for(&actor, ResourceKind::Study);
//! assert_eq!(scope.to_filter()["organizationIdentifier"], "ORG1");
//! ```

pub mod capabilities;
pub mod creation;
pub mod error;
pub mod models;
pub mod primary_role;
pub mod registry;
pub mod role;
pub mod role_config;
pub mod scope;
pub mod study_access;

pub use capabilities::{CapabilitySet, DashboardAccess, ViewerTools};
pub use creation::{CreationDecision, RoleCreationAuthorizer};
pub use error::{AccessError, AccessResult};
pub use models::{
    Actor, LabLink, OrganizationContext, ReferringPhysician, StudyAssignment, StudyRecord,
    StudyStatus,
};
pub use primary_role::PrimaryRoleResolver;
pub use registry::RoleRegistry;
pub use role::{Role, UnknownRole};
pub use role_config::{AssignableUser, LabAccessMode, RoleConfig, RoleConfigSanitizer};
pub use scope::{ResourceKind, TenantScope, TenantScopeBuilder};
pub use study_access::{StudyAccessEvaluator, StudyPermissions};
