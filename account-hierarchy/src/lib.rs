//! Account hierarchy and provisioning for RadFlow Engine
//!
//! Maintains the creator/parent/child graph between accounts and the
//! lifecycle operations that walk it:
//! - Provisioning gated by the role-creation hierarchy
//! - Role switches that clear config and re-materialize capabilities
//! - Soft deactivation with protected-account rules
//! - Atomic two-sided hierarchy edge writes behind a repository seam
//!
//! The persistence engine is the caller's concern; `AccountRepository`
//! defines the contract and `InMemoryAccountRepository` serves testing and
//! development.

pub mod error;
pub mod graph;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{HierarchyError, Result};
pub use graph::UserHierarchyGraph;
pub use models::{AccountRecord, Hierarchy, NewAccountRequest};
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use service::AccountService;
