//! Radiology Workflow Access Tests
//!
//! These tests walk real reporting-floor scenarios:
//! 1. A verifier following its assigned radiologists across two tenants
//! 2. A typist working entirely through its linked radiologist
//! 3. A group admin provisioning its reporting team
//! 4. A super_admin "viewing as" one tenant

use access_control::*;
use serde_json::json;

fn study(org: &str, assigned_to: &[&str]) -> StudyRecord {
    StudyRecord {
        organization_identifier: org.to_string(),
        assignment: assigned_to
            .iter()
            .map(|id| StudyAssignment::to_account(*id))
            .collect(),
        referring_physician: None,
        source_lab: None,
        status: Some(StudyStatus::Assigned),
    }
}

// ============================================================================
// TEST 1: Verifier - Tenant Isolation Overrides Assignment Match
// ============================================================================

#[test]
fn test_verifier_tenant_isolation_overrides_assignment_match() {
    let registry = RoleRegistry::new();
    let evaluator = StudyAccessEvaluator::new(&registry);

    let mut verifier = Actor::new("V1", Role::Verifier, Some("ORG1"));
    verifier.role_config = Some(RoleConfig::Verifier {
        assigned_radiologists: vec!["R1".to_string()],
    });

    // Same tenant, assigned radiologist on the study: allowed.
    assert!(evaluator.can_access(&verifier, &study("ORG1", &["R1"])));

    // Identical assignment in another tenant: denied, no exceptions.
    assert!(!evaluator.can_access(&verifier, &study("ORG2", &["R1"])));
}

// ============================================================================
// TEST 2: Typist - Delegated Access Only
// ============================================================================

#[test]
fn test_typist_works_through_linked_radiologist() {
    let registry = RoleRegistry::new();
    let evaluator = StudyAccessEvaluator::new(&registry);
    let sanitizer = RoleConfigSanitizer::new();

    // Provision the typist config the way the write path would.
    let config = sanitizer
        .sanitize(
            &json!({ "linkedRadiologist": "R9" }),
            Role::Typist,
            &[],
            None,
        )
        .unwrap()
        .unwrap();

    let mut typist = Actor::new("T1", Role::Typist, Some("ORG1"));
    typist.role_config = Some(config);

    // Studies assigned to the linked radiologist are visible.
    assert!(evaluator.can_access(&typist, &study("ORG1", &["R9"])));

    // Studies assigned to the typist directly are not: access is entirely
    // delegated through the linked radiologist.
    assert!(!evaluator.can_access(&typist, &study("ORG1", &["T1"])));
}

#[test]
fn test_typist_cannot_be_provisioned_unlinked() {
    let sanitizer = RoleConfigSanitizer::new();
    let result = sanitizer.sanitize(&json!({}), Role::Typist, &[], None);
    assert!(matches!(result, Err(AccessError::ConfigValidation(_))));
}

// ============================================================================
// TEST 3: Group Admin Provisions Its Reporting Team
// ============================================================================

#[test]
fn test_group_admin_provisioning_boundaries() {
    let authorizer = RoleCreationAuthorizer::new();

    // The reporting team itself is fine.
    for target in [
        Role::Assignor,
        Role::Radiologist,
        Role::Verifier,
        Role::Typist,
        Role::Receptionist,
    ] {
        assert!(authorizer.can_create(Role::GroupId, target).allowed);
    }

    // Everything financial or administrative is out of reach.
    for target in [Role::Billing, Role::Admin, Role::SuperAdmin, Role::Owner] {
        let decision = authorizer.can_create(Role::GroupId, target);
        assert!(!decision.allowed);
        let reason = decision.reason.unwrap();
        assert!(reason.contains("group_id"));
        assert!(reason.contains(target.as_str()));
    }
}

#[test]
fn test_multi_hat_assignor_account_setup() {
    let registry = RoleRegistry::new();
    let resolver = PrimaryRoleResolver::new(&registry);
    let sanitizer = RoleConfigSanitizer::new();

    // An account wearing radiologist and assignor hats: radiologist
    // outranks assignor, so it is the primary role.
    let held = [Role::Radiologist, Role::Assignor];
    assert_eq!(resolver.resolve(&held), Some(Role::Radiologist));

    // Lab links supplied at creation time drive the assignor lab scope,
    // overriding the blob's bare labAccessMode flag.
    let links = [LabLink::view_only("LAB1")];
    let config = sanitizer
        .sanitize(
            &json!({ "labAccessMode": "none" }),
            Role::Assignor,
            &held,
            Some(&links),
        )
        .unwrap()
        .unwrap();
    match config {
        RoleConfig::Assignor {
            lab_access_mode,
            assigned_labs,
            ..
        } => {
            assert_eq!(lab_access_mode, LabAccessMode::Selected);
            assert_eq!(assigned_labs, vec!["LAB1"]);
        }
        other => panic!("expected assignor config, got {other:?}"),
    }
}

// ============================================================================
// TEST 4: Super Admin "View As Tenant"
// ============================================================================

#[test]
fn test_super_admin_view_as_tenant() {
    let builder = TenantScopeBuilder::new();

    let mut root = Actor::new("root", Role::SuperAdmin, None);
    assert_eq!(
        builder.scope_for(&root, ResourceKind::Study),
        TenantScope::Unrestricted
    );

    // Once an organization context is attached, queries pin to it.
    root.organization_context = Some(OrganizationContext {
        organization_identifier: "ORG1".to_string(),
    });
    let scope = builder.scope_for(&root, ResourceKind::User);
    assert_eq!(scope, TenantScope::Organization("ORG1".to_string()));
    assert!(scope.covers(Some("ORG1")));
    assert!(!scope.covers(Some("ORG2")));
}

#[test]
fn test_deny_all_filter_matches_nothing() {
    let builder = TenantScopeBuilder::new();
    let orphan = Actor::new("u1", Role::Receptionist, None);
    let filter = builder.scope_for(&orphan, ResourceKind::Study).to_filter();
    assert_eq!(filter, json!({ "organizationIdentifier": { "$in": [] } }));
}
