use crate::registry::RoleRegistry;
use crate::role::Role;

/// Picks the single dominant role for an account holding several.
pub struct PrimaryRoleResolver<'a> {
    registry: &'a RoleRegistry,
}

impl<'a> PrimaryRoleResolver<'a> {
    pub fn new(registry: &'a RoleRegistry) -> Self {
        Self { registry }
    }

    /// Returns the highest-ranked role in `roles`, or `None` for an empty
    /// input.
    ///
    /// Ties break by original input order: among equal-rank candidates the
    /// first-listed role wins. When two roles are declared equally dominant,
    /// whichever the caller listed first is treated as primary, so the
    /// candidate is only replaced on a strictly greater rank.
    pub fn resolve(&self, roles: &[Role]) -> Option<Role> {
        match roles {
            [] => None,
            // No comparison needed for the common single-role account.
            [only] => Some(*only),
            [first, rest @ ..] => {
                let mut primary = *first;
                let mut best_rank = self.registry.rank_of(primary);
                for role in rest {
                    let rank = self.registry.rank_of(*role);
                    if rank > best_rank {
                        primary = *role;
                        best_rank = rank;
                    }
                }
                Some(primary)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_fixture() -> RoleRegistry {
        RoleRegistry::new()
    }

    #[test]
    fn test_empty_input_resolves_to_none() {
        let registry = resolver_fixture();
        assert_eq!(PrimaryRoleResolver::new(&registry).resolve(&[]), None);
    }

    #[test]
    fn test_single_role_resolves_to_itself() {
        let registry = resolver_fixture();
        let resolver = PrimaryRoleResolver::new(&registry);
        for role in Role::ALL {
            assert_eq!(resolver.resolve(&[role]), Some(role));
        }
    }

    #[test]
    fn test_highest_rank_wins() {
        let registry = resolver_fixture();
        let resolver = PrimaryRoleResolver::new(&registry);
        assert_eq!(
            resolver.resolve(&[Role::Typist, Role::Admin, Role::Billing]),
            Some(Role::Admin)
        );
    }

    #[test]
    fn test_equal_rank_ties_break_by_input_order() {
        let registry = resolver_fixture();
        let resolver = PrimaryRoleResolver::new(&registry);

        // Exhaustive over every equal-rank pair in the registry.
        for first in Role::ALL {
            for second in Role::ALL {
                if first != second && registry.rank_of(first) == registry.rank_of(second) {
                    assert_eq!(resolver.resolve(&[first, second]), Some(first));
                    assert_eq!(resolver.resolve(&[second, first]), Some(second));
                }
            }
        }
    }

    #[test]
    fn test_tie_behind_a_higher_rank_does_not_matter() {
        let registry = resolver_fixture();
        let resolver = PrimaryRoleResolver::new(&registry);
        assert_eq!(
            resolver.resolve(&[Role::Typist, Role::Radiologist, Role::GroupId]),
            Some(Role::GroupId)
        );
    }
}
