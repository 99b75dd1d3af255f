//! # Access Policy
//!
//! Maps `(operation, caller roles)` to allow or deny.
//!
//! The rule table is an explicit ordered list of `(Operation, Role)` pairs consulted by the
//! handler before any store call. It is a pure function of its inputs and knows nothing about
//! HTTP or how the roles were obtained.
//!
//! ```rust
//! use resource_framework::policy::{AccessPolicy, Decision, Operation, Role, Roles};
//!
//! let policy = AccessPolicy::standard();
//! let user = Roles::from_iter([Role::User]);
//!
//! assert_eq!(policy.evaluate(Operation::List, &user), Decision::Allow);
//! assert_eq!(policy.evaluate(Operation::Delete, &user), Decision::Deny);
//! assert_eq!(policy.evaluate(Operation::Get, &Roles::anonymous()), Decision::Deny);
//! ```

use crate::error::ResourceError;
use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

/// A caller capability tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Whether holding `self` grants `required`. `Admin` implies `User`.
    pub fn grants(self, required: Role) -> bool {
        self == required || (self == Role::Admin && required == Role::User)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("USER"),
            Role::Admin => f.write_str("ADMIN"),
        }
    }
}

/// Returned when a role name is not one of `USER` / `ADMIN`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts `USER`, `ADMIN` and the `ROLE_`-prefixed spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase();
        match name.strip_prefix("ROLE_").unwrap_or(&name) {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.trim().to_string())),
        }
    }
}

/// The set of roles attached to a request. Empty means anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roles(BTreeSet<Role>);

impl Roles {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Whether any held role grants `required`.
    pub fn satisfies(&self, required: Role) -> bool {
        self.0.iter().any(|held| held.grants(required))
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    /// Parses a comma-separated role list such as `"USER,ADMIN"`.
    /// Unknown names are skipped.
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .filter(|name| !name.trim().is_empty())
            .filter_map(|name| name.parse::<Role>().ok())
            .collect()
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            return f.write_str("anonymous");
        }
        let names: Vec<String> = self.iter().map(|r| r.to_string()).collect();
        f.write_str(&names.join(","))
    }
}

/// The five operations every resource exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Get,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Ordered `(operation, required role)` rule table.
///
/// The first rule matching the operation decides. Operations without a rule are denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    rules: Vec<(Operation, Role)>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<(Operation, Role)>) -> Self {
        Self { rules }
    }

    /// Reads need `USER`, writes need `ADMIN`.
    pub fn standard() -> Self {
        Self::new(vec![
            (Operation::List, Role::User),
            (Operation::Get, Role::User),
            (Operation::Create, Role::Admin),
            (Operation::Update, Role::Admin),
            (Operation::Delete, Role::Admin),
        ])
    }

    pub fn required_role(&self, operation: Operation) -> Option<Role> {
        self.rules
            .iter()
            .find(|(op, _)| *op == operation)
            .map(|(_, role)| *role)
    }

    pub fn evaluate(&self, operation: Operation, roles: &Roles) -> Decision {
        match self.required_role(operation) {
            Some(required) if roles.satisfies(required) => Decision::Allow,
            _ => Decision::Deny,
        }
    }

    /// Like [`evaluate`](Self::evaluate) but yields `ResourceError::Forbidden` on deny.
    pub fn check(&self, operation: Operation, roles: &Roles) -> Result<(), ResourceError> {
        match self.evaluate(operation, roles) {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(ResourceError::Forbidden { operation }),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::User), Just(Role::Admin)]
    }

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        prop::sample::select(Operation::ALL.to_vec())
    }

    #[test]
    fn parses_role_spellings() {
        assert_eq!("USER".parse::<Role>(), Ok(Role::User));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("ROLE_ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" role_user ".parse::<Role>(), Ok(Role::User));
        assert!("GUEST".parse::<Role>().is_err());
    }

    #[test]
    fn parse_list_skips_unknown_and_blank_names() {
        let roles = Roles::parse_list("USER, ,GUEST,ROLE_ADMIN");
        assert!(roles.contains(Role::User));
        assert!(roles.contains(Role::Admin));
        assert_eq!(roles.iter().count(), 2);
        assert!(Roles::parse_list("").is_anonymous());
    }

    #[test]
    fn standard_table() {
        let policy = AccessPolicy::standard();
        let user = Roles::from_iter([Role::User]);
        let admin = Roles::from_iter([Role::Admin, Role::User]);

        for op in [Operation::List, Operation::Get] {
            assert_eq!(policy.evaluate(op, &user), Decision::Allow);
            assert_eq!(policy.evaluate(op, &admin), Decision::Allow);
        }
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert_eq!(policy.evaluate(op, &user), Decision::Deny);
            assert_eq!(policy.evaluate(op, &admin), Decision::Allow);
        }
    }

    #[test]
    fn admin_alone_implies_user() {
        let policy = AccessPolicy::standard();
        let admin_only = Roles::from_iter([Role::Admin]);
        assert_eq!(policy.evaluate(Operation::Get, &admin_only), Decision::Allow);
    }

    #[test]
    fn operation_without_rule_is_denied() {
        let policy = AccessPolicy::new(vec![(Operation::List, Role::User)]);
        let admin = Roles::from_iter([Role::Admin]);
        assert_eq!(policy.evaluate(Operation::Delete, &admin), Decision::Deny);
    }

    #[test]
    fn check_reports_the_denied_operation() {
        let policy = AccessPolicy::standard();
        let err = policy
            .check(Operation::Create, &Roles::from_iter([Role::User]))
            .unwrap_err();
        assert_eq!(
            err,
            ResourceError::Forbidden {
                operation: Operation::Create
            }
        );
    }

    proptest! {
        #[test]
        fn anonymous_is_denied_everything(op in operation_strategy()) {
            prop_assert_eq!(AccessPolicy::standard().evaluate(op, &Roles::anonymous()), Decision::Deny);
        }

        #[test]
        fn writes_require_admin(
            roles in prop::collection::vec(role_strategy(), 0..3),
            op in prop::sample::select(vec![Operation::Create, Operation::Update, Operation::Delete]),
        ) {
            let roles = Roles::from_iter(roles);
            let allowed = AccessPolicy::standard().evaluate(op, &roles) == Decision::Allow;
            prop_assert_eq!(allowed, roles.contains(Role::Admin));
        }

        #[test]
        fn reads_allowed_for_any_non_anonymous_caller(
            roles in prop::collection::vec(role_strategy(), 1..3),
            op in prop::sample::select(vec![Operation::List, Operation::Get]),
        ) {
            let roles = Roles::from_iter(roles);
            prop_assert_eq!(AccessPolicy::standard().evaluate(op, &roles), Decision::Allow);
        }
    }
}
