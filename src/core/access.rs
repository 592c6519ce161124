//! Access guard
//!
//! Every mutating operation declares the identity class it requires. The
//! check is a pure function of (owner, caller, target, operation) and runs
//! before any other precondition.

use crate::types::{AccountId, CallerIdentity, LedgerError};

/// Identity class required by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    /// Only the ledger owner (registration and holds)
    Owner,
    /// Only the account holder acting on their own account
    SelfOnly,
}

/// Check a caller against an operation's access class
///
/// # Errors
///
/// Returns [`LedgerError::Unauthorized`] when the caller is not the owner
/// for `Owner` operations, or is not the target account for `SelfOnly`
/// operations.
pub fn authorize(
    owner: &AccountId,
    caller: &CallerIdentity,
    class: AccessClass,
    target: &AccountId,
    operation: &str,
) -> Result<(), LedgerError> {
    let allowed = match class {
        AccessClass::Owner => caller.id() == owner,
        AccessClass::SelfOnly => caller.id() == target,
    };

    if allowed {
        Ok(())
    } else {
        Err(LedgerError::unauthorized(caller.id(), target, operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::owner_registers("owner", AccessClass::Owner, "alice", true)]
    #[case::renter_registers("alice", AccessClass::Owner, "alice", false)]
    #[case::self_service("alice", AccessClass::SelfOnly, "alice", true)]
    #[case::other_renter("bob", AccessClass::SelfOnly, "alice", false)]
    #[case::owner_is_not_self("owner", AccessClass::SelfOnly, "alice", false)]
    fn test_authorize(
        #[case] caller: &str,
        #[case] class: AccessClass,
        #[case] target: &str,
        #[case] allowed: bool,
    ) {
        let owner = AccountId::from("owner");
        let result = authorize(
            &owner,
            &CallerIdentity::new(caller),
            class,
            &AccountId::from(target),
            "test",
        );

        assert_eq!(result.is_ok(), allowed);
        if !allowed {
            assert!(matches!(result, Err(LedgerError::Unauthorized { .. })));
        }
    }
}
