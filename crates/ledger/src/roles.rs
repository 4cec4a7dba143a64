//! Two-role access control for the ledger.
//!
//! `Owner` may reassign either role; `MonetaryPolicy` may call rebase.
//! Each role moves `Unset -> Set -> Set (reassigned)` and never returns to
//! `Unset` post-genesis, which is why the null address is rejected as a role
//! holder. Reassignment is atomic and takes effect immediately.

use crate::errors::LedgerError;
use fragment_types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// The two privileged identities recognised by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// May reassign the owner and monetary policy roles.
    Owner,
    /// May invoke rebase.
    MonetaryPolicy,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => f.write_str("owner"),
            Role::MonetaryPolicy => f.write_str("monetary policy"),
        }
    }
}

/// Role assignments. Owned by the ledger and mutated only through the
/// owner-gated setters below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roles {
    owner: Address,
    monetary_policy: Option<Address>,
}

impl Roles {
    /// Genesis assignment: the deployer becomes owner, the monetary policy
    /// role starts unset and rebase is inaccessible until it is assigned.
    pub fn genesis(owner: Address) -> Self {
        Self {
            owner,
            monetary_policy: None,
        }
    }

    /// Reconstruct role state from a snapshot.
    pub(crate) fn restore(owner: Address, monetary_policy: Option<Address>) -> Self {
        Self {
            owner,
            monetary_policy,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn monetary_policy(&self) -> Option<Address> {
        self.monetary_policy
    }

    /// Fail with `Unauthorized` unless `caller` is the current owner.
    pub fn ensure_owner(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized {
                role: Role::Owner,
                caller,
            });
        }
        Ok(())
    }

    /// Fail with `Unauthorized` unless `caller` is the assigned monetary
    /// policy. An unset policy rejects every caller.
    pub fn ensure_policy(&self, caller: Address) -> Result<(), LedgerError> {
        if self.monetary_policy != Some(caller) {
            return Err(LedgerError::Unauthorized {
                role: Role::MonetaryPolicy,
                caller,
            });
        }
        Ok(())
    }

    /// Owner-only: assign or reassign the monetary policy identity.
    pub fn set_monetary_policy(
        &mut self,
        caller: Address,
        policy: Address,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if policy.is_null() {
            return Err(LedgerError::InvalidRecipient {
                recipient: policy,
                reason: "monetary policy cannot be the null identity",
            });
        }
        info!(%policy, "monetary policy reassigned");
        self.monetary_policy = Some(policy);
        Ok(())
    }

    /// Owner-only: hand the owner role to another identity. There is no
    /// renounce; the role can never return to unset.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        if new_owner.is_null() {
            return Err(LedgerError::InvalidRecipient {
                recipient: new_owner,
                reason: "owner cannot be the null identity",
            });
        }
        info!(previous = %self.owner, new = %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address([tag; 32])
    }

    #[test]
    fn policy_starts_unset() {
        let roles = Roles::genesis(addr(1));
        assert_eq!(roles.monetary_policy(), None);
        assert!(matches!(
            roles.ensure_policy(addr(1)),
            Err(LedgerError::Unauthorized {
                role: Role::MonetaryPolicy,
                ..
            })
        ));
    }

    #[test]
    fn owner_assigns_and_reassigns_policy() {
        let mut roles = Roles::genesis(addr(1));
        roles.set_monetary_policy(addr(1), addr(2)).unwrap();
        assert_eq!(roles.monetary_policy(), Some(addr(2)));
        roles.ensure_policy(addr(2)).unwrap();

        roles.set_monetary_policy(addr(1), addr(3)).unwrap();
        assert_eq!(roles.monetary_policy(), Some(addr(3)));
        assert!(roles.ensure_policy(addr(2)).is_err());
    }

    #[test]
    fn non_owner_cannot_assign_policy() {
        let mut roles = Roles::genesis(addr(1));
        let err = roles.set_monetary_policy(addr(2), addr(3)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Unauthorized {
                role: Role::Owner,
                ..
            }
        ));
        assert_eq!(roles.monetary_policy(), None);
    }

    #[test]
    fn ownership_transfer_is_immediate() {
        let mut roles = Roles::genesis(addr(1));
        roles.transfer_ownership(addr(1), addr(2)).unwrap();
        assert_eq!(roles.owner(), addr(2));
        assert!(roles.ensure_owner(addr(1)).is_err());
        roles.ensure_owner(addr(2)).unwrap();
    }

    #[test]
    fn null_identity_rejected_for_roles() {
        let mut roles = Roles::genesis(addr(1));
        assert!(matches!(
            roles.set_monetary_policy(addr(1), Address::NULL),
            Err(LedgerError::InvalidRecipient { .. })
        ));
        assert!(matches!(
            roles.transfer_ownership(addr(1), Address::NULL),
            Err(LedgerError::InvalidRecipient { .. })
        ));
    }
}
