//! Dual-unit elastic ledger engine.
//!
//! Balances are held in grains, a fixed pool of high-resolution internal
//! units sized at genesis so that it divides evenly by the initial supply.
//! The externally visible balance of an account is its grain balance divided
//! by the current scale factor (`grains_per_fragment`), floor division.
//! A rebase replaces the scale factor and the supply scalar and touches no
//! account entry, so it is O(1) in the holder count; a transfer moves the
//! same grain amount out of one account and into another, so the debit and
//! credit are exactly equal in external units at any reachable scale.

use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::params::LedgerParams;
use crate::roles::Roles;
use fragment_types::{Address, Epoch, Fragments, SupplyDelta, MAX_SUPPLY};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Largest value the grain pool is carved from: 2^256 - 1.
static U256_MAX: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << 256u32) - BigUint::one());

/// Result of a successful rebase, also echoed as a [`LedgerEvent::Rebase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebaseOutcome {
    pub epoch: Epoch,
    pub total_supply: Fragments,
}

/// The elastic-supply account ledger.
///
/// All state is exclusively owned by this struct; callers interact only
/// through the operations below, each of which either fully commits or
/// returns an error with no partial effect.
#[derive(Debug, Clone)]
pub struct ElasticLedger {
    pub(crate) params: LedgerParams,
    /// The ledger's own identity; rejected as a transfer recipient so funds
    /// cannot be stranded on the contract itself.
    pub(crate) ledger_address: Address,
    pub(crate) total_supply: Fragments,
    /// Size of the grain pool. Constant for the life of the ledger and
    /// evenly divisible by `params.initial_supply`.
    pub(crate) total_grains: BigUint,
    /// Current conversion factor: `total_grains / total_supply`. Left
    /// untouched by a rebase that clamps supply to zero.
    pub(crate) grains_per_fragment: BigUint,
    pub(crate) balances: HashMap<Address, BigUint>,
    /// Spend approvals in external units, keyed owner -> spender. Never
    /// rescaled by rebase.
    pub(crate) allowances: HashMap<Address, HashMap<Address, Fragments>>,
    pub(crate) roles: Roles,
    pub(crate) events: Vec<LedgerEvent>,
}

impl ElasticLedger {
    /// Create the ledger and mint the full initial supply to `deployer`,
    /// who also becomes owner. The monetary policy role starts unset.
    pub fn genesis(
        params: LedgerParams,
        ledger_address: Address,
        deployer: Address,
    ) -> Result<Self, LedgerError> {
        params.validate()?;
        if deployer.is_null() {
            return Err(LedgerError::InvalidRecipient {
                recipient: deployer,
                reason: "deployer cannot be the null identity",
            });
        }
        if ledger_address.is_null() || ledger_address == deployer {
            return Err(LedgerError::InvalidRecipient {
                recipient: ledger_address,
                reason: "ledger address must be a distinct non-null identity",
            });
        }

        let initial_supply = params.initial_supply;
        let total_grains = Self::grain_pool(initial_supply);
        let grains_per_fragment = &total_grains / BigUint::from(initial_supply);

        let mut balances = HashMap::new();
        balances.insert(deployer, total_grains.clone());

        let mut ledger = Self {
            params,
            ledger_address,
            total_supply: initial_supply,
            total_grains,
            grains_per_fragment,
            balances,
            allowances: HashMap::new(),
            roles: Roles::genesis(deployer),
            events: Vec::new(),
        };

        ledger.events.push(LedgerEvent::Transfer {
            from: Address::NULL,
            to: deployer,
            amount: initial_supply,
        });
        debug!(supply = initial_supply, %deployer, "ledger initialised");
        Ok(ledger)
    }

    /// The grain pool for a given initial supply: the largest multiple of
    /// the supply that fits in 256 bits, so genesis conversion is exact and
    /// the pool dwarfs `MAX_SUPPLY` at every reachable scale.
    pub(crate) fn grain_pool(initial_supply: Fragments) -> BigUint {
        let supply = BigUint::from(initial_supply);
        &*U256_MAX - (&*U256_MAX % &supply)
    }

    // ---------------------------------------------------------------------
    // Supply control
    // ---------------------------------------------------------------------

    /// Adjust total supply by `delta`, clamped to `[0, MAX_SUPPLY]`.
    ///
    /// Monetary-policy only. Clamping is a defined saturating behavior, not
    /// an error; a rebase that changes nothing still emits a notification.
    /// The scale factor is left untouched when the new supply is zero.
    pub fn rebase(
        &mut self,
        caller: Address,
        epoch: Epoch,
        delta: SupplyDelta,
    ) -> Result<RebaseOutcome, LedgerError> {
        self.roles.ensure_policy(caller)?;

        let new_supply = match delta {
            SupplyDelta::Expand(amount) => {
                let grown = self.total_supply.saturating_add(amount);
                if grown == MAX_SUPPLY && amount > MAX_SUPPLY - self.total_supply {
                    warn!(epoch, "rebase clamped at max supply");
                }
                grown
            }
            SupplyDelta::Contract(amount) => self.total_supply.saturating_sub(amount),
        };

        if new_supply != 0 {
            self.grains_per_fragment = &self.total_grains / BigUint::from(new_supply);
        }
        self.total_supply = new_supply;

        self.events.push(LedgerEvent::Rebase {
            epoch,
            total_supply: new_supply,
        });
        debug!(epoch, %delta, total_supply = new_supply, "rebase applied");
        Ok(RebaseOutcome {
            epoch,
            total_supply: new_supply,
        })
    }

    // ---------------------------------------------------------------------
    // Balance queries
    // ---------------------------------------------------------------------

    /// Externally visible total supply, in fragments.
    pub fn total_supply(&self) -> Fragments {
        self.total_supply
    }

    /// External balance of an account: grain balance over the current scale
    /// factor, floor division. Unknown accounts hold zero.
    pub fn balance_of(&self, account: Address) -> Fragments {
        match self.balances.get(&account) {
            Some(grains) => self.to_fragments(grains),
            None => 0,
        }
    }

    /// Remaining approved spend for `spender` on `owner`'s funds.
    pub fn allowance(&self, owner: Address, spender: Address) -> Fragments {
        self.allowances
            .get(&owner)
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or(0)
    }

    // ---------------------------------------------------------------------
    // Transfers
    // ---------------------------------------------------------------------

    /// Move `amount` fragments from the caller to `to`.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Fragments,
    ) -> Result<(), LedgerError> {
        self.move_funds(caller, to, amount)
    }

    /// Move `amount` fragments from `from` to `to` on the strength of an
    /// allowance granted to the caller. The allowance is decremented by
    /// exactly `amount`, in external units.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Fragments,
    ) -> Result<(), LedgerError> {
        let current = self.allowance(from, caller);
        let remaining = current
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                requested: amount,
                available: current,
            })?;

        self.move_funds(from, to, amount)?;

        self.allowances
            .entry(from)
            .or_default()
            .insert(caller, remaining);
        Ok(())
    }

    fn move_funds(
        &mut self,
        from: Address,
        to: Address,
        amount: Fragments,
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient {
                recipient: to,
                reason: "cannot transfer to the null identity",
            });
        }
        if to == self.ledger_address {
            return Err(LedgerError::InvalidRecipient {
                recipient: to,
                reason: "cannot transfer to the ledger itself",
            });
        }

        // One conversion shared by both sides, so debit and credit are
        // exactly equal in external units.
        let grains = BigUint::from(amount) * &self.grains_per_fragment;
        let available = self.balances.get(&from).cloned().unwrap_or_default();
        if available < grains {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: self.to_fragments(&available),
            });
        }

        *self.balances.entry(from).or_default() -= &grains;
        *self.balances.entry(to).or_default() += &grains;

        self.events.push(LedgerEvent::Transfer { from, to, amount });
        debug!(%from, %to, amount, "transfer applied");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Allowances
    // ---------------------------------------------------------------------

    /// Set the caller's approval for `spender` to an absolute `amount`.
    /// Approving the null identity is permitted; spending toward it is not.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Fragments,
    ) -> Result<(), LedgerError> {
        self.set_allowance(caller, spender, amount);
        Ok(())
    }

    /// Raise the caller's approval for `spender` by `amount`, failing closed
    /// on overflow.
    pub fn increase_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Fragments,
    ) -> Result<Fragments, LedgerError> {
        let raised = self
            .allowance(caller, spender)
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        self.set_allowance(caller, spender, raised);
        Ok(raised)
    }

    /// Lower the caller's approval for `spender` by `amount`, flooring at
    /// zero rather than underflowing.
    pub fn decrease_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Fragments,
    ) -> Result<Fragments, LedgerError> {
        let lowered = self.allowance(caller, spender).saturating_sub(amount);
        self.set_allowance(caller, spender, lowered);
        Ok(lowered)
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Fragments) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
        self.events.push(LedgerEvent::Approval {
            owner,
            spender,
            amount,
        });
    }

    // ---------------------------------------------------------------------
    // Role management
    // ---------------------------------------------------------------------

    /// Owner-only: assign or reassign the identity permitted to rebase.
    pub fn set_monetary_policy(
        &mut self,
        caller: Address,
        policy: Address,
    ) -> Result<(), LedgerError> {
        self.roles.set_monetary_policy(caller, policy)?;
        self.events.push(LedgerEvent::PolicyUpdated { policy });
        Ok(())
    }

    /// Owner-only: hand the owner role to another identity.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), LedgerError> {
        let previous_owner = self.roles.owner();
        self.roles.transfer_ownership(caller, new_owner)?;
        self.events.push(LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    pub fn owner(&self) -> Address {
        self.roles.owner()
    }

    pub fn monetary_policy(&self) -> Option<Address> {
        self.roles.monetary_policy()
    }

    // ---------------------------------------------------------------------
    // Metadata and events
    // ---------------------------------------------------------------------

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub fn ledger_address(&self) -> Address {
        self.ledger_address
    }

    pub fn token_name(&self) -> &str {
        &self.params.token_name
    }

    pub fn token_symbol(&self) -> &str {
        &self.params.token_symbol
    }

    pub fn decimals(&self) -> u8 {
        self.params.decimals
    }

    /// Notifications appended since the last drain, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Drain the notification journal.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    fn to_fragments(&self, grains: &BigUint) -> Fragments {
        let fragments = grains / &self.grains_per_fragment;
        // Bounded by total_supply <= u128::MAX since no account can hold
        // more grains than the pool.
        fragments.to_u128().unwrap_or(MAX_SUPPLY)
    }

    /// Sum of all grain balances. Equals the pool size at all times; used
    /// by snapshot restore to validate integrity.
    pub(crate) fn grain_balance_total(&self) -> BigUint {
        self.balances
            .values()
            .fold(BigUint::zero(), |acc, grains| acc + grains)
    }
}
