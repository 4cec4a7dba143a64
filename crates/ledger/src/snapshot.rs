//! Durable snapshot of the ledger state.
//!
//! The on-disk layout is exactly the field set the ledger owns: parameters,
//! supply, grain balances, allowances, the two role identities, and any
//! notifications not yet drained by the host. The grain pool is re-derived
//! from the genesis parameters on restore and the snapshot is re-validated
//! against the ledger's invariants before it is accepted.

use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::ElasticLedger;
use crate::params::LedgerParams;
use crate::roles::Roles;
use anyhow::Context;
use fragment_types::{Address, Fragments};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialized ledger state written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub params: LedgerParams,
    pub ledger_address: Address,
    pub total_supply: Fragments,
    /// Conversion factor at snapshot time. Recomputable from `total_supply`
    /// except in the degenerate zero-supply state, so it is carried and
    /// cross-checked on restore.
    pub grains_per_fragment: BigUint,
    /// Grain balances per account.
    pub balances: HashMap<Address, BigUint>,
    /// External-unit allowances, keyed owner -> spender.
    pub allowances: HashMap<Address, HashMap<Address, Fragments>>,
    pub owner: Address,
    pub monetary_policy: Option<Address>,
    /// Notifications appended but not yet drained when the snapshot was taken.
    #[serde(default)]
    pub pending_events: Vec<LedgerEvent>,
}

impl ElasticLedger {
    /// Capture the current state for persistence.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            params: self.params.clone(),
            ledger_address: self.ledger_address,
            total_supply: self.total_supply,
            grains_per_fragment: self.grains_per_fragment.clone(),
            balances: self.balances.clone(),
            allowances: self.allowances.clone(),
            owner: self.roles.owner(),
            monetary_policy: self.roles.monetary_policy(),
            pending_events: self.events.clone(),
        }
    }

    /// Rebuild a ledger from a snapshot, re-deriving the grain pool and
    /// rejecting state that violates the ledger's invariants.
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        snapshot.params.validate()?;
        if snapshot.owner.is_null() {
            return Err(LedgerError::InvalidParams {
                param: "owner",
                reason: "cannot be the null identity".to_string(),
            });
        }

        let total_grains = Self::grain_pool(snapshot.params.initial_supply);

        if snapshot.total_supply != 0 {
            let expected = &total_grains / BigUint::from(snapshot.total_supply);
            if snapshot.grains_per_fragment != expected {
                return Err(LedgerError::InvalidParams {
                    param: "grains_per_fragment",
                    reason: format!(
                        "inconsistent with total supply {}",
                        snapshot.total_supply
                    ),
                });
            }
        }

        let ledger = Self {
            params: snapshot.params,
            ledger_address: snapshot.ledger_address,
            total_supply: snapshot.total_supply,
            total_grains,
            grains_per_fragment: snapshot.grains_per_fragment,
            balances: snapshot.balances,
            allowances: snapshot.allowances,
            roles: Roles::restore(snapshot.owner, snapshot.monetary_policy),
            events: snapshot.pending_events,
        };

        // Transfers conserve grains and genesis assigns the whole pool, so
        // any other sum means a corrupt or foreign snapshot.
        if ledger.grain_balance_total() != ledger.total_grains {
            return Err(LedgerError::InvalidParams {
                param: "balances",
                reason: "grain balances do not sum to the pool size".to_string(),
            });
        }

        debug!(supply = ledger.total_supply, "ledger restored from snapshot");
        Ok(ledger)
    }
}

/// Write the ledger state to `path` as JSON.
pub fn save_snapshot(ledger: &ElasticLedger, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&ledger.snapshot())
        .context("failed to serialize ledger snapshot")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    Ok(())
}

/// Read a ledger back from a JSON snapshot at `path`.
pub fn load_snapshot(path: &Path) -> anyhow::Result<ElasticLedger> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
    let snapshot: LedgerSnapshot =
        serde_json::from_str(&json).context("failed to parse ledger snapshot")?;
    let ledger = ElasticLedger::restore(snapshot)?;
    Ok(ledger)
}
