//! Observable notifications emitted by mutating ledger operations.
//!
//! The journal is an explicit append-only list owned by the ledger; hosts
//! drain it with [`crate::ElasticLedger::take_events`] and forward entries to
//! whatever audit sink they run (there is no implicit global log).

use fragment_types::{Address, Epoch, Fragments};
use serde::{Deserialize, Serialize};

/// A single audit notification. Amounts are always in external units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Supply was rescaled. Emitted on every rebase call that passes the
    /// role check, including saturated and zero-delta rebases.
    Rebase {
        epoch: Epoch,
        total_supply: Fragments,
    },
    /// Funds moved. The genesis mint is recorded as a transfer from the
    /// null address.
    Transfer {
        from: Address,
        to: Address,
        amount: Fragments,
    },
    /// An allowance was set; `amount` is the resulting absolute value.
    Approval {
        owner: Address,
        spender: Address,
        amount: Fragments,
    },
    /// The monetary policy role was reassigned.
    PolicyUpdated { policy: Address },
    /// The owner role was reassigned.
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}
