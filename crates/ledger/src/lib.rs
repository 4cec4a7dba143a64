//! Fragment Elastic Ledger
//!
//! Account-balance store whose total supply can be expanded or contracted by a
//! privileged rebase operation while preserving every holder's proportional
//! share. Balances are kept in a fixed pool of high-resolution internal units
//! (grains); a single scale factor converts to the external denomination
//! (fragments), so a rebase touches two scalars and never iterates accounts.
//!
//! Monetary unit: fragment. 1 token = 10^9 fragments.

pub mod errors;
pub mod events;
pub mod ledger;
pub mod params;
pub mod roles;
pub mod snapshot;

pub use errors::*;
pub use events::*;
pub use ledger::*;
pub use params::*;
pub use roles::*;
pub use snapshot::*;

use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle for embedding hosts. The ledger itself is single-writer;
/// the lock serialises callers, it does not make individual operations
/// interruptible.
pub type SharedLedger = Arc<RwLock<ElasticLedger>>;

/// Wrap a ledger in a [`SharedLedger`] handle.
pub fn shared(ledger: ElasticLedger) -> SharedLedger {
    Arc::new(RwLock::new(ledger))
}
