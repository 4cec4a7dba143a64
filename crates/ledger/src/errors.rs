use crate::roles::Role;
use fragment_types::{Address, Fragments};
use thiserror::Error;

/// Errors returned by ledger operations. Every failure aborts the call with
/// no partial state change.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unauthorized: caller {caller} does not hold the {role} role")]
    Unauthorized { role: Role, caller: Address },
    #[error("insufficient balance: requested={requested}, available={available}")]
    InsufficientBalance {
        requested: Fragments,
        available: Fragments,
    },
    #[error("insufficient allowance: requested={requested}, available={available}")]
    InsufficientAllowance {
        requested: Fragments,
        available: Fragments,
    },
    #[error("invalid recipient {recipient}: {reason}")]
    InvalidRecipient {
        recipient: Address,
        reason: &'static str,
    },
    #[error("amount arithmetic overflowed")]
    AmountOverflow,
    #[error("invalid ledger parameter {param}: {reason}")]
    InvalidParams { param: &'static str, reason: String },
}
