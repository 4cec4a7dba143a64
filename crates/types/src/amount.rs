//! External-unit amount scalars for the Fragment ledger.
//!
//! The ledger keeps two denominations. The *external* unit (a fragment) is
//! what `total_supply`/`balance_of` report and what every public operation
//! accepts. The *internal* unit (a grain) is a much finer accounting unit
//! private to the ledger engine; it never appears in this crate.
//!
//! One whole token is 10^9 fragments. Supply is bounded by `MAX_SUPPLY`,
//! the full `u128` range, which is why signed rebase deltas are carried as
//! sign-plus-magnitude rather than as `i128`: a single expansion from
//! genesis to the cap does not fit a signed 128-bit integer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// External-unit amount. 1 token = 10^9 fragments.
pub type Fragments = u128;

/// Opaque rebase audit tag supplied by the policy caller. The ledger echoes
/// it in the rebase notification and does not enforce monotonicity.
pub type Epoch = u64;

/// Number of decimal places of the token (fragments per whole token).
pub const DECIMALS: u8 = 9;

/// Conversion factor: 1 whole token = 10^9 fragments.
pub const FRAGMENTS_PER_TOKEN: Fragments = 10u128.pow(DECIMALS as u32);

/// Hard ceiling on total supply, in fragments.
pub const MAX_SUPPLY: Fragments = u128::MAX;

/// Convert a whole-token count into fragments, saturating at `MAX_SUPPLY`.
pub fn tokens(whole: u128) -> Fragments {
    whole.saturating_mul(FRAGMENTS_PER_TOKEN)
}

/// Signed supply adjustment passed to `rebase`, in fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyDelta {
    /// Grow total supply by the contained amount.
    Expand(Fragments),
    /// Shrink total supply by the contained amount.
    Contract(Fragments),
}

impl SupplyDelta {
    /// A delta that leaves supply unchanged.
    pub const ZERO: SupplyDelta = SupplyDelta::Expand(0);

    /// Magnitude of the adjustment, in fragments.
    pub fn magnitude(&self) -> Fragments {
        match self {
            SupplyDelta::Expand(amount) | SupplyDelta::Contract(amount) => *amount,
        }
    }

    /// Whether this delta grows (or leaves unchanged) the supply.
    pub fn is_expansion(&self) -> bool {
        matches!(self, SupplyDelta::Expand(_))
    }
}

impl From<i128> for SupplyDelta {
    fn from(value: i128) -> Self {
        if value < 0 {
            SupplyDelta::Contract(value.unsigned_abs())
        } else {
            SupplyDelta::Expand(value as u128)
        }
    }
}

impl fmt::Display for SupplyDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplyDelta::Expand(amount) => write!(f, "+{amount}"),
            SupplyDelta::Contract(amount) => write!(f, "-{amount}"),
        }
    }
}

/// Format a fragment amount as a whole-token string without using floats.
pub fn format_fragments(amount: Fragments) -> FragmentsDisplay {
    FragmentsDisplay { amount }
}

/// Display helper returned by [`format_fragments`].
pub struct FragmentsDisplay {
    amount: Fragments,
}

impl fmt::Display for FragmentsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.amount / FRAGMENTS_PER_TOKEN;
        let fractional = self.amount % FRAGMENTS_PER_TOKEN;

        if fractional == 0 {
            write!(f, "{}", whole)
        } else {
            let formatted = format!("{:09}", fractional);
            write!(f, "{}.{}", whole, formatted.trim_end_matches('0'))
        }
    }
}
