use crate::errors::LedgerError;
use fragment_types::{tokens, Fragments, DECIMALS};
use serde::{Deserialize, Serialize};

/// Static parameters fixed at genesis.
///
/// These fields are serialized into the durable snapshot and are never
/// adjusted post-genesis; in particular `initial_supply` pins the size of the
/// internal grain pool for the life of the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Human-readable token name.
    pub token_name: String,
    /// Ticker symbol.
    pub token_symbol: String,
    /// Decimal places of the external unit.
    pub decimals: u8,
    /// Supply minted to the deployer at genesis, in fragments.
    pub initial_supply: Fragments,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            token_name: "Fragment".to_string(),
            token_symbol: "FRAG".to_string(),
            decimals: DECIMALS,
            initial_supply: tokens(50_000_000),
        }
    }
}

impl LedgerParams {
    /// Check the parameter set is usable for genesis.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.initial_supply == 0 {
            return Err(LedgerError::InvalidParams {
                param: "initial_supply",
                reason: "must be nonzero".to_string(),
            });
        }
        if self.token_name.is_empty() {
            return Err(LedgerError::InvalidParams {
                param: "token_name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.token_symbol.is_empty() {
            return Err(LedgerError::InvalidParams {
                param: "token_symbol",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
