//! Precision guarantees under repeated growth and contraction.
//!
//! Two long-run properties are exercised here: a one-fragment rebase always
//! moves `total_supply` by exactly one, from genesis all the way to the
//! supply cap; and a transfer of x fragments debits and credits exactly x at
//! any reachable scale, with the pair's combined balance conserved.

use fragment_ledger::{ElasticLedger, LedgerParams};
use fragment_types::{tokens, Address, Fragments, SupplyDelta, MAX_SUPPLY};
use num_bigint::BigUint;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

fn addr(tag: u8) -> Address {
    Address([tag; 32])
}

const DEPLOYER: u8 = 1;
const POLICY: u8 = 9;

fn policy_ledger() -> ElasticLedger {
    let mut ledger =
        ElasticLedger::genesis(LedgerParams::default(), Address([0xFF; 32]), addr(DEPLOYER))
            .unwrap();
    ledger
        .set_monetary_policy(addr(DEPLOYER), addr(POLICY))
        .unwrap();
    ledger
}

/// Percentage-of-supply rebase delta, saturating on expansion (the ledger
/// clamps at the cap anyway).
fn pct_delta(supply: Fragments, pct: i128) -> SupplyDelta {
    let step = supply / 100;
    if pct >= 0 {
        SupplyDelta::Expand(step.saturating_mul(pct as u128))
    } else {
        SupplyDelta::Contract(step.saturating_mul(pct.unsigned_abs()))
    }
}

#[test]
fn single_unit_rebase_is_exact_across_doublings() {
    let mut ledger = policy_ledger();
    let mut epoch = 0u64;

    // Double the supply until the next doubling would pass the cap,
    // checking a +1 rebase at every scale along the way.
    loop {
        let pre = ledger.total_supply();
        epoch += 1;
        ledger
            .rebase(addr(POLICY), epoch, SupplyDelta::Expand(1))
            .unwrap();
        assert_eq!(ledger.total_supply(), pre + 1);
        // The sole holder's balance tracks the supply exactly.
        assert_eq!(ledger.balance_of(addr(DEPLOYER)), ledger.total_supply());

        let supply = ledger.total_supply();
        if supply > MAX_SUPPLY / 2 {
            break;
        }
        epoch += 1;
        ledger
            .rebase(addr(POLICY), epoch, SupplyDelta::Expand(supply))
            .unwrap();
    }

    // One more exact +1 at the last representable scale below the cap.
    let supply = ledger.total_supply();
    ledger
        .rebase(
            addr(POLICY),
            epoch + 1,
            SupplyDelta::Expand(MAX_SUPPLY - supply - 1),
        )
        .unwrap();
    assert_eq!(ledger.total_supply(), MAX_SUPPLY - 1);
    ledger
        .rebase(addr(POLICY), epoch + 2, SupplyDelta::Expand(1))
        .unwrap();
    assert_eq!(ledger.total_supply(), MAX_SUPPLY);
    assert_eq!(ledger.balance_of(addr(DEPLOYER)), MAX_SUPPLY);
}

/// Transfer `amount` and check the exact external-unit settlement.
fn check_transfer(
    ledger: &mut ElasticLedger,
    from: Address,
    to: Address,
    amount: Fragments,
) -> Result<(), TestCaseError> {
    let from_before = ledger.balance_of(from);
    let to_before = ledger.balance_of(to);

    ledger
        .transfer(from, to, amount)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

    prop_assert_eq!(ledger.balance_of(from), from_before - amount);
    prop_assert_eq!(ledger.balance_of(to), to_before + amount);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Port of the random growth/contraction simulation: each cycle rebases
    // by a sampled percentage in [-50%, +250%] and then checks transfers of
    // one fragment and of the full balance, in both directions.
    #[test]
    fn transfers_settle_exactly_across_growth_cycles(
        pcts in vec(-50i128..=250i128, 1..10),
    ) {
        let mut ledger = policy_ledger();
        let a = addr(DEPLOYER);
        let b = addr(2);
        ledger.transfer(a, b, tokens(1_000)).unwrap();

        for (i, pct) in pcts.into_iter().enumerate() {
            let delta = pct_delta(ledger.total_supply(), pct);
            ledger
                .rebase(addr(POLICY), i as u64, delta)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            check_transfer(&mut ledger, a, b, 1)?;
            check_transfer(&mut ledger, b, a, 1)?;

            let all = ledger.balance_of(a);
            check_transfer(&mut ledger, a, b, all)?;
            check_transfer(&mut ledger, b, a, all)?;
        }
    }

    // Proportionality: a rebase with multiplier m = new/old moves every
    // holder to old_balance * m within a couple of external units, no
    // matter how the pool is split.
    #[test]
    fn rebase_scales_holders_proportionally(
        shares in vec(1u128..=1_000_000u128, 2..8),
        pct in -50i128..=250i128,
    ) {
        let mut ledger = policy_ledger();
        for (i, share) in shares.iter().enumerate() {
            ledger
                .transfer(addr(DEPLOYER), addr(10 + i as u8), tokens(*share))
                .unwrap();
        }

        let holders: Vec<Address> = (0..shares.len()).map(|i| addr(10 + i as u8)).collect();
        let before: Vec<Fragments> = holders.iter().map(|h| ledger.balance_of(*h)).collect();
        let old_supply = ledger.total_supply();

        ledger
            .rebase(addr(POLICY), 1, pct_delta(old_supply, pct))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let new_supply = ledger.total_supply();

        for (holder, old_balance) in holders.iter().zip(before) {
            let expected = (BigUint::from(old_balance) * new_supply) / old_supply;
            let actual = BigUint::from(ledger.balance_of(*holder));
            let drift = if actual > expected {
                &actual - &expected
            } else {
                &expected - &actual
            };
            prop_assert!(
                drift <= BigUint::from(2u32),
                "holder {} drifted by {} fragments",
                holder,
                drift
            );
        }
    }

    // Conservation survives interleaved rebases and arbitrary amounts.
    #[test]
    fn pairwise_sum_is_invariant_under_transfers(
        amounts in vec(1u128..=1_000_000_000u128, 1..10),
        pct in -50i128..=250i128,
    ) {
        let mut ledger = policy_ledger();
        let a = addr(DEPLOYER);
        let b = addr(2);
        ledger.transfer(a, b, tokens(500)).unwrap();
        ledger
            .rebase(addr(POLICY), 1, pct_delta(ledger.total_supply(), pct))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let sum_before = ledger.balance_of(a) + ledger.balance_of(b);
        for amount in amounts {
            let amount = amount.min(ledger.balance_of(a));
            check_transfer(&mut ledger, a, b, amount)?;
        }
        prop_assert_eq!(ledger.balance_of(a) + ledger.balance_of(b), sum_before);
    }
}
