use super::types::{Breakdown, FeeEntry, FeeKind, Inputs};

/// Derives the full financial breakdown for the current inputs.
///
/// Returns `None` when the unit price is not positive: that is the "nothing
/// to compute yet" signal, not an error. Every other input in the numeric
/// domain, zero and negative values included, produces a fully populated
/// breakdown. A non-positive margin per unit means no finite volume can
/// reach the target, reported as zero units with zero totals.
pub fn run_breakdown(inputs: &Inputs, fees: &[FeeEntry]) -> Option<Breakdown> {
    if !(inputs.unit_price > 0.0) {
        return None;
    }

    let total_fee_per_unit: f64 = fees
        .iter()
        .map(|fee| match fee.kind {
            FeeKind::Percentage => inputs.unit_price * fee.value / 100.0,
            FeeKind::FixedAmount => fee.value,
        })
        .sum();

    let margin_per_unit = inputs.unit_price
        - total_fee_per_unit
        - inputs.cost_of_goods
        - inputs.marketing_cost_per_unit
        - inputs.operational_cost_per_unit;

    let target_units = if margin_per_unit > 0.0 {
        let units = (inputs.target_profit / margin_per_unit).ceil();
        if units > 0.0 { units as u64 } else { 0 }
    } else {
        0
    };

    let units = target_units as f64;
    let target_revenue = units * inputs.unit_price;
    let total_marketing_cost = units * inputs.marketing_cost_per_unit;
    let total_fee_cost = units * total_fee_per_unit;
    let total_cost_of_goods = units * inputs.cost_of_goods;
    let total_operational_cost = units * inputs.operational_cost_per_unit;

    let net_merchandise_value = target_revenue - total_fee_cost;
    let final_profit =
        net_merchandise_value - total_cost_of_goods - total_marketing_cost - total_operational_cost;

    Some(Breakdown {
        total_fee_per_unit,
        margin_per_unit,
        target_units,
        target_revenue,
        total_marketing_cost,
        total_fee_cost,
        total_cost_of_goods,
        total_operational_cost,
        net_merchandise_value,
        final_profit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn fee(id: u32, value: f64, kind: FeeKind) -> FeeEntry {
        FeeEntry {
            id,
            name: String::new(),
            value,
            kind,
        }
    }

    fn sample_inputs() -> Inputs {
        Inputs {
            target_profit: 1_000_000.0,
            unit_price: 50_000.0,
            cost_of_goods: 20_000.0,
            marketing_cost_per_unit: 2_000.0,
            operational_cost_per_unit: 1_000.0,
        }
    }

    #[test]
    fn reaches_target_with_single_percentage_fee() {
        let inputs = sample_inputs();
        let fees = [fee(1, 2.5, FeeKind::Percentage)];

        let breakdown = run_breakdown(&inputs, &fees).expect("positive unit price");
        assert_approx(breakdown.total_fee_per_unit, 1_250.0);
        assert_approx(breakdown.margin_per_unit, 25_750.0);
        assert_eq!(breakdown.target_units, 39);
        assert_approx(breakdown.target_revenue, 1_950_000.0);
        assert_approx(breakdown.total_fee_cost, 39.0 * 1_250.0);
        assert_approx(breakdown.total_cost_of_goods, 39.0 * 20_000.0);
        assert_approx(breakdown.total_marketing_cost, 39.0 * 2_000.0);
        assert_approx(breakdown.total_operational_cost, 39.0 * 1_000.0);
        assert_approx(
            breakdown.net_merchandise_value,
            breakdown.target_revenue - breakdown.total_fee_cost,
        );
        assert!(breakdown.final_profit >= inputs.target_profit);
    }

    #[test]
    fn zero_unit_price_produces_no_breakdown() {
        let mut inputs = sample_inputs();
        inputs.unit_price = 0.0;

        assert_eq!(run_breakdown(&inputs, &[]), None);
        assert_eq!(
            run_breakdown(&inputs, &[fee(1, 2.5, FeeKind::Percentage)]),
            None
        );
    }

    #[test]
    fn negative_unit_price_produces_no_breakdown() {
        let mut inputs = sample_inputs();
        inputs.unit_price = -50_000.0;
        assert_eq!(run_breakdown(&inputs, &[]), None);
    }

    #[test]
    fn non_positive_margin_reports_zero_units_and_totals() {
        let inputs = Inputs {
            target_profit: 1_000_000.0,
            unit_price: 10_000.0,
            cost_of_goods: 9_000.0,
            marketing_cost_per_unit: 1_000.0,
            operational_cost_per_unit: 500.0,
        };
        let fees = [fee(1, 5.0, FeeKind::Percentage)];

        let breakdown = run_breakdown(&inputs, &fees).expect("positive unit price");
        assert_approx(breakdown.total_fee_per_unit, 500.0);
        assert_approx(breakdown.margin_per_unit, -1_000.0);
        assert_eq!(breakdown.target_units, 0);
        assert_approx(breakdown.target_revenue, 0.0);
        assert_approx(breakdown.total_fee_cost, 0.0);
        assert_approx(breakdown.total_marketing_cost, 0.0);
        assert_approx(breakdown.total_cost_of_goods, 0.0);
        assert_approx(breakdown.total_operational_cost, 0.0);
        assert_approx(breakdown.net_merchandise_value, 0.0);
        assert_approx(breakdown.final_profit, 0.0);
    }

    #[test]
    fn fixed_amount_fees_ignore_unit_price() {
        let mut inputs = sample_inputs();
        let fees = [fee(1, 1_500.0, FeeKind::FixedAmount)];

        let low = run_breakdown(&inputs, &fees).expect("breakdown");
        inputs.unit_price = 80_000.0;
        let high = run_breakdown(&inputs, &fees).expect("breakdown");

        assert_approx(low.total_fee_per_unit, 1_500.0);
        assert_approx(high.total_fee_per_unit, 1_500.0);
    }

    #[test]
    fn zero_target_profit_needs_zero_units() {
        let mut inputs = sample_inputs();
        inputs.target_profit = 0.0;

        let breakdown = run_breakdown(&inputs, &[]).expect("breakdown");
        assert_eq!(breakdown.target_units, 0);
        assert_approx(breakdown.final_profit, 0.0);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let inputs = sample_inputs();
        let fees = [
            fee(1, 2.5, FeeKind::Percentage),
            fee(2, 750.0, FeeKind::FixedAmount),
        ];

        let first = run_breakdown(&inputs, &fees);
        let second = run_breakdown(&inputs, &fees);
        assert_eq!(first, second);
    }

    #[test]
    fn fee_order_does_not_change_the_breakdown() {
        let inputs = sample_inputs();
        let forward = [
            fee(1, 2.5, FeeKind::Percentage),
            fee(2, 750.0, FeeKind::FixedAmount),
            fee(3, 1.0, FeeKind::Percentage),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            run_breakdown(&inputs, &forward),
            run_breakdown(&inputs, &reversed)
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_non_positive_unit_price_never_yields_breakdown(
            unit_price_cents in -10_000_000i64..=0,
            target_profit in 0u32..1_000_000,
            fee_value_bp in 0u32..50_000,
            fixed in proptest::bool::ANY
        ) {
            let inputs = Inputs {
                target_profit: target_profit as f64,
                unit_price: unit_price_cents as f64 / 100.0,
                ..Inputs::default()
            };
            let kind = if fixed { FeeKind::FixedAmount } else { FeeKind::Percentage };
            let fees = [fee(1, fee_value_bp as f64 / 100.0, kind)];
            prop_assert_eq!(run_breakdown(&inputs, &fees), None);
        }

        #[test]
        fn prop_positive_margin_reaches_target_without_overshooting_a_unit(
            target_profit in 1u32..5_000_000,
            unit_price in 1_000u32..100_000,
            cost_pct in 0u32..40,
            marketing_pct in 0u32..20,
            operational_pct in 0u32..20,
            fee_pct_bp in 0u32..1_000,
            fixed_fee in 0u32..100
        ) {
            let unit_price = unit_price as f64;
            let inputs = Inputs {
                target_profit: target_profit as f64,
                unit_price,
                cost_of_goods: unit_price * cost_pct as f64 / 100.0,
                marketing_cost_per_unit: unit_price * marketing_pct as f64 / 100.0,
                operational_cost_per_unit: unit_price * operational_pct as f64 / 100.0,
            };
            let fees = [
                fee(1, fee_pct_bp as f64 / 100.0, FeeKind::Percentage),
                fee(2, fixed_fee as f64, FeeKind::FixedAmount),
            ];

            let breakdown = run_breakdown(&inputs, &fees).expect("positive unit price");
            // The ranges above keep total per-unit cost strictly below the price.
            prop_assert!(breakdown.margin_per_unit > 0.0);
            prop_assert!(breakdown.final_profit + 1e-6 >= inputs.target_profit);
            prop_assert!(
                breakdown.final_profit < inputs.target_profit + breakdown.margin_per_unit + 1e-6
            );
        }

        #[test]
        fn prop_totals_scale_with_target_units(
            target_profit in 0u32..2_000_000,
            unit_price in 1u32..100_000,
            cost_of_goods in 0u32..150_000,
            fee_value in 0u32..10_000
        ) {
            let inputs = Inputs {
                target_profit: target_profit as f64,
                unit_price: unit_price as f64,
                cost_of_goods: cost_of_goods as f64,
                ..Inputs::default()
            };
            let fees = [fee(1, fee_value as f64, FeeKind::FixedAmount)];

            let breakdown = run_breakdown(&inputs, &fees).expect("positive unit price");
            let units = breakdown.target_units as f64;
            prop_assert_eq!(breakdown.target_revenue, units * inputs.unit_price);
            prop_assert_eq!(breakdown.total_fee_cost, units * breakdown.total_fee_per_unit);
            prop_assert_eq!(breakdown.total_cost_of_goods, units * inputs.cost_of_goods);
            prop_assert_eq!(
                breakdown.net_merchandise_value,
                breakdown.target_revenue - breakdown.total_fee_cost
            );
            if breakdown.margin_per_unit <= 0.0 {
                prop_assert_eq!(breakdown.target_units, 0);
            }
        }

        #[test]
        fn prop_fee_permutation_is_irrelevant(
            values in proptest::collection::vec((0u32..20_000, proptest::bool::ANY), 0..8),
            rotate_by in 0usize..8
        ) {
            let inputs = sample_inputs();
            let mut fees: Vec<FeeEntry> = values
                .iter()
                .enumerate()
                .map(|(i, (value, fixed))| {
                    let kind = if *fixed { FeeKind::FixedAmount } else { FeeKind::Percentage };
                    fee(i as u32 + 1, *value as f64 / 100.0, kind)
                })
                .collect();

            let baseline = run_breakdown(&inputs, &fees);
            if !fees.is_empty() {
                let mid = rotate_by % fees.len();
                fees.rotate_left(mid);
            }
            let rotated = run_breakdown(&inputs, &fees);

            match (baseline, rotated) {
                (Some(a), Some(b)) => {
                    prop_assert_eq!(a.target_units, b.target_units);
                    prop_assert!((a.total_fee_per_unit - b.total_fee_per_unit).abs() <= 1e-9);
                    prop_assert!((a.margin_per_unit - b.margin_per_unit).abs() <= 1e-9);
                    prop_assert!((a.final_profit - b.final_profit).abs() <= 1e-6);
                }
                (a, b) => prop_assert_eq!(a, b),
            }
        }
    }
}
