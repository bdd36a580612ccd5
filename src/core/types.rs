use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FeeKind {
    #[default]
    Percentage,
    FixedAmount,
}

/// One platform/administrative charge, either a percentage of the unit sale
/// price or a fixed amount per unit sold.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeEntry {
    pub id: u32,
    pub name: String,
    pub value: f64,
    pub kind: FeeKind,
}

/// Per-unit business inputs. The business domain expects every field to be
/// >= 0, but the engine accepts any value and lets the arithmetic flow
/// through; the API boundary is where the domain is enforced.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub target_profit: f64,
    pub unit_price: f64,
    pub cost_of_goods: f64,
    pub marketing_cost_per_unit: f64,
    pub operational_cost_per_unit: f64,
}

/// Full financial projection for reaching the profit target. Recomputed
/// wholesale on every input change; never mutated field by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub total_fee_per_unit: f64,
    pub margin_per_unit: f64,
    pub target_units: u64,
    pub target_revenue: f64,
    pub total_marketing_cost: f64,
    pub total_fee_cost: f64,
    pub total_cost_of_goods: f64,
    pub total_operational_cost: f64,
    pub net_merchandise_value: f64,
    pub final_profit: f64,
}
