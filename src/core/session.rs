use super::engine::run_breakdown;
use super::fees::{FeeList, FeeUpdate};
use super::types::{Breakdown, Inputs};

/// Names one scalar field of the parameter set for `set_parameter`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParamField {
    TargetProfit,
    UnitPrice,
    CostOfGoods,
    MarketingCostPerUnit,
    OperationalCostPerUnit,
}

/// One interactive calculation session: owns the parameter set and the fee
/// list, and keeps the breakdown current.
///
/// The original behavior recomputed reactively on every state change; here
/// every mutation runs one full synchronous recomputation before returning,
/// so `breakdown()` is always a plain read. Single-threaded by construction,
/// each recomputation is O(fee count).
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    params: Inputs,
    fees: FeeList,
    breakdown: Option<Breakdown>,
}

impl CalculatorSession {
    pub fn new(params: Inputs, fees: FeeList) -> Self {
        let breakdown = run_breakdown(&params, fees.entries());
        Self {
            params,
            fees,
            breakdown,
        }
    }

    pub fn set_parameter(&mut self, field: ParamField, value: f64) {
        match field {
            ParamField::TargetProfit => self.params.target_profit = value,
            ParamField::UnitPrice => self.params.unit_price = value,
            ParamField::CostOfGoods => self.params.cost_of_goods = value,
            ParamField::MarketingCostPerUnit => self.params.marketing_cost_per_unit = value,
            ParamField::OperationalCostPerUnit => self.params.operational_cost_per_unit = value,
        }
        self.recompute();
    }

    /// Appends a blank fee entry and returns its id.
    pub fn add_fee(&mut self) -> u32 {
        let id = self.fees.add();
        self.recompute();
        id
    }

    /// Silent no-op when no entry carries the id.
    pub fn update_fee(&mut self, id: u32, update: FeeUpdate) {
        self.fees.update(id, update);
        self.recompute();
    }

    /// Silent no-op when no entry carries the id.
    pub fn remove_fee(&mut self, id: u32) {
        self.fees.remove(id);
        self.recompute();
    }

    /// `None` until the unit price is positive.
    pub fn breakdown(&self) -> Option<&Breakdown> {
        self.breakdown.as_ref()
    }

    pub fn params(&self) -> &Inputs {
        &self.params
    }

    pub fn fees(&self) -> &FeeList {
        &self.fees
    }

    fn recompute(&mut self) {
        self.breakdown = run_breakdown(&self.params, self.fees.entries());
    }
}

impl Default for CalculatorSession {
    /// All parameters zero plus the default 2.5% platform commission, the
    /// state a seller starts from before typing anything.
    fn default() -> Self {
        Self::new(Inputs::default(), FeeList::default())
    }
}
