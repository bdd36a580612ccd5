mod engine;
mod fees;
mod session;
mod types;

pub use engine::run_breakdown;
pub use fees::{FeeList, FeeUpdate};
pub use session::{CalculatorSession, ParamField};
pub use types::{Breakdown, FeeEntry, FeeKind, Inputs};
