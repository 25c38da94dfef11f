//! Defines the interface to inference engines

use crate::factor::Factor;
use crate::variable::{Evidence, Variable};
use crate::util::Result;

pub mod ordering;
mod variable_elimination;
mod decision_support;

pub use self::ordering::{elimination_order, OrderingHeuristic};
pub use self::variable_elimination::VariableElimination;
pub use self::decision_support::{decision_support, outcomes_given};


/// A `ConditionalInferenceEngine` is capable of answering Conditional Probability Queries of the form:
///     ```P(Y | E = e)```
///
/// Engines hold no evidence of their own: every query passes its factors and `Evidence`
/// explicitly, so one engine can answer any number of independent queries.
pub trait ConditionalInferenceEngine {

    /// Infer the joint distribution ```P(query | evidence)``` over the product of `factors`.
    /// The result's scope lists `query` in the given order.
    fn infer(&self, factors: &[Factor], query: &[Variable], evidence: &Evidence) -> Result<Factor>;

}


/// Tunable parts of variable elimination
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EliminationConfig {

    /// How the elimination order is chosen
    pub heuristic: OrderingHeuristic

}

impl EliminationConfig {

    pub fn new() -> Self {
        EliminationConfig::default()
    }

    pub fn with_heuristic(mut self, heuristic: OrderingHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }
}
