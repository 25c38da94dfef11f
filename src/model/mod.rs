//! Defines a `Model`, a Bayesian network representing the factorization of a probability
//! distribution P over discrete `Variable`s.

use crate::factor::Factor;
use crate::variable::Variable;

pub mod bayes_net;
pub mod medical;

/// The `Model` trait is the view of a network that inference works against: a bag of
/// `Factor`s over a set of named `Variable`s.
pub trait Model {

    /// Lookup a `Variable` in the `Model` based on the name
    fn lookup_variable(&self, name: &str) -> Option<&Variable>;


    /// Get all `Variable`s in the model, in the order they were added.
    fn variables(&self) -> Vec<Variable>;


    /// Get the `Factor`s whose product is the joint distribution of the `Model`.
    fn factors(&self) -> Vec<Factor>;


    /// Get the number of `Variable`s in the `Model`
    fn num_variables(&self) -> usize {
        self.variables().len()
    }
}
