//! Defines a `BayesNet`, a directed model that represents the factorization of a probability
//! distribution P as a product of one conditional probability table per `Variable`.

use crate::factor::Factor;
use crate::init::Initialization;
use crate::util::{GalenError, Result};
use crate::variable::{Evidence, Variable};
use super::Model;

use indexmap::IndexMap;


/// Represents a Bayesian Network - a Directed Probabilistic Graphical Model.
///
/// # Representation
/// A traditional graph data structure is not used; instead, the Conditional Probability
/// Distribution (CPD) of each `Variable` implicitly defines the edges of the graph. The
/// `Variable`s are held in their topological order.
#[derive(Clone, Debug)]
pub struct BayesNet {

    /// The `Variable`s of the network and their CPDs. The `Factor` associated with a `Variable`
    /// ```X``` has scope ```Pa(X) U X```, so there are edges ```P -> X forall P in
    /// X.scope() where P != X```
    graph: IndexMap<Variable, Factor>

}

impl BayesNet {

    /// Get the CPD of the given variable in this network.
    pub fn cpd(&self, var: &Variable) -> Option<&Factor> {
        self.graph.get(var)
    }

    /// The parents of `var`, in the order its CPD lists them
    pub fn parents(&self, var: &Variable) -> Option<Vec<Variable>> {
        self.graph.get(var)
                  .map(|f| f.scope().iter().filter(|&v| v != var).cloned().collect())
    }

    /// Determine the probability of a full assignment to the `Variable`s in the network by the
    /// chain rule.
    ///
    /// # Errors
    /// * `GalenError::IncompleteAssignment` if `assignment` leaves out a `Variable`
    pub fn probability(&self, assignment: &Evidence) -> Result<f64> {
        let missing: Vec<String> = self.graph.keys()
                                             .filter(|v| !assignment.contains(v))
                                             .map(|v| v.name().to_string())
                                             .collect();
        if !missing.is_empty() {
            return Err(GalenError::IncompleteAssignment(missing));
        }

        self.graph.values()
                  .map(|cpd| cpd.value_for(assignment))
                  .fold(Ok(1.0), |acc, val| acc.and_then(|p| val.map(|v| p * v)))
    }
}

impl Model for BayesNet {

    fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.graph.get_key_value(name).map(|(v, _)| v)
    }

    fn variables(&self) -> Vec<Variable> {
        self.graph.keys().cloned().collect()
    }

    fn factors(&self) -> Vec<Factor> {
        self.graph.values().cloned().collect()
    }

    fn num_variables(&self) -> usize {
        self.graph.len()
    }
}


/// An implementation of the [builder pattern] for creating a `BayesNet`.
///
/// Networks must be assembled in topological order: every parent has to be added before its
/// children. The first error encountered is kept and reported by `build`.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct BayesNetBuilder {

    /// The `Variable`s and their associated CPDs
    factors: IndexMap<Variable, Factor>,

    /// The error state of the builder
    err: Option<GalenError>

}


impl BayesNetBuilder {

    /// Construct a new `BayesNetBuilder` representing an empty network
    pub fn new() -> Self {
        BayesNetBuilder {
            factors: IndexMap::new(),
            err: None
        }
    }


    /// Add a `Variable` to the network.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `parents`: the parent variables. The parents must already be in the model.
    /// * `init`: the initialization mechanism for the CPD of `var` in the model.
    pub fn with_variable(
        mut self,
        var: &Variable,
        parents: &[Variable],
        init: Initialization,
    ) -> Self {
        ///////////////////////////////////////////////////////////////////////
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Check for error conditions
        if let Some(p) = parents.iter().find(|&v| !self.factors.contains_key(v)) {
            self.err = Some(GalenError::MissingParent(p.name().to_string()));
            return self;
        }

        if self.factors.contains_key(var) {
            self.err = Some(GalenError::DuplicateVariable(var.name().to_string()));
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 3) Build the CPD and add it to the network
        match init.build_cpd(var, parents) {
            Ok(cpd) => {
                self.factors.insert(var.clone(), cpd);
            },
            Err(e) => {
                self.err = Some(e);
            }
        };

        self
    }


    /// Complete building the network.
    ///
    /// # Returns
    /// the `BayesNet`, or the first error generated during the building process
    pub fn build(self) -> Result<BayesNet> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(BayesNet { graph: self.factors })
        }
    }
}

impl Default for BayesNetBuilder {
    fn default() -> Self {
        BayesNetBuilder::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_empty() {
        let model = BayesNetBuilder::new().build().unwrap();
        assert_eq!(0, model.num_variables());
        assert!(model.factors().is_empty());
    }

    #[test]
    fn build_chain() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");

        let model = BayesNetBuilder::new()
            .with_variable(&a, &[], Initialization::Multinomial(&[0.4, 0.6]))
            .with_variable(&b, &[a.clone()], Initialization::Values(vec![0.9, 0.1, 0.2, 0.8]))
            .build()
            .unwrap();

        assert_eq!(vec![a.clone(), b.clone()], model.variables());
        assert_eq!(Some(&b), model.lookup_variable("B"));
        assert_eq!(None, model.lookup_variable("C"));
        assert_eq!(Some(vec![a.clone()]), model.parents(&b));
        assert_eq!(&[a.clone(), b.clone()][..], model.cpd(&b).unwrap().scope());
        assert_eq!(2, model.factors().len());
    }

    #[test]
    fn missing_parent() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");

        let res = BayesNetBuilder::new()
            .with_variable(&b, &[a.clone()], Initialization::Uniform)
            .with_variable(&a, &[], Initialization::Uniform)
            .build();

        match res {
            Err(GalenError::MissingParent(name)) => assert_eq!("A", name),
            _ => panic!("child added before its parent")
        };
    }

    #[test]
    fn duplicate_variable() {
        let a = Variable::binary("A");

        let res = BayesNetBuilder::new()
            .with_variable(&a, &[], Initialization::Uniform)
            .with_variable(&a, &[], Initialization::Uniform)
            .build();

        match res {
            Err(GalenError::DuplicateVariable(name)) => assert_eq!("A", name),
            _ => panic!("variable added twice")
        };
    }

    #[test]
    fn first_error_wins() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");

        let res = BayesNetBuilder::new()
            .with_variable(&a, &[], Initialization::Multinomial(&[0.5, 0.2]))
            .with_variable(&b, &[Variable::binary("Z")], Initialization::Uniform)
            .build();

        match res {
            Err(GalenError::NotACPD(_)) => (),
            Err(e) => panic!("wrong error {:?}", e),
            Ok(_) => panic!("invalid network built")
        };
    }

    #[test]
    fn probability() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");

        let model = BayesNetBuilder::new()
            .with_variable(&a, &[], Initialization::Multinomial(&[0.4, 0.6]))
            .with_variable(&b, &[a.clone()], Initialization::Values(vec![0.9, 0.1, 0.2, 0.8]))
            .build()
            .unwrap();

        let full = Evidence::new().with(&a, 1).unwrap().with(&b, 0).unwrap();
        assert!((0.6 * 0.2 - model.probability(&full).unwrap()).abs() < 1e-12);

        let partial = Evidence::new().with(&a, 1).unwrap();
        match model.probability(&partial) {
            Err(GalenError::IncompleteAssignment(names)) => assert_eq!(vec!["B"], names),
            _ => panic!("probability of a partial assignment")
        };
    }
}
