//! Module containing initialization routines for the conditional probability tables of a
//! network.

use crate::factor::{Factor, Table};
use crate::util::{GalenError, Result};
use crate::variable::Variable;

use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use std::collections::HashSet;

/// Tolerance when checking that each row of a CPD sums to one
const CPD_TOLERANCE: f64 = 1e-3;

/// Defines possible ways to initialize a `Variable`s CPD.
///
/// Every CPD built here (other than `Table`) has scope ```parents..., var```: the child is the
/// last axis, so each row along that axis is one conditional distribution.
pub enum Initialization<'a> {
    /// A uniform distribution over all possibilities
    Uniform,

    /// Randomly initialize the weights of the CPD.
    Random,

    /// Randomly initialize the weights of the CPD from a seeded generator, so the same seed
    /// always produces the same table.
    Seeded(u64),

    /// Initialize the CPD as a Multinomial distribution with parameters ```p_0, p_1...```.
    /// Note that this `Initialization` is valid only to a `Variable` with no parents.
    Multinomial(&'a [f64]),

    /// Explicit values, in row-major order over ```parents..., var```
    Values(Vec<f64>),

    /// User defined CPD. Its scope may list the `Variable`s in any order.
    Table(Factor)
}


impl<'a> Initialization<'a> {

    /// Construct a CPD, initialized based on ```self```
    ///
    /// # Args
    /// * `var`: the `Variable` the CPD describes
    /// * `parents`: the parents of `var`
    ///
    /// # Returns
    /// a `Factor` whose values, for every assignment to `parents`, form a distribution over
    /// `var`.
    pub fn build_cpd(self, var: &Variable, parents: &[Variable]) -> Result<Factor> {
        let name = format!("P({})", var);

        let mut scope = parents.to_vec();
        scope.push(var.clone());

        let factor = match self {
            // if this is a user defined factor, its scope just needs to be verified
            Initialization::Table(f) => {
                let expected: HashSet<&Variable> = scope.iter().collect();
                let actual: HashSet<&Variable> = f.scope().iter().collect();
                if expected != actual || f.scope().len() != scope.len() {
                    return Err(GalenError::InvalidScope(format!(
                        "CPD for {} has scope {:?}, expected {:?}", var, f.scope(), scope
                    )));
                }
                f
            },

            Initialization::Multinomial(_) if !parents.is_empty() => {
                return Err(GalenError::InvalidInitialization(format!(
                    "a multinomial cannot describe {}, which has parents", var
                )));
            },

            Initialization::Multinomial(p) if p.len() != var.cardinality() => {
                return Err(GalenError::InvalidInitialization(format!(
                    "{} parameters given for {}, which has {} values",
                    p.len(), var, var.cardinality()
                )));
            },

            Initialization::Multinomial(p) => {
                Factor::from_values(&name, scope, p.to_vec())?
            },

            Initialization::Values(values) => {
                Factor::from_values(&name, scope, values)?
            },

            Initialization::Uniform => {
                let shape: Vec<usize> = scope.iter().map(|v| v.cardinality()).collect();
                let val = 1. / (var.cardinality() as f64);
                Factor::new(&name, scope, Table::from_elem(shape, val))?
            },

            Initialization::Random => {
                random_cpd(&name, scope, &mut rand::thread_rng())?
            },

            Initialization::Seeded(seed) => {
                random_cpd(&name, scope, &mut StdRng::seed_from_u64(seed))?
            },
        };

        check_cpd(var, &factor)?;
        Ok(factor)
    }
}


/// Draw every entry uniformly from `[1, 100)` and normalize each row along the last axis.
fn random_cpd<R: Rng>(name: &str, scope: Vec<Variable>, rng: &mut R) -> Result<Factor> {
    let shape: Vec<usize> = scope.iter().map(|v| v.cardinality()).collect();
    let ax = nd::Axis(shape.len() - 1);

    let tbl = Table::random_using(shape, Uniform::new(1.0, 100.0), rng);
    let z = tbl.sum_axis(ax).insert_axis(ax);

    Factor::new(name, scope, tbl / &z)
}


/// Verify that, for every assignment to the other variables, the values of `factor` over `var`
/// sum to one.
fn check_cpd(var: &Variable, factor: &Factor) -> Result<()> {
    let axis = factor.position(var)
                     .ok_or_else(|| GalenError::VariableNotInScope(var.name().to_string()))?;

    let rows = factor.table().sum_axis(nd::Axis(axis));
    if rows.iter().all(|&z| (z - 1.0).abs() <= CPD_TOLERANCE) {
        Ok(())
    } else {
        Err(GalenError::NotACPD(factor.name().to_string()))
    }
}
