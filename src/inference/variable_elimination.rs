//! Defines a `ConditionalInferenceEngine` that uses exact inference by variable elimination to
//! answer conditional inference queries.
//!
//! Implementation of Koller & Friedman Algorithm 9.1 - Sum-Product-VE

use crate::factor::{multiply_factors, Factor};
use crate::util::{GalenError, Result};
use crate::variable::{Evidence, Variable};
use super::{ConditionalInferenceEngine, EliminationConfig};
use super::ordering::elimination_order;

use itertools::Itertools;


/// Exact inference over a bag of `Factor`s by summing out every non-query `Variable` in turn.
#[derive(Clone, Debug, Default)]
pub struct VariableElimination {

    config: EliminationConfig

}


impl VariableElimination {

    /// An engine using the default configuration (min-fill ordering)
    pub fn new() -> Self {
        VariableElimination { config: EliminationConfig::default() }
    }

    pub fn with_config(config: EliminationConfig) -> Self {
        VariableElimination { config }
    }

    pub fn config(&self) -> &EliminationConfig {
        &self.config
    }


    /// Compute the posterior distribution ```P(query | evidence)``` of a single `Variable`.
    ///
    /// # Returns
    /// one probability per value of `query`, in domain order, summing to 1
    pub fn query(&self, factors: &[Factor], query: &Variable, evidence: &Evidence) -> Result<Vec<f64>> {
        self.joint(factors, std::slice::from_ref(query), evidence)?.values()
    }


    /// Compute the joint posterior ```P(query | evidence)``` over several `Variable`s.
    ///
    /// # Args
    /// * `factors`: the factors whose product is the (unnormalized) joint distribution
    /// * `query`: the variables to keep, in the order the result should list them
    /// * `evidence`: observed values. Observations on variables no factor mentions are ignored.
    ///
    /// # Returns
    /// a normalized `Factor` whose scope is exactly `query`, in the given order
    ///
    /// # Errors
    /// * `GalenError::InvalidQuery` if `query` is empty, repeats a variable, or asks about an
    ///   observed variable
    /// * `GalenError::UnknownVariable` if a query variable is in no factor
    /// * `GalenError::ValueNotInDomain` if an observation is outside its domain
    /// * `GalenError::ZeroTotalProbability` if the evidence has probability zero
    pub fn joint(&self, factors: &[Factor], query: &[Variable], evidence: &Evidence) -> Result<Factor> {
        validate(factors, query, evidence)?;

        ///////////////////////////////////////////////////////////////////////
        // 1) Restrict every factor to the evidence
        let mut phis: Vec<Factor> = factors.iter()
                                           .map(|f| restrict_to(f, evidence))
                                           .collect::<Result<_>>()?;

        ///////////////////////////////////////////////////////////////////////
        // 2) Choose the elimination order over the restricted scopes
        let scopes: Vec<Vec<Variable>> = phis.iter().map(|f| f.scope().to_vec()).collect();
        let order = elimination_order(&scopes, query, self.config.heuristic);
        debug!("elimination order: [{}]", order.iter().join(", "));

        ///////////////////////////////////////////////////////////////////////
        // 3) Eliminate each variable in turn
        for var in order.iter() {
            let (touching, rest): (Vec<Factor>, Vec<Factor>) = phis.into_iter()
                                                                   .partition(|f| f.contains(var));

            // product step - multiply the factors that mention var
            let psi = multiply_factors(&touching)?;

            // sum step - marginalize psi over var
            let tau = psi.sum_out(var)?;
            debug!("eliminated {} from {} factors: [{}], {} entries",
                   var, touching.len(), tau.scope().iter().join(", "), tau.table().len());

            phis = rest;
            phis.push(tau);
        }

        ///////////////////////////////////////////////////////////////////////
        // 4) Combine what is left; its scope is exactly the query
        let phi = multiply_factors(&phis)?;
        let phi = phi.permute(query).map_err(|_| GalenError::InconsistentFactorTable(format!(
            "variable elimination left scope [{}], expected [{}]",
            phi.scope().iter().join(", "), query.iter().join(", ")
        )))?;

        ///////////////////////////////////////////////////////////////////////
        // 5) Normalize
        phi.normalize().map_err(|e| {
            if e == GalenError::ZeroTotalProbability {
                warn!("evidence [{}] has probability zero",
                      evidence.iter().map(|(v, val)| format!("{}={}", v, val)).join(", "));
            }
            e
        })
    }
}


impl ConditionalInferenceEngine for VariableElimination {

    fn infer(&self, factors: &[Factor], query: &[Variable], evidence: &Evidence) -> Result<Factor> {
        self.joint(factors, query, evidence)
    }
}


/// Check a query against the factors it will run over
fn validate(factors: &[Factor], query: &[Variable], evidence: &Evidence) -> Result<()> {
    if query.is_empty() {
        return Err(GalenError::InvalidQuery("no query variables".to_string()));
    }

    if let Some(v) = query.iter().duplicates().next() {
        return Err(GalenError::InvalidQuery(format!("{} is queried more than once", v)));
    }

    if let Some(v) = query.iter().find(|&v| evidence.contains(v)) {
        return Err(GalenError::InvalidQuery(format!("{} is both queried and observed", v)));
    }

    if let Some(v) = query.iter().find(|&v| !factors.iter().any(|f| f.contains(v))) {
        return Err(GalenError::UnknownVariable(v.name().to_string()));
    }

    Ok(())
}


/// Restrict `factor` by every observation on a variable in its scope
fn restrict_to(factor: &Factor, evidence: &Evidence) -> Result<Factor> {
    evidence.iter()
            .filter(|(var, _)| factor.contains(var))
            .fold(Ok(factor.clone()), |acc, (var, value)| {
                trace!("restrict {} to {}={}", factor.name(), var, value);
                acc.and_then(|f| f.restrict(var, value))
            })
}
