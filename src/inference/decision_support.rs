//! Decision-support queries: the joint posterior over a `MedicalNetwork`'s treatments and
//! outcomes given what is known about a `Patient`.

use crate::factor::Factor;
use crate::model::Model;
use crate::model::medical::{MedicalNetwork, Patient};
use crate::util::{GalenError, Result};
use crate::variable::{Assignment, Evidence};
use super::variable_elimination::VariableElimination;


impl VariableElimination {

    /// Compute ```P(treatments, outcomes | patient)```.
    ///
    /// # Returns
    /// a normalized `Factor` whose scope is the network's treatments followed by its outcomes
    ///
    /// # Errors
    /// any error from translating the patient into evidence, or from the query itself
    pub fn decision_support(&self, net: &MedicalNetwork, patient: &Patient) -> Result<Factor> {
        let evidence = net.evidence_for(patient)?;
        debug!("decision support for {} observations", evidence.len());
        self.joint(&net.factors(), &net.query_variables(), &evidence)
    }
}


/// Run a decision-support query with the default engine configuration.
pub fn decision_support(net: &MedicalNetwork, patient: &Patient) -> Result<Factor> {
    VariableElimination::new().decision_support(net, patient)
}


/// Condition a decision-support result on one choice of treatments.
///
/// # Args
/// * `net`: the network the result was computed over
/// * `joint`: a result of `decision_support`
/// * `treatment`: one value per treatment, in the network's order
///
/// # Returns
/// the distribution over the outcomes when the given treatments are chosen
///
/// # Errors
/// * `GalenError::AssignmentArity` if `treatment` has the wrong number of values
/// * `GalenError::ZeroTotalProbability` if the chosen treatments have probability zero
pub fn outcomes_given(net: &MedicalNetwork, joint: &Factor, treatment: &Assignment) -> Result<Factor> {
    if treatment.len() != net.treatments().len() {
        return Err(GalenError::AssignmentArity {
            expected: net.treatments().len(),
            found: treatment.len()
        });
    }

    let mut chosen = Evidence::new();
    for (var, value) in net.treatments().iter().zip(treatment.values()) {
        chosen.observe(var, value.clone())?;
    }

    chosen.iter()
          .fold(Ok(joint.clone()), |acc, (var, value)| acc.and_then(|f| f.restrict(var, value)))?
          .normalize()
}
