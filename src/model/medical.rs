//! Defines a `MedicalNetwork`, a `BayesNet` whose variables are partly designated as treatments
//! and outcomes, and the `Patient` records that provide evidence for it.

use crate::factor::Factor;
use crate::model::bayes_net::BayesNet;
use crate::util::{GalenError, Result};
use crate::variable::{Evidence, Value, Variable};
use super::Model;

use itertools::Itertools;


/// A `BayesNet` together with the treatment and outcome `Variable`s a decision-support query
/// asks about.
#[derive(Clone, Debug)]
pub struct MedicalNetwork {

    net: BayesNet,

    treatments: Vec<Variable>,

    outcomes: Vec<Variable>

}

impl MedicalNetwork {

    /// Designate treatments and outcomes in `net`.
    ///
    /// # Errors
    /// * `GalenError::UnknownVariable` if a designated `Variable` is not part of `net`
    /// * `GalenError::DuplicateVariable` if a `Variable` is designated twice, or as both a
    ///   treatment and an outcome
    pub fn new(net: BayesNet, treatments: Vec<Variable>, outcomes: Vec<Variable>) -> Result<Self> {
        if let Some(v) = treatments.iter().chain(outcomes.iter()).find(|v| net.cpd(v).is_none()) {
            return Err(GalenError::UnknownVariable(v.name().to_string()));
        }

        if let Some(v) = treatments.iter().chain(outcomes.iter()).duplicates().next() {
            return Err(GalenError::DuplicateVariable(v.name().to_string()));
        }

        Ok(MedicalNetwork { net, treatments, outcomes })
    }

    /// The underlying network
    pub fn net(&self) -> &BayesNet {
        &self.net
    }

    pub fn treatments(&self) -> &[Variable] {
        &self.treatments
    }

    pub fn outcomes(&self) -> &[Variable] {
        &self.outcomes
    }

    /// The variables of a decision-support query: treatments followed by outcomes
    pub fn query_variables(&self) -> Vec<Variable> {
        self.treatments.iter().chain(self.outcomes.iter()).cloned().collect()
    }

    /// Translate what is known about `patient` into `Evidence` over this network.
    ///
    /// # Errors
    /// * `GalenError::UnknownVariable` if the patient mentions a `Variable` outside the network
    /// * `GalenError::ValueNotInDomain` if an observed value is outside its domain
    /// * `GalenError::InvalidQuery` if the patient has evidence on a treatment or outcome
    pub fn evidence_for(&self, patient: &Patient) -> Result<Evidence> {
        let mut evidence = Evidence::new();

        for (var, value) in patient.evidence_variables().iter().zip(patient.evidence_values()) {
            let var = self.net
                          .lookup_variable(var.name())
                          .ok_or_else(|| GalenError::UnknownVariable(var.name().to_string()))?;

            if self.treatments.contains(var) || self.outcomes.contains(var) {
                return Err(GalenError::InvalidQuery(format!(
                    "patient evidence on {}, which is a treatment or outcome", var
                )));
            }

            evidence.observe(var, value.clone())?;
        }

        Ok(evidence)
    }
}

impl Model for MedicalNetwork {

    fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.net.lookup_variable(name)
    }

    fn variables(&self) -> Vec<Variable> {
        self.net.variables()
    }

    fn factors(&self) -> Vec<Factor> {
        self.net.factors()
    }

    fn num_variables(&self) -> usize {
        self.net.num_variables()
    }
}


/// What is known about a patient: observed values for some `Variable`s of a network.
#[derive(Clone, Debug, Default)]
pub struct Patient {

    variables: Vec<Variable>,

    values: Vec<Value>

}

impl Patient {

    /// # Errors
    /// * `GalenError::InvalidQuery` if the two lists differ in length
    pub fn new(variables: Vec<Variable>, values: Vec<Value>) -> Result<Self> {
        if variables.len() != values.len() {
            return Err(GalenError::InvalidQuery(format!(
                "patient lists {} variables but {} values", variables.len(), values.len()
            )));
        }
        Ok(Patient { variables, values })
    }

    /// Add an observation to the patient record
    pub fn with<V: Into<Value>>(mut self, var: &Variable, value: V) -> Self {
        self.variables.push(var.clone());
        self.values.push(value.into());
        self
    }

    pub fn evidence_variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn evidence_values(&self) -> &[Value] {
        &self.values
    }
}
