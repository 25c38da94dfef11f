//! Exact inference over discrete Bayesian networks by variable elimination, with a
//! decision-support query over the treatments and outcomes of a medical network.

#[cfg_attr(test, macro_use)]
extern crate itertools;
#[cfg_attr(test, macro_use)]
extern crate ndarray;
#[macro_use]
extern crate log;

#[macro_use]
pub mod variable;
pub mod util;
pub mod factor;
pub mod init;
pub mod model;
pub mod inference;

pub use util::{Result, GalenError};
pub use variable::{Assignment, Evidence, Value, Variable};
pub use factor::Factor;
pub use model::Model;
pub use model::bayes_net::{BayesNet, BayesNetBuilder};
pub use model::medical::{MedicalNetwork, Patient};
pub use inference::{ConditionalInferenceEngine, EliminationConfig, OrderingHeuristic, VariableElimination};
