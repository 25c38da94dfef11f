//! Build a small medical network and ask which treatment gives the best chance of recovery
//! for a given patient.
//!
//! Run with `RUST_LOG=galen=debug` to see the elimination order chosen for each query.

#[macro_use]
extern crate galen;

use galen::init::Initialization;
use galen::inference::{decision_support, outcomes_given};
use galen::{BayesNetBuilder, MedicalNetwork, Patient, Result, Variable};

fn main() -> Result<()> {
    env_logger::init();

    let age = Variable::new("Age", vec!["young", "old"])?;
    let smoker = Variable::binary("Smoker");
    let disease = Variable::new("Disease", vec!["mild", "severe"])?;
    let surgery = Variable::binary("Surgery");
    let recovery = Variable::binary("Recovery");

    let net = BayesNetBuilder::new()
        .with_variable(&age, &[], Initialization::Multinomial(&[0.65, 0.35]))
        .with_variable(&smoker, &[], Initialization::Multinomial(&[0.8, 0.2]))
        .with_variable(&disease, &[age.clone(), smoker.clone()], Initialization::Values(vec![
            0.9, 0.1,
            0.7, 0.3,
            0.6, 0.4,
            0.3, 0.7
        ]))
        .with_variable(&surgery, &[disease.clone()], Initialization::Values(vec![0.8, 0.2, 0.3, 0.7]))
        .with_variable(&recovery, &[age.clone(), disease.clone(), surgery.clone()], Initialization::Values(vec![
            0.05, 0.95,
            0.10, 0.90,
            0.50, 0.50,
            0.20, 0.80,
            0.15, 0.85,
            0.25, 0.75,
            0.70, 0.30,
            0.45, 0.55
        ]))
        .build()?;

    let med = MedicalNetwork::new(net, vec![surgery.clone()], vec![recovery.clone()])?;

    let patient = Patient::default().with(&age, "old").with(&smoker, 1);
    let joint = decision_support(&med, &patient)?;
    println!("{}", joint);

    for choice in surgery.domain() {
        let outcomes = outcomes_given(&med, &joint, &assignment![choice.clone()])?;
        let p = outcomes.values()?;
        println!("{} = {}: P({} = 1) = {:.4}", surgery, choice, recovery, p[1]);
    }

    Ok(())
}
