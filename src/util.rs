//! Defines the `Error` type for the galen library

use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, GalenError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum GalenError {

    /// An operation required a `Variable` that is not part of the `Factor`'s scope.
    #[error("variable `{0}` is not in the scope of the factor")]
    VariableNotInScope(String),

    /// A table entry was read before any value was written to it.
    #[error("no value has been written for assignment {0}")]
    UnpopulatedAssignment(String),

    /// The evidence has probability zero under the model, so there is nothing to normalize.
    #[error("the evidence has zero total probability under the model")]
    ZeroTotalProbability,

    /// A factor operation read a missing entry from one of its inputs. This is a defect in the
    /// construction of the inputs, never a property of the evidence.
    #[error("inconsistent factor table: {0}")]
    InconsistentFactorTable(String),

    /// An assignment did not have exactly one value per variable of the scope.
    #[error("assignment has {found} values but the scope has {expected} variables")]
    AssignmentArity { expected: usize, found: usize },

    /// A value that is not part of a `Variable`'s domain.
    #[error("value `{value}` is not in the domain of `{variable}`")]
    ValueNotInDomain { variable: String, value: String },

    /// A variable was present multiple times in a situation where it should only have been
    /// present once
    #[error("variable `{0}` appears more than once")]
    DuplicateVariable(String),

    /// A domain listed the same value twice
    #[error("domain of `{variable}` repeats the value `{value}`")]
    DuplicateValue { variable: String, value: String },

    /// A variable was declared with an empty domain
    #[error("domain of `{0}` is empty")]
    InvalidDomain(String),

    /// Provided scope did not satisfy constraints
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// Factors may not hold negative values
    #[error("factor `{0}` holds a negative value")]
    NegativeValue(String),

    /// Factors may only hold finite values
    #[error("factor `{0}` holds a value that is NaN or infinite")]
    NonFiniteValue(String),

    /// Missing assignments to the listed variables where a complete assignment was required.
    #[error("missing assignments to the variables {0:?}")]
    IncompleteAssignment(Vec<String>),

    /// A parent was referenced before it was added to the model
    #[error("parent `{0}` has not been added to the model")]
    MissingParent(String),

    /// A table was expected to be a conditional probability distribution but is not
    #[error("factor `{0}` is not a conditional probability distribution")]
    NotACPD(String),

    /// An initialization that cannot apply to the requested variable
    #[error("invalid initialization: {0}")]
    InvalidInitialization(String),

    /// A variable that is not part of the model or factor set
    #[error("variable `{0}` is not part of the model")]
    UnknownVariable(String),

    /// A query that cannot be answered as posed
    #[error("invalid query: {0}")]
    InvalidQuery(String),

}
