//! Definition of the variable module
//!
//! A `Variable` represents a discrete random variable in a Bayesian network. The order of its
//! domain is significant: the position of a value in the domain is the index used for it in
//! every `Factor` table.

use crate::util::{GalenError, Result};

use indexmap::IndexMap;
use itertools::Itertools;

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;


/// A single value from the domain of a `Variable`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Text(String)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s)
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(v: &'a str) -> Self {
        Value::Text(String::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}


#[derive(Debug)]
struct VariableData {
    /// The name of the `Variable`
    name: String,

    /// The ordered values the `Variable` may take
    domain: Vec<Value>
}


/// A named discrete random variable.
///
/// `Variable`s are lightweight handles: cloning one shares the underlying name and domain.
/// Two `Variable`s are equal when their names are equal, so names must be unique within a
/// network.
#[derive(Clone)]
pub struct Variable(Rc<VariableData>);

impl Variable {

    /// Construct a new `Variable` over the given domain.
    ///
    /// # Errors
    /// * `GalenError::InvalidDomain` if the domain is empty
    /// * `GalenError::DuplicateValue` if the domain lists a value more than once
    pub fn new<V: Into<Value>>(name: &str, domain: Vec<V>) -> Result<Variable> {
        let domain: Vec<Value> = domain.into_iter().map(Into::into).collect();

        if domain.is_empty() {
            return Err(GalenError::InvalidDomain(String::from(name)));
        }

        if let Some(dup) = domain.iter().duplicates().next() {
            return Err(GalenError::DuplicateValue {
                variable: String::from(name),
                value: dup.to_string()
            });
        }

        Ok(Variable(Rc::new(VariableData { name: String::from(name), domain })))
    }

    /// Construct a binary `Variable` with the domain `[0, 1]`
    pub fn binary(name: &str) -> Variable {
        Variable(Rc::new(VariableData {
            name: String::from(name),
            domain: vec![Value::Int(0), Value::Int(1)]
        }))
    }

    /// Get the name of the `Variable`
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Get the ordered domain of the `Variable`
    pub fn domain(&self) -> &[Value] {
        &self.0.domain
    }

    /// Get the number of values the `Variable` may take
    pub fn cardinality(&self) -> usize {
        self.0.domain.len()
    }

    /// Position of `value` in the domain, if it belongs to it
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.0.domain.iter().position(|v| v == value)
    }

    /// The value at position `idx` of the domain
    pub fn value_at(&self, idx: usize) -> Option<&Value> {
        self.0.domain.get(idx)
    }

    /// Like `index_of`, but reports a value outside the domain as an error.
    pub(crate) fn checked_index(&self, value: &Value) -> Result<usize> {
        self.index_of(value).ok_or_else(|| GalenError::ValueNotInDomain {
            variable: self.name().to_string(),
            value: value.to_string()
        })
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state)
    }
}

/// Lets maps keyed by `Variable` be queried by name. Sound because equality and hashing are
/// both defined by the name alone.
impl Borrow<str> for Variable {
    fn borrow(&self) -> &str {
        &self.0.name
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}


/// One value per `Variable` of some scope, in scope order.
///
/// An `Assignment` knows nothing about the scope it is meant for; it is validated against a
/// scope by the `Factor` it is used with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Assignment(Vec<Value>);

impl Assignment {

    pub fn new(values: Vec<Value>) -> Self {
        Assignment(values)
    }

    /// The assignment to the empty scope
    pub fn empty() -> Self {
        Assignment(Vec::new())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Assignment {
    fn from(values: Vec<Value>) -> Self {
        Assignment(values)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}

/// Build an `Assignment` from a list of values convertible into `Value`.
///
/// ```
/// #[macro_use] extern crate galen;
/// # fn main() {
/// let a = assignment![0, "high", true];
/// assert_eq!(3, a.len());
/// # }
/// ```
#[macro_export]
macro_rules! assignment {
    ($($v:expr),* $(,)*) => {
        $crate::variable::Assignment::new(vec![$($crate::variable::Value::from($v)),*])
    };
}


/// Lazy enumeration of every `Assignment` to a scope, in row-major order: the first `Variable`
/// varies slowest and the last varies fastest. The empty scope has exactly one (empty)
/// assignment.
pub struct Assignments<'a> {
    scope: &'a [Variable],
    next: Option<Vec<usize>>
}

impl<'a> Iterator for Assignments<'a> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        let mut idx = self.next.take()?;

        let current = Assignment::new(
            self.scope.iter()
                      .zip(idx.iter())
                      .map(|(v, &i)| v.domain()[i].clone())
                      .collect()
        );

        // advance like an odometer; if every position wraps we are done
        for pos in (0..idx.len()).rev() {
            idx[pos] += 1;
            if idx[pos] < self.scope[pos].cardinality() {
                self.next = Some(idx);
                break;
            }
            idx[pos] = 0;
        }

        Some(current)
    }
}

/// Enumerate all assignments to `scope`. The number of assignments is the product of the
/// cardinalities of the `Variable`s in the scope.
pub fn all_assignments(scope: &[Variable]) -> Assignments {
    Assignments { scope, next: Some(vec![0; scope.len()]) }
}

/// Observed values for a set of `Variable`s.
///
/// `Evidence` is passed explicitly to inference rather than stored on the `Variable`s
/// themselves, so independent queries over one network never observe each other's evidence.
/// Iteration follows the order in which variables were first observed.
#[derive(Clone, Debug, Default)]
pub struct Evidence {
    values: IndexMap<Variable, Value>
}

impl Evidence {

    pub fn new() -> Self {
        Evidence { values: IndexMap::new() }
    }

    /// Record that `var` was observed to take `value`. Observing a `Variable` again replaces
    /// the earlier observation.
    ///
    /// # Errors
    /// * `GalenError::ValueNotInDomain` if `value` is not in the domain of `var`
    pub fn observe<V: Into<Value>>(&mut self, var: &Variable, value: V) -> Result<()> {
        let value = value.into();
        var.checked_index(&value)?;
        self.values.insert(var.clone(), value);
        Ok(())
    }

    /// Builder-style variant of `observe`
    pub fn with<V: Into<Value>>(mut self, var: &Variable, value: V) -> Result<Self> {
        self.observe(var, value)?;
        Ok(self)
    }

    /// The observed value of `var`, if any
    pub fn get(&self, var: &Variable) -> Option<&Value> {
        self.values.get(var)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    /// Remove every observation
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}


// Unit Tests for the variable module.
#[cfg(test)]
mod tests {

    use super::*;

    use std::collections::HashSet;

    #[test]
    fn binary() {
        let var = Variable::binary("Foo");
        assert_eq!(var.name(), "Foo");
        assert_eq!(2, var.cardinality());
        assert_eq!(Some(1), var.index_of(&Value::Int(1)));
        assert_eq!(None, var.index_of(&Value::Int(2)));
    }

    #[test]
    fn enumerated() {
        let var = Variable::new("Foo", vec!["Probabilistic", "Graphical", "Models"]).unwrap();
        assert_eq!(3, var.cardinality());
        assert_eq!(Some(&Value::from("Graphical")), var.value_at(1));
        assert_eq!(Some(2), var.index_of(&Value::from("Models")));
    }

    #[test]
    fn invalid_domains() {
        match Variable::new::<i32>("Foo", vec![]) {
            Err(GalenError::InvalidDomain(name)) => assert_eq!("Foo", name),
            _ => panic!("empty domain accepted")
        };

        match Variable::new("Foo", vec![1, 2, 1]) {
            Err(GalenError::DuplicateValue { value, .. }) => assert_eq!("1", value),
            _ => panic!("duplicate value accepted")
        };
    }

    #[test]
    fn identity_is_by_name() {
        let a = Variable::binary("A");
        let a2 = Variable::new("A", vec!["x", "y", "z"]).unwrap();
        let b = Variable::binary("B");

        assert_eq!(a, a2);
        assert_ne!(a, b);

        let set: HashSet<Variable> = vec![a, a2, b].into_iter().collect();
        assert_eq!(2, set.len());
        assert!(set.contains("A"));
    }

    #[test]
    fn assignment_macro() {
        let a = assignment![1, "two", false];
        assert_eq!(
            &[Value::Int(1), Value::from("two"), Value::Bool(false)][..],
            a.values()
        );
        assert_eq!("(1, two, false)", a.to_string());
        assert!(assignment![].is_empty());
    }

    #[test]
    fn assignments_row_major() {
        let a = Variable::binary("A");
        let b = Variable::new("B", vec!["x", "y", "z"]).unwrap();

        let all: Vec<Assignment> = all_assignments(&[a.clone(), b.clone()]).collect();
        assert_eq!(6, all.len());
        assert_eq!(assignment![0, "x"], all[0]);
        assert_eq!(assignment![0, "y"], all[1]);
        assert_eq!(assignment![1, "x"], all[3]);
        assert_eq!(assignment![1, "z"], all[5]);

        // restartable
        let scope = vec![a, b];
        assert_eq!(all, all_assignments(&scope).collect::<Vec<_>>());
    }

    #[test]
    fn assignments_empty_scope() {
        let all: Vec<Assignment> = all_assignments(&[]).collect();
        assert_eq!(vec![Assignment::empty()], all);
    }

    #[test]
    fn evidence() {
        let a = Variable::binary("A");
        let b = Variable::new("B", vec!["lo", "hi"]).unwrap();

        let mut ev = Evidence::new();
        assert!(ev.is_empty());

        ev.observe(&b, "hi").unwrap();
        ev.observe(&a, 0).unwrap();
        assert_eq!(Some(&Value::from("hi")), ev.get(&b));
        assert_eq!(vec![&b, &a], ev.variables().collect::<Vec<_>>());

        // re-observing replaces the earlier value
        ev.observe(&a, 1).unwrap();
        assert_eq!(2, ev.len());
        assert_eq!(Some(&Value::Int(1)), ev.get(&a));

        ev.clear();
        assert!(!ev.contains(&a));
    }

    #[test]
    fn evidence_outside_domain() {
        let a = Variable::binary("A");
        let res = Evidence::new().with(&a, 7);
        match res {
            Err(GalenError::ValueNotInDomain { variable, value }) => {
                assert_eq!("A", variable);
                assert_eq!("7", value);
            },
            _ => panic!("accepted evidence outside the domain")
        };
    }

}
