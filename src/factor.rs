//! Definition of the factor module
//!
//! A `Factor` maps every assignment of an ordered scope of `Variable`s to a non-negative real
//! value. Factors are values: the algebra defined here (`multiply`, `restrict`, `sum_out`,
//! `normalize`) never mutates its inputs and always returns a fresh `Factor`.

use crate::util::{GalenError, Result};
use crate::variable::{all_assignments, Assignment, Assignments, Evidence, Value, Variable};

use itertools::Itertools;
use ndarray::prelude as nd;
use ndarray::Dimension;

use std::fmt;

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;


#[derive(Clone, Debug)]
pub struct Factor {
    /// A label for the `Factor`, used when printing tables
    name: String,

    /// The scope of the `Factor`. Axis `i` of the table corresponds to `scope[i]`.
    scope: Vec<Variable>,

    /// The values of the `Factor` table, indexed by domain position
    table: Table,

    /// Which entries of `table` have been written
    populated: nd::ArrayD<bool>
}


fn shape_of(scope: &[Variable]) -> Vec<usize> {
    scope.iter().map(|v| v.cardinality()).collect()
}

fn check_scope(scope: &[Variable]) -> Result<()> {
    match scope.iter().duplicates().next() {
        Some(dup) => Err(GalenError::DuplicateVariable(dup.name().to_string())),
        None => Ok(())
    }
}


impl Factor {

    /// Create a `Factor` over `scope` with no values written yet. Values are added with
    /// `add_value_at_assignment` or `add_values`.
    ///
    /// # Errors
    /// * `GalenError::DuplicateVariable` if a `Variable` appears twice in `scope`
    pub fn empty(name: &str, scope: Vec<Variable>) -> Result<Self> {
        check_scope(&scope)?;

        let shape = shape_of(&scope);
        Ok(Factor {
            name: String::from(name),
            table: Table::zeros(nd::IxDyn(&shape)),
            populated: nd::ArrayD::from_elem(nd::IxDyn(&shape), false),
            scope
        })
    }


    /// Create a fully populated `Factor`
    ///
    /// # Args
    /// * `name`: a label for the `Factor`
    /// * `scope`: the ordered scope
    /// * `table`: the values, with one axis per `Variable` of `scope` and axis lengths equal to
    ///   the cardinalities
    ///
    /// # Errors
    /// * `GalenError::DuplicateVariable` if a `Variable` appears twice in `scope`
    /// * `GalenError::InvalidScope` if the shape of `table` does not match `scope`
    /// * `GalenError::NegativeValue` if the table holds a negative value
    /// * `GalenError::NonFiniteValue` if the table holds a NaN or infinite value
    pub fn new(name: &str, scope: Vec<Variable>, table: Table) -> Result<Self> {
        check_scope(&scope)?;

        let shape = shape_of(&scope);
        if table.shape() != &shape[..] {
            return Err(GalenError::InvalidScope(format!(
                "table of shape {:?} does not match scope {:?} of shape {:?}",
                table.shape(), scope, shape
            )));
        }

        if table.iter().any(|v| !v.is_finite()) {
            return Err(GalenError::NonFiniteValue(String::from(name)));
        }

        // factors may not have negative values
        if table.iter().any(|&v| v < 0.0) {
            return Err(GalenError::NegativeValue(String::from(name)));
        }

        Ok(Factor::filled(String::from(name), scope, table))
    }


    /// Create a fully populated `Factor` from values listed in row-major assignment order (the
    /// order of `all_assignments(&scope)`).
    pub fn from_values(name: &str, scope: Vec<Variable>, values: Vec<f64>) -> Result<Self> {
        let shape = shape_of(&scope);
        let table = Table::from_shape_vec(nd::IxDyn(&shape), values).map_err(|e| {
            GalenError::InvalidScope(format!("values do not fit scope {:?}: {}", scope, e))
        })?;

        Factor::new(name, scope, table)
    }


    /// A `Factor` with an empty scope holding a single value
    ///
    /// # Errors
    /// * `GalenError::NegativeValue` or `GalenError::NonFiniteValue` as for `new`
    pub fn scalar(name: &str, value: f64) -> Result<Self> {
        Factor::new(name, Vec::new(), nd::arr0(value).into_dyn())
    }


    /// Internal constructor for tables produced by the algebra, which are complete by
    /// construction
    fn filled(name: String, scope: Vec<Variable>, table: Table) -> Self {
        let populated = nd::ArrayD::from_elem(table.raw_dim(), true);
        Factor { name, scope, table, populated }
    }


    pub fn name(&self) -> &str {
        &self.name
    }


    /// Retrieve the ordered scope of the `Factor`.
    pub fn scope(&self) -> &[Variable] {
        &self.scope
    }


    /// Position of `var` in the scope
    pub fn position(&self, var: &Variable) -> Option<usize> {
        self.scope.iter().position(|v| v == var)
    }


    pub fn contains(&self, var: &Variable) -> bool {
        self.position(var).is_some()
    }


    /// The underlying table. Entries that were never written read as `0.0`.
    pub fn table(&self) -> &Table {
        &self.table
    }


    /// Enumerate every assignment to the scope of this `Factor`, in row-major order.
    pub fn assignments(&self) -> Assignments {
        all_assignments(&self.scope)
    }


    /// `true` when a value has been written for every assignment
    pub fn is_populated(&self) -> bool {
        self.populated.iter().all(|&p| p)
    }


    /// Translate an assignment to table indices, validating it against the scope.
    fn index(&self, assignment: &Assignment) -> Result<Vec<usize>> {
        if assignment.len() != self.scope.len() {
            return Err(GalenError::AssignmentArity {
                expected: self.scope.len(),
                found: assignment.len()
            });
        }

        self.scope.iter()
                  .zip(assignment.values())
                  .map(|(var, val)| var.checked_index(val))
                  .collect()
    }


    /// Translate table indices back to an assignment. Only used for diagnostics.
    fn assignment_at(&self, idx: &[usize]) -> Assignment {
        Assignment::new(
            self.scope.iter()
                      .zip(idx)
                      .map(|(v, &i)| v.domain()[i].clone())
                      .collect()
        )
    }


    /// The first assignment that has not been written, if any
    fn first_gap(&self) -> Option<Assignment> {
        self.populated.indexed_iter()
                      .find(|&(_, &p)| !p)
                      .map(|(idx, _)| {
                          let idx: Vec<usize> = (0..idx.ndim()).map(|i| idx[i]).collect();
                          self.assignment_at(&idx)
                      })
    }


    /// Read an entry by table index on behalf of an algebra operation. A missing entry here
    /// means the input factor was never completed.
    fn entry(&self, idx: &[usize]) -> Result<f64> {
        let at = nd::IxDyn(idx);
        if self.populated[&at] {
            Ok(self.table[&at])
        } else {
            Err(GalenError::InconsistentFactorTable(format!(
                "factor `{}` has no value at {}", self.name, self.assignment_at(idx)
            )))
        }
    }


    /// Retrieve the value for a complete assignment over the scope of this `Factor`
    ///
    /// # Errors
    /// * `GalenError::AssignmentArity` if the assignment does not have one value per `Variable`
    /// * `GalenError::ValueNotInDomain` if a value is outside its `Variable`'s domain
    /// * `GalenError::UnpopulatedAssignment` if no value was written for the assignment
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        let idx = nd::IxDyn(&self.index(assignment)?);
        if self.populated[&idx] {
            Ok(self.table[&idx])
        } else {
            Err(GalenError::UnpopulatedAssignment(assignment.to_string()))
        }
    }


    /// Retrieve the value for the assignment described by `evidence`, which must observe every
    /// `Variable` in the scope and may observe others.
    ///
    /// # Errors
    /// * `GalenError::IncompleteAssignment` naming the scope variables `evidence` leaves out
    pub fn value_for(&self, evidence: &Evidence) -> Result<f64> {
        let missing: Vec<String> = self.scope.iter()
                                             .filter(|v| !evidence.contains(v))
                                             .map(|v| v.name().to_string())
                                             .collect();
        if !missing.is_empty() {
            return Err(GalenError::IncompleteAssignment(missing));
        }

        let values: Vec<Value> = self.scope.iter()
                                           .filter_map(|v| evidence.get(v).cloned())
                                           .collect();
        self.value(&Assignment::new(values))
    }


    /// Write `value` at `assignment`, replacing any previous value.
    pub fn add_value_at_assignment(&mut self, value: f64, assignment: &Assignment) -> Result<()> {
        if !value.is_finite() {
            return Err(GalenError::NonFiniteValue(self.name.clone()));
        }
        if value < 0.0 {
            return Err(GalenError::NegativeValue(self.name.clone()));
        }

        let idx = nd::IxDyn(&self.index(assignment)?);
        self.table[&idx] = value;
        self.populated[&idx] = true;
        Ok(())
    }


    /// Write many values at once. Stops at the first invalid row.
    pub fn add_values<I>(&mut self, rows: I) -> Result<()>
        where I: IntoIterator<Item = (Assignment, f64)>
    {
        for (assignment, value) in rows {
            self.add_value_at_assignment(value, &assignment)?;
        }
        Ok(())
    }


    /// All values, in row-major assignment order.
    ///
    /// # Errors
    /// * `GalenError::UnpopulatedAssignment` if some entry was never written
    pub fn values(&self) -> Result<Vec<f64>> {
        if let Some(gap) = self.first_gap() {
            return Err(GalenError::UnpopulatedAssignment(gap.to_string()));
        }
        Ok(self.table.iter().cloned().collect())
    }


    /// Sum of all values in the `Factor`
    pub fn total(&self) -> Result<f64> {
        if let Some(gap) = self.first_gap() {
            return Err(GalenError::UnpopulatedAssignment(gap.to_string()));
        }
        Ok(self.table.sum())
    }


    /// Product of this `Factor` and another.
    ///
    /// Defined in Koller & Friedman Section 4.2.1
    ///
    /// The product's scope is this `Factor`'s scope followed by every `Variable` of `other`
    /// that is not already in it, each side keeping its own order. Two scalar factors multiply
    /// to a scalar.
    ///
    /// # Errors
    /// * `GalenError::InvalidScope` if a shared `Variable` has a different domain in each input
    /// * `GalenError::InconsistentFactorTable` if either input is missing an entry
    pub fn multiply(&self, other: &Factor) -> Result<Factor> {
        let clash = other.scope.iter()
                               .find(|v| self.position(v).map_or(false, |i| self.scope[i].domain() != v.domain()));
        if let Some(v) = clash {
            return Err(GalenError::InvalidScope(format!(
                "variable `{}` has a different domain in `{}` and `{}`", v, self.name, other.name
            )));
        }

        let scope: Vec<Variable> = self.scope.iter()
                                             .chain(other.scope.iter())
                                             .unique()
                                             .cloned()
                                             .collect();

        // For each variable of `other`, the axis of the product it reads from: a shared
        // variable reads from the axis already fixed by `self`, the rest take the suffix axes
        // in the order they appear in `other`.
        let mut suffix = self.scope.len();
        let positions: Vec<usize> = other.scope.iter()
                                               .map(|v| match self.position(v) {
                                                   Some(i) => i,
                                                   None => {
                                                       suffix += 1;
                                                       suffix - 1
                                                   }
                                               })
                                               .collect();

        let prefix = self.scope.len();
        let mut table = Table::zeros(nd::IxDyn(&shape_of(&scope)));
        for (idx, out) in table.indexed_iter_mut() {
            let lhs: Vec<usize> = (0..prefix).map(|i| idx[i]).collect();
            let rhs: Vec<usize> = positions.iter().map(|&p| idx[p]).collect();
            *out = self.entry(&lhs)? * other.entry(&rhs)?;
        }

        Ok(Factor::filled(format!("{}*{}", self.name, other.name), scope, table))
    }


    /// Restrict the `Factor` to the entries where `var` takes `value`.
    ///
    /// Defined in Koller & Friedman 4.2.3
    ///
    /// `var` is removed from the scope; the remaining `Variable`s keep their relative order.
    /// Restricting a single-variable `Factor` yields a scalar.
    ///
    /// # Errors
    /// * `GalenError::VariableNotInScope` if `var` is not in the scope
    /// * `GalenError::ValueNotInDomain` if `value` is not in the domain of `var`
    pub fn restrict(&self, var: &Variable, value: &Value) -> Result<Factor> {
        let axis = self.position(var)
                       .ok_or_else(|| GalenError::VariableNotInScope(var.name().to_string()))?;
        let at = self.scope[axis].checked_index(value)?;

        let scope: Vec<Variable> = self.scope.iter().filter(|&v| v != var).cloned().collect();
        let table = self.table.index_axis(nd::Axis(axis), at).to_owned();
        let populated = self.populated.index_axis(nd::Axis(axis), at).to_owned();

        Ok(Factor {
            name: format!("{}|{}={}", self.name, var, value),
            scope,
            table,
            populated
        })
    }


    /// Sum the `Factor` over every value of `var`, removing it from the scope.
    ///
    /// Defined in Koller & Friedman 9.3.1
    ///
    /// Summing out of a scalar `Factor` has nothing to marginalize and returns it unchanged.
    ///
    /// # Errors
    /// * `GalenError::VariableNotInScope` if `var` is not in a non-empty scope
    /// * `GalenError::InconsistentFactorTable` if the `Factor` is missing an entry
    pub fn sum_out(&self, var: &Variable) -> Result<Factor> {
        if self.scope.is_empty() {
            return Ok(self.clone());
        }

        let axis = self.position(var)
                       .ok_or_else(|| GalenError::VariableNotInScope(var.name().to_string()))?;

        if let Some(gap) = self.first_gap() {
            return Err(GalenError::InconsistentFactorTable(format!(
                "factor `{}` has no value at {}", self.name, gap
            )));
        }

        let scope = self.scope.iter().filter(|&v| v != var).cloned().collect();
        let table = self.table.sum_axis(nd::Axis(axis));

        Ok(Factor::filled(format!("sum({}){}", var, self.name), scope, table))
    }


    /// Scale the `Factor` so that its values sum to 1.
    ///
    /// # Errors
    /// * `GalenError::ZeroTotalProbability` if the values sum to zero
    /// * `GalenError::UnpopulatedAssignment` if some entry was never written
    pub fn normalize(&self) -> Result<Factor> {
        let total = self.total()?;
        if total <= 0.0 || total.is_nan() {
            return Err(GalenError::ZeroTotalProbability);
        }

        Ok(Factor {
            name: self.name.clone(),
            scope: self.scope.clone(),
            table: &self.table / total,
            populated: self.populated.clone()
        })
    }


    /// The same `Factor` with its scope listed in `order`, which must be a permutation of the
    /// current scope.
    ///
    /// # Errors
    /// * `GalenError::InvalidScope` if `order` is not a permutation of the scope
    pub fn permute(&self, order: &[Variable]) -> Result<Factor> {
        let axes: Vec<usize> = order.iter().filter_map(|v| self.position(v)).collect();
        let same_domains = order.iter().zip(axes.iter()).all(|(v, &i)| v.domain() == self.scope[i].domain());
        if axes.len() != order.len() || axes.len() != self.scope.len() || !axes.iter().all_unique() || !same_domains {
            return Err(GalenError::InvalidScope(format!(
                "{:?} is not a reordering of {:?}", order, self.scope
            )));
        }

        Ok(Factor {
            name: self.name.clone(),
            scope: order.to_vec(),
            table: reordered(&self.table, &axes),
            populated: reordered(&self.populated, &axes)
        })
    }
}


/// Copy of `a` with its axes permuted, laid out in row-major order
fn reordered<A: Clone>(a: &nd::ArrayD<A>, axes: &[usize]) -> nd::ArrayD<A> {
    a.clone()
     .permuted_axes(axes.to_vec())
     .as_standard_layout()
     .into_owned()
}


/// Multiply a list of `Factor`s as a left fold, so the scope of the product lists variables in
/// the order they are first met. The product of no factors is the scalar 1.
pub fn multiply_factors(factors: &[Factor]) -> Result<Factor> {
    let mut iter = factors.iter();
    match iter.next() {
        None => Factor::scalar("1", 1.0),
        Some(first) => iter.fold(Ok(first.clone()), |acc, f| acc.and_then(|phi| phi.multiply(f)))
    }
}


impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}({})", self.name, self.scope.iter().join(", "))?;
        let entries = self.table.iter().zip(self.populated.iter());
        for (assignment, (value, &populated)) in self.assignments().zip(entries) {
            if populated {
                writeln!(f, "  {} = {}", assignment, value)?;
            } else {
                writeln!(f, "  {} = -", assignment)?;
            }
        }
        Ok(())
    }
}


// Unit tests
#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    /// Variables used by the Koller & Friedman examples: A has three values, B and C two.
    fn kf_vars() -> (Variable, Variable, Variable) {
        (Variable::new("A", vec![0, 1, 2]).unwrap(), Variable::binary("B"), Variable::binary("C"))
    }

    fn kf_abc(a: &Variable, b: &Variable, c: &Variable) -> Factor {
        Factor::from_values(
            "phi",
            vec![a.clone(), b.clone(), c.clone()],
            vec![0.25, 0.35, 0.08, 0.16, 0.05, 0.07, 0., 0., 0.15, 0.21, 0.09, 0.18]
        ).unwrap()
    }

    #[test]
    fn table_factor() {
        let (a, b, c) = kf_vars();
        let mut table = Table::ones(vec![3, 2, 2]);
        table[nd::IxDyn(&[1, 1, 1])] = 5.;

        let f = Factor::new("f", vec![a, b, c], table).unwrap();

        for (x, y, z) in iproduct!(0..3, 0..2, 0..2) {
            let val = f.value(&assignment![x, y, z]).unwrap();
            if x == 1 && y == 1 && z == 1 {
                assert_eq!(5., val);
            } else {
                assert_eq!(1., val);
            }
        }
        assert_eq!(12, f.assignments().count());
    }

    #[test]
    fn table_factor_errs() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");

        // mismatched number of dimensions
        match Factor::new("f", vec![a.clone(), b.clone()], Table::ones(vec![2, 2, 2])) {
            Err(GalenError::InvalidScope(_)) => (),
            _ => panic!("wrong error type")
        };

        // wrong cardinality
        match Factor::new("f", vec![a.clone(), b.clone()], Table::ones(vec![2, 3])) {
            Err(GalenError::InvalidScope(_)) => (),
            _ => panic!("wrong error type")
        };

        // repeated variable
        match Factor::empty("f", vec![a.clone(), b.clone(), a.clone()]) {
            Err(GalenError::DuplicateVariable(name)) => assert_eq!("A", name),
            _ => panic!("wrong error type")
        };

        // negative value
        match Factor::from_values("f", vec![a.clone()], vec![0.5, -0.5]) {
            Err(GalenError::NegativeValue(_)) => (),
            _ => panic!("wrong error type")
        };

        // NaN and infinite values
        match Factor::from_values("f", vec![a.clone()], vec![0.5, std::f64::NAN]) {
            Err(GalenError::NonFiniteValue(_)) => (),
            _ => panic!("accepted a NaN value")
        };
        match Factor::from_values("f", vec![a.clone()], vec![std::f64::INFINITY, 0.5]) {
            Err(GalenError::NonFiniteValue(_)) => (),
            _ => panic!("accepted an infinite value")
        };

        let mut f = Factor::empty("f", vec![a.clone()]).unwrap();
        match f.add_value_at_assignment(std::f64::NAN, &assignment![0]) {
            Err(GalenError::NonFiniteValue(_)) => (),
            _ => panic!("wrote a NaN value")
        };
        assert!(!f.is_populated());

        // too few values
        assert!(Factor::from_values("f", vec![a, b], vec![0.5, 0.5]).is_err());
    }

    #[test]
    fn populate_incrementally() {
        let a = Variable::binary("A");
        let b = Variable::new("B", vec!["lo", "hi"]).unwrap();

        let mut f = Factor::empty("f", vec![a, b]).unwrap();
        assert!(!f.is_populated());

        f.add_value_at_assignment(0.1, &assignment![0, "lo"]).unwrap();
        match f.value(&assignment![1, "hi"]) {
            Err(GalenError::UnpopulatedAssignment(assn)) => assert_eq!("(1, hi)", assn),
            _ => panic!("read an unpopulated assignment")
        };
        assert!(f.values().is_err());

        f.add_values(vec![
            (assignment![0, "hi"], 0.2),
            (assignment![1, "lo"], 0.3),
            (assignment![1, "hi"], 0.4)
        ]).unwrap();
        assert!(f.is_populated());
        assert_eq!(vec![0.1, 0.2, 0.3, 0.4], f.values().unwrap());

        // overwrite
        f.add_value_at_assignment(0.9, &assignment![0, "lo"]).unwrap();
        assert_eq!(0.9, f.value(&assignment![0, "lo"]).unwrap());
    }

    #[test]
    fn bad_assignments() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");
        let mut f = Factor::empty("f", vec![a, b]).unwrap();

        match f.add_value_at_assignment(0.5, &assignment![0]) {
            Err(GalenError::AssignmentArity { expected, found }) => {
                assert_eq!(2, expected);
                assert_eq!(1, found);
            },
            _ => panic!("short assignment accepted")
        };

        match f.value(&assignment![0, 2]) {
            Err(GalenError::ValueNotInDomain { variable, .. }) => assert_eq!("B", variable),
            _ => panic!("value outside the domain accepted")
        };
    }

    #[test]
    fn value_for_evidence() {
        let (a, b, c) = kf_vars();
        let phi = kf_abc(&a, &b, &c);

        let ev = Evidence::new().with(&c, 1).unwrap()
                                .with(&a, 2).unwrap()
                                .with(&b, 0).unwrap();
        assert_eq!(0.21, phi.value_for(&ev).unwrap());

        let partial = Evidence::new().with(&b, 0).unwrap();
        match phi.value_for(&partial) {
            Err(GalenError::IncompleteAssignment(names)) => assert_eq!(vec!["A", "C"], names),
            _ => panic!("incomplete assignment accepted")
        };
    }

    #[test]
    /// Example taken from Koller & Friedman Figure 4.3
    fn product() {
        let (a, b, c) = kf_vars();

        let phi1 = Factor::from_values(
            "phi1", vec![a.clone(), b.clone()], vec![0.5, 0.8, 0.1, 0., 0.3, 0.9]
        ).unwrap();
        let phi2 = Factor::from_values(
            "phi2", vec![b.clone(), c.clone()], vec![0.5, 0.7, 0.1, 0.2]
        ).unwrap();

        let phi = phi1.multiply(&phi2).unwrap();
        assert_eq!(&[a.clone(), b.clone(), c.clone()][..], phi.scope());
        assert_eq!("phi1*phi2", phi.name());

        let expected = kf_abc(&a, &b, &c);
        for assn in expected.assignments() {
            assert!(close(expected.value(&assn).unwrap(), phi.value(&assn).unwrap()));
        }
    }

    #[test]
    fn product_scope_order() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");
        let c = Variable::binary("C");
        let d = Variable::binary("D");

        let f = Factor::from_values("f", vec![c.clone(), a.clone()], vec![1., 2., 3., 4.]).unwrap();
        let g = Factor::from_values(
            "g", vec![d.clone(), a.clone(), b.clone()], vec![1., 2., 3., 4., 5., 6., 7., 8.]
        ).unwrap();

        // left scope first, then right-exclusive variables in right order
        let fg = f.multiply(&g).unwrap();
        assert_eq!(&[c.clone(), a.clone(), d.clone(), b.clone()][..], fg.scope());

        // f(C=1, A=0) * g(D=1, A=0, B=1) = 3 * 6
        assert_eq!(18., fg.value(&assignment![1, 0, 1, 1]).unwrap());
    }

    #[test]
    fn product_is_commutative_in_value() {
        let (a, b, c) = kf_vars();
        let phi1 = Factor::from_values(
            "phi1", vec![a.clone(), b.clone()], vec![0.5, 0.8, 0.1, 0., 0.3, 0.9]
        ).unwrap();
        let phi2 = Factor::from_values(
            "phi2", vec![c.clone(), b.clone()], vec![0.5, 0.7, 0.1, 0.2]
        ).unwrap();

        let ab = phi1.multiply(&phi2).unwrap();
        let ba = phi2.multiply(&phi1).unwrap().permute(ab.scope()).unwrap();

        assert_eq!(ab.scope(), ba.scope());
        for assn in ab.assignments() {
            assert!(close(ab.value(&assn).unwrap(), ba.value(&assn).unwrap()));
        }
    }

    #[test]
    fn product_scalars() {
        let a = Variable::binary("A");
        let s = Factor::scalar("s", 0.5).unwrap();
        let t = Factor::scalar("t", 0.25).unwrap();
        assert!(Factor::scalar("nan", std::f64::NAN).is_err());

        let st = s.multiply(&t).unwrap();
        assert!(st.scope().is_empty());
        assert_eq!(0.125, st.value(&Assignment::empty()).unwrap());

        let f = Factor::from_values("f", vec![a.clone()], vec![0.2, 0.8]).unwrap();
        let sf = s.multiply(&f).unwrap();
        assert_eq!(&[a][..], sf.scope());
        assert_eq!(vec![0.1, 0.4], sf.values().unwrap());
    }

    #[test]
    fn product_unpopulated_input() {
        let a = Variable::binary("A");
        let mut f = Factor::empty("f", vec![a.clone()]).unwrap();
        f.add_value_at_assignment(0.5, &assignment![0]).unwrap();
        let g = Factor::from_values("g", vec![a], vec![0.2, 0.8]).unwrap();

        match f.multiply(&g) {
            Err(GalenError::InconsistentFactorTable(_)) => (),
            _ => panic!("multiplied an incomplete factor")
        };
        match f.sum_out(&f.scope()[0]) {
            Err(GalenError::InconsistentFactorTable(_)) => (),
            _ => panic!("summed an incomplete factor")
        };
    }

    #[test]
    fn product_mismatched_domains() {
        let a3 = Variable::new("A", vec![0, 1, 2]).unwrap();
        let a2 = Variable::binary("A");
        let b = Variable::binary("B");

        let f = Factor::from_values("f", vec![a3.clone()], vec![0.2, 0.3, 0.5]).unwrap();
        let g = Factor::from_values("g", vec![a2.clone(), b], vec![0.9, 0.1, 0.4, 0.6]).unwrap();

        match f.multiply(&g) {
            Err(GalenError::InvalidScope(_)) => (),
            _ => panic!("multiplied factors that disagree on the domain of A")
        };
        assert!(g.multiply(&f).is_err());

        // reordering onto a same-named variable with another domain is rejected too
        assert!(f.permute(&[a2]).is_err());
        assert!(f.permute(&[a3]).is_ok());
    }

    #[test]
    fn multiply_list() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");

        let fa = Factor::from_values("fa", vec![a.clone()], vec![0.3, 0.7]).unwrap();
        let fb = Factor::from_values("fb", vec![b.clone()], vec![0.6, 0.4]).unwrap();
        let fab = Factor::from_values("fab", vec![b.clone(), a.clone()], vec![1., 2., 3., 4.]).unwrap();

        let all = multiply_factors(&[fa.clone(), fb, fab]).unwrap();
        assert_eq!(&[a.clone(), b.clone()][..], all.scope());
        assert_eq!("fa*fb*fab", all.name());
        // A=1, B=0: 0.7 * 0.6 * fab(B=0, A=1)
        assert!(close(0.7 * 0.6 * 2., all.value(&assignment![1, 0]).unwrap()));

        let one = multiply_factors(&[]).unwrap();
        assert_eq!(1.0, one.total().unwrap());

        let single = multiply_factors(&[fa.clone()]).unwrap();
        assert_eq!(fa.values().unwrap(), single.values().unwrap());
    }

    #[test]
    fn restrict_two_variables() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");
        let f = Factor::from_values("f", vec![a.clone(), b.clone()], vec![0.1, 0.2, 0.3, 0.4]).unwrap();

        let r = f.restrict(&b, &Value::Int(1)).unwrap();
        assert_eq!(&[a][..], r.scope());
        assert_eq!(0.2, r.value(&assignment![0]).unwrap());
        assert_eq!(0.4, r.value(&assignment![1]).unwrap());

        // the input is untouched
        assert_eq!(4, f.values().unwrap().len());
    }

    #[test]
    /// Example take from Koller & Friedman Figure 4.5
    fn restrict_middle() {
        let (a, b, c) = kf_vars();
        let phi = kf_abc(&a, &b, &c);

        let reduced = phi.restrict(&c, &Value::Int(0)).unwrap();
        assert_eq!(&[a.clone(), b.clone()][..], reduced.scope());
        assert_eq!(vec![0.25, 0.08, 0.05, 0., 0.15, 0.09], reduced.values().unwrap());

        let reduced = phi.restrict(&b, &Value::Int(1)).unwrap();
        assert_eq!(&[a, c][..], reduced.scope());
        assert_eq!(vec![0.08, 0.16, 0., 0., 0.09, 0.18], reduced.values().unwrap());
    }

    #[test]
    fn restrict_to_scalar() {
        let a = Variable::new("A", vec!["x", "y", "z"]).unwrap();
        let f = Factor::from_values("f", vec![a.clone()], vec![0.2, 0.5, 0.3]).unwrap();

        let r = f.restrict(&a, &Value::from("y")).unwrap();
        assert!(r.scope().is_empty());
        assert_eq!(0.5, r.value(&Assignment::empty()).unwrap());

        // summing out a variable that was restricted away leaves the scalar untouched
        let s = r.sum_out(&a).unwrap();
        assert_eq!(vec![0.5], s.values().unwrap());
    }

    #[test]
    fn restrict_is_order_independent() {
        let (a, b, c) = kf_vars();
        let phi = kf_abc(&a, &b, &c);

        let ab = phi.restrict(&a, &Value::Int(2)).unwrap().restrict(&c, &Value::Int(1)).unwrap();
        let ba = phi.restrict(&c, &Value::Int(1)).unwrap().restrict(&a, &Value::Int(2)).unwrap();

        assert_eq!(ab.scope(), ba.scope());
        assert_eq!(ab.values().unwrap(), ba.values().unwrap());
        assert_eq!(vec![0.21, 0.18], ab.values().unwrap());
    }

    #[test]
    fn restrict_errs() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");
        let f = Factor::from_values("f", vec![a.clone()], vec![0.4, 0.6]).unwrap();

        match f.restrict(&b, &Value::Int(0)) {
            Err(GalenError::VariableNotInScope(name)) => assert_eq!("B", name),
            _ => panic!("restricted on a variable outside the scope")
        };
        match f.restrict(&a, &Value::Int(3)) {
            Err(GalenError::ValueNotInDomain { .. }) => (),
            _ => panic!("restricted to a value outside the domain")
        };
    }

    #[test]
    /// Example taken from Koller & Friedman Figure 9.7
    fn sum_out() {
        let (a, b, c) = kf_vars();
        let phi = kf_abc(&a, &b, &c);

        let marginalized = phi.sum_out(&b).unwrap();
        assert_eq!(&[a.clone(), c.clone()][..], marginalized.scope());

        let expected = array![[0.33, 0.51], [0.05, 0.07], [0.24, 0.39]].into_dyn();
        for (x, y) in iproduct!(0..3usize, 0..2usize) {
            let val = expected[nd::IxDyn(&[x, y])];
            assert!(
                (val - marginalized.value(&assignment![x as i32, y as i32]).unwrap()).abs()
                    < 10. * std::f64::EPSILON
            );
        }

        match phi.sum_out(&Variable::binary("D")) {
            Err(GalenError::VariableNotInScope(_)) => (),
            _ => panic!("summed out a variable outside the scope")
        };
    }

    #[test]
    fn sum_out_last_variable() {
        let a = Variable::binary("A");
        let f = Factor::from_values("f", vec![a.clone()], vec![0.25, 0.5]).unwrap();
        let s = f.sum_out(&a).unwrap();
        assert!(s.scope().is_empty());
        assert_eq!(0.75, s.value(&Assignment::empty()).unwrap());
    }

    #[test]
    fn normalize() {
        let a = Variable::binary("A");
        let b = Variable::binary("B");
        let f = Factor::from_values("f", vec![a, b], vec![1., 2., 3., 4.]).unwrap();

        let n = f.normalize().unwrap();
        assert!(close(1.0, n.total().unwrap()));
        assert!(close(0.4, n.value(&assignment![1, 1]).unwrap()));

        let z = Factor::from_values("z", vec![Variable::binary("C")], vec![0., 0.]).unwrap();
        match z.normalize() {
            Err(GalenError::ZeroTotalProbability) => (),
            _ => panic!("normalized an all-zero factor")
        };
    }

    #[test]
    fn permute() {
        let (a, b, c) = kf_vars();
        let phi = kf_abc(&a, &b, &c);

        let p = phi.permute(&[c.clone(), a.clone(), b.clone()]).unwrap();
        assert_eq!(&[c.clone(), a.clone(), b.clone()][..], p.scope());
        for (x, y, z) in iproduct!(0..3, 0..2, 0..2) {
            assert_eq!(
                phi.value(&assignment![x, y, z]).unwrap(),
                p.value(&assignment![z, x, y]).unwrap()
            );
        }
        // values come back in the new row-major order
        assert_eq!(0.25, p.values().unwrap()[0]);
        assert_eq!(0.08, p.values().unwrap()[1]);

        assert!(phi.permute(&[a.clone(), b.clone()]).is_err());
        assert!(phi.permute(&[a.clone(), b, a]).is_err());
    }

    #[test]
    fn display() {
        let a = Variable::binary("A");
        let mut f = Factor::empty("f", vec![a]).unwrap();
        f.add_value_at_assignment(0.25, &assignment![1]).unwrap();

        assert_eq!("f(A)\n  (0) = -\n  (1) = 0.25\n", f.to_string());
    }
}
