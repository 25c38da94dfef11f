//! Elimination-ordering heuristics.
//!
//! An ordering is computed greedily over the interaction graph implied by a list of factor
//! scopes: two variables are adjacent when they appear together in some scope. After each
//! choice the elimination is simulated by replacing every scope that mentions the chosen
//! variable with their union minus that variable, which is the scope the product and sum-out
//! of those factors will have.

use crate::variable::Variable;

use indexmap::IndexSet;
use itertools::Itertools;

use std::collections::{HashMap, HashSet};


/// How the next variable to eliminate is chosen. Ties are always broken in favour of the
/// candidate met first when scanning the scopes in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderingHeuristic {
    /// Eliminate the variable whose elimination adds the fewest new edges between its
    /// neighbours
    MinFill,

    /// Eliminate the variable with the fewest neighbours
    MinNeighbors
}

impl Default for OrderingHeuristic {
    fn default() -> Self {
        OrderingHeuristic::MinFill
    }
}

type Neighbors = HashMap<Variable, HashSet<Variable>>;


/// Build the adjacency sets of the interaction graph
fn interaction_graph(scopes: &[Vec<Variable>]) -> Neighbors {
    let mut neighbors: Neighbors = HashMap::new();

    for scope in scopes {
        for v in scope {
            neighbors.entry(v.clone()).or_insert_with(HashSet::new);
        }
        for (a, b) in scope.iter().tuple_combinations() {
            neighbors.entry(a.clone()).or_insert_with(HashSet::new).insert(b.clone());
            neighbors.entry(b.clone()).or_insert_with(HashSet::new).insert(a.clone());
        }
    }

    neighbors
}


/// Number of edges that eliminating `var` would add to make its neighbours a clique
fn fill_in(neighbors: &Neighbors, var: &Variable) -> usize {
    let adjacent = match neighbors.get(var) {
        Some(adjacent) => adjacent,
        None => return 0
    };

    adjacent.iter()
            .tuple_combinations()
            .filter(|&(a, b)| !neighbors.get(a).map_or(false, |n| n.contains(b)))
            .count()
}


fn cost(heuristic: OrderingHeuristic, neighbors: &Neighbors, var: &Variable) -> usize {
    match heuristic {
        OrderingHeuristic::MinFill => fill_in(neighbors, var),
        OrderingHeuristic::MinNeighbors => neighbors.get(var).map_or(0, |n| n.len())
    }
}


/// Compute an elimination order for every variable of `scopes` that is not in `query`.
///
/// # Args
/// * `scopes`: the scopes of the current factors
/// * `query`: variables that must never be eliminated
/// * `heuristic`: the greedy cost used to pick each next variable
///
/// # Returns
/// the variables to eliminate, first to last. The same inputs always give the same order.
pub fn elimination_order(
    scopes: &[Vec<Variable>],
    query: &[Variable],
    heuristic: OrderingHeuristic
) -> Vec<Variable> {
    let mut scopes: Vec<Vec<Variable>> = scopes.to_vec();

    // candidates in the order they are first met
    let mut candidates: IndexSet<Variable> = scopes.iter()
                                                   .flatten()
                                                   .filter(|v| !query.contains(v))
                                                   .cloned()
                                                   .collect();

    let mut order = Vec::with_capacity(candidates.len());

    while !candidates.is_empty() {
        let neighbors = interaction_graph(&scopes);

        let pos = match candidates.iter().map(|v| cost(heuristic, &neighbors, v)).position_min() {
            Some(pos) => pos,
            None => break
        };

        let var = match candidates.shift_remove_index(pos) {
            Some(var) => var,
            None => break
        };

        trace!("eliminate {} next (cost {})", var, cost(heuristic, &neighbors, &var));

        // simulate the elimination: merge every scope mentioning var, minus var itself
        let (touching, mut rest): (Vec<Vec<Variable>>, Vec<Vec<Variable>>) =
            scopes.into_iter().partition(|s| s.contains(&var));

        let merged: Vec<Variable> = touching.iter()
                                            .flatten()
                                            .filter(|&v| *v != var)
                                            .unique()
                                            .cloned()
                                            .collect();
        rest.push(merged);
        scopes = rest;

        order.push(var);
    }

    order
}
