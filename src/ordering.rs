//! Evaluation ordering for calculations.
//!
//! Referenced identifiers are extracted from each calculation's parsed
//! formula; edges run dependency -> dependent across the calculation set and
//! Kahn's algorithm yields the evaluation order. This subsumes the coarse
//! category levels: a financial-category calculation that references an
//! operational-category one still evaluates after it. Levels only break ties
//! among calculations the graph leaves unordered, which keeps the order
//! deterministic and close to author intent.

use std::collections::{HashMap, HashSet};

use crate::error::FormulaError;
use crate::formula::{identifiers_of, parse, Expr};
use crate::models::{Calculation, CalculationId};

/// The order a recompute pass evaluates calculations in, plus the
/// calculations found to sit on a dependency cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationPlan {
    /// Every non-cycle calculation, dependencies before dependents.
    pub order: Vec<CalculationId>,
    /// Calculations on a cycle; excluded from `order` and from value
    /// substitution, so their dependents fail with an unresolved reference.
    pub cycles: Vec<CalculationId>,
    /// Parse outcome per calculation identifier. Planning already parses
    /// every formula, so the evaluation pass reuses these instead of
    /// parsing a second time.
    pub asts: HashMap<String, Result<Expr, FormulaError>>,
}

/// Build the evaluation plan for a calculation set.
pub fn plan(calculations: &[Calculation]) -> EvaluationPlan {
    let n = calculations.len();

    // Dependencies per calculation: identifiers that name another
    // calculation. Unparseable formulas contribute no edges; the evaluator
    // reports them during the pass.
    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut asts: HashMap<String, Result<Expr, FormulaError>> = HashMap::with_capacity(n);
    for (i, calc) in calculations.iter().enumerate() {
        let parsed = parse(&calc.formula);
        if let Ok(ast) = &parsed {
            for name in identifiers_of(ast) {
                if let Some(j) = calculations.iter().position(|c| c.id.0 == name) {
                    if !deps[i].contains(&j) {
                        deps[i].push(j);
                    }
                }
            }
        }
        asts.insert(calc.id.0.clone(), parsed);
    }

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree: Vec<usize> = vec![0; n];
    for (i, dep_list) in deps.iter().enumerate() {
        indegree[i] = dep_list.len();
        for &j in dep_list {
            dependents[j].push(i);
        }
    }

    let mut ready: Vec<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut emitted: Vec<usize> = Vec::with_capacity(n);
    let mut done = vec![false; n];

    while !ready.is_empty() {
        // Deterministic pick: lowest (effective level, declaration index).
        let pos = ready
            .iter()
            .enumerate()
            .min_by_key(|(_, &i)| (calculations[i].effective_level(), i))
            .map(|(pos, _)| pos)
            .unwrap_or(0);
        let i = ready.swap_remove(pos);

        emitted.push(i);
        done[i] = true;
        for &j in &dependents[i] {
            indegree[j] -= 1;
            if indegree[j] == 0 {
                ready.push(j);
            }
        }
    }

    // Leftover nodes either sit on a cycle or depend (transitively) on one.
    // Only true cycle members are reported as circular; the rest stay in the
    // order and fail naturally on their unresolved dependency.
    let mut cycles = Vec::new();
    let mut downstream = Vec::new();
    for i in 0..n {
        if done[i] {
            continue;
        }
        if on_cycle(i, &deps) {
            cycles.push(calculations[i].id.clone());
        } else {
            downstream.push(i);
        }
    }

    let mut order: Vec<CalculationId> = emitted
        .into_iter()
        .map(|i| calculations[i].id.clone())
        .collect();
    order.extend(downstream.into_iter().map(|i| calculations[i].id.clone()));

    EvaluationPlan { order, cycles, asts }
}

/// Whether node `start` can reach itself along dependency edges.
fn on_cycle(start: usize, deps: &[Vec<usize>]) -> bool {
    let mut visited = HashSet::new();
    let mut stack: Vec<usize> = deps[start].clone();
    while let Some(i) = stack.pop() {
        if i == start {
            return true;
        }
        if visited.insert(i) {
            stack.extend(deps[i].iter().copied());
        }
    }
    false
}
