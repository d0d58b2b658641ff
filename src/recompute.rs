//! Full re-derivation of calculation results for one configuration.
//!
//! A pass is synchronous and total: it runs to completion before the
//! triggering mutation returns, and afterwards every calculation's
//! result/status reflects the current parameter values. Failures are
//! contained per calculation and never abort the pass.

use tracing::{debug, warn};

use crate::configuration::Configuration;
use crate::error::FormulaError;
use crate::formula::{evaluate, finish};
use crate::models::CalcStatus;
use crate::ordering;

/// Recompute every calculation in the configuration.
///
/// Conditional parameters are re-derived first, then calculations evaluate
/// in dependency order. As each calculation resolves, its rounded result
/// joins the value map so later calculations can reference it.
pub fn recompute(config: &mut Configuration) {
    config.resolve_conditionals();

    let mut values = config.value_map();
    let plan = ordering::plan(config.calculations());

    debug!(
        calculations = config.calculations().len(),
        parameters = config.parameters().len(),
        "recompute pass"
    );

    if !plan.cycles.is_empty() {
        warn!(cycles = ?plan.cycles, "circular reference between calculations");
    }

    for id in &plan.cycles {
        if let Ok(calc) = config.calculation_mut(id) {
            calc.result = None;
            calc.status = CalcStatus::Error(FormulaError::CircularReference.to_string());
        }
    }

    for id in &plan.order {
        // The plan holds a parse outcome for every calculation it ordered.
        let Some(parsed) = plan.asts.get(&id.0) else {
            continue;
        };

        let outcome = match parsed {
            Ok(ast) => {
                let provider = |name: &str| values.get(name).copied();
                evaluate(ast, &provider).and_then(finish)
            }
            Err(err) => Err(err.clone()),
        };

        if let Ok(calc) = config.calculation_mut(id) {
            match outcome {
                Ok(value) => {
                    calc.result = Some(value);
                    calc.status = CalcStatus::Valid;
                    values.insert(id.0.clone(), value);
                }
                Err(err) => {
                    calc.result = None;
                    calc.status = CalcStatus::Error(err.to_string());
                }
            }
        }
    }
}
