//! Reconciliation of two independently-authored parameter sets into shared
//! and variant-specific groups for side-by-side comparison.
//!
//! Pure derivation over plain inputs: calling it twice with the same
//! configurations yields the same partition.

use crate::configuration::Configuration;
use crate::models::Parameter;

/// Which comparison panel to partition. Basic and advanced parameters are
/// compared separately with the same algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Basic,
    Advanced,
}

/// A unified parameter present in both variants: the A-side instance is the
/// canonical representative, with the matching B-side instance attached so
/// editors can show both current values.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedParameter {
    pub a: Parameter,
    pub b: Parameter,
}

/// Partition of unified parameters across variants A and B.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonPartition {
    pub shared: Vec<MatchedParameter>,
    pub unique_to_a: Vec<Parameter>,
    pub unique_to_b: Vec<Parameter>,
}

/// Partition the unified parameters of two configurations for one panel.
///
/// Matching is by exact, case-sensitive `name` equality — not identifier,
/// since the two configurations have independent identifier spaces. Orders
/// follow each side's declaration order.
pub fn reconcile(a: &Configuration, b: &Configuration, panel: Panel) -> ComparisonPartition {
    let a_side: Vec<&Parameter> = panel_parameters(a, panel);
    let b_side: Vec<&Parameter> = panel_parameters(b, panel);

    let mut partition = ComparisonPartition::default();

    for param in &a_side {
        match b_side.iter().find(|p| p.name == param.name) {
            Some(matched) => partition.shared.push(MatchedParameter {
                a: (*param).clone(),
                b: (*matched).clone(),
            }),
            None => partition.unique_to_a.push((*param).clone()),
        }
    }

    for param in &b_side {
        let name_shared = partition.shared.iter().any(|m| m.a.name == param.name);
        if !name_shared {
            partition.unique_to_b.push((*param).clone());
        }
    }

    partition
}

fn panel_parameters(config: &Configuration, panel: Panel) -> Vec<&Parameter> {
    config
        .parameters()
        .iter()
        .filter(|p| {
            p.is_unified
                && match panel {
                    Panel::Basic => !p.user_interface.is_advanced,
                    Panel::Advanced => p.user_interface.is_advanced,
                }
        })
        .collect()
}
