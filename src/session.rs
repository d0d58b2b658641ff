//! Editing session: owns one or two in-memory configurations and exposes
//! the discrete mutation events the presentation layer sends back.
//!
//! Every mutation recomputes the owning variant before returning, so the
//! session never exposes a half-updated snapshot. The two variants share no
//! mutable state; mutating A never recomputes B.

use tracing::debug;

use crate::configuration::Configuration;
use crate::error::ConfigError;
use crate::models::{Access, CalcCategory, CalculationId, ParameterId};
use crate::recompute::recompute;
use crate::reconcile::{reconcile, ComparisonPartition, Panel};

/// Which solution variant a mutation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn label(&self) -> &'static str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
        }
    }
}

/// A single-user editing session over one (`single`) or two (`compare`)
/// fully materialized configurations.
#[derive(Clone, Debug)]
pub struct Session {
    a: Configuration,
    b: Option<Configuration>,
}

impl Session {
    /// Open a session over one configuration. All calculations are brought
    /// up to date immediately.
    pub fn single(mut a: Configuration) -> Self {
        recompute(&mut a);
        Session { a, b: None }
    }

    /// Open a compare-mode session over two configurations.
    pub fn compare(mut a: Configuration, mut b: Configuration) -> Self {
        recompute(&mut a);
        recompute(&mut b);
        Session { a, b: Some(b) }
    }

    pub fn is_compare(&self) -> bool {
        self.b.is_some()
    }

    pub fn configuration(&self, variant: Variant) -> Result<&Configuration, ConfigError> {
        match variant {
            Variant::A => Ok(&self.a),
            Variant::B => self
                .b
                .as_ref()
                .ok_or_else(|| ConfigError::VariantNotLoaded(variant.label().to_string())),
        }
    }

    fn configuration_mut(&mut self, variant: Variant) -> Result<&mut Configuration, ConfigError> {
        match variant {
            Variant::A => Ok(&mut self.a),
            Variant::B => self
                .b
                .as_mut()
                .ok_or_else(|| ConfigError::VariantNotLoaded(variant.label().to_string())),
        }
    }

    fn editable_check(config: &Configuration, id: &ParameterId) -> Result<(), ConfigError> {
        let parameter = config
            .parameter(id)
            .ok_or_else(|| ConfigError::UnknownParameter(id.0.clone()))?;
        if parameter.user_interface.access != Access::Input {
            return Err(ConfigError::InvalidSelection {
                parameter: id.0.clone(),
                message: "parameter is not user-editable".to_string(),
            });
        }
        Ok(())
    }

    /// Commit a user override for a parameter and recompute the variant.
    pub fn set_override(
        &mut self,
        variant: Variant,
        id: &ParameterId,
        value: f64,
    ) -> Result<(), ConfigError> {
        let config = self.configuration_mut(variant)?;
        Self::editable_check(config, id)?;
        config.parameter_mut(id)?.set_override(value);
        debug!(variant = variant.label(), parameter = %id.0, "override set");
        recompute(config);
        Ok(())
    }

    /// Clear a user override, restoring the default, and recompute.
    pub fn clear_override(&mut self, variant: Variant, id: &ParameterId) -> Result<(), ConfigError> {
        let config = self.configuration_mut(variant)?;
        Self::editable_check(config, id)?;
        config.parameter_mut(id)?.clear_override();
        recompute(config);
        Ok(())
    }

    /// Select a dropdown option by label and recompute.
    pub fn select_option(
        &mut self,
        variant: Variant,
        id: &ParameterId,
        label: &str,
    ) -> Result<(), ConfigError> {
        let config = self.configuration_mut(variant)?;
        Self::editable_check(config, id)?;
        config.parameter_mut(id)?.select_option(label)?;
        recompute(config);
        Ok(())
    }

    /// Select a filter option by label and recompute (conditional parameters
    /// driven by the filter re-derive during the pass).
    pub fn select_filter(
        &mut self,
        variant: Variant,
        id: &ParameterId,
        label: &str,
    ) -> Result<(), ConfigError> {
        let config = self.configuration_mut(variant)?;
        Self::editable_check(config, id)?;
        config.parameter_mut(id)?.select_filter(label)?;
        recompute(config);
        Ok(())
    }

    /// Replace a calculation's formula and recompute.
    pub fn edit_formula(
        &mut self,
        variant: Variant,
        id: &CalculationId,
        formula: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let config = self.configuration_mut(variant)?;
        config.calculation_mut(id)?.formula = formula.into();
        debug!(variant = variant.label(), calculation = %id.0, "formula edited");
        recompute(config);
        Ok(())
    }

    /// Change a calculation's category and recompute.
    pub fn edit_category(
        &mut self,
        variant: Variant,
        id: &CalculationId,
        category: CalcCategory,
    ) -> Result<(), ConfigError> {
        let config = self.configuration_mut(variant)?;
        config.calculation_mut(id)?.category = category;
        recompute(config);
        Ok(())
    }

    /// The shared/unique partition for one panel. Compare mode only.
    pub fn partition(&self, panel: Panel) -> Result<ComparisonPartition, ConfigError> {
        let b = self
            .b
            .as_ref()
            .ok_or_else(|| ConfigError::VariantNotLoaded("B".to_string()))?;
        Ok(reconcile(&self.a, b, panel))
    }
}
