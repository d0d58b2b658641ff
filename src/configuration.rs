//! Configuration: the ordered parameter + calculation set for one solution
//! variant.
//!
//! Parameters and calculations share one identifier namespace because both
//! can be referenced from formula text; insertion enforces uniqueness across
//! the whole configuration.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::models::{Calculation, CalculationId, DisplayType, Parameter, ParameterId};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    parameters: Vec<Parameter>,
    calculations: Vec<Calculation>,
}

impl Configuration {
    pub fn new() -> Self {
        Configuration::default()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn calculations(&self) -> &[Calculation] {
        &self.calculations
    }

    pub fn parameter(&self, id: &ParameterId) -> Option<&Parameter> {
        self.parameters.iter().find(|p| &p.id == id)
    }

    pub fn parameter_mut(&mut self, id: &ParameterId) -> Result<&mut Parameter, ConfigError> {
        self.parameters
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ConfigError::UnknownParameter(id.0.clone()))
    }

    pub fn calculation(&self, id: &CalculationId) -> Option<&Calculation> {
        self.calculations.iter().find(|c| &c.id == id)
    }

    pub fn calculation_mut(&mut self, id: &CalculationId) -> Result<&mut Calculation, ConfigError> {
        self.calculations
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ConfigError::UnknownCalculation(id.0.clone()))
    }

    fn identifier_taken(&self, id: &str) -> bool {
        self.parameters.iter().any(|p| p.id.0 == id)
            || self.calculations.iter().any(|c| c.id.0 == id)
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<(), ConfigError> {
        if self.identifier_taken(&parameter.id.0) {
            return Err(ConfigError::DuplicateIdentifier(parameter.id.0.clone()));
        }
        self.parameters.push(parameter);
        Ok(())
    }

    pub fn add_calculation(&mut self, calculation: Calculation) -> Result<(), ConfigError> {
        if self.identifier_taken(&calculation.id.0) {
            return Err(ConfigError::DuplicateIdentifier(calculation.id.0.clone()));
        }
        self.calculations.push(calculation);
        Ok(())
    }

    pub fn remove_parameter(&mut self, id: &ParameterId) -> Result<Parameter, ConfigError> {
        let index = self
            .parameters
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| ConfigError::UnknownParameter(id.0.clone()))?;
        Ok(self.parameters.remove(index))
    }

    pub fn remove_calculation(&mut self, id: &CalculationId) -> Result<Calculation, ConfigError> {
        let index = self
            .calculations
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ConfigError::UnknownCalculation(id.0.clone()))?;
        Ok(self.calculations.remove(index))
    }

    /// Re-derive every conditional parameter's value from its source
    /// filter's current selection. The first rule whose condition matches
    /// the selection supplies the value; no match (or a value string that is
    /// not a number) leaves the parameter's prior effective value.
    pub fn resolve_conditionals(&mut self) {
        let mut updates: Vec<(usize, f64)> = Vec::new();

        for (index, parameter) in self.parameters.iter().enumerate() {
            let DisplayType::Conditional { source, rules } = &parameter.display_type else {
                continue;
            };

            let selection = self
                .parameters
                .iter()
                .find(|p| &p.id == source)
                .and_then(|p| match &p.display_type {
                    DisplayType::Filter { selected, .. } => selected.clone(),
                    _ => None,
                });

            let Some(selection) = selection else {
                continue;
            };

            if let Some(rule) = rules.iter().find(|r| r.condition == selection) {
                if let Ok(value) = rule.value.trim().parse::<f64>() {
                    updates.push((index, value));
                }
            }
        }

        for (index, value) in updates {
            self.parameters[index].override_value = Some(value);
        }
    }

    /// Identifier → effective value for every parameter. Calculation results
    /// are layered on top of this map during a recompute pass.
    pub fn value_map(&self) -> HashMap<String, f64> {
        self.parameters
            .iter()
            .map(|p| (p.id.0.clone(), p.effective_value()))
            .collect()
    }

    /// Calculations marked as top-level deliverables for the comparison and
    /// report surface.
    pub fn output_calculations(&self) -> Vec<&Calculation> {
        self.calculations.iter().filter(|c| c.output).collect()
    }

    /// Calculations whose numeric result is shown to the end user.
    pub fn displayed_calculations(&self) -> Vec<&Calculation> {
        self.calculations
            .iter()
            .filter(|c| c.display_result)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalcCategory, ConditionalRule};

    #[test]
    fn test_add_and_lookup() {
        let mut config = Configuration::new();
        config
            .add_parameter(Parameter::new("utilization", "Utilization", 80.0))
            .unwrap();
        config
            .add_calculation(Calculation::new(
                "total_power",
                "Total Power",
                "utilization * 20",
                CalcCategory::Performance,
            ))
            .unwrap();

        assert!(config
            .parameter(&ParameterId("utilization".to_string()))
            .is_some());
        assert!(config
            .calculation(&CalculationId("total_power".to_string()))
            .is_some());
        assert_eq!(config.parameters().len(), 1);
        assert_eq!(config.calculations().len(), 1);
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let mut config = Configuration::new();
        config
            .add_parameter(Parameter::new("utilization", "Utilization", 80.0))
            .unwrap();

        let err = config
            .add_parameter(Parameter::new("utilization", "Other", 1.0))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateIdentifier(ref s) if s == "utilization"));

        // Calculations share the identifier namespace
        let err = config
            .add_calculation(Calculation::new(
                "utilization",
                "Shadowing",
                "1 + 1",
                CalcCategory::Financial,
            ))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateIdentifier(_)));
    }

    #[test]
    fn test_remove() {
        let mut config = Configuration::new();
        config
            .add_parameter(Parameter::new("x", "X", 1.0))
            .unwrap();

        let removed = config.remove_parameter(&ParameterId("x".to_string())).unwrap();
        assert_eq!(removed.name, "X");
        assert!(config.parameters().is_empty());

        let err = config
            .remove_parameter(&ParameterId("x".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownParameter(_)));
    }

    #[test]
    fn test_value_map_uses_effective_values() {
        let mut config = Configuration::new();
        let mut p = Parameter::new("x", "X", 10.0);
        p.set_override(25.0);
        config.add_parameter(p).unwrap();
        config
            .add_parameter(Parameter::new("y", "Y", 3.0))
            .unwrap();

        let map = config.value_map();
        assert!((map["x"] - 25.0).abs() < f64::EPSILON);
        assert!((map["y"] - 3.0).abs() < f64::EPSILON);
    }

    fn conditional_fixture() -> Configuration {
        let mut config = Configuration::new();

        let mut filter = Parameter::new("region", "Region", 0.0);
        filter.display_type = DisplayType::Filter {
            options: vec!["EU".to_string(), "US".to_string()],
            selected: None,
        };
        config.add_parameter(filter).unwrap();

        let mut price = Parameter::new("electricity_price", "Electricity Price", 0.10);
        price.display_type = DisplayType::Conditional {
            source: ParameterId("region".to_string()),
            rules: vec![
                ConditionalRule {
                    condition: "EU".to_string(),
                    value: "0.25".to_string(),
                },
                ConditionalRule {
                    condition: "US".to_string(),
                    value: "0.12".to_string(),
                },
            ],
        };
        config.add_parameter(price).unwrap();

        config
    }

    #[test]
    fn test_conditional_rule_first_match() {
        let mut config = conditional_fixture();

        config
            .parameter_mut(&ParameterId("region".to_string()))
            .unwrap()
            .select_filter("EU")
            .unwrap();
        config.resolve_conditionals();

        let price = config
            .parameter(&ParameterId("electricity_price".to_string()))
            .unwrap();
        assert!((price.effective_value() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_conditional_no_selection_keeps_default() {
        let mut config = conditional_fixture();
        config.resolve_conditionals();

        let price = config
            .parameter(&ParameterId("electricity_price".to_string()))
            .unwrap();
        assert!((price.effective_value() - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn test_conditional_no_matching_rule_keeps_prior_value() {
        let mut config = conditional_fixture();

        config
            .parameter_mut(&ParameterId("region".to_string()))
            .unwrap()
            .select_filter("EU")
            .unwrap();
        config.resolve_conditionals();

        // Switching to a selection without a rule keeps the last derived value
        if let DisplayType::Filter { options, selected } = &mut config
            .parameter_mut(&ParameterId("region".to_string()))
            .unwrap()
            .display_type
        {
            options.push("APAC".to_string());
            *selected = Some("APAC".to_string());
        }
        config.resolve_conditionals();

        let price = config
            .parameter(&ParameterId("electricity_price".to_string()))
            .unwrap();
        assert!((price.effective_value() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_conditional_unparsable_value_is_no_match() {
        let mut config = conditional_fixture();

        if let DisplayType::Conditional { rules, .. } = &mut config
            .parameter_mut(&ParameterId("electricity_price".to_string()))
            .unwrap()
            .display_type
        {
            rules[0].value = "not a number".to_string();
        }

        config
            .parameter_mut(&ParameterId("region".to_string()))
            .unwrap()
            .select_filter("EU")
            .unwrap();
        config.resolve_conditionals();

        let price = config
            .parameter(&ParameterId("electricity_price".to_string()))
            .unwrap();
        assert!((price.effective_value() - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn test_output_and_displayed_subsets() {
        let mut config = Configuration::new();
        let mut a = Calculation::new("a", "A", "1 + 1", CalcCategory::Financial);
        a.output = true;
        let mut b = Calculation::new("b", "B", "2 + 2", CalcCategory::Financial);
        b.display_result = false;
        config.add_calculation(a).unwrap();
        config.add_calculation(b).unwrap();

        assert_eq!(config.output_calculations().len(), 1);
        assert_eq!(config.displayed_calculations().len(), 1);
        assert_eq!(config.output_calculations()[0].id.0, "a");
        assert_eq!(config.displayed_calculations()[0].id.0, "a");
    }
}
