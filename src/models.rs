//! Plain data model for parameters, calculations, and their metadata.
//!
//! All types here are inert data: mutation policy (uniqueness, recompute
//! triggers) lives in `configuration` and `session`.

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculationId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolutionId(pub String);

/// Group label for UI partitioning; the color tag is display-only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Category {
    pub name: String,
    pub color: Option<String>,
}

impl Category {
    pub fn named(name: impl Into<String>) -> Self {
        Category {
            name: name.into(),
            color: None,
        }
    }
}

/// Whether end users may edit a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Access {
    Input,
    Static,
    NotViewable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserInterface {
    pub access: Access,
    pub is_advanced: bool,
}

impl Default for UserInterface {
    fn default() -> Self {
        UserInterface {
            access: Access::Input,
            is_advanced: false,
        }
    }
}

/// One option of a dropdown parameter: a label shown to the user and the
/// numeric value it stands for.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropdownOption {
    pub label: String,
    pub value: f64,
}

/// One rule of a conditional parameter, matched against a filter parameter's
/// current selection. The value round-trips as an opaque string.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalRule {
    pub condition: String,
    pub value: String,
}

/// Input widget semantics for a parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayType {
    /// Free numeric entry.
    Simple,
    /// Bounded numeric entry; committed values clamp to the nearest bound.
    Range { min: Option<f64>, max: Option<f64> },
    /// Closed set of named options carrying stored values.
    Dropdown {
        options: Vec<DropdownOption>,
        selected: Option<String>,
    },
    /// Closed set driving conditional rules; carries no arithmetic value of
    /// its own beyond the parameter default.
    Filter {
        options: Vec<String>,
        selected: Option<String>,
    },
    /// Value derived by matching rules against a filter parameter's selection.
    Conditional {
        /// Identifier of the driving filter parameter.
        source: ParameterId,
        rules: Vec<ConditionalRule>,
    },
}

/// A named, user- or author-settable input value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub id: ParameterId,
    pub name: String,
    pub default_value: f64,
    pub override_value: Option<f64>,
    pub unit: Option<String>,
    pub display_type: DisplayType,
    pub category: Category,
    pub is_unified: bool,
    pub user_interface: UserInterface,
}

impl Parameter {
    pub fn new(id: impl Into<String>, name: impl Into<String>, default_value: f64) -> Self {
        Parameter {
            id: ParameterId(id.into()),
            name: name.into(),
            default_value,
            override_value: None,
            unit: None,
            display_type: DisplayType::Simple,
            category: Category::named("Global"),
            is_unified: false,
            user_interface: UserInterface::default(),
        }
    }

    /// The override value if present, else the default. Range parameters
    /// clamp the result, so an author-set default outside the bounds still
    /// reads back in range.
    pub fn effective_value(&self) -> f64 {
        self.clamp(self.override_value.unwrap_or(self.default_value))
    }

    /// Clamp a candidate value to the range bounds, if this is a range
    /// parameter with bounds set. Idempotent and monotonic.
    pub fn clamp(&self, value: f64) -> f64 {
        if let DisplayType::Range { min, max } = &self.display_type {
            let mut v = value;
            if let Some(min) = min {
                if v < *min {
                    v = *min;
                }
            }
            if let Some(max) = max {
                if v > *max {
                    v = *max;
                }
            }
            v
        } else {
            value
        }
    }

    /// Commit an override value, clamping range parameters to the nearest
    /// bound. Silent correction, never rejection.
    pub fn set_override(&mut self, value: f64) {
        self.override_value = Some(self.clamp(value));
    }

    pub fn clear_override(&mut self) {
        self.override_value = None;
    }

    /// Select a dropdown option by label; the option's stored value becomes
    /// the override.
    pub fn select_option(&mut self, label: &str) -> Result<(), ConfigError> {
        let value = match &mut self.display_type {
            DisplayType::Dropdown { options, selected } => {
                let option = options.iter().find(|o| o.label == label).ok_or_else(|| {
                    ConfigError::InvalidSelection {
                        parameter: self.id.0.clone(),
                        message: format!("no dropdown option '{}'", label),
                    }
                })?;
                let value = option.value;
                *selected = Some(label.to_string());
                value
            }
            _ => {
                return Err(ConfigError::InvalidSelection {
                    parameter: self.id.0.clone(),
                    message: "not a dropdown parameter".to_string(),
                })
            }
        };
        self.override_value = Some(value);
        Ok(())
    }

    /// Select a filter option by label. Filters carry no arithmetic value;
    /// the selection drives conditional parameters.
    pub fn select_filter(&mut self, label: &str) -> Result<(), ConfigError> {
        match &mut self.display_type {
            DisplayType::Filter { options, selected } => {
                if !options.iter().any(|o| o == label) {
                    return Err(ConfigError::InvalidSelection {
                        parameter: self.id.0.clone(),
                        message: format!("no filter option '{}'", label),
                    });
                }
                *selected = Some(label.to_string());
                Ok(())
            }
            _ => Err(ConfigError::InvalidSelection {
                parameter: self.id.0.clone(),
                message: "not a filter parameter".to_string(),
            }),
        }
    }
}

/// Category of a calculation; infers its display level when no explicit
/// level is authored.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalcCategory {
    Financial,
    Performance,
    Efficiency,
    Operational,
    Custom(String),
}

impl CalcCategory {
    /// Coarse level heuristic. Evaluation order comes from the dependency
    /// graph; this value only groups calculations and breaks ordering ties.
    pub fn default_level(&self) -> u32 {
        match self {
            CalcCategory::Financial => 1,
            CalcCategory::Performance | CalcCategory::Efficiency => 2,
            CalcCategory::Operational => 3,
            CalcCategory::Custom(_) => 1,
        }
    }
}

/// Evaluation status of a calculation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalcStatus {
    /// Before first evaluation.
    Pending,
    /// Last evaluation produced a finite number.
    Valid,
    /// Last evaluation failed; carries a human-readable reason for inline
    /// rendering.
    Error(String),
}

impl CalcStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, CalcStatus::Valid)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CalcStatus::Error(_))
    }
}

/// A named, formula-derived output value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calculation {
    pub id: CalculationId,
    pub name: String,
    pub formula: String,
    pub category: CalcCategory,
    /// Explicit author tier; inferred from the category when absent.
    pub level: Option<u32>,
    pub result: Option<f64>,
    pub status: CalcStatus,
    /// Exposed to the comparison/report surface.
    pub output: bool,
    /// Shown to the end user at all.
    pub display_result: bool,
}

impl Calculation {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        formula: impl Into<String>,
        category: CalcCategory,
    ) -> Self {
        Calculation {
            id: CalculationId(id.into()),
            name: name.into(),
            formula: formula.into(),
            category,
            level: None,
            result: None,
            status: CalcStatus::Pending,
            output: false,
            display_result: true,
        }
    }

    pub fn effective_level(&self) -> u32 {
        self.level.unwrap_or_else(|| self.category.default_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_value() {
        let mut p = Parameter::new("utilization", "Utilization", 80.0);
        assert!((p.effective_value() - 80.0).abs() < f64::EPSILON);

        p.set_override(65.0);
        assert!((p.effective_value() - 65.0).abs() < f64::EPSILON);

        p.clear_override();
        assert!((p.effective_value() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_range_clamping() {
        let mut p = Parameter::new("utilization", "Utilization", 80.0);
        p.display_type = DisplayType::Range {
            min: Some(0.0),
            max: Some(100.0),
        };

        p.set_override(150.0);
        assert!((p.effective_value() - 100.0).abs() < f64::EPSILON);

        p.set_override(-10.0);
        assert!((p.effective_value() - 0.0).abs() < f64::EPSILON);

        // In-range values commit unchanged
        p.set_override(42.0);
        assert!((p.effective_value() - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_default_is_clamped() {
        let mut p = Parameter::new("utilization", "Utilization", 150.0);
        p.display_type = DisplayType::Range {
            min: Some(0.0),
            max: Some(100.0),
        };

        // The author-set default sits above the bound; reads stay in range.
        assert!((p.effective_value() - 100.0).abs() < f64::EPSILON);

        p.set_override(50.0);
        assert!((p.effective_value() - 50.0).abs() < f64::EPSILON);

        // Clearing the override falls back to the clamped default, not 150
        p.clear_override();
        assert!((p.effective_value() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_idempotent() {
        let mut p = Parameter::new("x", "X", 0.0);
        p.display_type = DisplayType::Range {
            min: Some(10.0),
            max: Some(20.0),
        };

        let once = p.clamp(35.0);
        assert!((p.clamp(once) - once).abs() < f64::EPSILON);
        assert!((p.clamp(15.0) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_only_applies_to_range() {
        let p = Parameter::new("x", "X", 0.0);
        assert!((p.clamp(1e12) - 1e12).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dropdown_selection() {
        let mut p = Parameter::new("cooling_type", "Cooling Type", 1.0);
        p.display_type = DisplayType::Dropdown {
            options: vec![
                DropdownOption {
                    label: "Air-cooled".to_string(),
                    value: 1.0,
                },
                DropdownOption {
                    label: "Water-cooled".to_string(),
                    value: 2.0,
                },
            ],
            selected: None,
        };

        p.select_option("Water-cooled").unwrap();
        assert!((p.effective_value() - 2.0).abs() < f64::EPSILON);

        let err = p.select_option("Oil-cooled").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelection { .. }));
    }

    #[test]
    fn test_filter_selection() {
        let mut p = Parameter::new("region", "Region", 0.0);
        p.display_type = DisplayType::Filter {
            options: vec!["EU".to_string(), "US".to_string()],
            selected: None,
        };

        p.select_filter("EU").unwrap();
        assert!(matches!(
            &p.display_type,
            DisplayType::Filter { selected: Some(s), .. } if s == "EU"
        ));

        assert!(p.select_filter("APAC").is_err());

        // Selecting on a non-filter parameter is rejected
        let mut simple = Parameter::new("x", "X", 0.0);
        assert!(simple.select_filter("EU").is_err());
    }

    #[test]
    fn test_category_default_level() {
        assert_eq!(CalcCategory::Financial.default_level(), 1);
        assert_eq!(CalcCategory::Performance.default_level(), 2);
        assert_eq!(CalcCategory::Efficiency.default_level(), 2);
        assert_eq!(CalcCategory::Operational.default_level(), 3);
        assert_eq!(CalcCategory::Custom("misc".to_string()).default_level(), 1);
    }

    #[test]
    fn test_effective_level() {
        let mut c = Calculation::new("tco", "Total Cost", "capex + opex", CalcCategory::Financial);
        assert_eq!(c.effective_level(), 1);

        c.level = Some(4);
        assert_eq!(c.effective_level(), 4);
    }

    #[test]
    fn test_new_calculation_is_pending() {
        let c = Calculation::new("tco", "Total Cost", "capex + opex", CalcCategory::Financial);
        assert_eq!(c.status, CalcStatus::Pending);
        assert!(c.result.is_none());
        assert!(!c.output);
        assert!(c.display_result);
    }
}
