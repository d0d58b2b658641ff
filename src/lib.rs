pub mod configuration;
pub mod error;
pub mod formula;
pub mod models;
pub mod ordering;
pub mod recompute;
pub mod reconcile;
pub mod session;
pub mod storage;

pub use configuration::Configuration;
pub use error::{ConfigError, FormulaError};
pub use models::{
    Access, CalcCategory, CalcStatus, Calculation, CalculationId, Category, ConditionalRule,
    DisplayType, DropdownOption, Parameter, ParameterId, SolutionId, UserInterface,
};
pub use ordering::EvaluationPlan;
pub use recompute::recompute;
pub use reconcile::{reconcile, ComparisonPartition, MatchedParameter, Panel};
pub use session::{Session, Variant};
pub use storage::{ConfigurationStore, StoreNotConfigured};
