use crate::configuration::Configuration;
use crate::models::SolutionId;

/// Collaborator boundary for persistence. The engine assumes a fully
/// materialized configuration before any evaluation begins; loads and saves
/// are whole snapshots, never deltas. Formula text and category/level fields
/// round-trip as opaque data.
pub trait ConfigurationStore {
    fn load_configuration(&self, solution: &SolutionId) -> Result<Option<Configuration>, String>;
    fn save_configuration(
        &mut self,
        solution: &SolutionId,
        configuration: &Configuration,
    ) -> Result<(), String>;
    fn list_solutions(&self) -> Result<Vec<SolutionId>, String>;
}

#[derive(Debug)]
pub struct StoreNotConfigured;

impl std::fmt::Display for StoreNotConfigured {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration store not configured")
    }
}

impl std::error::Error for StoreNotConfigured {}
