use crate::shared::Result;
use crate::threat_detection::domain::ThreatDatabase;
use std::path::Path;

/// ThreatDatabaseRepository port for loading the threat database
pub trait ThreatDatabaseRepository {
    /// Loads and validates the database at `location`
    ///
    /// # Errors
    /// Returns an error if the database is missing, unreadable, or fails
    /// validation. A scan cannot proceed without it.
    fn load_database(&self, location: &Path) -> Result<ThreatDatabase>;
}
