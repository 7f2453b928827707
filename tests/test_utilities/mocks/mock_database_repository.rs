use lockwarden::prelude::*;
use std::path::Path;

/// Mock ThreatDatabaseRepository parsing an in-memory document
pub struct MockThreatDatabaseRepository {
    pub json: String,
}

impl MockThreatDatabaseRepository {
    pub fn new(json: &str) -> Self {
        Self {
            json: json.to_string(),
        }
    }
}

impl ThreatDatabaseRepository for MockThreatDatabaseRepository {
    fn load_database(&self, _location: &Path) -> Result<ThreatDatabase> {
        ThreatDatabase::parse(&self.json)
    }
}
