use crate::ids::{DEFAULT_DIRECTORY_PREFIX, DEFAULT_EMPLOYEE_PREFIX, IdGenerator};
use crate::lookup::LookupTables;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMAIL_DOMAIN: &str = "example.com";

/// Immutable inputs shared by every processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainConfig {
    pub email_domain: String,
    pub employee_id_prefix: String,
    pub directory_id_prefix: String,
    pub lookup: LookupTables,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            employee_id_prefix: DEFAULT_EMPLOYEE_PREFIX.to_string(),
            directory_id_prefix: DEFAULT_DIRECTORY_PREFIX.to_string(),
            lookup: LookupTables::default(),
        }
    }
}

impl DomainConfig {
    pub fn with_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.email_domain = domain.into();
        self
    }

    pub fn with_lookup(mut self, lookup: LookupTables) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn id_generator(&self) -> IdGenerator {
        IdGenerator::new(&self.employee_id_prefix, &self.directory_id_prefix)
    }
}
