//! Static lookup tables for the extended onboarding workflow.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_ACCESS_GROUP: &str = "grp-basic";
pub const DEFAULT_MANAGER: &str = "HR Onboarding Team";
pub const DEFAULT_HARDWARE_PROFILE: &str = "standard-laptop";

/// Read-only tables mapping role, department and location to onboarding defaults.
///
/// Keys match case-insensitively; absent keys fall back to the table defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupTables {
    pub role_groups: BTreeMap<String, Vec<String>>,
    pub department_managers: BTreeMap<String, String>,
    pub location_hardware: BTreeMap<String, String>,
    pub default_groups: Vec<String>,
    pub default_manager: String,
    pub default_hardware: String,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self {
            role_groups: BTreeMap::new(),
            department_managers: BTreeMap::new(),
            location_hardware: BTreeMap::new(),
            default_groups: vec![DEFAULT_ACCESS_GROUP.to_string()],
            default_manager: DEFAULT_MANAGER.to_string(),
            default_hardware: DEFAULT_HARDWARE_PROFILE.to_string(),
        }
    }
}

impl LookupTables {
    pub fn with_role_groups<I, S>(mut self, role: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_groups
            .insert(role.into(), groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_department_manager(
        mut self,
        department: impl Into<String>,
        manager: impl Into<String>,
    ) -> Self {
        self.department_managers
            .insert(department.into(), manager.into());
        self
    }

    pub fn with_location_hardware(
        mut self,
        location: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        self.location_hardware
            .insert(location.into(), profile.into());
        self
    }

    pub fn groups_for_role(&self, role: &str) -> Vec<String> {
        find(&self.role_groups, role)
            .cloned()
            .unwrap_or_else(|| self.default_groups.clone())
    }

    pub fn manager_for_department(&self, department: &str) -> &str {
        find(&self.department_managers, department)
            .map(String::as_str)
            .unwrap_or(&self.default_manager)
    }

    pub fn hardware_for_location(&self, location: &str) -> &str {
        find(&self.location_hardware, location)
            .map(String::as_str)
            .unwrap_or(&self.default_hardware)
    }
}

fn find<'a, V>(table: &'a BTreeMap<String, V>, key: &str) -> Option<&'a V> {
    let key = key.trim();
    table
        .iter()
        .find(|(candidate, _)| candidate.trim().eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}
