use onboard_rt_core::{DirectoryUserId, EmployeeId};
use uuid::Uuid;

pub const DEFAULT_EMPLOYEE_PREFIX: &str = "E-";
pub const DEFAULT_DIRECTORY_PREFIX: &str = "dir-";

const EMPLOYEE_SUFFIX_LEN: usize = 8;
const DIRECTORY_SUFFIX_LEN: usize = 10;

/// Mints employee and directory identifiers from fresh v4 UUIDs.
///
/// Identifiers are unique per call; identical requests never share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    employee_prefix: String,
    directory_prefix: String,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_EMPLOYEE_PREFIX, DEFAULT_DIRECTORY_PREFIX)
    }
}

impl IdGenerator {
    pub fn new(employee_prefix: impl Into<String>, directory_prefix: impl Into<String>) -> Self {
        Self {
            employee_prefix: employee_prefix.into(),
            directory_prefix: directory_prefix.into(),
        }
    }

    /// `E-` followed by 8 uppercase hex digits.
    pub fn employee_id(&self) -> EmployeeId {
        let suffix = random_hex(EMPLOYEE_SUFFIX_LEN).to_uppercase();
        EmployeeId::new(format!("{}{suffix}", self.employee_prefix))
    }

    /// `dir-` followed by 10 lowercase hex digits.
    pub fn directory_user_id(&self) -> DirectoryUserId {
        let suffix = random_hex(DIRECTORY_SUFFIX_LEN);
        DirectoryUserId::new(format!("{}{suffix}", self.directory_prefix))
    }
}

// The leading 12 hex digits of a v4 UUID are all random.
fn random_hex(len: usize) -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(len);
    hex
}
