//! IT provisioning: an employee record becomes a directory account.

use crate::config::DomainConfig;
use crate::derive::validate_email;
use crate::error::DomainError;
use crate::ids::IdGenerator;
use crate::processor::{DomainProcessor, FromFields, RenderOutput, compact_json};
use onboard_rt_core::{DirectoryUserId, EmployeeId};
use onboard_rt_intake::{FieldSchema, NormalizedFields};
use serde::{Deserialize, Serialize};

pub const PROVISION_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub job_title: String,
}

impl FromFields for ProvisioningRequest {
    const SCHEMA: FieldSchema = FieldSchema::new(
        "provisioning",
        &["employeeId", "fullName", "email", "jobTitle"],
    );

    fn from_fields(fields: &NormalizedFields) -> Result<Self, DomainError> {
        let email = fields.get("email");
        validate_email("email", email)?;
        Ok(Self {
            employee_id: EmployeeId::new(fields.get("employeeId")),
            full_name: fields.get("fullName").to_string(),
            email: email.to_string(),
            job_title: fields.get("jobTitle").to_string(),
        })
    }

    fn subject(&self) -> String {
        self.full_name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionResult {
    pub directory_user_id: DirectoryUserId,
    pub status: String,
}

impl RenderOutput for ProvisionResult {
    fn render_text(&self) -> String {
        compact_json(self)
    }
}

#[derive(Debug, Clone)]
pub struct ProvisioningProcessor {
    ids: IdGenerator,
}

impl ProvisioningProcessor {
    pub fn new(config: &DomainConfig) -> Self {
        Self {
            ids: config.id_generator(),
        }
    }
}

impl DomainProcessor for ProvisioningProcessor {
    type Request = ProvisioningRequest;
    type Output = ProvisionResult;

    fn process(&self, request: ProvisioningRequest) -> Result<ProvisionResult, DomainError> {
        tracing::debug!(employee_id = %request.employee_id, "provisioning directory account");
        Ok(ProvisionResult {
            directory_user_id: self.ids.directory_user_id(),
            status: PROVISION_SUCCESS.to_string(),
        })
    }
}
