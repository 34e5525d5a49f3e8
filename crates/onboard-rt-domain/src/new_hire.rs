//! New hire: HR record plus in-process IT provisioning.

use crate::config::DomainConfig;
use crate::derive::normalize_title;
use crate::error::DomainError;
use crate::processor::{DomainProcessor, FromFields, RenderOutput, compact_json};
use crate::provisioning::{ProvisionResult, ProvisioningProcessor, ProvisioningRequest};
use crate::quick_hire::{EmployeeRecord, QuickHireProcessor};
use onboard_rt_intake::{FieldSchema, NormalizedFields, SentenceMapping};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHireRequest {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl NewHireRequest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl FromFields for NewHireRequest {
    const SCHEMA: FieldSchema = FieldSchema::new("new_hire", &["firstName", "lastName", "role"])
        .with_sentence(SentenceMapping::SplitName {
            first: "firstName",
            last: "lastName",
            role: "role",
        });

    fn from_fields(fields: &NormalizedFields) -> Result<Self, DomainError> {
        Ok(Self {
            first_name: fields.get("firstName").to_string(),
            last_name: fields.get("lastName").to_string(),
            role: fields.get("role").to_string(),
        })
    }

    fn subject(&self) -> String {
        self.full_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHireResult {
    pub hr: EmployeeRecord,
    pub it: ProvisionResult,
}

impl RenderOutput for NewHireResult {
    fn render_text(&self) -> String {
        compact_json(self)
    }
}

#[derive(Debug, Clone)]
pub struct NewHireProcessor {
    hr: QuickHireProcessor,
    it: ProvisioningProcessor,
}

impl NewHireProcessor {
    pub fn new(config: &DomainConfig) -> Self {
        Self {
            hr: QuickHireProcessor::new(config),
            it: ProvisioningProcessor::new(config),
        }
    }
}

impl DomainProcessor for NewHireProcessor {
    type Request = NewHireRequest;
    type Output = NewHireResult;

    fn process(&self, request: NewHireRequest) -> Result<NewHireResult, DomainError> {
        let hr = self
            .hr
            .create_record(&request.full_name(), &normalize_title(&request.role));
        let it = self.it.process(ProvisioningRequest {
            employee_id: hr.employee_id.clone(),
            full_name: hr.full_name.clone(),
            email: hr.email.clone(),
            job_title: hr.job_title.clone(),
        })?;
        Ok(NewHireResult { hr, it })
    }
}
