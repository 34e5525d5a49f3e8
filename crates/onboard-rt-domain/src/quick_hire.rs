//! Quick hire: a full name and job title become an employee record.

use crate::config::DomainConfig;
use crate::derive::synthesize_email;
use crate::error::DomainError;
use crate::ids::IdGenerator;
use crate::processor::{DomainProcessor, FromFields, RenderOutput};
use onboard_rt_core::EmployeeId;
use onboard_rt_intake::{FieldSchema, NormalizedFields, SentenceMapping};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickHireRequest {
    pub full_name: String,
    pub job_title: String,
}

impl FromFields for QuickHireRequest {
    const SCHEMA: FieldSchema = FieldSchema::new("quick_hire", &["fullName", "jobTitle"])
        .with_sentence(SentenceMapping::FullName {
            name: "fullName",
            role: "jobTitle",
        });

    fn from_fields(fields: &NormalizedFields) -> Result<Self, DomainError> {
        Ok(Self {
            full_name: fields.get("fullName").to_string(),
            job_title: fields.get("jobTitle").to_string(),
        })
    }

    fn subject(&self) -> String {
        self.full_name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub job_title: String,
}

impl RenderOutput for EmployeeRecord {
    fn render_text(&self) -> String {
        format!(
            "Employee onboarded successfully!\n\n\
             Employee ID: {}\n\
             Full Name: {}\n\
             Email: {}\n\
             Job Title: {}",
            self.employee_id, self.full_name, self.email, self.job_title
        )
    }
}

/// Creates an employee record, keeping the job title as given.
#[derive(Debug, Clone)]
pub struct QuickHireProcessor {
    email_domain: String,
    ids: IdGenerator,
}

impl QuickHireProcessor {
    pub fn new(config: &DomainConfig) -> Self {
        Self {
            email_domain: config.email_domain.clone(),
            ids: config.id_generator(),
        }
    }

    pub(crate) fn create_record(&self, full_name: &str, job_title: &str) -> EmployeeRecord {
        let full_name = full_name.trim().to_string();
        EmployeeRecord {
            employee_id: self.ids.employee_id(),
            email: synthesize_email(&full_name, &self.email_domain),
            full_name,
            job_title: job_title.trim().to_string(),
        }
    }
}

impl DomainProcessor for QuickHireProcessor {
    type Request = QuickHireRequest;
    type Output = EmployeeRecord;

    fn process(&self, request: QuickHireRequest) -> Result<EmployeeRecord, DomainError> {
        Ok(self.create_record(&request.full_name, &request.job_title))
    }
}
