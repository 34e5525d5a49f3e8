//! Extended onboarding with manager, access-group and hardware lookups.

use crate::config::DomainConfig;
use crate::derive::{normalize_title, synthesize_email, validate_email};
use crate::error::DomainError;
use crate::ids::IdGenerator;
use crate::lookup::LookupTables;
use crate::processor::{DomainProcessor, FromFields, RenderOutput};
use chrono::NaiveDate;
use onboard_rt_core::EmployeeId;
use onboard_rt_intake::{FieldSchema, NormalizedFields};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub location: String,
    pub start_date: NaiveDate,
}

impl FromFields for OnboardingRequest {
    const SCHEMA: FieldSchema = FieldSchema::new(
        "onboarding",
        &[
            "firstName",
            "lastName",
            "email",
            "role",
            "department",
            "location",
            "startDate",
        ],
    );

    fn from_fields(fields: &NormalizedFields) -> Result<Self, DomainError> {
        let email = fields.get("email");
        validate_email("email", email)?;

        let raw_date = fields.get("startDate");
        let start_date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|err| {
            DomainError::validation(
                "startDate",
                format!("{raw_date:?} is not a YYYY-MM-DD date ({err})"),
            )
        })?;

        Ok(Self {
            first_name: fields.get("firstName").to_string(),
            last_name: fields.get("lastName").to_string(),
            email: email.to_string(),
            role: fields.get("role").to_string(),
            department: fields.get("department").to_string(),
            location: fields.get("location").to_string(),
            start_date,
        })
    }

    fn subject(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRecord {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub personal_email: String,
    pub job_title: String,
    pub department: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub manager: String,
    pub access_groups: Vec<String>,
    pub hardware_profile: String,
}

impl RenderOutput for OnboardingRecord {
    fn render_text(&self) -> String {
        format!(
            "Onboarding complete for {}.\n\n\
             Employee ID: {}\n\
             Email: {}\n\
             Job Title: {}\n\
             Department: {}\n\
             Location: {}\n\
             Start Date: {}\n\
             Manager: {}\n\
             Access Groups: {}\n\
             Hardware: {}",
            self.full_name,
            self.employee_id,
            self.email,
            self.job_title,
            self.department,
            self.location,
            self.start_date.format(DATE_FORMAT),
            self.manager,
            self.access_groups.join(", "),
            self.hardware_profile
        )
    }
}

#[derive(Debug, Clone)]
pub struct OnboardingProcessor {
    email_domain: String,
    ids: IdGenerator,
    lookup: LookupTables,
}

impl OnboardingProcessor {
    pub fn new(config: &DomainConfig) -> Self {
        Self {
            email_domain: config.email_domain.clone(),
            ids: config.id_generator(),
            lookup: config.lookup.clone(),
        }
    }
}

impl DomainProcessor for OnboardingProcessor {
    type Request = OnboardingRequest;
    type Output = OnboardingRecord;

    fn process(&self, request: OnboardingRequest) -> Result<OnboardingRecord, DomainError> {
        let full_name = request.subject();
        let job_title = normalize_title(&request.role);
        Ok(OnboardingRecord {
            employee_id: self.ids.employee_id(),
            email: synthesize_email(&full_name, &self.email_domain),
            personal_email: request.email,
            access_groups: self.lookup.groups_for_role(&job_title),
            manager: self
                .lookup
                .manager_for_department(&request.department)
                .to_string(),
            hardware_profile: self
                .lookup
                .hardware_for_location(&request.location)
                .to_string(),
            full_name,
            job_title,
            department: request.department,
            location: request.location,
            start_date: request.start_date,
        })
    }
}
