//! Pure onboarding domain logic.
//!
//! Every processor here is deterministic apart from the identifiers minted by
//! [`IdGenerator`], performs no I/O, and is safe to call repeatedly.

pub mod config;
pub mod derive;
pub mod error;
pub mod ids;
pub mod lookup;
pub mod new_hire;
pub mod onboarding;
pub mod processor;
pub mod provisioning;
pub mod quick_hire;

pub use config::DomainConfig;
pub use derive::{normalize_title, synthesize_email};
pub use error::DomainError;
pub use ids::IdGenerator;
pub use lookup::LookupTables;
pub use new_hire::{NewHireProcessor, NewHireRequest, NewHireResult};
pub use onboarding::{OnboardingProcessor, OnboardingRecord, OnboardingRequest};
pub use processor::{DomainProcessor, FromFields, RenderOutput};
pub use provisioning::{ProvisionResult, ProvisioningProcessor, ProvisioningRequest};
pub use quick_hire::{EmployeeRecord, QuickHireProcessor, QuickHireRequest};
