//! Named onboarding scenarios binding a schema, guidance and a processor.

use onboard_rt_core::OnboardError;
use onboard_rt_domain::{
    DomainConfig, DomainError, DomainProcessor, FromFields, NewHireProcessor, OnboardingProcessor,
    ProvisioningProcessor, QuickHireProcessor, RenderOutput,
};
use onboard_rt_intake::{FieldSchema, NormalizedFields};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const QUICK_HIRE_GUIDANCE: &str = "Please provide the onboarding request in the format:\n\
Onboard <Full Name> as <Job Title>\n\n\
Example: Onboard Sarah Williams as a Software Engineer";

pub const NEW_HIRE_GUIDANCE: &str = "Please provide firstName, lastName and role, \
or a request in the format:\nOnboard <Full Name> as <Role>\n\n\
Example: Onboard John Smith as an Analyst";

pub const PROVISIONING_GUIDANCE: &str =
    "Please provide a JSON object with employeeId, fullName, email and jobTitle.";

pub const ONBOARDING_GUIDANCE: &str = "Please provide a JSON object with firstName, lastName, \
email, role, department, location and startDate (YYYY-MM-DD).";

/// How a workflow's result is relayed to chat callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOutput {
    pub text: String,
    pub data: Value,
}

/// Object-safe view of a domain processor.
pub trait Workflow: Send + Sync {
    fn name(&self) -> &'static str;
    fn schema(&self) -> FieldSchema;
    fn guidance(&self) -> &'static str;
    fn output_format(&self) -> OutputFormat;

    /// Parse the fields into a typed request. Fails when they do not form one.
    fn prepare<'a>(
        &'a self,
        fields: &NormalizedFields,
    ) -> Result<Box<dyn PreparedRequest + 'a>, DomainError>;
}

/// A request parsed once, ready to be processed.
pub trait PreparedRequest: Send {
    /// Who the request is about, for progress messages.
    fn subject(&self) -> String;

    fn run(self: Box<Self>) -> Result<WorkflowOutput, DomainError>;
}

struct Parsed<'a, P: DomainProcessor> {
    processor: &'a P,
    request: P::Request,
}

impl<P> PreparedRequest for Parsed<'_, P>
where
    P: DomainProcessor,
    P::Request: Send,
{
    fn subject(&self) -> String {
        self.request.subject()
    }

    fn run(self: Box<Self>) -> Result<WorkflowOutput, DomainError> {
        let output = self.processor.process(self.request)?;
        Ok(WorkflowOutput {
            text: output.render_text(),
            data: output.to_data()?,
        })
    }
}

pub struct ProcessorWorkflow<P> {
    name: &'static str,
    guidance: &'static str,
    format: OutputFormat,
    processor: P,
}

impl<P: DomainProcessor> ProcessorWorkflow<P> {
    pub fn new(
        name: &'static str,
        guidance: &'static str,
        format: OutputFormat,
        processor: P,
    ) -> Self {
        Self {
            name,
            guidance,
            format,
            processor,
        }
    }
}

impl<P> Workflow for ProcessorWorkflow<P>
where
    P: DomainProcessor,
    P::Request: Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn schema(&self) -> FieldSchema {
        P::Request::SCHEMA
    }

    fn guidance(&self) -> &'static str {
        self.guidance
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn prepare<'a>(
        &'a self,
        fields: &NormalizedFields,
    ) -> Result<Box<dyn PreparedRequest + 'a>, DomainError> {
        let request = P::Request::from_fields(fields)?;
        Ok(Box::new(Parsed {
            processor: &self.processor,
            request,
        }))
    }
}

/// The workflows an agent can be configured to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowKind {
    /// Natural-language HR agent: full name and job title.
    #[default]
    #[serde(alias = "hr")]
    QuickHire,
    /// Chat HR agent that also provisions IT.
    NewHire,
    /// IT agent.
    #[serde(alias = "it")]
    Provisioning,
    /// Extended onboarding with lookups.
    Onboarding,
}

impl WorkflowKind {
    pub const ALL: [WorkflowKind; 4] = [
        WorkflowKind::QuickHire,
        WorkflowKind::NewHire,
        WorkflowKind::Provisioning,
        WorkflowKind::Onboarding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::QuickHire => "quick-hire",
            WorkflowKind::NewHire => "new-hire",
            WorkflowKind::Provisioning => "provisioning",
            WorkflowKind::Onboarding => "onboarding",
        }
    }

    pub fn build(self, config: &DomainConfig) -> Arc<dyn Workflow> {
        match self {
            WorkflowKind::QuickHire => Arc::new(ProcessorWorkflow::new(
                self.as_str(),
                QUICK_HIRE_GUIDANCE,
                OutputFormat::Text,
                QuickHireProcessor::new(config),
            )),
            WorkflowKind::NewHire => Arc::new(ProcessorWorkflow::new(
                self.as_str(),
                NEW_HIRE_GUIDANCE,
                OutputFormat::Json,
                NewHireProcessor::new(config),
            )),
            WorkflowKind::Provisioning => Arc::new(ProcessorWorkflow::new(
                self.as_str(),
                PROVISIONING_GUIDANCE,
                OutputFormat::Json,
                ProvisioningProcessor::new(config),
            )),
            WorkflowKind::Onboarding => Arc::new(ProcessorWorkflow::new(
                self.as_str(),
                ONBOARDING_GUIDANCE,
                OutputFormat::Text,
                OnboardingProcessor::new(config),
            )),
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowKind {
    type Err = OnboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quick-hire" | "hr" => Ok(WorkflowKind::QuickHire),
            "new-hire" => Ok(WorkflowKind::NewHire),
            "provisioning" | "it" => Ok(WorkflowKind::Provisioning),
            "onboarding" => Ok(WorkflowKind::Onboarding),
            other => Err(OnboardError::InvalidArgument(format!(
                "unknown agent kind {other:?}; expected one of quick-hire, new-hire, provisioning, onboarding"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_rt_intake::Normalizer;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn kinds_parse_from_aliases() {
        assert_eq!("hr".parse::<WorkflowKind>().unwrap(), WorkflowKind::QuickHire);
        assert_eq!("IT".parse::<WorkflowKind>().unwrap(), WorkflowKind::Provisioning);
        assert!("payroll".parse::<WorkflowKind>().is_err());
        for kind in WorkflowKind::ALL {
            assert_eq!(kind.as_str().parse::<WorkflowKind>().unwrap(), kind);
        }
    }

    #[test]
    fn workflow_exposes_processor_schema() {
        let workflow = WorkflowKind::NewHire.build(&DomainConfig::default());
        assert_eq!(workflow.schema().fields, &["firstName", "lastName", "role"]);
        assert_eq!(workflow.output_format(), OutputFormat::Json);

        let fields = Normalizer::new(workflow.schema())
            .normalize_value(json!({"firstName": "Ada", "lastName": "Lovelace", "role": "cto"}))
            .unwrap();
        let prepared = workflow.prepare(&fields).unwrap();
        assert_eq!(prepared.subject(), "Ada Lovelace");
        let output = prepared.run().unwrap();
        assert_eq!(output.data["hr"]["jobTitle"], json!("Cto"));
    }

    static PARSES: AtomicUsize = AtomicUsize::new(0);

    struct Greeting(String);

    impl FromFields for Greeting {
        const SCHEMA: FieldSchema = FieldSchema::new("greeting", &["name"]);

        fn from_fields(fields: &NormalizedFields) -> Result<Self, DomainError> {
            PARSES.fetch_add(1, Ordering::SeqCst);
            Ok(Greeting(fields.get("name").to_string()))
        }

        fn subject(&self) -> String {
            self.0.clone()
        }
    }

    #[derive(Serialize)]
    struct Greeted {
        name: String,
    }

    impl RenderOutput for Greeted {
        fn render_text(&self) -> String {
            format!("hello {}", self.name)
        }
    }

    struct Greeter;

    impl DomainProcessor for Greeter {
        type Request = Greeting;
        type Output = Greeted;

        fn process(&self, request: Greeting) -> Result<Greeted, DomainError> {
            Ok(Greeted { name: request.0 })
        }
    }

    #[test]
    fn fields_are_parsed_once_per_run() {
        let workflow =
            ProcessorWorkflow::new("greeting", "send a name", OutputFormat::Text, Greeter);
        let fields = Normalizer::new(workflow.schema())
            .normalize_value(json!({"name": "Ada"}))
            .unwrap();

        let prepared = workflow.prepare(&fields).unwrap();
        assert_eq!(prepared.subject(), "Ada");
        let output = prepared.run().unwrap();
        assert_eq!(output.text, "hello Ada");
        assert_eq!(output.data, json!({"name": "Ada"}));
        assert_eq!(PARSES.load(Ordering::SeqCst), 1);
    }
}
