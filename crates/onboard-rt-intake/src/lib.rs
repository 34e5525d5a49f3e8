//! Request intake: turns heterogeneous inbound payloads into validated field sets.
//!
//! Callers hand over whatever arrived on the wire (a chat-completions body, A2A message
//! parts, a JSON string, or a plain sentence) wrapped in an [`InboundPayload`]. The
//! [`Normalizer`] resolves it against a [`FieldSchema`] and either returns
//! [`NormalizedFields`] with every field present or an [`IntakeError`] naming what is wrong.

pub mod error;
pub mod normalizer;
pub mod payload;
pub mod schema;
pub mod sentence;

pub use error::IntakeError;
pub use normalizer::{NormalizedFields, Normalizer};
pub use payload::InboundPayload;
pub use schema::{FieldSchema, SentenceMapping};
pub use sentence::{OnboardSentence, parse_onboard_sentence};
