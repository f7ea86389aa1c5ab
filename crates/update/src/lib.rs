//! Channel configuration update orchestration.
//!
//! Sequences the full update pipeline — fetch, transcode, mutate, diff,
//! sign, submit — for the three supported update kinds: channel creation,
//! anchor peer update and revocation list update.

mod errors;
mod mutator;
mod submit;
mod templates;
mod workflow;

pub use errors::{MutationError, UpdateError, WorkflowError, WorkflowPhase};
pub use mutator::{ConfigEdit, ConfigMutator};
pub use submit::{ConfigSource, HttpOrdererClient, OrdererClient, SubmissionClient};
pub use templates::{FileTemplateStore, TemplateStore};
pub use workflow::UpdateWorkflow;
