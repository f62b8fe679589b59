pub mod draft_cache;
pub mod media_checks;
pub mod submission_flow;
pub mod submission_validator;
pub mod upload_orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use draft_cache::{DEFAULT_DRAFT_KEY, DEFAULT_QUIET_WINDOW, DraftCache};
pub use media_checks::{AudioDurationExtractor, ImageCheck, ImageDimensionValidator};
pub use submission_flow::SubmissionFlow;
pub use submission_validator::{SubmissionValidator, ValidationRules, stage_issues, validate_draft};
pub use upload_orchestrator::{
  DEFAULT_BATCH_TIMEOUT, SubmissionContext, SubmissionReceipt, UploadFailure, UploadOrchestrator,
};
