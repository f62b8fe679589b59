pub mod cover_art;
pub mod draft;
pub mod extension;
pub mod genre;
pub mod ids;
pub mod media_file;
pub mod progress;
pub mod release;
pub mod release_type;
pub mod stage;
pub mod track;
pub mod validation;

pub use cover_art::{CoverArt, PreviewRef};
pub use draft::SubmissionDraft;
pub use extension::{MetadataBag, MetadataValue};
pub use genre::Genre;
pub use ids::{ArtistId, DraftId, ReleaseId, TrackId};
pub use media_file::MediaFile;
pub use progress::{UploadPhase, UploadProgress};
pub use release::ReleaseMetadata;
pub use release_type::ReleaseType;
pub use stage::Stage;
pub use track::{Track, TrackDuration};
pub use validation::{ValidationIssue, ValidationResult};
