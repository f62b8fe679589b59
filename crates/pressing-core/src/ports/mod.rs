pub mod draft_store;
pub mod media;
pub mod progress;
pub mod remote;

pub use draft_store::{DraftStore, StoreError};
pub use media::{MediaError, MediaProbe, PixelSize};
pub use progress::ProgressReporter;
pub use remote::{
  ArtistRecord, NewReleaseRecord, NewTrackRecord, ReleaseRecords, RemoteError, RemoteStorage, StoredLocations,
  UploadBatch,
};
