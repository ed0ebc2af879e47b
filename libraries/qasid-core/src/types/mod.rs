mod ids;
mod modes;
mod progress;
mod track;

pub use ids::TrackId;
pub use modes::{RepeatMode, ViewMode};
pub use progress::{ProgressEntry, ProgressMap, FINISHED_RATIO, RESUME_MARGIN_MS};
pub use track::{AudioReference, Track};
