pub mod discovery;
pub mod file_sanitizer;
pub mod report;

pub use discovery::discover_candidates;
pub use file_sanitizer::{FileSanitizer, SanitizeStep};
pub use report::{FileOutcome, FileStatus, RunReport};
