pub mod cli;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod naming;
pub mod resources;

// Re-export main types for convenience
pub use cli::LoaderCommand;
pub use error::{LoadError, ResourceDownloadError};
pub use loader::{load_page, DownloadOutcome};
pub use naming::DerivedNames;
pub use resources::{CandidateResource, ResourceType};
