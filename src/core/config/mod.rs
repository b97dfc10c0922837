pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, CompletionSettings, RetrievalSettings, ServerSettings};
