//! API endpoint implementations, grouped by app type.

mod app;
mod audio;
mod chat;
mod files;
mod workflows;

pub use app::AppApi;
pub use audio::AudioApi;
pub use chat::ChatApi;
pub use files::FilesApi;
pub use workflows::WorkflowsApi;
