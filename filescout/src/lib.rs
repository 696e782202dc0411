pub mod cancel;
pub mod config;
pub mod content;
pub mod errors;
pub mod filters;
pub mod progress;
pub mod results;
pub mod search;
pub mod walker;

pub use cancel::CancellationToken;
pub use config::SearchOptions;
pub use errors::{SearchError, SearchResult};
pub use progress::{ProgressSink, SearchProgress};
pub use results::SearchMatch;
pub use search::search;
