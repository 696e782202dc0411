pub mod engine;
pub mod matcher;
pub mod processor;

pub use engine::search;
pub use matcher::NamePattern;
pub use processor::FileProcessor;
