// Core modules
pub mod audit;
pub mod error;
pub mod generate;
pub mod hooks;
pub mod params;
pub mod pipeline;
pub mod qa;
pub mod template;

// Re-export commonly used types
pub use error::{BakecheckError, Result};
pub use generate::{BakeOptions, BakeResult, Baker, GeneratedProject};
pub use params::ParameterSet;
pub use template::Template;
