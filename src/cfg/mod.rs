pub mod config;
pub mod error;

pub use config::{ConfigSpec, OutputSpec, SourceSpec};
