pub mod config;
pub mod error;
pub mod output;

pub use config::Configuration;
pub use error::{ChartError, ChartErrorKind, Result, Stage};
