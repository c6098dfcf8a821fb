pub mod chart;
pub mod core;

pub use crate::chart::{ChartConfig, ChartResult};
pub use crate::core::Configuration;
pub use crate::core::error::{ChartError, ChartErrorKind, Result, Stage};
