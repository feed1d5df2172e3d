// Library crate - exports the session calculator and its building blocks

pub mod types;
pub mod config;
pub mod bars;
pub mod session;

// Re-export commonly used types
pub use types::*;
pub use config::CalculatorConfig;
pub use session::{BarOutput, SessionCalculator};
