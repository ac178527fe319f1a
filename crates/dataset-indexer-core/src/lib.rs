pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod shape;

pub use config::{AppConfig, ScanOptions};
pub use engine::{IndexEngine, ScanResult};
pub use error::Error;
pub use model::{DatasetIndex, EchoEntry, SummaryRow};
pub use progress::{ScanReporter, SilentReporter};
pub use scanner::{scan_address, ScanOutcome};
