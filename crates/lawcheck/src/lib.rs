pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use workflows::checklist::{Checklist, ChecklistReport, CreditPolicy};
