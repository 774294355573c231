//! Application services - Business logic orchestration

pub mod command_service;
pub mod lifecycle;

pub use command_service::CommandService;
pub use lifecycle::{Action, ActionOutcome, BatchReport, LifecycleManager, Wildcard};
