//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod host;

pub use bot::{Bot, BotInfo};
pub use host::ExtensionHost;
