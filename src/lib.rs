//! glyph-bot - an emoji and asset preview bot with runtime-managed extensions

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod cogs;
