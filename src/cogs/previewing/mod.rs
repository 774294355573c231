//! Asset previewing cogs

pub mod icon;
