//! Extension host trait - the narrow seam over the host-owned plugin table

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::application::errors::HostError;

/// The runtime that owns the extension load table.
///
/// Extension state lives entirely behind this trait: callers read it with
/// [`loaded`](ExtensionHost::loaded) at the start of an invocation and never
/// cache it across invocations. Load hooks may run arbitrary extension setup
/// code, so every mutating operation is async and may suspend the caller.
#[async_trait]
pub trait ExtensionHost: Send + Sync {
    /// Load an extension by its unit id.
    async fn load(&self, unit: &str) -> Result<(), HostError>;

    /// Unload an extension by its unit id.
    async fn unload(&self, unit: &str) -> Result<(), HostError>;

    /// Reload an extension by its unit id.
    ///
    /// Fails with [`HostError::NotLoaded`] when the unit is not currently
    /// loaded; callers decide whether that is fatal.
    async fn reload(&self, unit: &str) -> Result<(), HostError>;

    /// Snapshot of the unit ids currently loaded.
    fn loaded(&self) -> BTreeSet<String>;
}
