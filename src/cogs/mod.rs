//! Bot extensions ("cogs")
//!
//! Each cog is an independently loadable unit identified by a dotted path.
//! The known set is enumerated once at process start from the factory table;
//! loaded state is owned by the [`host::CogHost`].

pub mod host;

pub mod emoji;
pub mod ping;
pub mod previewing;
pub mod utils;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::{Lazy, OnceCell};

use crate::application::errors::{BotError, CommandError, SetupError};
use crate::application::services::LifecycleManager;
use crate::domain::entities::{Message, Reply};
use crate::infrastructure::config::Config;

pub use host::CogHost;

/// Common root of every unit id; stripped when deriving display categories.
pub const UNIT_ROOT: &str = "glyph.exts";

pub const TWEMOJI_UNIT: &str = "glyph.exts.emojis.twemoji";
pub const NOTO_UNIT: &str = "glyph.exts.emojis.noto";
pub const ICON_UNIT: &str = "glyph.exts.previewing.icon";
pub const MANAGER_UNIT: &str = "glyph.exts.utils.extensions";
pub const PING_UNIT: &str = "glyph.exts.ping";

/// Units that must never be unloaded. Losing the management cog would cut
/// off the ability to recover at runtime.
static UNLOAD_DENYLIST: Lazy<BTreeSet<String>> =
    Lazy::new(|| [MANAGER_UNIT.to_string()].into());

/// A loadable bot extension.
#[async_trait]
pub trait Cog: Send + Sync {
    /// The unit id this cog is enumerated under.
    fn unit_id(&self) -> &'static str;

    /// Command names, including aliases, this cog responds to.
    fn commands(&self) -> &'static [&'static str];

    /// Handle a command message addressed to this cog.
    async fn handle(&self, message: &Message) -> Result<Reply, CommandError>;

    /// Teardown hook, called when the cog is unloaded.
    fn on_unload(&self) {}

    fn accepts(&self, command: &str) -> bool {
        self.commands()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(command))
    }
}

/// Shared dependencies handed to cog factories.
///
/// The lifecycle manager is published after construction (it needs the host,
/// which needs this context); factories that depend on it fail setup when it
/// has not been set.
pub struct CogContext {
    pub config: Config,
    pub http: reqwest::Client,
    manager: OnceCell<Arc<LifecycleManager>>,
}

impl CogContext {
    pub fn new(config: Config) -> Result<Self, BotError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.assets.download_timeout_secs))
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;
        Ok(Self {
            config,
            http,
            manager: OnceCell::new(),
        })
    }

    pub fn set_manager(&self, manager: Arc<LifecycleManager>) {
        let _ = self.manager.set(manager);
    }

    pub fn manager(&self) -> Option<Arc<LifecycleManager>> {
        self.manager.get().cloned()
    }
}

/// Constructor for a cog instance; invoked by the host on every load.
pub type CogFactory = fn(&Arc<CogContext>) -> Result<Arc<dyn Cog>, SetupError>;

static FACTORIES: Lazy<BTreeMap<&'static str, CogFactory>> = Lazy::new(|| {
    BTreeMap::from([
        (TWEMOJI_UNIT, emoji::twemoji::setup as CogFactory),
        (NOTO_UNIT, emoji::noto::setup as CogFactory),
        (ICON_UNIT, previewing::icon::setup as CogFactory),
        (MANAGER_UNIT, utils::extensions::setup as CogFactory),
        (PING_UNIT, ping::setup as CogFactory),
    ])
});

/// The fixed known-unit set, enumerated once at process start.
static EXTENSIONS: Lazy<BTreeSet<String>> =
    Lazy::new(|| FACTORIES.keys().map(|unit| unit.to_string()).collect());

pub fn known_units() -> &'static BTreeSet<String> {
    &EXTENSIONS
}

pub fn unload_denylist() -> &'static BTreeSet<String> {
    &UNLOAD_DENYLIST
}

/// Number of path segments the unit root occupies.
pub fn root_depth() -> usize {
    UNIT_ROOT.split('.').count()
}

pub(crate) fn factory(unit: &str) -> Option<CogFactory> {
    FACTORIES.get(unit).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_unit_sits_under_the_root() {
        for unit in known_units() {
            assert!(unit.starts_with("glyph.exts."), "unit {} escapes the root", unit);
        }
    }

    #[test]
    fn denylist_is_a_subset_of_the_known_units() {
        for unit in unload_denylist() {
            assert!(known_units().contains(unit));
        }
    }
}
