//! In-process extension table
//!
//! Owns the live cog instances and implements the [`ExtensionHost`] seam
//! the lifecycle manager drives. State lives only here, for the lifetime of
//! the process.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::info;

use super::{factory, Cog, CogContext};
use crate::application::errors::HostError;
use crate::domain::traits::ExtensionHost;

pub struct CogHost {
    ctx: Arc<CogContext>,
    table: RwLock<HashMap<String, Arc<dyn Cog>>>,
}

impl CogHost {
    pub fn new(ctx: Arc<CogContext>) -> Self {
        Self {
            ctx,
            table: RwLock::new(HashMap::new()),
        }
    }

    fn construct(&self, unit: &str) -> Result<Arc<dyn Cog>, HostError> {
        let factory = factory(unit).ok_or_else(|| HostError::Unknown(unit.to_string()))?;
        factory(&self.ctx).map_err(HostError::Setup)
    }

    pub fn is_loaded(&self, unit: &str) -> bool {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(unit)
    }

    /// The loaded cog claiming a command name, if any.
    pub fn cog_for_command(&self, command: &str) -> Option<Arc<dyn Cog>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|cog| cog.accepts(command))
            .cloned()
    }

    pub fn snapshot(&self) -> Vec<Arc<dyn Cog>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ExtensionHost for CogHost {
    async fn load(&self, unit: &str) -> Result<(), HostError> {
        if self.is_loaded(unit) {
            return Err(HostError::AlreadyLoaded(unit.to_string()));
        }

        // Construction runs setup code and may fail; nothing is inserted
        // until it succeeds.
        let cog = self.construct(unit)?;

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if table.contains_key(unit) {
            return Err(HostError::AlreadyLoaded(unit.to_string()));
        }
        table.insert(unit.to_string(), cog);
        info!("Loaded extension: {}", unit);
        Ok(())
    }

    async fn unload(&self, unit: &str) -> Result<(), HostError> {
        let removed = self
            .table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(unit);

        match removed {
            Some(cog) => {
                cog.on_unload();
                info!("Unloaded extension: {}", unit);
                Ok(())
            }
            None => Err(HostError::NotLoaded(unit.to_string())),
        }
    }

    async fn reload(&self, unit: &str) -> Result<(), HostError> {
        if !self.is_loaded(unit) {
            return Err(HostError::NotLoaded(unit.to_string()));
        }

        // The prior instance stays in place until the replacement is built;
        // a failed reload keeps the working state.
        let fresh = self.construct(unit)?;

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = table.insert(unit.to_string(), fresh) {
            old.on_unload();
        }
        info!("Reloaded extension: {}", unit);
        Ok(())
    }

    fn loaded(&self) -> BTreeSet<String> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
