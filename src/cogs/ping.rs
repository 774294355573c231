//! Liveness check cog

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{CommandError, SetupError};
use crate::cogs::{Cog, CogContext, PING_UNIT};
use crate::domain::entities::{Message, Reply};

pub struct PingCog;

pub fn setup(_ctx: &Arc<CogContext>) -> Result<Arc<dyn Cog>, SetupError> {
    Ok(Arc::new(PingCog))
}

#[async_trait]
impl Cog for PingCog {
    fn unit_id(&self) -> &'static str {
        PING_UNIT
    }

    fn commands(&self) -> &'static [&'static str] {
        &["ping"]
    }

    async fn handle(&self, _message: &Message) -> Result<Reply, CommandError> {
        Ok(Reply::Text("Pong!".to_string()))
    }
}
