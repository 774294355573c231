//! Noto emoji preview cog

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{CommandError, SetupError};
use crate::cogs::{Cog, CogContext, NOTO_UNIT};
use crate::domain::entities::{Embed, Message, Reply};
use crate::infrastructure::assets::codepoints::{
    codepoint_from_input, display_name, emoji_for_codepoints,
};
use crate::infrastructure::assets::sources::{noto_url, AssetFormat, NotoSize};

/// Utilities for working with Noto emojis.
pub struct NotoCog;

pub fn setup(_ctx: &Arc<CogContext>) -> Result<Arc<dyn Cog>, SetupError> {
    Ok(Arc::new(NotoCog))
}

impl NotoCog {
    /// The main embed for the `noto` command.
    fn build_embed(codepoint: &str) -> Embed {
        let emoji = emoji_for_codepoints(codepoint);
        let title = display_name(&emoji).unwrap_or_else(|| "Unknown emoji".to_string());

        Embed::info()
            .with_title(title)
            .with_description(format!(
                "{}\n[Download svg]({})",
                codepoint.replace('-', " "),
                noto_url(codepoint, AssetFormat::Svg, NotoSize::S128)
            ))
            .with_thumbnail(noto_url(codepoint, AssetFormat::Png, NotoSize::S128))
    }
}

#[async_trait]
impl Cog for NotoCog {
    fn unit_id(&self) -> &'static str {
        NOTO_UNIT
    }

    fn commands(&self) -> &'static [&'static str] {
        &["noto", "noto_emoji"]
    }

    async fn handle(&self, message: &Message) -> Result<Reply, CommandError> {
        let raw = message.args().join(" ");
        let codepoint = codepoint_from_input(&raw).map_err(|_| {
            CommandError::InvalidArgs("please include a valid emoji or emoji codepoint.".to_string())
        })?;
        Ok(Reply::Embed(Self::build_embed(&codepoint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn previews_component_codepoints() {
        let cog = NotoCog;
        let msg = Message::from_command(
            "chat",
            "noto",
            vec!["1f1f8".to_string(), "1f1ea".to_string()],
        );
        let Reply::Embed(embed) = cog.handle(&msg).await.unwrap() else {
            panic!("expected an embed");
        };
        assert_eq!(
            embed.thumbnail_url.as_deref(),
            Some("https://raw.githubusercontent.com/googlefonts/noto-emoji/main/png/128/emoji_u1f1f8_1f1ea.png")
        );
        assert!(embed.description.unwrap().contains("1f1f8 1f1ea"));
    }
}
