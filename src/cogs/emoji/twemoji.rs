//! Twemoji preview cog

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{CommandError, SetupError};
use crate::cogs::{Cog, CogContext, TWEMOJI_UNIT};
use crate::domain::entities::{Embed, Message, Reply};
use crate::infrastructure::assets::codepoints::{
    codepoint_from_input, display_name, emoji_for_codepoints,
};
use crate::infrastructure::assets::sources::{twemoji_url, AssetFormat};

/// Utilities for working with Twemojis.
pub struct TwemojiCog;

pub fn setup(_ctx: &Arc<CogContext>) -> Result<Arc<dyn Cog>, SetupError> {
    Ok(Arc::new(TwemojiCog))
}

impl TwemojiCog {
    /// The main embed for the `twemoji` command.
    fn build_embed(codepoint: &str) -> Embed {
        let emoji = emoji_for_codepoints(codepoint);
        let title = display_name(&emoji).unwrap_or_else(|| "Unknown emoji".to_string());

        Embed::info()
            .with_title(title)
            .with_description(format!(
                "{}\n[Download svg]({})",
                codepoint.replace('-', " "),
                twemoji_url(codepoint, AssetFormat::Svg)
            ))
            .with_thumbnail(twemoji_url(codepoint, AssetFormat::Png))
    }
}

#[async_trait]
impl Cog for TwemojiCog {
    fn unit_id(&self) -> &'static str {
        TWEMOJI_UNIT
    }

    fn commands(&self) -> &'static [&'static str] {
        &["twemoji"]
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
    async fn previews_an_emoji_glyph() {
        let cog = TwemojiCog;
        let msg = Message::from_command("chat", "twemoji", vec!["\u{1f40d}".to_string()]);
        let Reply::Embed(embed) = cog.handle(&msg).await.unwrap() else {
            panic!("expected an embed");
        };
        assert_eq!(embed.title.as_deref(), Some("Snake"));
        assert_eq!(
            embed.thumbnail_url.as_deref(),
            Some("https://raw.githubusercontent.com/twitter/twemoji/master/assets/72x72/1f40d.png")
        );
        assert!(embed.description.unwrap().contains("1f40d"));
    }

    #[tokio::test]
    async fn rejects_non_emoji_input() {
        let cog = TwemojiCog;
        let msg = Message::from_command("chat", "twemoji", vec!["hello".to_string()]);
        assert!(matches!(
            cog.handle(&msg).await,
            Err(CommandError::InvalidArgs(_))
        ));
    }
}
