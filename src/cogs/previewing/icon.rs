//! Server icon preview cog
//!
//! Downloads an image, composites it onto a light or dark chat background,
//! and renders it at the three places an icon shows up in a server list.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};

use crate::application::errors::{CommandError, SetupError};
use crate::cogs::{Cog, CogContext, ICON_UNIT};
use crate::domain::entities::{Message, Reply};
use crate::infrastructure::assets::imaging::{
    add_background, download_image, filename_from_url, write_image, OutputFormat,
};

const ICON_SIZE: u32 = 48;
const ICON_POSITIONS: [(i64, i64); 3] = [(12, 42), (94, 42), (176, 42)];
const TRAY_WIDTH: u32 = 236;
const TRAY_HEIGHT: u32 = 132;

pub struct IconPreviewCog {
    http: reqwest::Client,
    output_dir: PathBuf,
}

pub fn setup(ctx: &Arc<CogContext>) -> Result<Arc<dyn Cog>, SetupError> {
    Ok(Arc::new(IconPreviewCog {
        http: ctx.http.clone(),
        output_dir: ctx.config.assets.output_dir.clone(),
    }))
}

impl IconPreviewCog {
    /// Background colour for the given display mode.
    fn background_color(mode: &str) -> Result<Rgba<u8>, CommandError> {
        match mode {
            "dark" => Ok(Rgba([0x20, 0x22, 0x25, 0xff])),
            "light" => Ok(Rgba([0xe2, 0xe5, 0xe8, 0xff])),
            other => Err(CommandError::InvalidArgs(format!(
                "unknown mode `{}`; expected `dark` or `light`.",
                other
            ))),
        }
    }

    /// Render the icon at every slot of a background tray.
    fn render_tray(icon: &DynamicImage, color: Rgba<u8>) -> DynamicImage {
        let icon = icon.resize_exact(ICON_SIZE, ICON_SIZE, FilterType::Lanczos3);
        let icon = add_background(&icon, color);

        let mut tray = RgbaImage::from_pixel(TRAY_WIDTH, TRAY_HEIGHT, color);
        for (x, y) in ICON_POSITIONS {
            image::imageops::overlay(&mut tray, &icon, x, y);
        }
        DynamicImage::ImageRgba8(tray)
    }
}

#[async_trait]
impl Cog for IconPreviewCog {
    fn unit_id(&self) -> &'static str {
        ICON_UNIT
    }

    fn commands(&self) -> &'static [&'static str] {
        &["preview"]
    }

    async fn handle(&self, message: &Message) -> Result<Reply, CommandError> {
        let args = message.args();
        let url = args
            .first()
            .ok_or_else(|| CommandError::InvalidArgs("usage: /preview <url> [dark|light]".to_string()))?
            .clone();
        let mode = args.get(1).map(|m| m.to_lowercase()).unwrap_or_else(|| "dark".to_string());
        let color = Self::background_color(&mode)?;

        let image = download_image(&self.http, &url)
            .await
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

        // Raster work is CPU-bound; keep it off the main task.
        let preview = tokio::task::spawn_blocking(move || Self::render_tray(&image, color))
            .await
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

        let stem = format!("{}-preview", filename_from_url(&url));
        let path = write_image(&preview, &self.output_dir, &stem, OutputFormat::Png)
            .await
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;
        Ok(Reply::File(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tray_places_the_icon_on_the_mode_background() {
        let icon = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            64,
            64,
            Rgba([255, 0, 0, 255]),
        ));
        let color = IconPreviewCog::background_color("dark").unwrap();
        let tray = IconPreviewCog::render_tray(&icon, color).to_rgba8();

        assert_eq!(tray.dimensions(), (TRAY_WIDTH, TRAY_HEIGHT));
        // Centre of the first icon slot carries the icon, corners the background.
        assert_eq!(tray.get_pixel(12 + 24, 42 + 24).0, [255, 0, 0, 255]);
        assert_eq!(tray.get_pixel(0, 0).0, [0x20, 0x22, 0x25, 0xff]);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(IconPreviewCog::background_color("sepia").is_err());
    }
}
