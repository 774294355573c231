//! Image asset pipeline
//!
//! Downloads asset bytes, decodes (or rasterizes SVG) into an in-memory
//! raster image, performs transparency masking and background compositing,
//! and re-encodes to an output file. Downloads are single attempts; a
//! failure surfaces to the user immediately.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{DynamicImage, GrayImage, ImageFormat, Rgba, RgbaImage};
use reqwest::Client;

use crate::application::errors::ImageError;

/// Download raw bytes from a URL.
///
/// Malformed URLs and connection failures classify as `InvalidUrl`;
/// non-success responses as `Unreachable`.
pub async fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>, ImageError> {
    let parsed = reqwest::Url::parse(url).map_err(|_| ImageError::InvalidUrl)?;
    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|_| ImageError::InvalidUrl)?;

    if !response.status().is_success() {
        return Err(ImageError::Unreachable {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|_| ImageError::InvalidUrl)?;
    Ok(bytes.to_vec())
}

/// Download and decode an image from a URL.
///
/// URLs ending in `.svg` are rasterized at their intrinsic size.
pub async fn download_image(client: &Client, url: &str) -> Result<DynamicImage, ImageError> {
    let bytes = download_bytes(client, url).await?;

    if url.to_lowercase().ends_with(".svg") {
        return rasterize_svg(&bytes, 1.0);
    }

    image::load_from_memory(&bytes).map_err(|_| ImageError::Undecodable {
        url: url.to_string(),
    })
}

/// Rasterize SVG bytes into an RGBA image at the given scale.
pub fn rasterize_svg(data: &[u8], scale: f32) -> Result<DynamicImage, ImageError> {
    let options = resvg::usvg::Options::default();
    let tree = resvg::usvg::Tree::from_data(data, &options).map_err(|_| ImageError::InvalidSvg)?;

    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap =
        resvg::tiny_skia::Pixmap::new(width, height).ok_or(ImageError::InvalidSvg)?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia renders premultiplied; demultiply into a plain RGBA buffer.
    let mut image = RgbaImage::new(width, height);
    for (pixel, out) in pixmap.pixels().iter().zip(image.pixels_mut()) {
        let color = pixel.demultiply();
        *out = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    Ok(DynamicImage::ImageRgba8(image))
}

/// Binary transparency mask: 0 where the pixel is fully transparent, 255
/// everywhere else.
pub fn image_to_mask(image: &DynamicImage) -> GrayImage {
    let rgba = image.to_rgba8();
    let mut mask = GrayImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(mask.pixels_mut()) {
        dst.0 = [if src.0[3] == 0 { 0 } else { 255 }];
    }
    mask
}

/// Select foreground pixels where the mask is set, background otherwise.
///
/// All three images must share the same dimensions.
pub fn composite(foreground: &RgbaImage, background: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    let mut out = background.clone();
    for ((fg, bg), m) in foreground.pixels().zip(out.pixels_mut()).zip(mask.pixels()) {
        if m.0[0] > 0 {
            *bg = *fg;
        }
    }
    out
}

/// Composite an image over a solid canvas through its transparency mask.
pub fn add_background(image: &DynamicImage, color: Rgba<u8>) -> RgbaImage {
    let rgba = image.to_rgba8();
    let canvas = RgbaImage::from_pixel(rgba.width(), rgba.height(), color);
    composite(&rgba, &canvas, &image_to_mask(image))
}

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    WebP,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::WebP => "webp",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::WebP => ImageFormat::WebP,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            other => Err(ImageError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Encode an image into the given output format.
///
/// JPEG carries no alpha channel, so transparency is dropped first.
pub fn encode_image(image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, ImageError> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut buffer, ImageFormat::Jpeg)
        }
        OutputFormat::WebP => {
            DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut buffer, ImageFormat::WebP)
        }
        OutputFormat::Png => image.write_to(&mut buffer, format.image_format()),
    }
    .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Encode and write an image as `{stem}.{ext}` under `dir`.
///
/// `stem` must not carry an extension; it is appended from the format.
pub async fn write_image(
    image: &DynamicImage,
    dir: &Path,
    stem: &str,
    format: OutputFormat,
) -> Result<PathBuf, ImageError> {
    let encoded = encode_image(image, format)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.{}", stem, format.extension()));
    tokio::fs::write(&path, encoded).await?;
    Ok(path)
}

/// File name stem of a URL: the path basename up to its first dot.
///
/// `"https://host/image.png"` gives `"image"`, `"https://host/files.archive.zip"`
/// gives `"files"`. Falls back to `"image"`.
pub fn filename_from_url(url: &str) -> String {
    let path = reqwest::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    let basename = path.rsplit('/').next().unwrap_or("");
    let stem = basename.split('.').next().unwrap_or("");
    if stem.is_empty() {
        "image".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkered() -> DynamicImage {
        // 2x2: opaque red, transparent, transparent, opaque red
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn mask_is_binary_on_alpha() {
        let mask = image_to_mask(&checkered());
        assert_eq!(mask.get_pixel(0, 0).0, [255]);
        assert_eq!(mask.get_pixel(1, 0).0, [0]);
    }

    #[test]
    fn background_fills_only_transparent_pixels() {
        let out = add_background(&checkered(), Rgba([0, 255, 0, 255]));
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(1, 0).0, [0, 255, 0, 255]);
    }

    #[test]
    fn jpeg_encoding_drops_alpha() {
        let bytes = encode_image(&checkered(), OutputFormat::Jpeg).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn png_roundtrips_pixels() {
        let bytes = encode_image(&checkered(), OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(matches!(
            "gif".parse::<OutputFormat>(),
            Err(ImageError::UnsupportedFormat(_))
        ));
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    }

    #[test]
    fn rasterizes_a_simple_svg() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"##;
        let image = rasterize_svg(svg, 1.0).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (10, 10));
        assert_eq!(image.get_pixel(5, 5).0, [255, 0, 0, 255]);

        let scaled = rasterize_svg(svg, 2.0).unwrap();
        assert_eq!(scaled.to_rgba8().dimensions(), (20, 20));
    }

    #[test]
    fn invalid_svg_is_rejected() {
        assert!(matches!(
            rasterize_svg(b"not an svg", 1.0),
            Err(ImageError::InvalidSvg)
        ));
    }

    #[test]
    fn filename_stems_stop_at_the_first_dot() {
        assert_eq!(filename_from_url("https://host/path/image.png"), "image");
        assert_eq!(filename_from_url("https://host/files.archive.zip"), "files");
        assert_eq!(filename_from_url("https://host/"), "image");
        assert_eq!(filename_from_url("not a url"), "image");
    }

    #[tokio::test]
    async fn malformed_url_is_invalid() {
        let client = Client::new();
        assert!(matches!(
            download_bytes(&client, "definitely not a url").await,
            Err(ImageError::InvalidUrl)
        ));
    }
}
