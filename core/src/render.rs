use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage, ImageEncoder, ImageError, ImageFormat, Rgba, RgbaImage};

use crate::error::IconError;
use crate::models::{BackgroundColor, IconSpec, MASKABLE_PADDING_RATIO};

/// Padding on each side of a maskable icon: `floor(size * 0.1)`.
pub fn maskable_padding(size: u32) -> u32 {
    (size as f64 * MASKABLE_PADDING_RATIO).floor() as u32
}

/// Edge length of the logo inside a maskable icon.
pub fn maskable_inner_size(size: u32) -> u32 {
    size.saturating_sub(2 * maskable_padding(size))
}

/// Render one square icon from the (already RGBA) source.
///
/// Plain icons stretch the source to `size x size`. Maskable icons shrink it
/// into the safe zone and paste it onto an opaque `background` canvas: the
/// logo's color replaces the canvas pixel and alpha is forced to 255.
pub fn generate_icon(
    source: &RgbaImage,
    size: u32,
    maskable: bool,
    background: BackgroundColor,
) -> Result<RgbaImage, IconError> {
    if size == 0 || source.width() == 0 || source.height() == 0 {
        return Err(IconError::InvalidSize { size, maskable });
    }
    if !maskable {
        return Ok(imageops::resize(source, size, size, FilterType::Lanczos3));
    }

    let padding = maskable_padding(size);
    let inner = maskable_inner_size(size);
    if inner == 0 {
        return Err(IconError::InvalidSize { size, maskable });
    }
    let logo = imageops::resize(source, inner, inner, FilterType::Lanczos3);
    let mut canvas = RgbaImage::from_pixel(size, size, background.to_rgba());
    for (x, y, px) in logo.enumerate_pixels() {
        let [r, g, b, _] = px.0;
        canvas.put_pixel(x + padding, y + padding, Rgba([r, g, b, 255]));
    }
    Ok(canvas)
}

/// Convenience wrapper taking a table entry.
pub fn render_spec(
    source: &RgbaImage,
    spec: &IconSpec,
    background: BackgroundColor,
) -> Result<RgbaImage, IconError> {
    generate_icon(source, spec.size, spec.maskable, background)
}

/// PNG-encode with maximum compression and adaptive row filters.
pub fn encode_png<W: Write>(icon: &RgbaImage, writer: W) -> Result<(), ImageError> {
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
    encoder.write_image(icon.as_raw(), icon.width(), icon.height(), ColorType::Rgba8)
}

/// Write `icon` to `path` as an optimized PNG and return the file size in bytes.
pub fn save_png(icon: &RgbaImage, path: &Path) -> Result<u64, IconError> {
    let io_err = |source| IconError::Io { path: path.to_path_buf(), source };
    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    encode_png(icon, &mut writer).map_err(|source| IconError::Encode {
        name: file_label(path),
        source,
    })?;
    writer.flush().map_err(io_err)?;
    let bytes = fs::metadata(path).map_err(io_err)?.len();
    Ok(bytes)
}

/// Decode the source logo. The format is sniffed from the file content, so a
/// JPEG saved under a `.png` name still loads.
pub fn load_source(path: &Path) -> Result<DynamicImage, IconError> {
    if !path.is_file() {
        return Err(IconError::MissingSource(path.to_path_buf()));
    }
    let io_err = |source| IconError::Io { path: path.to_path_buf(), source };
    let reader = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?;
    reader.decode().map_err(|source| match source {
        ImageError::IoError(e) => io_err(e),
        source => IconError::Decode { path: path.to_path_buf(), source },
    })
}

/// Round-trips a 1x1 image through the PNG codec so a build without PNG
/// support fails before anything touches the disk.
pub fn check_png_support() -> Result<(), IconError> {
    let pixel = RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
    let mut buf = Vec::new();
    encode_png(&pixel, &mut buf)
        .map_err(|e| IconError::MissingDependency(format!("PNG encoder: {e}")))?;
    image::load_from_memory_with_format(&buf, ImageFormat::Png)
        .map_err(|e| IconError::MissingDependency(format!("PNG decoder: {e}")))?;
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ICON_SPECS;
    use image::Rgba;

    fn solid_source(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn test_padding_math() {
        assert_eq!(maskable_padding(512), 51);
        assert_eq!(maskable_inner_size(512), 410);
        assert_eq!(maskable_padding(72), 7);
        assert_eq!(maskable_inner_size(72), 58);
        assert_eq!(maskable_padding(9), 0);
        assert_eq!(maskable_inner_size(9), 9);
    }

    #[test]
    fn test_every_icon_is_square() {
        let source = solid_source(300, 200);
        for spec in ICON_SPECS.iter() {
            let icon = render_spec(&source, spec, BackgroundColor::default()).unwrap();
            assert_eq!(icon.dimensions(), (spec.size, spec.size), "{}", spec.name);
        }
    }

    #[test]
    fn test_maskable_border_and_inset() {
        let bg = BackgroundColor::default();
        let icon = generate_icon(&solid_source(640, 640), 512, true, bg).unwrap();
        let expected_bg = Rgba([0x1e, 0x46, 0x20, 255]);

        for y in 0..512 {
            for x in 0..512 {
                let inside = (51..461).contains(&x) && (51..461).contains(&y);
                let px = *icon.get_pixel(x, y);
                if inside {
                    assert_eq!(px, Rgba([255, 0, 0, 255]), "inset pixel at {x},{y}");
                } else {
                    assert_eq!(px, expected_bg, "border pixel at {x},{y}");
                }
            }
        }
    }

    #[test]
    fn test_maskable_pastes_translucent_logo_opaque() {
        let bg = BackgroundColor::default();
        let half = RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 128]));
        let icon = generate_icon(&half, 512, true, bg).unwrap();
        assert!(icon.pixels().all(|p| p.0[3] == 255));
        assert_eq!(*icon.get_pixel(256, 256), Rgba([255, 0, 0, 255]));
        assert_eq!(*icon.get_pixel(51, 51), Rgba([255, 0, 0, 255]));
        assert_eq!(*icon.get_pixel(50, 50), bg.to_rgba());

        // fully transparent pixels keep their color instead of showing the background
        let clear = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 0]));
        let icon = generate_icon(&clear, 100, true, bg).unwrap();
        assert!(icon.pixels().all(|p| p.0[3] == 255));
        assert_eq!(*icon.get_pixel(50, 50), Rgba([255, 255, 255, 255]));
        assert_eq!(*icon.get_pixel(9, 9), bg.to_rgba());
    }

    #[test]
    fn test_plain_icon_stretches() {
        let source = RgbaImage::from_fn(40, 10, |x, _| {
            if x < 20 { Rgba([0, 0, 255, 255]) } else { Rgba([0, 255, 0, 255]) }
        });
        let icon = generate_icon(&source, 72, false, BackgroundColor::default()).unwrap();
        assert_eq!(icon.dimensions(), (72, 72));
        assert_eq!(*icon.get_pixel(2, 2), Rgba([0, 0, 255, 255]));
        assert_eq!(*icon.get_pixel(69, 69), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_invalid_sizes() {
        let source = solid_source(8, 8);
        assert!(matches!(
            generate_icon(&source, 0, false, BackgroundColor::default()),
            Err(IconError::InvalidSize { size: 0, maskable: false })
        ));
        let empty = RgbaImage::new(0, 0);
        assert!(generate_icon(&empty, 72, false, BackgroundColor::default()).is_err());
    }

    #[test]
    fn test_encode_png_decodes_back() {
        let icon = generate_icon(&solid_source(32, 32), 16, false, BackgroundColor::default()).unwrap();
        let mut buf = Vec::new();
        encode_png(&icon, &mut buf).unwrap();
        assert_eq!(&buf[1..4], b"PNG");
        let decoded = image::load_from_memory(&buf).unwrap();
        assert_eq!(decoded.to_rgba8(), icon);
    }

    #[test]
    fn test_check_png_support() {
        check_png_support().unwrap();
    }

    #[test]
    fn test_load_source_sniffs_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo-source.png");
        image::DynamicImage::ImageRgba8(solid_source(40, 30))
            .to_rgb8()
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();

        let decoded = load_source(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));

        fs::write(&path, b"neither png nor jpeg").unwrap();
        let err = load_source(&path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Generation);
    }

    #[test]
    fn test_load_source_missing() {
        let err = load_source(Path::new("definitely/not/here/logo-source.png")).unwrap_err();
        assert!(matches!(err, IconError::MissingSource(_)));
    }
}
