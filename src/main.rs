//! line-gutter - render the line-number gutter of a text file
//!
//! Usage:
//!   line-gutter notes.txt --font fonts/JetBrainsMono.ttf --out gutter.png
//!   line-gutter notes.txt --wrap 60 --height 400 --scroll 1200 --labels

use std::path::Path;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use line_gutter::cli::{CliArgs, PreviewConfig};
use line_gutter::config::GutterConfig;
use line_gutter::font::{FontHandle, FontSpec, FontSystem, FontdueFonts, GlyphCache};
use line_gutter::gutter::GutterWidget;
use line_gutter::model::{TextMetrics, TextView};
use line_gutter::schedule::MAX_SELF_CORRECTIONS;
use line_gutter::view::{Frame, FramePainter, Rect};

fn main() -> Result<()> {
    line_gutter::tracing::init();

    let args = CliArgs::parse();
    let mut config = match &args.config {
        Some(path) => GutterConfig::load_from(path),
        None => GutterConfig::load(),
    };
    args.apply_overrides(&mut config);
    let preview = args.into_config().map_err(anyhow::Error::msg)?;

    let fonts = Rc::new(FontdueFonts::from_config(&config, 1.0));
    if !fonts.has_family(&config.font_family) {
        tracing::info!(
            family = %config.font_family,
            "font family not registered, drawing with the embedded face"
        );
    }

    let view = TextView::from_file(&preview.file)
        .with_context(|| format!("reading {}", preview.file.display()))?
        .with_metrics(text_metrics(&fonts, &config))
        .with_wrap(preview.wrap_columns);
    let editor = view.into_shared();
    if let Some(line) = preview.caret_line {
        editor
            .borrow_mut()
            .set_caret_line(line)
            .with_context(|| format!("placing caret on line {}", line + 1))?;
    }

    let mut gutter =
        GutterWidget::from_config(Some(Rc::clone(&editor)), Rc::clone(&fonts), &config)?;
    gutter.on_idle();

    let host_height = gutter.preferred_height().max(1) as u32;
    let height = preview.viewport_height.unwrap_or(host_height);
    let mut glyph_cache = GlyphCache::default();

    // A pass that widens the gutter schedules another one; the repaint
    // queue stops scheduling after a bounded number of corrections.
    let mut passes = 0;
    let (buffer, width, clip) = loop {
        passes += 1;
        let (buffer, width, clip) =
            render_pass(&mut gutter, &fonts, &mut glyph_cache, &preview, height)?;
        let idle = gutter.on_idle();
        if !idle.needs_redraw() || passes > usize::from(MAX_SELF_CORRECTIONS) {
            break (buffer, width, clip);
        }
        tracing::debug!(passes, width = gutter.margin_width(), "gutter resized, repainting");
    };

    save_png(&buffer, width, height, &preview.out)?;
    eprintln!(
        "rendered {} lines ({}x{} px) to {}",
        editor.borrow().line_count(),
        width,
        height,
        preview.out.display()
    );

    if preview.print_labels {
        let labels = gutter.visible_labels(clip);
        println!("{}", serde_json::to_string_pretty(&labels)?);
    }

    Ok(())
}

/// Text metrics from the configured font, or the built-in defaults if the
/// font system has no face for it
fn text_metrics(fonts: &FontdueFonts, config: &GutterConfig) -> TextMetrics {
    let font = FontHandle::new(FontSpec::sanitized(
        Some(config.font_family.as_str()),
        config.font_size,
    ));
    let defaults = TextMetrics::default();
    TextMetrics {
        line_height: fonts.line_height(&font).unwrap_or(defaults.line_height),
        descent: fonts.descent(&font).unwrap_or(defaults.descent),
        char_width: fonts
            .measure_width(&font, "0", config.antialias())
            .map(|w| w.ceil() as i32)
            .unwrap_or(defaults.char_width),
    }
}

/// Paint the gutter once into a fresh buffer sized to its preferred width
fn render_pass(
    gutter: &mut GutterWidget<TextView, Rc<FontdueFonts>>,
    fonts: &FontdueFonts,
    glyph_cache: &mut GlyphCache,
    preview: &PreviewConfig,
    height: u32,
) -> Result<(Vec<u32>, u32, Rect)> {
    let width = gutter.preferred_width().max(1) as u32;
    let scroll_y = preview.scroll_y as i32;
    let clip_height = i32::try_from(height).context("viewport height is too large")?;
    let clip = Rect::new(0, scroll_y, width as i32, clip_height);

    let pixels = pixel_count(width, height, 1)?;
    let mut buffer = vec![0u32; pixels];
    let frame = Frame::new(&mut buffer, width as usize, height as usize).with_origin_y(scroll_y);
    let mut painter = FramePainter::new(frame, fonts, glyph_cache, gutter.antialias());
    gutter.render(&mut painter, clip);

    Ok((buffer, width, clip))
}

/// `width * height * channels` as a buffer length, or an error if the image
/// is too large to address
fn pixel_count(width: u32, height: u32, channels: u32) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| anyhow!("gutter image of {}x{} px is too large", width, height))
}

fn save_png(buffer: &[u32], width: u32, height: u32, path: &Path) -> Result<()> {
    // Convert ARGB (0xAARRGGBB) to RGBA bytes
    let mut rgba = Vec::with_capacity(pixel_count(width, height, 4)?);
    for &pixel in buffer {
        rgba.push(((pixel >> 16) & 0xFF) as u8);
        rgba.push(((pixel >> 8) & 0xFF) as u8);
        rgba.push((pixel & 0xFF) as u8);
        rgba.push(((pixel >> 24) & 0xFF) as u8);
    }

    let img = image::ImageBuffer::<image::Rgba<u8>, Vec<u8>>::from_raw(width, height, rgba)
        .context("failed to create image buffer")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    img.save(path)
        .with_context(|| format!("saving PNG to {}", path.display()))?;

    Ok(())
}
