//! Fonts for the gutter labels
//!
//! A [`FontHandle`] is the logical font (family, size, style) the widget keeps
//! between paints. Turning it into pixels is the job of a [`FontSystem`];
//! [`FontdueFonts`] is the fontdue-backed implementation used for pixel
//! buffers.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use fontdue::{Font, FontSettings, Metrics};

use crate::error::{GutterError, Result};

/// Family used when none (or an empty one) is supplied
pub const DEFAULT_FONT_FAMILY: &str = "Monospaced";
/// Size used when the supplied size is not usable (<= 1)
pub const DEFAULT_FONT_SIZE_PT: i32 = 14;

/// DejaVu Sans Mono, embedded so labels can be drawn without any font
/// configured. Registered as [`DEFAULT_FONT_FAMILY`].
pub const EMBEDDED_FACE: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Plain,
}

/// Family, size and style of a font
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: String,
    pub size_pt: i32,
    pub style: FontStyle,
}

impl FontSpec {
    pub fn plain(family: impl Into<String>, size_pt: i32) -> Self {
        Self {
            family: family.into(),
            size_pt,
            style: FontStyle::Plain,
        }
    }

    /// Apply the fallback policy: a missing/empty family or a size <= 1
    /// yields the default monospace family at the default size.
    pub fn sanitized(family: Option<&str>, size_pt: i32) -> Self {
        match family.map(str::trim) {
            Some(family) if !family.is_empty() && size_pt > 1 => Self::plain(family, size_pt),
            _ => {
                tracing::debug!(
                    ?family,
                    size_pt,
                    "unusable font settings, falling back to {} {}",
                    DEFAULT_FONT_FAMILY,
                    DEFAULT_FONT_SIZE_PT
                );
                Self::plain(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PT)
            }
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::plain(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PT)
    }
}

/// Cheap-to-clone handle to a resolved font
#[derive(Debug, Clone)]
pub struct FontHandle(Rc<FontSpec>);

impl FontHandle {
    pub fn new(spec: FontSpec) -> Self {
        Self(Rc::new(spec))
    }

    pub fn spec(&self) -> &FontSpec {
        &self.0
    }

    pub fn family(&self) -> &str {
        &self.0.family
    }

    pub fn size_pt(&self) -> i32 {
        self.0.size_pt
    }

    pub fn style(&self) -> FontStyle {
        self.0.style
    }

    /// Whether this handle already describes `family` at `size_pt`
    pub fn matches(&self, family: &str, size_pt: i32) -> bool {
        self.0.family == family && self.0.size_pt == size_pt
    }

    /// Whether both handles share the same allocation
    pub fn ptr_eq(a: &FontHandle, b: &FontHandle) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for FontHandle {}

/// The platform's font measurement facility
pub trait FontSystem {
    /// Advance width of `text` in pixels, or `None` if the font cannot be
    /// measured. `antialias` must match the policy used when drawing.
    fn measure_width(&self, font: &FontHandle, text: &str, antialias: bool) -> Option<f32>;
}

// Glyph cache key: (face index, character, pixel size as bits)
pub type GlyphCacheKey = (usize, char, u32);

pub type GlyphCache = HashMap<GlyphCacheKey, (Metrics, Vec<u8>)>;

/// fontdue faces registered by family name
///
/// Faces are immutable once registered, so one instance can be shared (via
/// `Rc`) between the widget, which measures, and painters, which rasterize
/// into their own [`GlyphCache`].
pub struct FontdueFonts {
    faces: Vec<Font>,
    families: HashMap<String, usize>,
    scale_factor: f32,
}

impl FontdueFonts {
    pub fn new(scale_factor: f32) -> Self {
        Self {
            faces: Vec::new(),
            families: HashMap::new(),
            scale_factor,
        }
    }

    /// Font system holding only the embedded face
    pub fn with_embedded_face(scale_factor: f32) -> Result<Self> {
        let mut fonts = Self::new(scale_factor);
        fonts.register_bytes(DEFAULT_FONT_FAMILY, EMBEDDED_FACE)?;
        Ok(fonts)
    }

    /// The embedded face, then every font file in the user fonts directory,
    /// then the fonts listed in the configuration. Later registrations win
    /// for the same family. Failures are logged and skipped so one bad file
    /// does not take the others down.
    pub fn from_config(config: &crate::config::GutterConfig, scale_factor: f32) -> Self {
        let mut fonts = Self::new(scale_factor);
        if let Err(e) = fonts.register_bytes(DEFAULT_FONT_FAMILY, EMBEDDED_FACE) {
            tracing::warn!("{}", e);
        }
        if let Some(dir) = crate::config_paths::fonts_dir() {
            fonts.register_dir(&dir);
        }
        for source in &config.fonts {
            if let Err(e) = fonts.register_file(&source.family, &source.path) {
                tracing::warn!("{}", e);
            }
        }
        fonts
    }

    /// Parse font bytes and make them available as `family`
    pub fn register_bytes(&mut self, family: &str, bytes: &[u8]) -> Result<()> {
        let face = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| {
            GutterError::FontLoad {
                family: family.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.faces.push(face);
        self.families.insert(family.to_lowercase(), self.faces.len() - 1);
        tracing::debug!(family, "registered font face");
        Ok(())
    }

    /// Read a font file and register it as `family`
    pub fn register_file(&mut self, family: &str, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|e| GutterError::FontLoad {
            family: family.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        self.register_bytes(family, &bytes)
    }

    /// Register every `.ttf`/`.otf` file in `dir` under its file stem
    /// (`JetBrainsMono.ttf` becomes family "JetBrainsMono"). Returns how many
    /// faces were added; a missing directory adds none.
    pub fn register_dir(&mut self, dir: &Path) -> usize {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0;
        };
        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_font_file(path))
            .collect();
        paths.sort();

        let mut added = 0;
        for path in paths {
            let Some(family) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match self.register_file(family, &path) {
                Ok(()) => added += 1,
                Err(e) => tracing::warn!("{}", e),
            }
        }
        added
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(&family.to_lowercase())
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Face for a family: exact match, then the default family, then the
    /// first registered face.
    fn face_index(&self, family: &str) -> Option<usize> {
        self.families
            .get(&family.to_lowercase())
            .or_else(|| self.families.get(&DEFAULT_FONT_FAMILY.to_lowercase()))
            .copied()
            .or_else(|| (!self.faces.is_empty()).then_some(0))
    }

    /// Pixel size for a point size at the current scale factor
    pub fn px_size(&self, font: &FontHandle) -> f32 {
        font.size_pt() as f32 * self.scale_factor
    }

    /// Font descent in whole pixels (positive, below the baseline)
    pub fn descent(&self, font: &FontHandle) -> Option<i32> {
        let face = &self.faces[self.face_index(font.family())?];
        let metrics = face.horizontal_line_metrics(self.px_size(font))?;
        Some((-metrics.descent).ceil() as i32)
    }

    /// Line height in whole pixels
    pub fn line_height(&self, font: &FontHandle) -> Option<i32> {
        let face = &self.faces[self.face_index(font.family())?];
        let metrics = face.horizontal_line_metrics(self.px_size(font))?;
        Some(metrics.new_line_size.ceil() as i32)
    }

    /// Rasterized glyph, cached per face, character and pixel size.
    /// Face indices are per instance, so a cache must not be shared
    /// between different `FontdueFonts`.
    pub fn rasterize<'c>(
        &self,
        cache: &'c mut GlyphCache,
        font: &FontHandle,
        ch: char,
    ) -> Option<&'c (Metrics, Vec<u8>)> {
        let face = self.face_index(font.family())?;
        let px = self.px_size(font);
        Some(
            cache
                .entry((face, ch, px.to_bits()))
                .or_insert_with(|| self.faces[face].rasterize(ch, px)),
        )
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
}

impl<T: FontSystem + ?Sized> FontSystem for Rc<T> {
    fn measure_width(&self, font: &FontHandle, text: &str, antialias: bool) -> Option<f32> {
        (**self).measure_width(font, text, antialias)
    }
}

impl FontSystem for FontdueFonts {
    fn measure_width(&self, font: &FontHandle, text: &str, antialias: bool) -> Option<f32> {
        let face = &self.faces[self.face_index(font.family())?];
        let px = self.px_size(font);
        let width = text
            .chars()
            .map(|ch| {
                let advance = face.metrics(ch, px).advance_width;
                if antialias {
                    advance
                } else {
                    advance.round()
                }
            })
            .sum();
        Some(width)
    }
}
