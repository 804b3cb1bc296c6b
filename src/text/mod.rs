//! Grapheme- and emoji-aware text layout.
//!
//! Text is split on line breaks, each line is segmented into extended
//! grapheme clusters, and clusters carrying an `Emoji_Presentation` code point
//! are laid out as fixed-size square glyphs instead of font glyphs. The
//! resulting [`TextBlock`] is the single source of truth for both drawing and
//! hit-testing.

use egui::Pos2;
use unicode_properties::{EmojiStatus, UnicodeEmoji};
use unicode_segmentation::UnicodeSegmentation;

mod font;
pub mod glyph_cache;

pub use font::FontFace;
pub use glyph_cache::{DirGlyphSource, FetchMode, GlyphCache, GlyphSource, NoGlyphSource};

/// Emoji squares are slightly larger than the font size
pub const EMOJI_WIDTH_FACTOR: f32 = 1.05;
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

const VARIATION_SELECTOR_16: char = '\u{fe0f}';

/// Glyph-metrics provider used for non-emoji clusters
pub trait TextMeasure {
    /// Advance width of `cluster` at `font_size`
    fn advance(&self, cluster: &str, font_size: f32) -> f32;
}

/// Identifier of an emoji bitmap: hex code points joined by `-`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphKey(String);

impl GlyphKey {
    pub fn for_cluster(cluster: &str) -> Self {
        let hex: Vec<String> = cluster
            .chars()
            .filter(|c| *c != VARIATION_SELECTOR_16)
            .map(|c| format!("{:x}", c as u32))
            .collect();
        Self(hex.join("-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn has_emoji_presentation(c: char) -> bool {
    matches!(
        c.emoji_status(),
        EmojiStatus::EmojiPresentation
            | EmojiStatus::EmojiPresentationAndModifierBase
            | EmojiStatus::EmojiPresentationAndEmojiComponent
            | EmojiStatus::EmojiPresentationAndModifierAndEmojiComponent
    )
}

pub fn is_emoji(cluster: &str) -> bool {
    cluster.chars().any(has_emoji_presentation)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClusterKind {
    Text,
    Emoji(GlyphKey),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub text: String,
    pub kind: ClusterKind,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub clusters: Vec<Cluster>,
    pub width: f32,
}

/// Laid-out multi-line text block
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<Line>,
    pub font_size: f32,
    pub line_height: f32,
    pub width: f32,
    pub height: f32,
}

/// A line positioned for drawing: `left` is its first cluster's x,
/// `middle_y` its vertical center.
#[derive(Debug, Clone, Copy)]
pub struct PlacedLine<'a> {
    pub line: &'a Line,
    pub left: f32,
    pub middle_y: f32,
}

pub fn segment_line(line: &str, font_size: f32, measure: &dyn TextMeasure) -> Line {
    let clusters: Vec<Cluster> = line
        .graphemes(true)
        .map(|g| {
            if is_emoji(g) {
                Cluster {
                    text: g.to_owned(),
                    kind: ClusterKind::Emoji(GlyphKey::for_cluster(g)),
                    width: font_size * EMOJI_WIDTH_FACTOR,
                }
            } else {
                Cluster {
                    text: g.to_owned(),
                    kind: ClusterKind::Text,
                    width: measure.advance(g, font_size),
                }
            }
        })
        .collect();
    let width = clusters.iter().map(|c| c.width).sum();
    Line { clusters, width }
}

pub fn layout(text: &str, font_size: f32, measure: &dyn TextMeasure) -> TextBlock {
    let lines: Vec<Line> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| segment_line(line, font_size, measure))
        .collect();
    let line_height = font_size * LINE_HEIGHT_FACTOR;
    let width = lines.iter().map(|l| l.width).fold(0.0, f32::max);
    let height = lines.len() as f32 * line_height;
    TextBlock {
        lines,
        font_size,
        line_height,
        width,
        height,
    }
}

impl TextBlock {
    /// Lines centered horizontally and the block centered vertically on
    /// `center`.
    pub fn place(&self, center: Pos2) -> impl Iterator<Item = PlacedLine<'_>> + '_ {
        let start_y = center.y - self.height / 2.0 + self.line_height / 2.0;
        self.lines.iter().enumerate().map(move |(i, line)| PlacedLine {
            line,
            left: center.x - line.width / 2.0,
            middle_y: start_y + i as f32 * self.line_height,
        })
    }

    pub fn glyph_keys(&self) -> impl Iterator<Item = &GlyphKey> {
        self.lines
            .iter()
            .flat_map(|l| l.clusters.iter())
            .filter_map(|c| match &c.kind {
                ClusterKind::Emoji(key) => Some(key),
                ClusterKind::Text => None,
            })
    }
}

#[cfg(test)]
pub(crate) struct FixedAdvance(pub f32);

#[cfg(test)]
impl TextMeasure for FixedAdvance {
    // Per cluster, given at size 10
    fn advance(&self, _cluster: &str, font_size: f32) -> f32 {
        self.0 * font_size / 10.0
    }
}
