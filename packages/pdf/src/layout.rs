//! Positioned glyphs, and the lines and words built from them.
//!
//! Coordinates are in PDF user space with `y` flipped so it grows down the
//! page. Distances between glyphs are compared in ems of the glyph's
//! rendered size, so the same thresholds work for any font size.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

/// A horizontal gap wider than this many ems starts a new word.
pub const WORD_GAP_EM: f64 = 0.1;

/// A horizontal gap wider than this many ems starts a new cell.
pub const CELL_GAP_EM: f64 = 1.0;

/// Glyphs whose baselines differ by less than this many ems share a line.
const LINE_TOLERANCE_EM: f64 = 0.5;

/// One visible character placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Left edge.
    pub x: f64,
    /// Baseline, measured from the top of the page.
    pub y: f64,
    /// Right edge.
    pub end: f64,
    /// Rendered font size.
    pub size: f64,
    /// Decoded text of the glyph.
    pub text: String,
}

/// A run of glyphs with no word gap between them, or a run of words with
/// no cell gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub start: f64,
    pub end: f64,
    pub size: f64,
    pub text: String,
}

impl Word {
    /// Horizontal midpoint.
    #[must_use]
    pub fn center(&self) -> f64 {
        f64::midpoint(self.start, self.end)
    }

    fn gap_to(&self, next: &Self) -> f64 {
        next.start - self.end
    }

    fn absorb(&mut self, next: Self, separator: &str) {
        self.text.push_str(separator);
        self.text.push_str(&next.text);
        self.end = self.end.max(next.end);
        self.size = self.size.max(next.size);
    }
}

/// Words sharing a baseline, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    /// Lays out a line of text on a monospace grid, one em per character.
    ///
    /// A single space stays inside a cell and two or more split cells, the
    /// way a fixed-width text rendering of a table reads.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut glyphs = Vec::new();
        let mut x = 0.0;
        for ch in text.chars() {
            if !ch.is_whitespace() {
                glyphs.push(Glyph {
                    x,
                    y: 0.0,
                    end: x + 1.0,
                    size: 1.0,
                    text: ch.to_string(),
                });
            }
            x += if ch == '\t' { 4.0 } else { 1.0 };
        }
        Self {
            words: group_words(glyphs),
        }
    }

    /// Whether the line has no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words joined by single spaces.
    #[must_use]
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Words merged into cells wherever the gap between them is at most
    /// [`CELL_GAP_EM`].
    #[must_use]
    pub fn cells(&self) -> Vec<Word> {
        let mut cells: Vec<Word> = Vec::new();
        for word in &self.words {
            match cells.last_mut() {
                Some(cell) if cell.gap_to(word) <= CELL_GAP_EM * cell.size.max(word.size) => {
                    cell.absorb(word.clone(), " ");
                }
                _ => cells.push(word.clone()),
            }
        }
        cells
    }
}

/// Groups a page's glyphs into lines, top to bottom.
#[must_use]
pub fn lines(mut glyphs: Vec<Glyph>) -> Vec<Line> {
    glyphs.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut groups: Vec<Vec<Glyph>> = Vec::new();
    for glyph in glyphs {
        match groups.last_mut() {
            Some(group) if same_line(group, &glyph) => group.push(glyph),
            _ => groups.push(vec![glyph]),
        }
    }

    groups
        .into_iter()
        .map(|mut group| {
            group.sort_by(|a, b| a.x.total_cmp(&b.x));
            Line {
                words: group_words(group),
            }
        })
        .collect()
}

fn same_line(group: &[Glyph], glyph: &Glyph) -> bool {
    group.first().is_some_and(|first| {
        (glyph.y - first.y).abs() < LINE_TOLERANCE_EM * first.size.max(glyph.size)
    })
}

/// Glyphs must already be ordered by `x`.
fn group_words(glyphs: Vec<Glyph>) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    for glyph in glyphs {
        let next = Word {
            start: glyph.x,
            end: glyph.end,
            size: glyph.size,
            text: glyph.text,
        };
        match words.last_mut() {
            Some(word) if word.gap_to(&next) <= WORD_GAP_EM * word.size.max(next.size) => {
                word.absorb(next, "");
            }
            _ => words.push(next),
        }
    }
    words
}

/// Collects the visible glyphs of every page through [`pdf_extract::output_doc`].
#[derive(Debug, Default)]
pub struct GlyphCollector {
    pages: Vec<Vec<Glyph>>,
    page_height: f64,
}

impl GlyphCollector {
    /// Glyphs per page, in document order.
    #[must_use]
    pub fn into_pages(self) -> Vec<Vec<Glyph>> {
        self.pages
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.page_height = media_box.ury - media_box.lly;
        self.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        text: &str,
    ) -> Result<(), OutputError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let scaled = (font_size * (trm.m11 + trm.m21) * font_size * (trm.m12 + trm.m22))
            .abs()
            .sqrt();
        let size = if scaled.is_normal() {
            scaled
        } else {
            font_size.abs()
        };
        let x = trm.m31;

        if let Some(page) = self.pages.last_mut() {
            page.push(Glyph {
                x,
                y: self.page_height - trm.m32,
                end: x + width * size,
                size,
                text: text.to_owned(),
            });
        }
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}
