use cellcon_data::Color;
use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::{
    glyph::{GlyphAtlas, Unit},
    position::CellPos,
    quad::Quad,
    viewport::Grid,
};

/// A run of text anchored at a grid position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCell {
    pos: CellPos,
    text: CompactString,
    fg: Color,
    bg: Color,
}

impl TextCell {
    /// Anchor position of the entry.
    pub fn pos(&self) -> CellPos {
        self.pos
    }

    /// Text drawn from the anchor rightwards.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Foreground color.
    pub fn fg(&self) -> Color {
        self.fg
    }

    /// Background color.
    pub fn bg(&self) -> Color {
        self.bg
    }
}

/// Sparse collection of text entries keyed by their anchor position.
///
/// Holds at most one entry per position: writing to an occupied position
/// replaces the text and colors in place. Entries are drawn in insertion
/// order and are never removed, so the buffer grows with the number of
/// distinct positions written during a session.
///
/// Positions outside the current grid are stored like any other; they simply
/// produce no geometry when drawn.
#[derive(Debug, Default)]
pub struct TextBuffer {
    cells: Vec<TextCell>,
    /// Anchor position to index into `cells`
    index: FxHashMap<CellPos, usize>,
}

impl TextBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `text` at `pos`, overwriting any entry already anchored there.
    ///
    /// Returns true if a new entry was created.
    pub fn upsert(&mut self, pos: CellPos, text: &str, fg: Color, bg: Color) -> bool {
        if let Some(&idx) = self.index.get(&pos) {
            let cell = &mut self.cells[idx];
            cell.text = CompactString::from(text);
            cell.fg = fg;
            cell.bg = bg;
            return false;
        }

        self.index.insert(pos, self.cells.len());
        self.cells.push(TextCell { pos, text: CompactString::from(text), fg, bg });
        true
    }

    /// Returns the entry anchored at `pos`.
    pub fn get(&self, pos: CellPos) -> Option<&TextCell> {
        self.index.get(&pos).map(|&idx| &self.cells[idx])
    }

    /// Re-anchors the entry at `from` to `to`.
    ///
    /// If `to` is already occupied, that entry is replaced by the moved one, so
    /// positions stay unique. Returns false if there is no entry at `from`.
    pub fn relocate(&mut self, from: CellPos, to: CellPos) -> bool {
        if !self.index.contains_key(&from) {
            return false;
        }
        if from == to {
            return true;
        }

        if let Some(displaced) = self.index.remove(&to) {
            self.cells.remove(displaced);
            self.rebuild_index();
        }

        let Some(idx) = self.index.remove(&from) else {
            return false;
        };
        self.cells[idx].pos = to;
        self.index.insert(to, idx);
        true
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TextCell> {
        self.cells.iter()
    }

    /// Lays out every entry through `atlas` and appends the visible glyph quads
    /// to `out`. Characters outside `grid` are dropped.
    ///
    /// Returns the number of quads appended.
    pub fn draw_all(&self, atlas: &GlyphAtlas, grid: Grid, out: &mut Vec<Quad>) -> usize {
        let before = out.len();
        for cell in &self.cells {
            out.extend(atlas.glyph_run(
                &cell.text,
                cell.pos.row as f32,
                cell.pos.col as f32,
                (cell.fg, cell.bg),
                grid,
                Unit::Cell,
            ));
        }

        out.len() - before
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (cell.pos, idx))
            .collect();
    }
}
