//! Extruded block-letter text.
//!
//! Glyphs are 5x7 cell bitmaps. Each horizontal run of filled cells becomes
//! one box, extruded along +Z by the configured depth. The bevel grows the
//! outline by `bevel_size` and the depth by `bevel_thickness` on both faces,
//! so the overall footprint matches a beveled outline extrusion.

use glam::Vec3;

use super::geometry::{cuboid, MeshData};
use crate::config::TextConfig;

pub const GLYPH_COLUMNS: usize = 5;
pub const GLYPH_ROWS: usize = 7;
/// Glyph width plus one column of spacing.
const ADVANCE_COLUMNS: usize = GLYPH_COLUMNS + 1;

type Glyph = [u8; GLYPH_ROWS];

/// Row bitmaps, top row first, bit 4 is the leftmost column.
fn glyph(ch: char) -> Option<Glyph> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        _ => return None,
    };
    Some(rows)
}

/// Filled runs in one glyph row as `(start_column, length)`.
fn row_runs(bits: u8) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for col in 0..=GLYPH_COLUMNS {
        let filled = col < GLYPH_COLUMNS && bits & (1 << (GLYPH_COLUMNS - 1 - col)) != 0;
        match (filled, start) {
            (true, None) => start = Some(col),
            (false, Some(s)) => {
                runs.push((s, col - s));
                start = None;
            }
            _ => {}
        }
    }
    runs
}

pub fn is_supported(ch: char) -> bool {
    ch == ' ' || glyph(ch).is_some()
}

/// True when at least one character of `content` produces geometry.
pub fn has_glyphs(content: &str) -> bool {
    content.chars().any(|ch| glyph(ch).is_some())
}

/// Builds the text mesh centered on its bounding box.
///
/// Unsupported characters advance like a space.
pub fn block_text(config: &TextConfig) -> MeshData {
    let cell = config.size / GLYPH_ROWS as f32;
    let (grow, thickness) = if config.bevel_enabled {
        (config.bevel_size, config.bevel_thickness)
    } else {
        (0.0, 0.0)
    };

    let mut mesh = MeshData::default();
    for (index, ch) in config.content.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            if ch != ' ' {
                log::warn!("no block glyph for {:?}, leaving a gap", ch);
            }
            continue;
        };
        let origin_col = index * ADVANCE_COLUMNS;
        for (row, bits) in rows.iter().enumerate() {
            let y0 = (GLYPH_ROWS - 1 - row) as f32 * cell;
            for (col, len) in row_runs(*bits) {
                let x0 = (origin_col + col) as f32 * cell;
                let min = Vec3::new(x0 - grow, y0 - grow, -thickness);
                let max = Vec3::new(x0 + len as f32 * cell + grow, y0 + cell + grow, config.depth + thickness);
                mesh.append(cuboid(min, max));
            }
        }
    }
    mesh.center();
    mesh
}
