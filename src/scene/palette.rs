use serde::{Deserialize, Serialize};

use crate::math::Color;

pub const DEFAULT_COLOR1: Color = Color::rgb(0xcc, 0xff, 0x66);
pub const DEFAULT_COLOR2: Color = Color::rgb(0xff, 0x5f, 0xaa);
pub const DEFAULT_COLOR3: Color = Color::rgb(0xdf, 0x00, 0xff);

/// Names one of the three palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteSlot {
    /// Boundary sphere.
    Color1,
    /// Text overlay.
    Color2,
    /// Toruses and spheres.
    Color3,
}

impl PaletteSlot {
    pub const ALL: [PaletteSlot; 3] = [PaletteSlot::Color1, PaletteSlot::Color2, PaletteSlot::Color3];

    pub fn label(&self) -> &'static str {
        match self {
            PaletteSlot::Color1 => "Boundary Color",
            PaletteSlot::Color2 => "Text Overlay Color",
            PaletteSlot::Color3 => "Other Color",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub color1: Color,
    pub color2: Color,
    pub color3: Color,
}

impl Palette {
    pub fn get(&self, slot: PaletteSlot) -> Color {
        match slot {
            PaletteSlot::Color1 => self.color1,
            PaletteSlot::Color2 => self.color2,
            PaletteSlot::Color3 => self.color3,
        }
    }

    pub fn set(&mut self, slot: PaletteSlot, color: Color) {
        match slot {
            PaletteSlot::Color1 => self.color1 = color,
            PaletteSlot::Color2 => self.color2 = color,
            PaletteSlot::Color3 => self.color3 = color,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            color1: DEFAULT_COLOR1,
            color2: DEFAULT_COLOR2,
            color3: DEFAULT_COLOR3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_hex() {
        let palette = Palette::default();
        assert_eq!(palette.color1.to_hex(), "#ccff66");
        assert_eq!(palette.color2.to_hex(), "#ff5faa");
        assert_eq!(palette.color3, Color::from_hex("#DF00FF").unwrap());
    }

    #[test]
    fn test_set_touches_one_slot() {
        let mut palette = Palette::default();
        let red = Color::rgb(255, 0, 0);
        palette.set(PaletteSlot::Color2, red);
        assert_eq!(palette.get(PaletteSlot::Color2), red);
        assert_eq!(palette.color1, DEFAULT_COLOR1);
        assert_eq!(palette.color3, DEFAULT_COLOR3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let palette: Palette = serde_json::from_str(r##"{"color3": "#000000"}"##).unwrap();
        assert_eq!(palette.color1, DEFAULT_COLOR1);
        assert_eq!(palette.color3, Color::rgb(0, 0, 0));
    }
}
