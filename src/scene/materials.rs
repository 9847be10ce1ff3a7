use crate::math::Color;

use super::palette::{Palette, PaletteSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialId {
    Boundary,
    Text,
    Torus,
    Sphere,
}

impl MaterialId {
    pub const ALL: [MaterialId; 4] = [
        MaterialId::Boundary,
        MaterialId::Text,
        MaterialId::Torus,
        MaterialId::Sphere,
    ];

    /// Palette entry this material derives its color from.
    pub fn palette_slot(&self) -> PaletteSlot {
        match self {
            MaterialId::Boundary => PaletteSlot::Color1,
            MaterialId::Text => PaletteSlot::Color2,
            MaterialId::Torus | MaterialId::Sphere => PaletteSlot::Color3,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MaterialId::Boundary => 0,
            MaterialId::Text => 1,
            MaterialId::Torus => 2,
            MaterialId::Sphere => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Unlit color, optionally multiplied by a texture.
    Basic,
    /// Color multiplied by a matcap lookup on the view-space normal.
    Matcap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    /// Inside faces only; used for the enclosing sphere.
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Matcap,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    pub side: Side,
    pub texture: Option<TextureSlot>,
    pub wireframe: bool,
}

/// The four scene materials with explicit setters.
#[derive(Debug, Clone)]
pub struct Materials {
    slots: [Material; 4],
    revision: u64,
}

impl Materials {
    pub fn new(palette: &Palette) -> Self {
        let boundary = Material {
            shading: Shading::Basic,
            color: palette.color1,
            side: Side::Back,
            texture: None,
            wireframe: false,
        };
        let text = Material {
            shading: Shading::Matcap,
            color: palette.color2,
            side: Side::Front,
            texture: Some(TextureSlot::Matcap),
            wireframe: false,
        };
        let torus = Material {
            shading: Shading::Basic,
            color: palette.color3,
            side: Side::Front,
            texture: Some(TextureSlot::Pattern),
            wireframe: false,
        };
        let sphere = Material {
            shading: Shading::Basic,
            color: palette.color3,
            side: Side::Front,
            texture: None,
            wireframe: true,
        };
        Self {
            slots: [boundary, text, torus, sphere],
            revision: 0,
        }
    }

    pub fn get(&self, id: MaterialId) -> &Material {
        &self.slots[id.index()]
    }

    pub fn set_color(&mut self, id: MaterialId, color: Color) {
        self.slots[id.index()].color = color;
        self.revision += 1;
    }

    pub fn set_wireframe(&mut self, id: MaterialId, wireframe: bool) {
        self.slots[id.index()].wireframe = wireframe;
        self.revision += 1;
    }

    /// Re-assigns colors for every material reading from `slot`.
    pub fn apply_palette_slot(&mut self, palette: &Palette, slot: PaletteSlot) {
        for id in MaterialId::ALL {
            if id.palette_slot() == slot {
                self.set_color(id, palette.get(slot));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        MaterialId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
