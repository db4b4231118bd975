use std::collections::BTreeMap;

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::coord::TileKey;
use crate::visual::VisualOp;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Color { r, g, b, a: 255 } }
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self { Color { r, g, b, a } }

    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, f64::from(self.a) / 255.)
        }
    }
}

pub const LAST_MOVE_COLOR: Color = Color::rgba(155, 199, 0, 105);
pub const CHECK_COLOR: Color = Color::rgba(220, 30, 30, 140);
pub const PREVIEW_COLOR: Color = Color::rgba(20, 85, 30, 90);
pub const LIGHT_TILE_COLOR: Color = Color::rgb(240, 217, 181);
pub const DARK_TILE_COLOR: Color = Color::rgb(181, 136, 99);
pub const DISABLED_TILE_COLOR: Color = Color::rgb(60, 60, 60);


// Independent highlight layers. Changing one layer never touches another, so a renderer
// should stack them (e.g. as separate overlays) rather than keep one color per tile.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[derive(Enum, EnumIter, Serialize, Deserialize)]
pub enum HighlightLayer {
    // Origin and destination of the most recent move. At most two tiles.
    LastMove,
    // Kings in check.
    Check,
    // Legal move preview, set and cleared by the embedding UI.
    Preview,
}

#[derive(Clone, Debug, Default)]
pub struct HighlightState {
    layers: EnumMap<HighlightLayer, BTreeMap<TileKey, Color>>,
}

impl HighlightState {
    pub fn new() -> Self { Self::default() }

    pub fn layer(&self, layer: HighlightLayer) -> &BTreeMap<TileKey, Color> { &self.layers[layer] }

    pub fn color(&self, layer: HighlightLayer, key: TileKey) -> Option<Color> {
        self.layers[layer].get(&key).copied()
    }

    pub fn set(
        &mut self, layer: HighlightLayer, key: TileKey, color: Option<Color>,
    ) -> Option<VisualOp> {
        let old = match color {
            Some(color) => self.layers[layer].insert(key, color),
            None => self.layers[layer].remove(&key),
        };
        (old != color).then_some(VisualOp::SetTileHighlight { key, layer, color })
    }

    // Replaces the whole layer. Only tiles whose color actually changes produce an op:
    // first the removals, then the additions and recolorings.
    pub fn replace(
        &mut self, layer: HighlightLayer, new_layer: BTreeMap<TileKey, Color>,
    ) -> Vec<VisualOp> {
        let old_layer = std::mem::replace(&mut self.layers[layer], new_layer);
        let new_layer = &self.layers[layer];
        let removed = old_layer
            .keys()
            .filter(|&key| !new_layer.contains_key(key))
            .map(|&key| VisualOp::SetTileHighlight { key, layer, color: None });
        let changed = new_layer
            .iter()
            .filter(|&(key, color)| old_layer.get(key) != Some(color))
            .map(|(&key, &color)| VisualOp::SetTileHighlight { key, layer, color: Some(color) });
        removed.chain(changed).collect()
    }

    pub fn clear(&mut self, layer: HighlightLayer) -> Vec<VisualOp> {
        self.replace(layer, BTreeMap::new())
    }

    // Drops all highlights without emitting ops. Used on teardown, where removing the
    // tiles removes their highlights too.
    pub fn forget_all(&mut self) { self.layers = EnumMap::default(); }
}
