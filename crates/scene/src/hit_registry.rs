use std::collections::BTreeMap;

use foundation::color::Rgba;

/// Bidirectional id-to-flat-color table for the picking pass.
///
/// Indices encode little-endian into RGB, so up to 2^24 - 1 records per
/// session keep distinct colors. Index 0 is reserved: a black pixel on
/// the hit surface means "nothing here".
///
/// The table only grows. `reset` empties it for a full data reload and
/// bumps the generation, which invalidates any pixel snapshot taken
/// against the old numbering.
#[derive(Debug, Default)]
pub struct HitRegistry {
    ids: Vec<Option<String>>,
    index_of: BTreeMap<String, usize>,
    generation: u64,
}

impl HitRegistry {
    pub fn new() -> Self {
        Self {
            ids: vec![None],
            index_of: BTreeMap::new(),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.ids.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable color for an id; a repeated id keeps its first color.
    pub fn color_for(&mut self, id: &str) -> Rgba {
        let index = match self.index_of.get(id) {
            Some(index) => *index,
            None => {
                let index = self.ids.len();
                self.ids.push(Some(id.to_string()));
                self.index_of.insert(id.to_string(), index);
                index
            }
        };
        Self::index_to_color(index)
    }

    /// Id behind a readback pixel, if the pixel carries one.
    pub fn decode(&self, r: u8, g: u8, b: u8) -> Option<&str> {
        let index = r as usize | (g as usize) << 8 | (b as usize) << 16;
        if index == 0 {
            return None;
        }
        self.ids.get(index)?.as_deref()
    }

    /// Drop every entry and invalidate outstanding snapshots.
    pub fn reset(&mut self) {
        self.ids.clear();
        self.ids.push(None);
        self.index_of.clear();
        self.generation += 1;
    }

    fn index_to_color(index: usize) -> Rgba {
        Rgba::opaque(
            (index & 0xff) as u8,
            ((index >> 8) & 0xff) as u8,
            ((index >> 16) & 0xff) as u8,
        )
    }
}
