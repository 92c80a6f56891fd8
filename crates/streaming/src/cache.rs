use std::collections::{BTreeMap, BTreeSet};

use foundation::Aabb2;
use scene::BuildingRecord;

use crate::tile::TileKey;

/// Where an active record lives inside the cache.
#[derive(Debug, Copy, Clone)]
enum Slot {
    Tile { zoom: u8, key: TileKey, index: usize },
    Static { index: usize },
}

/// Imported records, keyed by zoom and tile, plus the active set the
/// renderer iterates.
///
/// A tile entry is one of three states. Missing: never loaded, a request
/// is due. `Some(records)`: loaded, possibly empty. `None`: loaded once
/// and then evicted; the placeholder stays so the zoom keeps its shape
/// while the records are freed, and a later activation pass re-requests
/// it like a missing tile.
///
/// Notes on determinism: both maps are ordered, so activation walks
/// tiles in (zoom, column, row) order and the active list is stable for
/// a given cache content regardless of insertion order.
#[derive(Debug, Default)]
pub struct TileCache {
    tiles: BTreeMap<u8, BTreeMap<TileKey, Option<Vec<BuildingRecord>>>>,
    statics: Vec<BuildingRecord>,
    seen: BTreeSet<String>,
    active: Vec<Slot>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the tile holds records (an empty load counts). Evicted
    /// placeholders and never-loaded tiles both answer false and should
    /// be requested again.
    pub fn is_cached(&self, zoom: u8, key: TileKey) -> bool {
        matches!(
            self.tiles.get(&zoom).and_then(|level| level.get(&key)),
            Some(Some(_))
        )
    }

    pub fn insert_tile(&mut self, zoom: u8, key: TileKey, records: Vec<BuildingRecord>) {
        self.tiles
            .entry(zoom)
            .or_default()
            .insert(key, Some(records));
    }

    /// Appends the tile's records to the active set, skipping ids that
    /// are already active. Features split across adjoining tiles render
    /// once this way. Returns how many records went live.
    pub fn activate_tile(&mut self, zoom: u8, key: TileKey) -> usize {
        let Some(records) = self
            .tiles
            .get(&zoom)
            .and_then(|level| level.get(&key))
            .and_then(|entry| entry.as_ref())
        else {
            return 0;
        };
        let mut added = 0;
        for (index, record) in records.iter().enumerate() {
            if self.seen.insert(record.id.clone()) {
                self.active.push(Slot::Tile { zoom, key, index });
                added += 1;
            }
        }
        added
    }

    /// Replaces the tile-independent record set fed by `set_data` and
    /// bbox loads.
    pub fn set_static(&mut self, records: Vec<BuildingRecord>) {
        self.statics = records;
    }

    pub fn activate_static(&mut self) -> usize {
        let mut added = 0;
        for (index, record) in self.statics.iter().enumerate() {
            if self.seen.insert(record.id.clone()) {
                self.active.push(Slot::Static { index });
                added += 1;
            }
        }
        added
    }

    /// Empties the active set ahead of a fresh activation pass. Cached
    /// records stay put.
    pub fn clear_active(&mut self) {
        self.active.clear();
        self.seen.clear();
    }

    /// Drops everything, static records included.
    pub fn clear_all(&mut self) {
        self.tiles.clear();
        self.statics.clear();
        self.seen.clear();
        self.active.clear();
    }

    /// Frees every loaded tile outside `zoom`, leaving placeholders.
    /// Returns the number of tiles freed.
    pub fn evict_other_zooms(&mut self, zoom: u8) -> usize {
        let mut freed = 0;
        for (level_zoom, level) in &mut self.tiles {
            if *level_zoom == zoom {
                continue;
            }
            for entry in level.values_mut() {
                if entry.take().is_some() {
                    freed += 1;
                }
            }
        }
        freed
    }

    /// Frees loaded tiles of `zoom` whose bounds miss the viewport
    /// rectangle. Returns the number of tiles freed.
    pub fn evict_invisible(&mut self, zoom: u8, viewport: &Aabb2) -> usize {
        let Some(level) = self.tiles.get_mut(&zoom) else {
            return 0;
        };
        let mut freed = 0;
        for (key, entry) in level.iter_mut() {
            if entry.is_some() && !key.bounds().intersects(viewport) {
                *entry = None;
                freed += 1;
            }
        }
        freed
    }

    /// Active records in activation order.
    pub fn active(&self) -> impl Iterator<Item = &BuildingRecord> {
        self.active.iter().filter_map(|slot| match *slot {
            Slot::Tile { zoom, key, index } => self
                .tiles
                .get(&zoom)
                .and_then(|level| level.get(&key))
                .and_then(|entry| entry.as_ref())
                .and_then(|records| records.get(index)),
            Slot::Static { index } => self.statics.get(index),
        })
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Tile entries known at `zoom`, evicted placeholders included.
    pub fn zoom_len(&self, zoom: u8) -> usize {
        self.tiles.get(&zoom).map_or(0, |level| level.len())
    }

    /// Advances every sub-1.0 fade scale by `amount`, clamped at 1.0.
    /// Answers whether any record still needed stepping; a false return
    /// is the signal to stop the fade timer.
    pub fn step_scales(&mut self, amount: f64) -> bool {
        let tiles = &mut self.tiles;
        let statics = &mut self.statics;
        let mut stepped = false;
        for slot in &self.active {
            let record = match *slot {
                Slot::Tile { zoom, key, index } => tiles
                    .get_mut(&zoom)
                    .and_then(|level| level.get_mut(&key))
                    .and_then(|entry| entry.as_mut())
                    .and_then(|records| records.get_mut(index)),
                Slot::Static { index } => statics.get_mut(index),
            };
            if let Some(record) = record
                && record.scale < 1.0
            {
                record.scale = (record.scale + amount).min(1.0);
                stepped = true;
            }
        }
        stepped
    }
}
