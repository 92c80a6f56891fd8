//! The embeddable surface: one facade over the view, the tile cache
//! and the layer stack, driven entirely by host events and an explicit
//! pump. Nothing in here reads a wall clock, so the same sequence of
//! calls always paints the same picture.

use foundation::color::Color;
use foundation::math::{Vec2, pixel_to_geo};
use foundation::time::Timestamp;
use formats::{GeoFeature, GeoJsonError, import_collection};
use layers::LayerStack;
use runtime::{Event, EventBus, RedrawLatch, Timers};
use scene::{BuildingRecord, HitRegistry, ViewState};
use serde_json::Value;
use streaming::{
    Delivery, GeoBounds, InFlight, Resource, TileCache, TileKey, TileSource, covering,
};

pub mod style;

pub use scene::MIN_ZOOM;
pub use style::*;

/// Fade-in timer period.
pub const FADE_INTERVAL_MS: u64 = 33;
/// Scale added to every growing record per fade tick.
pub const FADE_STEP: f64 = 0.1;
/// Quiet time after the last full repaint before the picking surface
/// re-snapshots.
pub const HIT_DEBOUNCE_MS: u64 = 500;

const FADE_TIMER: &str = "fade";
const HIT_TIMER: &str = "hit";

/// Pick result handed to the click callback.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    /// Feature id of the hit record, or its relation id when grouped.
    pub feature: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One massing session. Hosts feed pointer and camera events in, pass
/// the current time to the methods that need one, and call
/// [`Engine::pump`] whenever they can afford a repaint. Completed
/// requests come back through the `deliver_*` methods, or through a
/// polling [`TileSource`] drained inside the pump.
pub struct Engine {
    view: ViewState,
    cache: TileCache,
    registry: HitRegistry,
    stack: LayerStack,
    timers: Timers,
    redraw: RedrawLatch,
    in_flight: InFlight,
    events: EventBus,
    source: Option<Box<dyn TileSource>>,
    static_data: Option<Value>,
    zooming: bool,
    filter: Option<Box<dyn Fn(&GeoFeature) -> bool>>,
    click_handler: Option<Box<dyn FnMut(ClickEvent)>>,
    details_handler: Option<Box<dyn FnMut(&str, &Value)>>,
}

impl Engine {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            view: ViewState::new(width as f64, height as f64),
            cache: TileCache::new(),
            registry: HitRegistry::new(),
            stack: LayerStack::new(width, height),
            timers: Timers::new(),
            redraw: RedrawLatch::new(),
            in_flight: InFlight::new(),
            events: EventBus::new(),
            source: None,
            static_data: None,
            zooming: false,
            filter: None,
            click_handler: None,
            details_handler: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.stack.width()
    }

    pub fn height(&self) -> u32 {
        self.stack.height()
    }

    /// Wires a data provider and loads the current viewport from it.
    pub fn set_source(&mut self, source: Box<dyn TileSource>, now_ms: u64) {
        self.source = Some(source);
        self.update(now_ms);
    }

    /// Inclusion predicate applied to every feature on import. Takes
    /// effect from the next import, not retroactively.
    pub fn set_filter(&mut self, filter: impl Fn(&GeoFeature) -> bool + 'static) {
        self.filter = Some(Box::new(filter));
    }

    pub fn set_click_handler(&mut self, handler: impl FnMut(ClickEvent) + 'static) {
        self.click_handler = Some(Box::new(handler));
    }

    /// Receives the raw GeoJSON payloads answered to
    /// [`Engine::get_details`].
    pub fn set_details_handler(&mut self, handler: impl FnMut(&str, &Value) + 'static) {
        self.details_handler = Some(Box::new(handler));
    }

    /// Replaces whatever is loaded with one standalone collection. The
    /// records grow in from the ground; later viewport changes
    /// re-import the same collection at full height.
    ///
    /// A payload that fails to import leaves an empty, consistent
    /// scene and the error with the caller.
    pub fn set_data(&mut self, data: Value, now_ms: u64) -> Result<(), GeoJsonError> {
        self.registry.reset();
        self.cache.clear_all();
        self.static_data = None;
        self.redraw.request(false);
        let records =
            import_collection(&data, &self.view, &mut self.registry, self.filter.as_deref())?;
        self.cache.set_static(records);
        self.cache.activate_static();
        self.static_data = Some(data);
        self.timers.schedule_repeating(FADE_TIMER, FADE_INTERVAL_MS, now_ms);
        Ok(())
    }

    /// Asks the provider for everything inside `bounds`. The answer
    /// replaces the current dataset when it arrives.
    pub fn load_bbox(&mut self, bounds: GeoBounds) {
        let Some(source) = &mut self.source else {
            return;
        };
        if self.in_flight.begin(Resource::bbox(bounds)) {
            source.request_bbox(bounds);
        }
    }

    /// Asks the provider for one feature's raw GeoJSON by id. The
    /// payload lands in the details handler; repeated asks coalesce
    /// while one is in flight.
    pub fn get_details(&mut self, id: &str) {
        let Some(source) = &mut self.source else {
            return;
        };
        if self.in_flight.begin(Resource::Feature { id: id.to_owned() }) {
            source.request_feature(id);
        }
    }

    /// Applies style overrides. Unparseable colors leave the current
    /// palette in place.
    pub fn style(&mut self, config: &StyleConfig) {
        if let Some(raw) = config.wall_source() {
            match Color::parse(raw) {
                Some(color) => self.view.set_wall_color(color),
                None => log::debug!("wall color {raw:?} does not parse, keeping palette"),
            }
        }
        if let Some(raw) = config.roof_color.as_deref() {
            match Color::parse(raw) {
                Some(color) => self.view.set_roof_color(color),
                None => log::debug!("roof color {raw:?} does not parse, keeping palette"),
            }
        }
        if let Some(enabled) = config.shadows {
            self.stack.shadow_pass.enabled = enabled;
        }
        self.redraw.request(false);
    }

    /// Moves the sun. The shadow surface repaints right away;
    /// everything else stays as drawn.
    pub fn set_date(&mut self, date: Timestamp) {
        self.stack.shadow_pass.set_date(date);
        let records: Vec<&BuildingRecord> = self.cache.active().collect();
        self.stack.render_shadows(&self.view, &records, self.zooming);
    }

    pub fn on_resize(&mut self, width: u32, height: u32, now_ms: u64) {
        self.view.set_size(width as f64, height as f64);
        self.stack.set_size(width, height);
        self.update(now_ms);
    }

    /// Transient camera shift while a pan gesture is underway. Only
    /// the extruded buildings follow it; the slow surfaces wait for
    /// [`Engine::on_move_end`].
    pub fn on_move(&mut self, offset: Vec2) {
        self.view.move_cam(offset);
        self.redraw.request(true);
    }

    /// Pan settled: the camera snaps back over the viewport center and
    /// the view re-anchors at `origin`.
    pub fn on_move_end(&mut self, origin: Vec2, now_ms: u64) {
        self.view.move_cam(Vec2::new(0.0, 0.0));
        self.view.set_origin(origin);
        self.update(now_ms);
    }

    pub fn on_zoom_start(&mut self) {
        self.zooming = true;
        self.redraw.request(false);
    }

    pub fn on_zoom_end(&mut self, zoom: u8, origin: Vec2, now_ms: u64) {
        self.zooming = false;
        self.view.set_zoom(zoom);
        self.view.set_origin(origin);
        self.update(now_ms);
    }

    /// Resolves a pointer position against the picking snapshot and
    /// feeds the click callback. Pointers over empty ground do
    /// nothing.
    pub fn on_click(&mut self, x: f64, y: f64) {
        let Some(id) = self.stack.query_hit(x, y, &self.registry) else {
            return;
        };
        let feature = id.to_owned();
        let geo = pixel_to_geo(x + self.view.origin.x, y + self.view.origin.y, self.view.map_size());
        if let Some(handler) = self.click_handler.as_mut() {
            handler(ClickEvent {
                feature,
                latitude: geo.latitude,
                longitude: geo.longitude,
            });
        }
    }

    /// One host animation tick: drains a polling source, fires due
    /// timers and performs at most one repaint.
    pub fn pump(&mut self, now_ms: u64) {
        let deliveries = match &mut self.source {
            Some(source) => source.poll(),
            None => Vec::new(),
        };
        for delivery in deliveries {
            match delivery {
                Delivery::Tile { zoom, key, payload } => {
                    self.deliver_tile(zoom, key, payload, now_ms)
                }
                Delivery::Feature { id, payload } => self.deliver_feature(&id, payload),
                Delivery::Bbox { bounds, payload } => self.deliver_bbox(bounds, payload, now_ms),
            }
        }

        for timer in self.timers.fire_due(now_ms) {
            match timer {
                FADE_TIMER => {
                    let growing = self.cache.step_scales(FADE_STEP);
                    self.redraw.request(false);
                    if !growing {
                        self.timers.cancel(FADE_TIMER);
                        self.events.emit(now_ms, "fade", "settled");
                    }
                }
                HIT_TIMER => {
                    let records: Vec<&BuildingRecord> = self.cache.active().collect();
                    self.stack
                        .render_hit(&self.view, &records, self.zooming, self.registry.generation());
                    self.events.emit(now_ms, "hit", "snapshot");
                }
                _ => {}
            }
        }

        if let Some(quick) = self.redraw.take() {
            let records: Vec<&BuildingRecord> = self.cache.active().collect();
            self.stack.render(&self.view, &records, self.zooming, quick);
            if !quick {
                self.timers.schedule_once(HIT_TIMER, HIT_DEBOUNCE_MS, now_ms);
            }
        }
    }

    /// Hands a finished tile request to the engine. `None` means the
    /// fetch failed; the tile stays unrequested until the viewport
    /// next changes. Deliveries nothing waits for are dropped, which
    /// is how requests outlive a viewport change harmlessly.
    pub fn deliver_tile(&mut self, zoom: u8, key: TileKey, payload: Option<Value>, now_ms: u64) {
        if !self.in_flight.finish(&Resource::Tile { zoom, key }) {
            log::trace!("stale tile {key} at zoom {zoom} dropped");
            return;
        }
        let Some(payload) = payload else {
            log::debug!("tile {key} at zoom {zoom} failed to load");
            return;
        };
        let records = match import_collection(
            &payload,
            &self.view,
            &mut self.registry,
            self.filter.as_deref(),
        ) {
            Ok(records) => records,
            Err(err) => {
                log::debug!("tile {key} at zoom {zoom} rejected: {err}");
                return;
            }
        };
        self.events.emit(now_ms, "tiles", format!("loaded {key} at zoom {zoom}"));
        self.cache.insert_tile(zoom, key, records);
        if zoom == self.view.zoom {
            self.cache.activate_tile(zoom, key);
            self.timers.schedule_repeating(FADE_TIMER, FADE_INTERVAL_MS, now_ms);
            self.redraw.request(false);
        }
    }

    /// Hands a finished details request to the engine.
    pub fn deliver_feature(&mut self, id: &str, payload: Option<Value>) {
        if !self.in_flight.finish(&Resource::Feature { id: id.to_owned() }) {
            log::trace!("stale details for {id} dropped");
            return;
        }
        let Some(payload) = payload else {
            log::debug!("details for {id} failed to load");
            return;
        };
        if let Some(handler) = self.details_handler.as_mut() {
            handler(id, &payload);
        }
    }

    /// Hands a finished area request to the engine. The payload
    /// becomes the new standalone dataset.
    pub fn deliver_bbox(&mut self, bounds: GeoBounds, payload: Option<Value>, now_ms: u64) {
        if !self.in_flight.finish(&Resource::bbox(bounds)) {
            log::trace!("stale bbox answer dropped");
            return;
        }
        let Some(payload) = payload else {
            log::debug!("bbox load failed");
            return;
        };
        if let Err(err) = self.set_data(payload, now_ms) {
            log::debug!("bbox payload rejected: {err}");
        }
    }

    /// Renders everything at full height and hands the composite back
    /// as premultiplied RGBA, row major. In-progress fades are fast
    /// forwarded rather than caught mid-grow.
    pub fn screenshot(&mut self) -> Vec<u8> {
        self.timers.cancel(FADE_TIMER);
        self.cache.step_scales(1.0);
        let records: Vec<&BuildingRecord> = self.cache.active().collect();
        self.stack.render(&self.view, &records, self.zooming, false);
        self.redraw.take();
        self.stack.screenshot()
    }

    /// Drains the activity trace, stamped with the virtual clock the
    /// host supplied. Mostly useful to assert ordering in tests.
    pub fn trace(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Rebuilds the active set for the current viewport: the
    /// standalone dataset re-imports at the current zoom, cached tiles
    /// come back as they are and missing ones are requested.
    /// Everything in flight for the previous viewport is dropped
    /// first.
    fn update(&mut self, now_ms: u64) {
        self.cache.clear_active();
        if let Some(source) = &mut self.source {
            source.abort_all();
        }
        self.in_flight.clear();
        self.redraw.request(false);

        if self.view.zoom < MIN_ZOOM {
            return;
        }
        self.events.emit(now_ms, "update", format!("viewport at zoom {}", self.view.zoom));

        let mut activated = false;

        if let Some(data) = &self.static_data {
            match import_collection(data, &self.view, &mut self.registry, self.filter.as_deref()) {
                Ok(mut records) => {
                    // Data already on screen re-enters at full height.
                    for record in &mut records {
                        record.scale = 1.0;
                    }
                    self.cache.set_static(records);
                }
                Err(err) => log::debug!("standalone data failed to re-import: {err}"),
            }
            self.cache.activate_static();
            activated = true;
        }

        self.cache.evict_other_zooms(self.view.zoom);
        self.cache.evict_invisible(self.view.zoom, &self.view.viewport());

        let zoom = self.view.zoom;
        if let Some(source) = &mut self.source {
            for key in covering(self.view.origin, self.stack.width(), self.stack.height()) {
                if self.cache.is_cached(zoom, key) {
                    self.cache.activate_tile(zoom, key);
                    activated = true;
                } else if self.in_flight.begin(Resource::Tile { zoom, key }) {
                    self.events.emit(now_ms, "tiles", format!("request {key} at zoom {zoom}"));
                    source.request_tile(key, zoom);
                }
            }
        }

        if activated {
            self.timers.schedule_repeating(FADE_TIMER, FADE_INTERVAL_MS, now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use foundation::math::{Geo, Vec2, geo_to_pixel, map_size};
    use foundation::time::Timestamp;
    use scene::MIN_ZOOM;
    use serde_json::{Value, json};
    use streaming::{GeoBounds, StaticSource, covering};

    use super::{ClickEvent, Engine, FADE_INTERVAL_MS, HIT_DEBOUNCE_MS, StyleConfig};

    fn square(lon: f64, lat: f64, side: f64) -> Value {
        json!([[
            [lon, lat],
            [lon + side, lat],
            [lon + side, lat - side],
            [lon, lat - side],
            [lon, lat],
        ]])
    }

    fn collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 42,
                "properties": { "height": 60 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": square(13.4, 52.52, 0.0009),
                },
            }],
        })
    }

    /// Engine over a 200 pixel viewport with geographic Berlin center
    /// at screen (100, 100).
    fn berlin_engine(zoom: u8) -> (Engine, Vec2) {
        let mut engine = Engine::new(200, 200);
        let origin = geo_to_pixel(Geo::new(52.52, 13.4), map_size(zoom)) - Vec2::new(100.0, 100.0);
        engine.on_zoom_end(zoom, origin, 0);
        (engine, origin)
    }

    /// Pumps until the fade timer cancels itself.
    fn settle_fade(engine: &mut Engine, mut now: u64) -> u64 {
        let deadline = now + 40 * FADE_INTERVAL_MS;
        while engine.timers.is_armed("fade") {
            now += FADE_INTERVAL_MS;
            engine.pump(now);
            assert!(now < deadline, "fade never settled");
        }
        now
    }

    #[test]
    fn standalone_data_fades_in_and_settles() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_data(collection(), 0).unwrap();
        assert_eq!(engine.cache.active_len(), 1);
        assert!(engine.timers.is_armed("fade"));

        engine.pump(0);
        let scales: Vec<f64> = engine.cache.active().map(|r| r.scale).collect();
        assert_eq!(scales, vec![0.0], "first fade tick is still ahead");

        settle_fade(&mut engine, 0);
        assert!(engine.cache.active().all(|r| r.scale == 1.0));
        let trace = engine.trace();
        assert!(trace.iter().any(|e| e.kind == "fade" && e.message == "settled"));
    }

    #[test]
    fn adjoining_tiles_share_one_record() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_source(Box::new(StaticSource::new(collection())), 0);
        // every covering tile answers with the same collection
        assert!(engine.in_flight.len() >= 4);

        engine.pump(0);
        assert!(engine.in_flight.is_empty());
        assert_eq!(engine.cache.active_len(), 1);
        let ids: Vec<&str> = engine.cache.active().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["42"]);
    }

    #[test]
    fn zoom_change_evicts_other_levels_and_reloads() {
        let (mut engine, origin16) = berlin_engine(16);
        engine.set_source(Box::new(StaticSource::new(collection())), 0);
        engine.pump(0);
        let key16 = covering(origin16, 200, 200)[0];
        assert!(engine.cache.is_cached(16, key16));

        let origin17 = geo_to_pixel(Geo::new(52.52, 13.4), map_size(17)) - Vec2::new(100.0, 100.0);
        engine.on_zoom_end(17, origin17, 1_000);
        assert!(!engine.cache.is_cached(16, key16));
        assert_eq!(engine.cache.active_len(), 0);

        engine.pump(1_000);
        assert_eq!(engine.cache.active_len(), 1);
    }

    #[test]
    fn re_imported_standalone_data_keeps_full_height() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_data(collection(), 0).unwrap();
        let scales: Vec<f64> = engine.cache.active().map(|r| r.scale).collect();
        assert_eq!(scales, vec![0.0], "fresh data grows from the ground");
        let generation = engine.registry.generation();

        let origin17 = geo_to_pixel(Geo::new(52.52, 13.4), map_size(17)) - Vec2::new(100.0, 100.0);
        engine.on_zoom_end(17, origin17, 50);
        let scales: Vec<f64> = engine.cache.active().map(|r| r.scale).collect();
        assert_eq!(scales, vec![1.0], "the same data at a new zoom shows at once");
        assert_eq!(engine.registry.generation(), generation);
    }

    #[test]
    fn below_min_zoom_nothing_loads_or_stays_active() {
        let (mut engine, origin) = berlin_engine(16);
        engine.set_source(Box::new(StaticSource::new(collection())), 0);
        engine.pump(0);
        assert_eq!(engine.cache.active_len(), 1);

        engine.on_zoom_end(MIN_ZOOM - 1, origin, 100);
        assert_eq!(engine.cache.active_len(), 0);
        assert!(engine.in_flight.is_empty());
        engine.pump(100);
        assert_eq!(engine.cache.active_len(), 0);
    }

    #[test]
    fn a_short_pan_reuses_cached_tiles() {
        let (mut engine, origin) = berlin_engine(16);
        engine.set_source(Box::new(StaticSource::new(collection())), 0);
        engine.pump(0);

        // ten pixels stays inside the loaded tile block
        engine.on_move_end(origin + Vec2::new(10.0, 0.0), 100);
        assert!(engine.in_flight.is_empty());
        assert_eq!(engine.cache.active_len(), 1);
    }

    #[test]
    fn pans_render_quick_and_settle_full() {
        let (mut engine, origin) = berlin_engine(16);
        engine.set_data(collection(), 0).unwrap();
        engine.screenshot();
        engine.redraw.request(false);
        engine.pump(0);
        assert!(engine.timers.is_armed("hit"));
        engine.pump(HIT_DEBOUNCE_MS);
        assert!(!engine.timers.is_armed("hit"));

        engine.on_move(Vec2::new(4.0, 0.0));
        engine.pump(HIT_DEBOUNCE_MS + 10);
        assert!(!engine.timers.is_armed("hit"), "quick renders skip the picking pass");

        engine.on_move_end(origin + Vec2::new(4.0, 0.0), HIT_DEBOUNCE_MS + 20);
        engine.pump(HIT_DEBOUNCE_MS + 20);
        assert!(engine.timers.is_armed("hit"), "settling repaints everything");
    }

    #[test]
    fn the_picking_pass_waits_for_a_quiet_spell() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_data(collection(), 0).unwrap();
        engine.screenshot();
        engine.redraw.request(false);
        engine.pump(0);
        assert!(engine.stack.query_hit(120.0, 130.0, &engine.registry).is_none());

        engine.redraw.request(false);
        engine.pump(300);
        assert!(
            engine.stack.query_hit(120.0, 130.0, &engine.registry).is_none(),
            "renders at 0 and 300 slide the deadline to 800"
        );
        engine.pump(500);
        assert!(engine.stack.query_hit(120.0, 130.0, &engine.registry).is_none());

        engine.pump(800);
        assert_eq!(engine.stack.query_hit(120.0, 130.0, &engine.registry), Some("42"));
    }

    #[test]
    fn clicks_resolve_the_feature_and_its_location() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_data(collection(), 0).unwrap();
        let clicks: Rc<RefCell<Vec<ClickEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        engine.set_click_handler(move |event| sink.borrow_mut().push(event));

        engine.screenshot();
        engine.redraw.request(false);
        engine.pump(0);
        engine.pump(HIT_DEBOUNCE_MS);

        engine.on_click(10.0, 10.0);
        assert!(clicks.borrow().is_empty(), "empty ground swallows the click");

        engine.on_click(120.0, 130.0);
        let events = clicks.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].feature, "42");
        assert!((events[0].latitude - 52.52).abs() < 0.01);
        assert!((events[0].longitude - 13.4).abs() < 0.01);
    }

    #[test]
    fn feature_details_coalesce_while_in_flight() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_source(Box::new(StaticSource::new(collection())), 0);
        engine.pump(0);

        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine.set_details_handler(move |id, _payload| sink.borrow_mut().push(id.to_owned()));

        engine.get_details("42");
        engine.get_details("42");
        engine.pump(10);
        assert_eq!(seen.borrow().as_slice(), &["42"][..]);

        engine.get_details("nowhere");
        engine.pump(20);
        assert_eq!(seen.borrow().len(), 1, "unknown ids fail without a callback");
        assert!(engine.in_flight.is_empty());
    }

    #[test]
    fn a_bbox_load_replaces_the_dataset() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_source(Box::new(StaticSource::new(collection())), 0);
        engine.pump(0);
        assert_eq!(engine.cache.active_len(), 1);
        let generation = engine.registry.generation();

        engine.load_bbox(GeoBounds {
            min_lat: 52.0,
            min_lon: 13.0,
            max_lat: 53.0,
            max_lon: 14.0,
        });
        engine.pump(10);
        assert!(engine.static_data.is_some());
        assert_eq!(engine.cache.active_len(), 1);
        assert_eq!(engine.cache.zoom_len(16), 0, "the tile cache was dropped");
        assert_eq!(engine.registry.generation(), generation + 1);
    }

    #[test]
    fn zooming_blanks_the_picture() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_data(collection(), 0).unwrap();
        let shot = engine.screenshot();
        assert!(shot.chunks_exact(4).any(|px| px[3] != 0));

        engine.on_zoom_start();
        let shot = engine.screenshot();
        assert!(shot.chunks_exact(4).all(|px| px[3] == 0));
    }

    #[test]
    fn style_overrides_recolor_the_scene() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_data(collection(), 0).unwrap();
        let plain = engine.screenshot();

        engine.style(&StyleConfig {
            wall_color: Some("#ff0000".into()),
            ..StyleConfig::default()
        });
        let red = engine.screenshot();
        assert_ne!(plain, red);

        engine.style(&StyleConfig {
            roof_color: Some("#00ff00".into()),
            ..StyleConfig::default()
        });
        let green_roof = engine.screenshot();
        assert_ne!(red, green_roof);

        engine.style(&StyleConfig {
            roof_color: Some("not a color".into()),
            ..StyleConfig::default()
        });
        assert_eq!(engine.screenshot(), green_roof, "bad colors keep the palette");
    }

    #[test]
    fn the_shadow_surface_follows_the_date() {
        let (mut engine, _) = berlin_engine(16);
        engine.style(&StyleConfig {
            shadows: Some(true),
            ..StyleConfig::default()
        });
        engine.set_data(collection(), 0).unwrap();
        let night = engine.screenshot();

        // 2013-06-21 12:00 UTC, early afternoon in Berlin
        engine.set_date(Timestamp(1_371_808_800_000));
        let noon = engine.screenshot();
        assert_ne!(night, noon);
    }

    #[test]
    fn resize_grows_the_tile_cover() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_source(Box::new(StaticSource::new(collection())), 0);
        engine.pump(0);
        let loaded = engine.cache.zoom_len(16);

        engine.on_resize(600, 600, 100);
        assert_eq!(engine.width(), 600);
        engine.pump(100);
        assert!(engine.cache.zoom_len(16) > loaded, "a wider viewport wants more tiles");
    }

    #[test]
    fn trace_orders_requests_before_deliveries() {
        let (mut engine, _) = berlin_engine(16);
        engine.set_source(Box::new(StaticSource::new(collection())), 0);
        engine.pump(0);

        let events = engine.trace();
        assert_eq!(events[0].kind, "update");
        let requests = events
            .iter()
            .filter(|e| e.kind == "tiles" && e.message.starts_with("request"))
            .count();
        let loads = events
            .iter()
            .filter(|e| e.kind == "tiles" && e.message.starts_with("loaded"))
            .count();
        assert!(requests >= 4);
        assert_eq!(requests, loads);
        let last_request = events
            .iter()
            .rposition(|e| e.message.starts_with("request"))
            .unwrap();
        let first_load = events
            .iter()
            .position(|e| e.message.starts_with("loaded"))
            .unwrap();
        assert!(last_request < first_load);
    }
}
