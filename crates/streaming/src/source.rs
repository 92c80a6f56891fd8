use std::collections::BTreeSet;

use foundation::math::StableF64;
use serde_json::Value;

use crate::tile::TileKey;

/// Geographic rectangle for area loads, degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Data provider the engine pulls GeoJSON from. Requests are
/// fire-and-forget; results come back through the engine's deliver
/// methods whenever the provider has them.
pub trait TileSource {
    fn request_tile(&mut self, key: TileKey, zoom: u8);
    fn request_feature(&mut self, id: &str);
    fn request_bbox(&mut self, bounds: GeoBounds);
    /// Drop whatever is still underway. Best effort; a delivery that
    /// races the abort is ignored by the in-flight bookkeeping.
    fn abort_all(&mut self);
    /// Completed requests ready to hand back, drained once per pump.
    /// Push-style providers leave this empty and feed the engine's
    /// deliver methods from their own callbacks instead.
    fn poll(&mut self) -> Vec<Delivery> {
        Vec::new()
    }
}

/// A completed request. `None` payloads are failed fetches; the engine
/// drops them without retrying.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Tile {
        zoom: u8,
        key: TileKey,
        payload: Option<Value>,
    },
    Feature {
        id: String,
        payload: Option<Value>,
    },
    Bbox {
        bounds: GeoBounds,
        payload: Option<Value>,
    },
}

/// Identity of one outstanding request, ordered so the pending set is
/// deterministic to walk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resource {
    Tile {
        zoom: u8,
        key: TileKey,
    },
    Feature {
        id: String,
    },
    Bbox {
        min_lat: StableF64,
        min_lon: StableF64,
        max_lat: StableF64,
        max_lon: StableF64,
    },
}

impl Resource {
    pub fn bbox(bounds: GeoBounds) -> Self {
        Resource::Bbox {
            min_lat: StableF64(bounds.min_lat),
            min_lon: StableF64(bounds.min_lon),
            max_lat: StableF64(bounds.max_lat),
            max_lon: StableF64(bounds.max_lon),
        }
    }
}

/// Pending-request ledger. Repeated asks for a resource collapse into
/// the one already underway.
#[derive(Debug, Default)]
pub struct InFlight {
    pending: BTreeSet<Resource>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the resource as underway. True means the caller owns the
    /// request and should issue it; false means it is already in
    /// flight.
    pub fn begin(&mut self, resource: Resource) -> bool {
        let begun = self.pending.insert(resource);
        if !begun {
            log::trace!("request coalesced into an in-flight one");
        }
        begun
    }

    /// Clears the resource on delivery. False for deliveries that were
    /// aborted or never asked for.
    pub fn finish(&mut self, resource: &Resource) -> bool {
        self.pending.remove(resource)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn contains(&self, resource: &Resource) -> bool {
        self.pending.contains(resource)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Source backed by one fixed FeatureCollection. Every tile and bbox
/// request answers with the whole collection; the cache's id dedup
/// collapses the overlap. Pulled deliveries make the exchange
/// synchronous and inspectable, which is what local data and tests
/// want.
#[derive(Debug)]
pub struct StaticSource {
    data: Value,
    deliveries: Vec<Delivery>,
}

impl StaticSource {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            deliveries: Vec::new(),
        }
    }

    /// Hands out everything requested since the last take.
    pub fn take_deliveries(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.deliveries)
    }

    fn find_feature(&self, id: &str) -> Option<Value> {
        let features = self.data.get("features")?.as_array()?;
        features
            .iter()
            .find(|feature| {
                feature_id(feature).as_deref() == Some(id)
                    || property_id(feature).as_deref() == Some(id)
            })
            .cloned()
    }
}

fn feature_id(feature: &Value) -> Option<String> {
    value_id(feature.get("id")?)
}

fn property_id(feature: &Value) -> Option<String> {
    value_id(feature.get("properties")?.get("id")?)
}

fn value_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl TileSource for StaticSource {
    fn request_tile(&mut self, key: TileKey, zoom: u8) {
        self.deliveries.push(Delivery::Tile {
            zoom,
            key,
            payload: Some(self.data.clone()),
        });
    }

    fn request_feature(&mut self, id: &str) {
        let payload = self.find_feature(id);
        if payload.is_none() {
            log::debug!("no feature {id} in the static collection");
        }
        self.deliveries.push(Delivery::Feature {
            id: id.to_owned(),
            payload,
        });
    }

    fn request_bbox(&mut self, bounds: GeoBounds) {
        self.deliveries.push(Delivery::Bbox {
            bounds,
            payload: Some(self.data.clone()),
        });
    }

    fn abort_all(&mut self) {
        self.deliveries.clear();
    }

    fn poll(&mut self) -> Vec<Delivery> {
        self.take_deliveries()
    }
}

#[cfg(test)]
mod tests {
    use super::{Delivery, GeoBounds, InFlight, Resource, StaticSource, TileSource};
    use crate::tile::TileKey;
    use serde_json::json;

    fn collection() -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 101,
                    "properties": { "height": 12 },
                    "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [0.001, 0.0], [0.001, 0.001], [0.0, 0.0]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "id": "hall", "height": 30 },
                    "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [0.002, 0.0], [0.002, 0.002], [0.0, 0.0]]] }
                }
            ]
        })
    }

    #[test]
    fn every_tile_request_serves_the_whole_collection() {
        let mut source = StaticSource::new(collection());
        source.request_tile(TileKey::new(4, 5), 16);
        source.request_bbox(GeoBounds {
            min_lat: 0.0,
            min_lon: 0.0,
            max_lat: 1.0,
            max_lon: 1.0,
        });

        let deliveries = source.take_deliveries();
        assert_eq!(deliveries.len(), 2);
        match &deliveries[0] {
            Delivery::Tile { zoom, key, payload } => {
                assert_eq!(*zoom, 16);
                assert_eq!(*key, TileKey::new(4, 5));
                assert_eq!(payload.as_ref(), Some(&collection()));
            }
            other => panic!("expected a tile delivery, got {other:?}"),
        }
        assert!(matches!(
            &deliveries[1],
            Delivery::Bbox { bounds, payload: Some(_) } if bounds.max_lat == 1.0
        ));
        assert!(source.take_deliveries().is_empty());
    }

    #[test]
    fn feature_requests_match_top_level_and_property_ids() {
        let mut source = StaticSource::new(collection());
        source.request_feature("101");
        source.request_feature("hall");
        source.request_feature("nowhere");

        let deliveries = source.take_deliveries();
        assert_eq!(deliveries.len(), 3);
        assert!(matches!(&deliveries[0], Delivery::Feature { payload: Some(_), .. }));
        assert!(matches!(&deliveries[1], Delivery::Feature { payload: Some(_), .. }));
        assert!(matches!(
            &deliveries[2],
            Delivery::Feature { id, payload: None } if id == "nowhere"
        ));
    }

    #[test]
    fn abort_drops_undelivered_work() {
        let mut source = StaticSource::new(collection());
        source.request_tile(TileKey::new(0, 0), 16);
        source.abort_all();
        assert!(source.take_deliveries().is_empty());
    }

    #[test]
    fn in_flight_requests_coalesce_until_finished() {
        let mut flight = InFlight::new();
        let tile = Resource::Tile {
            zoom: 16,
            key: TileKey::new(1, 2),
        };

        assert!(flight.begin(tile.clone()));
        assert!(!flight.begin(tile.clone()));
        assert_eq!(flight.len(), 1);

        assert!(flight.finish(&tile));
        assert!(!flight.finish(&tile));
        assert!(flight.begin(tile));
    }

    #[test]
    fn aborted_flights_ignore_late_deliveries() {
        let mut flight = InFlight::new();
        let bounds = GeoBounds {
            min_lat: 52.5,
            min_lon: 13.3,
            max_lat: 52.6,
            max_lon: 13.4,
        };
        flight.begin(Resource::bbox(bounds));
        flight.begin(Resource::Feature { id: "101".into() });

        flight.clear();
        assert!(flight.is_empty());
        assert!(!flight.finish(&Resource::bbox(bounds)));
    }
}
