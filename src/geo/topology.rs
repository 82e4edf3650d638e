//! TopoJSON decoding.
//!
//! A topology stores each shared boundary once as an "arc"; geometries refer
//! to arcs by index, with `~i` (encoded as `-i - 1`) meaning arc `i` walked
//! backwards. Quantized topologies delta-encode arc positions as integers and
//! carry a `transform` that maps them back to longitude/latitude.

use super::GeoFeature;
use crate::error::TopologyError;
use geo_types::Coord;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Quantization transform of a topology.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> Coord<f64> {
        Coord {
            x: x * self.scale[0] + self.translate[0],
            y: y * self.scale[1] + self.translate[1],
        }
    }
}

/// A geometry object as stored in the topology.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    Point {
        coordinates: Vec<f64>,
    },
    MultiPoint {
        coordinates: Vec<Vec<f64>>,
    },
    LineString {
        arcs: Vec<i64>,
    },
    MultiLineString {
        arcs: Vec<Vec<i64>>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
    },
    GeometryCollection {
        geometries: Vec<CollectionMember>,
    },
}

/// Member of a geometry collection. Null geometries (`"type": null`) and
/// unknown types are kept as raw JSON and skipped during conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CollectionMember {
    Geometry(TopoGeometry),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct RawTopology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, TopoGeometry>,
}

/// A decoded topology with absolute arc coordinates.
#[derive(Debug, Clone)]
pub struct Topology {
    transform: Option<Transform>,
    /// Arcs in longitude/latitude, already un-quantized.
    arcs: Vec<Vec<Coord<f64>>>,
    objects: BTreeMap<String, TopoGeometry>,
}

impl Topology {
    /// Parses a TopoJSON document.
    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Parses a TopoJSON document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTopology) -> Result<Self, TopologyError> {
        if raw.kind != "Topology" {
            return Err(TopologyError::NotTopology(raw.kind));
        }

        let arcs = raw
            .arcs
            .iter()
            .map(|arc| decode_arc(arc, raw.transform.as_ref()))
            .collect();

        Ok(Self {
            transform: raw.transform,
            arcs,
            objects: raw.objects,
        })
    }

    pub fn has_object(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    #[cfg(test)]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Converts a named object to features.
    pub fn feature(&self, name: &str) -> Result<Vec<GeoFeature>, TopologyError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_string()))?;

        let mut features = Vec::new();
        self.collect_features(object, &mut features)?;
        Ok(features)
    }

    /// Returns every arc used by a named object exactly once, as lines.
    ///
    /// For a countries object this yields the land/sea coastline plus every
    /// internal border without drawing shared borders twice.
    pub fn mesh(&self, name: &str) -> Result<Vec<Vec<Coord<f64>>>, TopologyError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_string()))?;

        let mut indices = Vec::new();
        collect_arc_indices(object, &mut indices);

        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for index in indices {
            let absolute = absolute_arc_index(index);
            if seen.insert(absolute) {
                lines.push(self.arc(absolute as i64)?.to_vec());
            }
        }
        Ok(lines)
    }

    fn collect_features(
        &self,
        geometry: &TopoGeometry,
        out: &mut Vec<GeoFeature>,
    ) -> Result<(), TopologyError> {
        match geometry {
            TopoGeometry::Point { coordinates } => {
                if let Some(coord) = self.position(coordinates) {
                    out.push(GeoFeature::Point(coord));
                }
            }
            TopoGeometry::MultiPoint { coordinates } => {
                for position in coordinates {
                    if let Some(coord) = self.position(position) {
                        out.push(GeoFeature::Point(coord));
                    }
                }
            }
            TopoGeometry::LineString { arcs } => {
                out.push(GeoFeature::LineString(self.line(arcs)?));
            }
            TopoGeometry::MultiLineString { arcs } => {
                let lines = arcs
                    .iter()
                    .map(|line| self.line(line))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push(GeoFeature::MultiLineString(lines));
            }
            TopoGeometry::Polygon { arcs } => {
                if let Some((exterior, holes)) = self.polygon(arcs)? {
                    out.push(GeoFeature::Polygon { exterior, holes });
                }
            }
            TopoGeometry::MultiPolygon { arcs } => {
                let mut polygons = Vec::with_capacity(arcs.len());
                for rings in arcs {
                    if let Some(polygon) = self.polygon(rings)? {
                        polygons.push(polygon);
                    }
                }
                out.push(GeoFeature::MultiPolygon(polygons));
            }
            TopoGeometry::GeometryCollection { geometries } => {
                for member in geometries {
                    match member {
                        CollectionMember::Geometry(g) => self.collect_features(g, out)?,
                        CollectionMember::Other(raw) => {
                            log::debug!("Skipping geometry of type {}", raw["type"]);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Rings of a polygon: the first is the exterior, the rest are holes.
    #[allow(clippy::type_complexity)]
    fn polygon(
        &self,
        rings: &[Vec<i64>],
    ) -> Result<Option<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)>, TopologyError> {
        let Some((first, rest)) = rings.split_first() else {
            return Ok(None);
        };
        let exterior = self.line(first)?;
        let holes = rest
            .iter()
            .map(|ring| self.line(ring))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some((exterior, holes)))
    }

    /// Stitches arcs into one line. Consecutive arcs share their joining
    /// point, so it is only kept once.
    fn line(&self, indices: &[i64]) -> Result<Vec<Coord<f64>>, TopologyError> {
        let mut points: Vec<Coord<f64>> = Vec::new();
        for &index in indices {
            let arc = self.arc(index)?;
            let skip = usize::from(!points.is_empty());
            if index < 0 {
                points.extend(arc.iter().rev().skip(skip).copied());
            } else {
                points.extend(arc.iter().skip(skip).copied());
            }
        }
        Ok(points)
    }

    fn arc(&self, index: i64) -> Result<&[Coord<f64>], TopologyError> {
        self.arcs
            .get(absolute_arc_index(index))
            .map(Vec::as_slice)
            .ok_or(TopologyError::ArcOutOfRange {
                index,
                count: self.arcs.len(),
            })
    }

    /// Decodes a point position; these are quantized but never delta-encoded.
    fn position(&self, position: &[f64]) -> Option<Coord<f64>> {
        let [x, y, ..] = position else {
            return None;
        };
        Some(match &self.transform {
            Some(t) => t.apply(*x, *y),
            None => Coord { x: *x, y: *y },
        })
    }
}

fn absolute_arc_index(index: i64) -> usize {
    if index < 0 {
        (!index) as usize
    } else {
        index as usize
    }
}

fn decode_arc(arc: &[Vec<f64>], transform: Option<&Transform>) -> Vec<Coord<f64>> {
    match transform {
        Some(t) => {
            let (mut x, mut y) = (0.0, 0.0);
            arc.iter()
                .filter_map(|p| match p.as_slice() {
                    [dx, dy, ..] => {
                        x += dx;
                        y += dy;
                        Some(t.apply(x, y))
                    }
                    _ => None,
                })
                .collect()
        }
        None => arc
            .iter()
            .filter_map(|p| match p.as_slice() {
                [x, y, ..] => Some(Coord { x: *x, y: *y }),
                _ => None,
            })
            .collect(),
    }
}

fn collect_arc_indices(geometry: &TopoGeometry, out: &mut Vec<i64>) {
    match geometry {
        TopoGeometry::Point { .. } | TopoGeometry::MultiPoint { .. } => {}
        TopoGeometry::LineString { arcs } => out.extend(arcs),
        TopoGeometry::MultiLineString { arcs } | TopoGeometry::Polygon { arcs } => {
            out.extend(arcs.iter().flatten())
        }
        TopoGeometry::MultiPolygon { arcs } => out.extend(arcs.iter().flatten().flatten()),
        TopoGeometry::GeometryCollection { geometries } => {
            for member in geometries {
                if let CollectionMember::Geometry(g) = member {
                    collect_arc_indices(g, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two squares sharing one edge, quantized with a 1-degree grid.
    const SHARED_EDGE: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [1, 1], "translate": [10, 20]},
        "objects": {
            "land": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "arcs": [[0, 1]]},
                    {"type": "Polygon", "arcs": [[2, -1]]},
                    {"type": null}
                ]
            },
            "capital": {"type": "Point", "coordinates": [1, 1]}
        },
        "arcs": [
            [[2, 0], [0, 2]],
            [[2, 2], [-2, 0], [0, -2], [2, 0]],
            [[2, 0], [2, 0], [0, 2], [-2, 0]]
        ]
    }"#;

    #[test]
    fn test_delta_decoding_and_transform() {
        let topology = Topology::from_json(SHARED_EDGE).unwrap();
        assert_eq!(topology.arc_count(), 3);

        let features = topology.feature("land").unwrap();
        assert_eq!(features.len(), 2);

        let GeoFeature::Polygon { exterior, .. } = &features[0] else {
            panic!("expected polygon");
        };
        assert_eq!(exterior.first(), Some(&Coord { x: 12.0, y: 20.0 }));
        assert_eq!(exterior.last(), Some(&Coord { x: 12.0, y: 20.0 }));
        assert_eq!(exterior.len(), 5);
    }

    #[test]
    fn test_reversed_arc_reference() {
        let topology = Topology::from_json(SHARED_EDGE).unwrap();
        let features = topology.feature("land").unwrap();

        let GeoFeature::Polygon { exterior, .. } = &features[1] else {
            panic!("expected polygon");
        };
        // Arc 2 ends at (12, 22); the reversed shared edge walks back down to (12, 20).
        assert_eq!(exterior.len(), 5);
        assert_eq!(exterior[3], Coord { x: 12.0, y: 22.0 });
        assert_eq!(exterior[4], Coord { x: 12.0, y: 20.0 });
    }

    #[test]
    fn test_point_is_not_delta_encoded() {
        let topology = Topology::from_json(SHARED_EDGE).unwrap();
        let features = topology.feature("capital").unwrap();
        assert!(matches!(
            features.as_slice(),
            [GeoFeature::Point(Coord { x, y })] if *x == 11.0 && *y == 21.0
        ));
    }

    #[test]
    fn test_mesh_uses_each_arc_once() {
        let topology = Topology::from_json(SHARED_EDGE).unwrap();
        let mesh = topology.mesh("land").unwrap();
        assert_eq!(mesh.len(), 3);
    }

    #[test]
    fn test_missing_object() {
        let topology = Topology::from_json(SHARED_EDGE).unwrap();
        assert!(matches!(
            topology.feature("countries"),
            Err(TopologyError::MissingObject(name)) if name == "countries"
        ));
    }

    #[test]
    fn test_rejects_geojson() {
        let err = Topology::from_json(r#"{"type": "FeatureCollection", "features": []}"#).unwrap_err();
        assert!(matches!(err, TopologyError::NotTopology(_)));
    }

    #[test]
    fn test_arc_out_of_range() {
        let json = r#"{
            "type": "Topology",
            "objects": {"land": {"type": "LineString", "arcs": [4]}},
            "arcs": [[[0, 0], [1, 1]]]
        }"#;
        let topology = Topology::from_json(json).unwrap();
        assert!(matches!(
            topology.feature("land"),
            Err(TopologyError::ArcOutOfRange { index: 4, count: 1 })
        ));
    }

    #[test]
    fn test_unquantized_arcs_are_absolute() {
        let json = r#"{
            "type": "Topology",
            "objects": {"coast": {"type": "LineString", "arcs": [0, 1]}},
            "arcs": [[[0, 0], [5, 5]], [[5, 5], [10, 0]]]
        }"#;
        let topology = Topology::from_json(json).unwrap();
        let features = topology.feature("coast").unwrap();
        let GeoFeature::LineString(line) = &features[0] else {
            panic!("expected line");
        };
        assert_eq!(line.len(), 3);
        assert_eq!(line[2], Coord { x: 10.0, y: 0.0 });
    }
}
