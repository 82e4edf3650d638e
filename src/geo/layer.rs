//! Geographic layer data structures.

use super::Topology;
use crate::error::TopologyError;
use eframe::egui::Color32;
use geo_types::Coord;

/// Name of the land object in world-atlas topologies.
pub const LAND_OBJECT: &str = "land";
/// Name of the countries object in world-atlas topologies.
pub const COUNTRIES_OBJECT: &str = "countries";

/// Type of geographic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLayerType {
    Land,
    Borders,
}

impl GeoLayerType {
    /// Returns the default color for this layer type.
    pub fn default_color(&self) -> Color32 {
        match self {
            GeoLayerType::Land => Color32::from_rgb(0x34, 0x49, 0x5e),
            GeoLayerType::Borders => Color32::from_rgb(0x5d, 0x6d, 0x7e),
        }
    }

    /// Whether polygons in this layer are filled as well as outlined.
    pub fn is_filled(&self) -> bool {
        matches!(self, GeoLayerType::Land)
    }

    /// Returns the default line width for this layer type.
    pub fn default_line_width(&self) -> f32 {
        match self {
            GeoLayerType::Land => 1.6,
            GeoLayerType::Borders => 0.6,
        }
    }
}

/// A geographic feature that can be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFeature {
    /// A series of connected line segments (for boundaries, rivers, etc.)
    LineString(Vec<Coord<f64>>),
    /// Multiple line strings (for complex boundaries)
    MultiLineString(Vec<Vec<Coord<f64>>>),
    /// A closed polygon
    Polygon {
        exterior: Vec<Coord<f64>>,
        holes: Vec<Vec<Coord<f64>>>,
    },
    /// Multiple polygons, each an exterior ring and its holes
    MultiPolygon(Vec<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)>),
    /// A single point
    Point(Coord<f64>),
}

/// A geographic layer containing multiple features.
#[derive(Debug, Clone)]
pub struct GeoLayer {
    /// Type of this layer
    pub layer_type: GeoLayerType,
    /// Features in this layer
    pub features: Vec<GeoFeature>,
    /// Override color (None = use default)
    pub color: Option<Color32>,
    /// Whether this layer is visible
    pub visible: bool,
}

impl GeoLayer {
    /// Creates a new empty layer of the specified type.
    pub fn new(layer_type: GeoLayerType) -> Self {
        Self {
            layer_type,
            features: Vec::new(),
            color: None,
            visible: true,
        }
    }

    /// Returns the effective color for this layer.
    pub fn effective_color(&self) -> Color32 {
        self.color
            .unwrap_or_else(|| self.layer_type.default_color())
    }

    pub fn effective_line_width(&self) -> f32 {
        self.layer_type.default_line_width()
    }
}

/// Collection of all geographic layers drawn on the globe.
#[derive(Debug, Clone, Default)]
pub struct GeoLayerSet {
    pub land: Option<GeoLayer>,
    pub borders: Option<GeoLayer>,
}

impl GeoLayerSet {
    /// Creates a new empty layer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the layer set from a world topology.
    ///
    /// The land object is required; country borders are added when the
    /// topology carries a countries object.
    pub fn from_topology(topology: &Topology) -> Result<Self, TopologyError> {
        let mut land = GeoLayer::new(GeoLayerType::Land);
        land.features = topology.feature(LAND_OBJECT)?;

        let borders = if topology.has_object(COUNTRIES_OBJECT) {
            let mut layer = GeoLayer::new(GeoLayerType::Borders);
            layer.features = vec![GeoFeature::MultiLineString(
                topology.mesh(COUNTRIES_OBJECT)?,
            )];
            Some(layer)
        } else {
            None
        };

        Ok(Self {
            land: Some(land),
            borders,
        })
    }

    /// Returns an iterator over all loaded layers, back to front.
    pub fn iter(&self) -> impl Iterator<Item = &GeoLayer> {
        [self.land.as_ref(), self.borders.as_ref()]
            .into_iter()
            .flatten()
    }

    /// Total number of features across layers.
    pub fn feature_count(&self) -> usize {
        self.iter().map(|l| l.features.len()).sum()
    }
}
