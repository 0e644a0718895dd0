//! Plater configuration
//!
//! Holds the bed and spacing options the plate state manager reads. The keys
//! mirror the printer/print options the plater consults when placing and
//! arranging objects. Configuration is stored as TOML.
//!
//! The arranger never reads `PlaterConfig` directly; it receives an
//! [`ArrangeSettings`] derived from it for each arrangement call.

use crate::error::{ConfigError, ConfigResult};
use crate::geometry::{BedShape, Point2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete plater configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaterConfig {
    /// Bed outline as a list of XY points (mm)
    pub bed_shape: Vec<[f64; 2]>,
    /// Print objects one after another; the extruder clearance then applies
    pub complete_objects: bool,
    /// Radius around the nozzle that must stay clear of other objects (mm)
    pub extruder_clearance_radius: f64,
    /// Minimum distance between copies and between arranged objects (mm)
    pub duplicate_distance: f64,
    /// Number of skirt loops
    pub skirts: u32,
    /// Distance between skirt and object (mm)
    pub skirt_distance: f64,
    /// Brim width around each object (mm)
    pub brim_width: f64,
    /// Maximum number of undo steps retained
    pub history_limit: usize,
    /// Thumbnail edge length (pixels)
    pub thumbnail_size: u32,
    /// Centre the packed arrangement on the bed
    pub center_arrangement: bool,
}

impl Default for PlaterConfig {
    fn default() -> Self {
        Self {
            bed_shape: vec![[0.0, 0.0], [200.0, 0.0], [200.0, 200.0], [0.0, 200.0]],
            complete_objects: false,
            extruder_clearance_radius: 20.0,
            duplicate_distance: 6.0,
            skirts: 1,
            skirt_distance: 6.0,
            brim_width: 0.0,
            history_limit: 100,
            thumbnail_size: 128,
            center_arrangement: true,
        }
    }
}

impl PlaterConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: PlaterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded plater config from {}", path.display());
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration to a TOML file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Validate all values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bed_shape.len() < 3 {
            return Err(ConfigError::invalid(
                "bed_shape",
                "bed outline needs at least 3 points",
            ));
        }
        if self
            .bed_shape
            .iter()
            .any(|[x, y]| !x.is_finite() || !y.is_finite())
        {
            return Err(ConfigError::invalid(
                "bed_shape",
                "bed outline contains non-finite coordinates",
            ));
        }
        if self.bed().area() <= 0.0 {
            return Err(ConfigError::invalid("bed_shape", "bed outline has no area"));
        }

        let distances = [
            ("extruder_clearance_radius", self.extruder_clearance_radius),
            ("duplicate_distance", self.duplicate_distance),
            ("skirt_distance", self.skirt_distance),
            ("brim_width", self.brim_width),
        ];
        for (key, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(key, format!("must be >= 0, got {value}")));
            }
        }

        if self.history_limit == 0 {
            return Err(ConfigError::invalid("history_limit", "must be > 0"));
        }
        if self.thumbnail_size == 0 {
            return Err(ConfigError::invalid("thumbnail_size", "must be > 0"));
        }
        Ok(())
    }

    /// The bed outline as a polygon
    pub fn bed(&self) -> BedShape {
        BedShape::from_points(
            self.bed_shape
                .iter()
                .map(|[x, y]| Point2::new(*x, *y))
                .collect(),
        )
    }

    /// Minimum distance between two printed objects.
    ///
    /// Sequential printing needs the extruder clearance when it is the larger
    /// of the two distances.
    pub fn min_object_distance(&self) -> f64 {
        if self.complete_objects && self.extruder_clearance_radius > self.duplicate_distance {
            self.extruder_clearance_radius
        } else {
            self.duplicate_distance
        }
    }

    /// Extra space each object needs around its footprint for brim and skirt.
    pub fn object_margin(&self) -> f64 {
        let skirt = if self.complete_objects && self.skirts > 0 {
            self.skirt_distance
        } else {
            0.0
        };
        self.brim_width + skirt
    }

    /// Arrangement input derived from this configuration
    pub fn arrange_settings(&self) -> ArrangeSettings {
        let clearance = if self.complete_objects {
            self.extruder_clearance_radius
        } else {
            0.0
        };
        ArrangeSettings::new(self.bed(), clearance)
            .with_duplicate_distance(self.duplicate_distance)
            .with_margin(self.object_margin())
            .with_centering(self.center_arrangement)
    }
}

/// Read-only input of a single arrangement run.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangeSettings {
    /// Printable area
    pub bed: BedShape,
    /// Required gap between any two instances (mm)
    pub clearance: f64,
    /// Minimum distance between copies (mm); the larger of this and
    /// `clearance` is used
    pub duplicate_distance: f64,
    /// Extra space reserved around every footprint (mm)
    pub margin: f64,
    /// Centre the packed cluster on the bed when it fits
    pub center: bool,
}

impl ArrangeSettings {
    pub fn new(bed: BedShape, clearance: f64) -> Self {
        debug_assert!(
            clearance.is_finite() && clearance >= 0.0,
            "clearance must be non-negative and finite, got {clearance}"
        );
        Self {
            bed,
            clearance,
            duplicate_distance: 0.0,
            margin: 0.0,
            center: false,
        }
    }

    pub fn with_duplicate_distance(mut self, distance: f64) -> Self {
        self.duplicate_distance = distance;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_centering(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Gap that must separate the footprints of two instances.
    pub fn spacing(&self) -> f64 {
        self.clearance.max(self.duplicate_distance) + 2.0 * self.margin
    }
}
