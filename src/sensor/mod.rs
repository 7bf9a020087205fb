//! Satellite sensor definitions and path-based resolution
//!
//! This module loads the known sensor identifiers and their display colors
//! from an embedded TOML registry, and classifies scene paths into sensor
//! names by substring matching.

use std::collections::HashMap;
use lazy_static::lazy_static;
use crate::errors::{SceneError, SceneResult};

/// Classification result for a path with no recognizable sensor name
pub const UNKNOWN_SENSOR: &str = "UNKNOWN";

lazy_static! {
    // Parse the TOML registry at startup
    static ref SENSOR_REGISTRY: SensorRegistry = {
        let content = include_str!("../../sensors.toml");
        SensorRegistry::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse sensor definitions: {}", e);
            SensorRegistry::default()
        })
    };
}

/// Container for sensor identifiers and display colors
#[derive(Debug, Default)]
pub struct SensorRegistry {
    /// Sensor names in priority order (earlier wins positional ties)
    pub names: Vec<String>,
    /// Maps sensor names to display colors
    pub colors: HashMap<String, String>,
}

impl SensorRegistry {
    /// Parse sensor definitions from a TOML string
    pub fn from_str(content: &str) -> SceneResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => {
                return Err(SceneError::GenericError(format!(
                    "Failed to parse TOML: {}",
                    e
                )))
            }
        };

        let mut registry = SensorRegistry::default();

        if let Some(names) = toml_value.get("names").and_then(|v| v.as_array()) {
            for name in names {
                if let Some(name) = name.as_str() {
                    registry.names.push(name.to_string());
                }
            }
        }

        if let Some(table) = toml_value.get("colors").and_then(|v| v.as_table()) {
            for (name, color) in table {
                if let Some(color) = color.as_str() {
                    registry.colors.insert(name.clone(), color.to_string());
                }
            }
        }

        Ok(registry)
    }

    /// Classifies a path into a sensor identifier
    ///
    /// The whole path is uppercased and every known sensor name is looked up
    /// with its rightmost occurrence. The name matching closest to the end of
    /// the path wins; positional ties go to the earlier entry in the priority
    /// list. Sensor identifiers usually sit in a parent directory right above
    /// the file, so the rightmost match is the most specific one.
    ///
    /// # Arguments
    /// * `path` - File path string to classify
    ///
    /// # Returns
    /// The matching sensor name, or `UNKNOWN_SENSOR` when no name occurs
    pub fn resolve(&self, path: &str) -> String {
        let upper = path.to_uppercase();

        let mut best: Option<(&str, usize)> = None;
        for name in &self.names {
            if let Some(idx) = upper.rfind(name.as_str()) {
                // Strictly-greater keeps the first maximum on ties
                if best.map_or(true, |(_, best_idx)| idx > best_idx) {
                    best = Some((name, idx));
                }
            }
        }

        match best {
            Some((name, _)) => name.to_string(),
            None => UNKNOWN_SENSOR.to_string(),
        }
    }

    /// Looks up the display color for a sensor name
    pub fn color(&self, sensor: &str) -> Option<&str> {
        self.colors.get(sensor).map(String::as_str)
    }
}

/// Resolves a path against the embedded sensor registry
pub fn resolve_sensor(path: &str) -> String {
    SENSOR_REGISTRY.resolve(path)
}

/// Display color for a sensor from the embedded registry
pub fn sensor_color(sensor: &str) -> Option<&'static str> {
    SENSOR_REGISTRY.color(sensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rightmost_match_wins() {
        // K3 in the filename sits to the right of both K3A and WV3
        let sensor = resolve_sensor("/archive/K3A/WV3_scene/img_K3.tif");
        assert_eq!(sensor, "K3");
    }

    #[test]
    fn match_is_case_insensitive() {
        assert_eq!(resolve_sensor("/data/skysat/scene_001.tif"), "SKYSAT");
    }

    #[test]
    fn no_match_is_unknown() {
        assert_eq!(resolve_sensor("/data/misc/scene_001.tif"), UNKNOWN_SENSOR);
    }

    #[test]
    fn positional_tie_prefers_priority_order() {
        let registry = SensorRegistry {
            names: vec!["K3".to_string(), "K3A".to_string()],
            colors: HashMap::new(),
        };
        // Both names match at the same index; K3 is listed first
        assert_eq!(registry.resolve("/data/K3A_scene.tif"), "K3");
    }

    #[test]
    fn registry_colors_are_present() {
        assert_eq!(sensor_color("WV3"), Some("#F423E8"));
        assert!(sensor_color(UNKNOWN_SENSOR).is_none());
    }
}
