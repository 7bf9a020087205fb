//! Spatial visualization of scene footprints

mod map;

pub use map::{LegendEntry, SceneMap, StyledPolygon};
