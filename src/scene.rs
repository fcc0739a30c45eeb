use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::background::BackgroundSpec;
use crate::error::Result;
use crate::geometry::Viewport;
use crate::primitives::{Primitive, PrimitiveQueue};

/// A saved drawing: the world viewport, an optional background and the
/// primitives in draw order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub viewport: Viewport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundSpec>,
    #[serde(default)]
    pub primitives: PrimitiveQueue,
}

impl Scene {
    pub fn new(name: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            name: name.into(),
            viewport,
            background: None,
            primitives: PrimitiveQueue::new(),
        }
    }

    pub fn with_background(mut self, background: impl Into<BackgroundSpec>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn add_primitive(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive);
    }

    /// Save scene to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("saved scene '{}' ({} primitives) to {}", self.name, self.primitives.len(), path.display());
        Ok(())
    }

    /// Load scene from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("untitled", Viewport::new(1.0, -1.0, -1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::GraphingPaperBackground;
    use crate::color::Rgba;
    use crate::error::CanvasError;
    use crate::geometry::Vec2;
    use crate::primitives::{Circle, Line};

    #[test]
    fn test_save_load() {
        let mut scene = Scene::new("plot", Viewport::new(5.0, -5.0, -5.0, 5.0))
            .with_background(GraphingPaperBackground::new(0.05, 0.05));
        scene.add_primitive(Circle::new(Vec2::new(0.0, 0.0), 1.0, Rgba::BLUE));
        scene.add_primitive(Line::new(Vec2::new(-1.0, 1.0), Vec2::new(1.0, -3.0), Rgba::GREEN, 0.1));

        let path = std::env::temp_dir().join(format!("rastercanvas-scene-{}.json", std::process::id()));
        scene.save(&path).unwrap();
        let loaded = Scene::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_minimal_json() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "name": "bare",
                "viewport": {"top": 1.0, "bottom": 0.0, "left": 0.0, "right": 1.0},
                "primitives": [
                    {"type": "line", "start": {"x": 0.0, "y": 0.0}, "end": {"x": 1.0, "y": 1.0},
                     "color": {"r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0}}
                ]
            }"#,
        )
        .unwrap();

        assert!(scene.background.is_none());
        assert_eq!(scene.primitives.len(), 1);
        match scene.primitives.as_slice()[0] {
            Primitive::Line(l) => assert!(l.is_hairline()),
            _ => panic!("expected a line"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scene::load("/nonexistent/rastercanvas/scene.json").unwrap_err();
        assert!(matches!(err, CanvasError::Io(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = std::env::temp_dir().join(format!("rastercanvas-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = Scene::load(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, CanvasError::Scene(_)));
    }
}
