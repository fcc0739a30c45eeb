//! Drawable shapes and the queue that holds them between updates

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::geometry::Vec2;

/// A line segment. `thickness == 0` is a one pixel hairline; anything larger
/// is a capsule of half-width `thickness` in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Rgba,
    #[serde(default)]
    pub thickness: f32,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2, color: Rgba, thickness: f32) -> Self {
        Self {
            start,
            end,
            color,
            thickness,
        }
    }

    pub fn is_hairline(&self) -> bool {
        self.thickness == 0.0
    }
}

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub origin: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

impl Circle {
    pub fn new(origin: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            origin,
            radius,
            color,
        }
    }
}

/// A filled triangle; vertex order does not matter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub points: [Vec2; 3],
    pub color: Rgba,
}

impl Triangle {
    pub fn new(p1: Vec2, p2: Vec2, p3: Vec2, color: Rgba) -> Self {
        Self {
            points: [p1, p2, p3],
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Line(Line),
    Circle(Circle),
    Triangle(Triangle),
}

impl Primitive {
    pub fn color(&self) -> Rgba {
        match self {
            Primitive::Line(l) => l.color,
            Primitive::Circle(c) => c.color,
            Primitive::Triangle(t) => t.color,
        }
    }

    /// Primitives colored [`Rgba::NONE`] are skipped without computing geometry
    pub fn is_visible(&self) -> bool {
        !self.color().is_none()
    }
}

impl From<Line> for Primitive {
    fn from(l: Line) -> Self {
        Primitive::Line(l)
    }
}

impl From<Circle> for Primitive {
    fn from(c: Circle) -> Self {
        Primitive::Circle(c)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

/// Insertion-ordered list of primitives.
///
/// Drawing does not consume entries: every update redraws the whole queue
/// until [`PrimitiveQueue::clear`] is called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimitiveQueue {
    items: Vec<Primitive>,
}

impl PrimitiveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: impl Into<Primitive>) {
        self.items.push(primitive.into());
    }

    /// Append `n - 1` segments joining consecutive points; fewer than two
    /// points adds nothing.
    pub fn push_connected(&mut self, points: &[Vec2], color: Rgba, thickness: f32) {
        for pair in points.windows(2) {
            self.push(Line::new(pair[0], pair[1], color, thickness));
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Primitive] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a PrimitiveQueue {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Primitive> for PrimitiveQueue {
    fn from_iter<I: IntoIterator<Item = Primitive>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_keeps_insertion_order() {
        let mut queue = PrimitiveQueue::new();
        queue.push(Circle::new(Vec2::new(0.0, 0.0), 1.0, Rgba::RED));
        queue.push(Triangle::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Rgba::BLUE,
        ));
        queue.push(Line::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Rgba::GREEN, 0.0));

        let kinds: Vec<&str> = queue
            .iter()
            .map(|p| match p {
                Primitive::Line(_) => "line",
                Primitive::Circle(_) => "circle",
                Primitive::Triangle(_) => "triangle",
            })
            .collect();
        assert_eq!(kinds, vec!["circle", "triangle", "line"]);
    }

    #[test]
    fn test_connected_points() {
        let mut queue = PrimitiveQueue::new();
        queue.push_connected(&[Vec2::new(0.0, 0.0)], Rgba::RED, 0.0);
        assert!(queue.is_empty());

        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        queue.push_connected(&pts, Rgba::RED, 0.5);
        assert_eq!(queue.len(), 3);
        assert_eq!(
            queue.as_slice()[1],
            Primitive::Line(Line::new(pts[1], pts[2], Rgba::RED, 0.5))
        );
    }

    #[test]
    fn test_transparent_primitive_is_invisible() {
        let p: Primitive = Circle::new(Vec2::new(0.0, 0.0), 1.0, Rgba::NONE).into();
        assert!(!p.is_visible());
        let p: Primitive = Circle::new(Vec2::new(0.0, 0.0), 1.0, Rgba::RED.with_alpha(0.0)).into();
        assert!(p.is_visible());
    }

    #[test]
    fn test_primitive_json_shape() {
        let p = Primitive::Circle(Circle::new(Vec2::new(1.0, 2.0), 3.0, Rgba::RED));
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["type"], "circle");
        assert_eq!(json["radius"], 3.0);
        let back: Primitive = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
