// src/renderer.rs
use eframe::egui::{self, Color32, Painter, Stroke, Vec2};

use crate::canvas::{Canvas, Primitive};
use crate::geometry::Geometry;

pub const DEFAULT_FLATTEN_TOLERANCE: f32 = 0.25;

/// Paints a [`Canvas`] with egui, bottom primitive first.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Max distance between a flattened path and the true curve
    tolerance: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_FLATTEN_TOLERANCE)
    }
}

impl Renderer {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Renders the canvas, shifted by `offset` into screen space
    pub fn paint(&self, canvas: &Canvas, painter: &Painter, offset: Vec2) {
        for (_, primitive) in canvas.primitives() {
            painter.extend(self.shapes_for(primitive, offset));
        }
    }

    /// The egui shapes that draw one primitive
    pub fn shapes_for(&self, primitive: &Primitive, offset: Vec2) -> Vec<egui::Shape> {
        let fill = primitive.style.fill.to_color32();
        let stroke = Stroke::new(primitive.style.line_width, primitive.style.stroke.to_color32());

        match &primitive.geometry {
            Geometry::Rect(rect) => {
                let rect = rect.translate(offset);
                vec![
                    egui::Shape::rect_filled(rect, 0.0, fill),
                    egui::Shape::rect_stroke(rect, 0.0, stroke),
                ]
            }
            Geometry::Ellipse(rect) => {
                let rect = rect.translate(offset);
                let radius = rect.size() / 2.0;
                vec![
                    egui::Shape::ellipse_filled(rect.center(), radius, fill),
                    egui::Shape::ellipse_stroke(rect.center(), radius, stroke),
                ]
            }
            Geometry::Circle { center, radius } => {
                let center = *center + offset;
                vec![
                    egui::Shape::circle_filled(center, *radius, fill),
                    egui::Shape::circle_stroke(center, *radius, stroke),
                ]
            }
            Geometry::Path { data, .. } => {
                let mut shapes = Vec::new();
                for polyline in data.flatten(self.tolerance) {
                    let points: Vec<_> = polyline.into_iter().map(|p| p + offset).collect();
                    if points.len() < 2 {
                        continue;
                    }
                    // Closing the outline with its chord gives the filled region
                    if points.len() > 2 && fill != Color32::TRANSPARENT {
                        let region = points.clone();
                        shapes.push(egui::Shape::convex_polygon(region, fill, Stroke::NONE));
                    }
                    shapes.push(egui::Shape::line(points, stroke));
                }
                shapes
            }
        }
    }
}
