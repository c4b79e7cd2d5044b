use eframe::egui;

use crate::path::{PathData, Sweep};
use crate::shape::ShapeKind;

pub struct ToolButton {
    pub kind: ShapeKind,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(kind: ShapeKind, selected: bool) -> Self {
        Self { kind, selected }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(32.0, 32.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(100, 181, 246) // Light blue when selected
            } else if response.hovered() {
                egui::Color32::from_gray(40) // Lighter gray on hover
            } else {
                egui::Color32::from_gray(30) // Dark gray by default
            };

            // Draw background
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let glyph_color = if self.selected {
                egui::Color32::BLACK
            } else {
                egui::Color32::WHITE
            };
            self.paint_glyph(ui.painter(), rect.shrink(8.0), glyph_color);

            // Draw border when selected
            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response
    }

    /// Draws a small outline of the shape the tool creates
    fn paint_glyph(&self, painter: &egui::Painter, rect: egui::Rect, color: egui::Color32) {
        let stroke = egui::Stroke::new(2.0, color);
        let path = match self.kind {
            ShapeKind::Rectangle => {
                painter.rect_stroke(rect, 0.0, stroke);
                return;
            }
            ShapeKind::Ellipse => {
                painter.add(egui::Shape::ellipse_stroke(rect.center(), rect.size() / 2.0, stroke));
                return;
            }
            ShapeKind::EllipticalArc => PathData::new().move_to(rect.left_bottom()).arc_to(
                egui::vec2(rect.width() / 2.0, rect.height()),
                Sweep::Up,
                rect.right_bottom(),
            ),
            ShapeKind::QuadraticCurve => PathData::new()
                .move_to(rect.left_bottom())
                .quad_to(rect.center_top(), rect.right_bottom()),
        };

        for polyline in path.flatten(0.5) {
            painter.add(egui::Shape::line(polyline, stroke));
        }
    }
}
