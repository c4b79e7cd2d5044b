use crate::components::tool_button::ToolButton;
use crate::shape::ShapeKind;
use crate::style::{NormalizedColor, LINE_WIDTH_RANGE};
use crate::SketchApp;

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let selected = app.tools().selected();
            ui.horizontal_wrapped(|ui| {
                for kind in ShapeKind::ALL {
                    let is_selected = selected == Some(kind);
                    let response = ToolButton::new(kind, is_selected)
                        .show(ui)
                        .on_hover_text(kind.label());

                    // Clicking the active tool again puts it down
                    if response.clicked() {
                        app.tools().select(if is_selected { None } else { Some(kind) });
                    }
                }
            });
            ui.separator();

            {
                let mut style = app.style_settings().borrow_mut();
                ui.horizontal(|ui| {
                    ui.label("Line width:");
                    ui.add(egui::Slider::new(&mut style.line_width, LINE_WIDTH_RANGE));
                });
                color_row(ui, "Stroke:", &mut style.stroke);
                color_row(ui, "Fill:", &mut style.fill);
            }

            ui.separator();
            ui.label(format!("Shapes: {}", app.tools().shape_count()));
        });
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut NormalizedColor) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut rgba = color.to_array();
        if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
            *color = NormalizedColor::from_array(rgba);
        }
    });
}
