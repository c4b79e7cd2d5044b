use crate::SketchApp;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::WHITE))
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
            let canvas_rect = response.rect;

            // Handle input
            app.handle_input(ctx, canvas_rect);

            // Render the canvas
            app.renderer()
                .paint(app.canvas(), &painter, canvas_rect.min.to_vec2());
        });
}
