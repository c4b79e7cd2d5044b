use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::Canvas;
use crate::config::AppConfig;
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel};
use crate::renderer::Renderer;
use crate::style::StyleSettings;
use crate::tools::ToolController;

/// Storage key of the persisted style pickers
const STYLE_KEY: &str = "style";

pub struct SketchApp {
    style: Rc<RefCell<StyleSettings>>,
    canvas: Canvas,
    tools: ToolController,
    input: InputHandler,
    renderer: Renderer,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        // Settings from the last run win over the config file
        let style = cc
            .storage
            .and_then(|storage| eframe::get_value::<StyleSettings>(storage, STYLE_KEY))
            .unwrap_or(config.style);
        Self::with_style(style, config.flatten_tolerance)
    }

    pub fn with_style(style: StyleSettings, flatten_tolerance: f32) -> Self {
        let style = Rc::new(RefCell::new(style));
        let mut canvas = Canvas::new();
        let tools = ToolController::install(&mut canvas, style.clone());

        Self {
            style,
            canvas,
            tools,
            input: InputHandler::new(egui::Rect::NOTHING),
            renderer: Renderer::new(flatten_tolerance),
        }
    }

    pub fn style_settings(&self) -> &Rc<RefCell<StyleSettings>> {
        &self.style
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Feeds this frame's pointer input to the canvas
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        self.input.set_canvas_rect(canvas_rect);
        for event in self.input.process_input(ctx) {
            self.canvas.dispatch(event);
        }
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, STYLE_KEY, &*self.style.borrow());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
