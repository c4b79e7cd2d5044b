#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
mod id_generator;
pub mod input;
pub mod marker;
pub mod panels;
pub mod path;
pub mod renderer;
pub mod shape;
pub mod style;
pub mod surface;
pub mod tools;

pub use app::SketchApp;
pub use canvas::Canvas;
pub use config::AppConfig;
pub use error::{ColorError, ConfigError};
pub use input::{PointerEvent, PointerEventKind};
pub use marker::{Marker, MarkerRole};
pub use renderer::Renderer;
pub use shape::{AnyShape, Phase, Shape, ShapeKind};
pub use style::{PackedRgba, StyleProvider, StyleSettings};
pub use surface::{DrawingSurface, EventFlow, EventScope};
pub use tools::ToolController;
