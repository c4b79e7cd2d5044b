use std::cell::RefCell;
use std::ops::RangeInclusive;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// Range offered by the line width picker
pub const LINE_WIDTH_RANGE: RangeInclusive<f32> = 0.0..=20.0;

/// RGBA with 8 bits per channel, packed R,G,B,A from most to least
/// significant byte (`0xRRGGBBAA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    pub fn from_normalized(color: NormalizedColor) -> Self {
        Self::from_rgba(
            channel_to_u8(color.r),
            channel_to_u8(color.g),
            channel_to_u8(color.b),
            channel_to_u8(color.a),
        )
    }

    /// Channels in R,G,B,A order
    pub fn channels(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn alpha(self) -> u8 {
        self.channels()[3]
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b, a] = self.channels();
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

fn channel_to_u8(value: f32) -> u8 {
    // Truncates like the toolkit color buttons do
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// A color with channels in `0.0..=1.0`, as color pickers report them.
///
/// Deserializes from `[r, g, b]` or `[r, g, b, a]`; without alpha the color
/// is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct NormalizedColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl NormalizedColor {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_channels(channels: &[f32]) -> Result<Self, ColorError> {
        match *channels {
            [r, g, b] => Ok(Self::new(r, g, b, 1.0)),
            [r, g, b, a] => Ok(Self::new(r, g, b, a)),
            _ => Err(ColorError::ChannelCount(channels.len())),
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl TryFrom<Vec<f32>> for NormalizedColor {
    type Error = ColorError;

    fn try_from(channels: Vec<f32>) -> Result<Self, Self::Error> {
        Self::from_channels(&channels)
    }
}

impl From<NormalizedColor> for Vec<f32> {
    fn from(color: NormalizedColor) -> Self {
        color.to_array().to_vec()
    }
}

/// Supplies the current style at the moment a shape is instantiated.
pub trait StyleProvider {
    fn stroke_color(&self) -> PackedRgba;
    fn fill_color(&self) -> PackedRgba;
    fn line_width(&self) -> f32;
}

impl<T: StyleProvider> StyleProvider for RefCell<T> {
    fn stroke_color(&self) -> PackedRgba {
        self.borrow().stroke_color()
    }

    fn fill_color(&self) -> PackedRgba {
        self.borrow().fill_color()
    }

    fn line_width(&self) -> f32 {
        self.borrow().line_width()
    }
}

/// The style pickers' state, persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    pub stroke: NormalizedColor,
    pub fill: NormalizedColor,
    pub line_width: f32,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            stroke: NormalizedColor::BLACK,
            // "green" at half transparency
            fill: NormalizedColor::new(0.0, 128.0 / 255.0, 0.0, 0.5),
            line_width: 1.0,
        }
    }
}

impl StyleProvider for StyleSettings {
    fn stroke_color(&self) -> PackedRgba {
        PackedRgba::from_normalized(self.stroke)
    }

    fn fill_color(&self) -> PackedRgba {
        PackedRgba::from_normalized(self.fill)
    }

    fn line_width(&self) -> f32 {
        self.line_width
            .clamp(*LINE_WIDTH_RANGE.start(), *LINE_WIDTH_RANGE.end())
    }
}

/// Style handed to the surface with a primitive. Shapes capture it once
/// from a [`StyleProvider`] and never refresh it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveStyle {
    pub stroke: PackedRgba,
    pub fill: PackedRgba,
    pub line_width: f32,
}

impl PrimitiveStyle {
    pub fn capture(provider: &dyn StyleProvider) -> Self {
        Self {
            stroke: provider.stroke_color(),
            fill: provider.fill_color(),
            line_width: provider.line_width(),
        }
    }
}
