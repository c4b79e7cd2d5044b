use std::fmt;

use egui::{Pos2, Rect, Vec2};
use lyon::geom::ArcFlags;
use lyon::math::{point, vector, Angle};
use lyon::path::builder::SvgPathBuilder;
use lyon::path::iterator::PathIterator;
use lyon::path::{Event, Path};

/// Tolerance used when a path is flattened only to measure it
const BOUNDS_TOLERANCE: f32 = 0.1;

/// Which of the two candidate arcs through a pair of endpoints is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    /// Sweep flag 1
    Up,
    /// Sweep flag 0
    Down,
}

impl Sweep {
    pub fn flag(self) -> u8 {
        match self {
            Sweep::Up => 1,
            Sweep::Down => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Pos2),
    QuadTo {
        ctrl: Pos2,
        to: Pos2,
    },
    /// Elliptical arc with zero x-rotation and the small-arc flag
    ArcTo {
        radii: Vec2,
        sweep: Sweep,
        to: Pos2,
    },
}

/// SVG-style path data. Formats as the `d` attribute it describes,
/// e.g. `M0,0 Q50,60 100,0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, to: Pos2) -> Self {
        self.commands.push(PathCommand::MoveTo(to));
        self
    }

    pub fn quad_to(mut self, ctrl: Pos2, to: Pos2) -> Self {
        self.commands.push(PathCommand::QuadTo { ctrl, to });
        self
    }

    pub fn arc_to(mut self, radii: Vec2, sweep: Sweep, to: Pos2) -> Self {
        self.commands.push(PathCommand::ArcTo { radii, sweep, to });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn to_lyon(&self) -> Path {
        let mut builder = Path::builder().with_svg();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(to) => {
                    builder.move_to(point(to.x, to.y));
                }
                PathCommand::QuadTo { ctrl, to } => {
                    builder.quadratic_bezier_to(point(ctrl.x, ctrl.y), point(to.x, to.y));
                }
                PathCommand::ArcTo { radii, sweep, to } => {
                    // Signed radii are kept in the data; the arc itself uses magnitudes
                    builder.arc_to(
                        vector(radii.x.abs(), radii.y.abs()),
                        Angle::radians(0.0),
                        ArcFlags {
                            large_arc: false,
                            sweep: sweep == Sweep::Up,
                        },
                        point(to.x, to.y),
                    );
                }
            }
        }
        builder.build()
    }

    /// Flattens the path into one polyline per subpath.
    pub fn flatten(&self, tolerance: f32) -> Vec<Vec<Pos2>> {
        let mut polylines = Vec::new();
        if self.is_empty() {
            return polylines;
        }

        let path = self.to_lyon();
        let mut current: Vec<Pos2> = Vec::new();
        for event in path.iter().flattened(tolerance) {
            match event {
                Event::Begin { at } => {
                    current = vec![Pos2::new(at.x, at.y)];
                }
                Event::Line { to, .. } => {
                    current.push(Pos2::new(to.x, to.y));
                }
                Event::End { .. } => {
                    if !current.is_empty() {
                        polylines.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            }
        }
        if !current.is_empty() {
            polylines.push(current);
        }
        polylines
    }

    /// Bounds of the drawn outline, `Rect::NOTHING` for an empty path.
    pub fn bounds(&self) -> Rect {
        let points: Vec<Pos2> = self.flatten(BOUNDS_TOLERANCE).into_iter().flatten().collect();
        if points.is_empty() {
            return Rect::NOTHING;
        }
        Rect::from_points(&points)
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match command {
                PathCommand::MoveTo(to) => write!(f, "M{},{}", to.x, to.y)?,
                PathCommand::QuadTo { ctrl, to } => {
                    write!(f, "Q{},{} {},{}", ctrl.x, ctrl.y, to.x, to.y)?
                }
                PathCommand::ArcTo { radii, sweep, to } => write!(
                    f,
                    "A{},{} 0 0 {} {},{}",
                    radii.x,
                    radii.y,
                    sweep.flag(),
                    to.x,
                    to.y
                )?,
            }
        }
        Ok(())
    }
}
