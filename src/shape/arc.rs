use std::cell::RefCell;
use std::rc::{Rc, Weak};

use egui::{pos2, vec2, Pos2, Rect, Vec2};

use super::{edit, impl_shape, marker_callback, spawn, ShapeCore, ShapeKind, ShapeState};
use crate::geometry::Geometry;
use crate::marker::{Marker, MarkerRole};
use crate::path::{PathData, Sweep};
use crate::style::StyleProvider;
use crate::surface::DrawingSurface;

/// Vertical radius of the arc drawn while it is being sized
pub const PROVISIONAL_RADIUS_Y: f32 = 100.0;

/// An SVG-style elliptical arc from the anchor to an endpoint, bowed by a
/// belly handle.
///
/// Markers: anchor, endpoint, belly. The drawn path is always
/// `M origin A rx,ry 0 0 sweep end`.
#[derive(Debug, Clone)]
pub struct EllipticalArc {
    state: Rc<RefCell<ArcState>>,
}

#[derive(Debug)]
pub(crate) struct ArcState {
    core: ShapeCore,
    end: Pos2,
    radii: Vec2,
    sweep: Sweep,
    path: PathData,
    bounds: Rect,
}

impl EllipticalArc {
    pub(crate) fn create(
        surface: &mut dyn DrawingSurface,
        style: &dyn StyleProvider,
        origin: Pos2,
    ) -> Self {
        let bounds = Rect::from_min_size(origin, Vec2::ZERO);
        let geometry = Geometry::Path {
            data: PathData::new(),
            bounds,
        };
        let kind = ShapeKind::EllipticalArc;
        let state = spawn(surface, kind, style, origin, geometry, |core| ArcState {
            core,
            end: origin,
            radii: Vec2::ZERO,
            sweep: Sweep::Up,
            path: PathData::new(),
            bounds,
        });
        Self { state }
    }

    pub fn end(&self) -> Pos2 {
        self.state.borrow().end
    }

    pub fn radii(&self) -> Vec2 {
        self.state.borrow().radii
    }

    pub fn sweep(&self) -> Sweep {
        self.state.borrow().sweep
    }

    pub fn path(&self) -> PathData {
        self.state.borrow().path.clone()
    }

    /// Height of the drawn arc
    pub fn height(&self) -> f32 {
        self.state.borrow().bounds.height()
    }

    pub fn resize(&self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        edit(&self.state, surface, pos, ArcState::resize);
    }

    pub fn move_shape(&self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        edit(&self.state, surface, pos, ArcState::move_shape);
    }

    pub fn adjust_curvature(&self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        edit(&self.state, surface, pos, ArcState::adjust_curvature);
    }
}

impl_shape!(EllipticalArc);

impl ArcState {
    fn rebuild(&mut self, surface: &mut dyn DrawingSurface) {
        self.path = PathData::new()
            .move_to(self.core.origin)
            .arc_to(self.radii, self.sweep, self.end);
        self.bounds = self.path.bounds();
        surface.update_geometry(
            self.core.primitive,
            Geometry::Path {
                data: self.path.clone(),
                bounds: self.bounds,
            },
        );
    }

    /// Where the belly handle starts: above or below the chord by the arc's
    /// height, depending on the quadrant the drag ended in.
    fn initial_belly(&self) -> Pos2 {
        let origin = self.core.origin;
        let end = self.end;
        let height = self.bounds.height();
        let y = if end.x > origin.x {
            if end.y > origin.y { end.y - height } else { origin.y - height }
        } else if end.y > origin.y {
            origin.y + height
        } else {
            end.y + height
        };
        pos2(end.x - (end.x - origin.x) / 2.0, y)
    }
}

impl ShapeState for ArcState {
    fn core(&self) -> &ShapeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ShapeCore {
        &mut self.core
    }

    fn track_pointer(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        self.end = pos;
        self.radii = vec2((pos.x - self.core.origin.x) / 2.0, PROVISIONAL_RADIUS_Y);
        self.sweep = Sweep::Up;
        self.rebuild(surface);
    }

    fn finalize(
        &mut self,
        surface: &mut dyn DrawingSurface,
        pos: Pos2,
        this: &Weak<RefCell<Self>>,
    ) {
        self.track_pointer(surface, pos);
        let belly = self.initial_belly();

        let endpoint = Marker::create(
            surface,
            self.end,
            MarkerRole::Corner,
            Some(marker_callback(this, Self::resize)),
        );
        let belly = Marker::create(
            surface,
            belly,
            MarkerRole::Curvature,
            Some(marker_callback(this, Self::adjust_curvature)),
        );
        self.core.markers.push(endpoint);
        self.core.markers.push(belly);
    }

    fn resize(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        self.end = pos;
        self.rebuild(surface);
    }

    fn move_shape(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        let delta = pos - self.core.origin;
        self.core.origin = pos;
        self.end += delta;
        if let [_, endpoint, belly] = self.core.markers.as_slice() {
            endpoint.move_to(surface, self.end);
            belly.move_to(surface, belly.position() + delta);
        }
        self.rebuild(surface);
    }

    fn adjust_curvature(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        let start = self.core.origin;
        let height = self.bounds.height();
        self.radii = vec2(start.distance(self.end) / 2.0, self.end.y - pos.y);
        self.sweep = if pos.y > start.y + height / 2.0 { Sweep::Down } else { Sweep::Up };
        self.rebuild(surface);
    }
}
