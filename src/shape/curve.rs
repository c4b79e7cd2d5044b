use std::cell::RefCell;
use std::rc::{Rc, Weak};

use egui::{pos2, Pos2, Rect, Vec2};

use super::{edit, impl_shape, marker_callback, spawn, ShapeCore, ShapeKind, ShapeState};
use crate::geometry::{normalize_extent, Geometry};
use crate::marker::{Marker, MarkerRole};
use crate::path::PathData;
use crate::style::StyleProvider;
use crate::surface::DrawingSurface;

/// A single quadratic Bézier from the anchor to an endpoint.
#[derive(Debug, Clone)]
pub struct QuadraticCurve {
    state: Rc<RefCell<CurveState>>,
}

#[derive(Debug)]
pub(crate) struct CurveState {
    core: ShapeCore,
    end: Pos2,
    control: Pos2,
    bounds: Rect,
}

impl QuadraticCurve {
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
        let kind = ShapeKind::QuadraticCurve;
        let state = spawn(surface, kind, style, origin, geometry, |core| CurveState {
            core,
            end: origin,
            control: origin,
            bounds,
        });
        Self { state }
    }

    pub fn end(&self) -> Pos2 {
        self.state.borrow().end
    }

    pub fn control(&self) -> Pos2 {
        self.state.borrow().control
    }

    pub fn path(&self) -> PathData {
        self.state.borrow().path()
    }

    /// Box spanned by the anchor and the endpoint
    pub fn bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    pub fn resize(&self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        edit(&self.state, surface, pos, CurveState::resize);
    }

    pub fn move_shape(&self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        edit(&self.state, surface, pos, CurveState::move_shape);
    }

    pub fn adjust_curvature(&self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        edit(&self.state, surface, pos, CurveState::adjust_curvature);
    }
}

impl_shape!(QuadraticCurve);

impl CurveState {
    fn path(&self) -> PathData {
        PathData::new()
            .move_to(self.core.origin)
            .quad_to(self.control, self.end)
    }

    fn rebuild(&mut self, surface: &mut dyn DrawingSurface) {
        let (bounds, _) = normalize_extent(self.core.origin, self.end - self.core.origin);
        self.bounds = bounds;
        surface.update_geometry(
            self.core.primitive,
            Geometry::Path {
                data: self.path(),
                bounds,
            },
        );
    }
}

impl ShapeState for CurveState {
    fn core(&self) -> &ShapeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ShapeCore {
        &mut self.core
    }

    fn track_pointer(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        let origin = self.core.origin;
        let extent = pos - origin;
        self.end = pos;
        self.control = pos2(origin.x + extent.x / 2.0, origin.y + extent.y);
        self.rebuild(surface);
    }

    fn finalize(
        &mut self,
        surface: &mut dyn DrawingSurface,
        pos: Pos2,
        this: &Weak<RefCell<Self>>,
    ) {
        // The provisional control point becomes permanent here
        self.track_pointer(surface, pos);

        let endpoint = Marker::create(
            surface,
            self.end,
            MarkerRole::Corner,
            Some(marker_callback(this, Self::resize)),
        );
        let control = Marker::create(
            surface,
            self.control,
            MarkerRole::Curvature,
            Some(marker_callback(this, Self::adjust_curvature)),
        );
        self.core.markers.push(endpoint);
        self.core.markers.push(control);
    }

    fn resize(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        self.end = pos;
        self.rebuild(surface);
    }

    fn move_shape(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        let delta = pos - self.core.origin;
        self.core.origin = pos;
        self.end += delta;
        self.control += delta;
        if let [_, endpoint, control] = self.core.markers.as_slice() {
            endpoint.move_to(surface, self.end);
            control.move_to(surface, self.control);
        }
        self.rebuild(surface);
    }

    fn adjust_curvature(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        self.control = pos;
        self.rebuild(surface);
    }
}
