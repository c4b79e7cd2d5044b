use std::cell::RefCell;
use std::rc::{Rc, Weak};

use egui::{pos2, Pos2, Rect, Vec2};

use super::{edit, impl_shape, marker_callback, spawn, ShapeCore, ShapeKind, ShapeState};
use crate::geometry::{normalize_extent, Geometry, Quadrant};
use crate::marker::{Marker, MarkerRole};
use crate::style::StyleProvider;
use crate::surface::DrawingSurface;

/// Rectangle or ellipse sized by a signed extent from its origin.
#[derive(Debug, Clone)]
pub struct BoxShape {
    state: Rc<RefCell<BoxState>>,
}

#[derive(Debug)]
pub(crate) struct BoxState {
    core: ShapeCore,
    /// Last signed width/height, before normalization
    extent: Vec2,
    quadrant: Quadrant,
    bounds: Rect,
}

impl BoxShape {
    pub(crate) fn create(
        surface: &mut dyn DrawingSurface,
        kind: ShapeKind,
        style: &dyn StyleProvider,
        origin: Pos2,
    ) -> Self {
        let bounds = Rect::from_min_size(origin, Vec2::ZERO);
        let geometry = box_geometry(kind, bounds);
        let state = spawn(surface, kind, style, origin, geometry, |core| BoxState {
            core,
            extent: Vec2::ZERO,
            quadrant: Quadrant::default(),
            bounds,
        });
        Self { state }
    }

    /// Signed extent from the origin to the far corner
    pub fn extent(&self) -> Vec2 {
        self.state.borrow().extent
    }

    pub fn quadrant(&self) -> Quadrant {
        self.state.borrow().quadrant
    }

    /// Normalized bounds handed to the surface
    pub fn bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    /// Makes `pos` the far corner. Ignored until the shape is editable.
    pub fn resize(&self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        edit(&self.state, surface, pos, BoxState::resize);
    }

    /// Moves the anchor to `pos`, carrying the shape along. Ignored until the
    /// shape is editable.
    pub fn move_shape(&self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        edit(&self.state, surface, pos, BoxState::move_shape);
    }
}

impl_shape!(BoxShape);

fn box_geometry(kind: ShapeKind, bounds: Rect) -> Geometry {
    match kind {
        ShapeKind::Ellipse => Geometry::Ellipse(bounds),
        _ => Geometry::Rect(bounds),
    }
}

impl BoxState {
    fn set_width_height(&mut self, surface: &mut dyn DrawingSurface, extent: Vec2) {
        let (bounds, quadrant) = normalize_extent(self.core.origin, extent);
        self.extent = extent;
        self.quadrant = quadrant;
        self.bounds = bounds;
        surface.update_geometry(self.core.primitive, box_geometry(self.core.kind, bounds));
    }
}

impl ShapeState for BoxState {
    fn core(&self) -> &ShapeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ShapeCore {
        &mut self.core
    }

    fn track_pointer(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        self.set_width_height(surface, pos - self.core.origin);
    }

    fn finalize(
        &mut self,
        surface: &mut dyn DrawingSurface,
        pos: Pos2,
        this: &Weak<RefCell<Self>>,
    ) {
        self.set_width_height(surface, pos - self.core.origin);
        let corner = Marker::create(
            surface,
            pos,
            MarkerRole::Corner,
            Some(marker_callback(this, Self::resize)),
        );
        self.core.markers.push(corner);
    }

    fn resize(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        self.set_width_height(surface, pos - self.core.origin);
    }

    fn move_shape(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2) {
        let size = self.bounds.size();
        let min = pos2(
            if self.quadrant.neg_x { pos.x - size.x } else { pos.x },
            if self.quadrant.neg_y { pos.y - size.y } else { pos.y },
        );
        self.core.origin = pos;
        self.bounds = Rect::from_min_size(min, size);
        surface.update_geometry(self.core.primitive, box_geometry(self.core.kind, self.bounds));

        // Keep the corner handle glued to the far corner
        if let Some(corner) = self.core.markers.get(1) {
            corner.move_to(surface, pos + self.extent);
        }
    }
}
