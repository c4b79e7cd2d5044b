use std::cell::RefCell;
use std::rc::{Rc, Weak};

use egui::Pos2;
use log::debug;

use crate::geometry::{Geometry, PrimitiveKind};
use crate::input::{PointerEvent, PointerEventKind};
use crate::style::{PackedRgba, PrimitiveStyle};
use crate::surface::{DrawingSurface, EventFlow, EventScope, PointerHandler, PrimitiveHandle};

pub const MARKER_RADIUS: f32 = 8.0;

const MARKER_FILL: PackedRgba = PackedRgba(0xffffff20);
const MARKER_LINE_WIDTH: f32 = 2.0;

/// What a marker controls on its shape. Also picks its display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    /// The shape's origin
    Anchor,
    /// Far corner or endpoint
    Corner,
    /// Belly of an arc or control point of a curve
    Curvature,
}

impl MarkerRole {
    pub fn color(self) -> PackedRgba {
        match self {
            MarkerRole::Anchor => PackedRgba::from_rgba(255, 0, 0, 255),
            MarkerRole::Corner => PackedRgba::from_rgba(255, 255, 0, 255),
            MarkerRole::Curvature => PackedRgba::from_rgba(0, 0, 255, 255),
        }
    }

    fn style(self) -> PrimitiveStyle {
        PrimitiveStyle {
            stroke: self.color(),
            fill: MARKER_FILL,
            line_width: MARKER_LINE_WIDTH,
        }
    }
}

/// Invoked with the marker's new center after each drag step.
pub type MoveCallback = Rc<dyn Fn(&mut dyn DrawingSurface, Pos2)>;

struct MarkerState {
    center: Pos2,
    radius: f32,
    role: MarkerRole,
    primitive: PrimitiveHandle,
    /// Last pointer position of an active drag
    drag_origin: Option<Pos2>,
    on_move: Option<MoveCallback>,
}

impl MarkerState {
    fn geometry(&self) -> Geometry {
        Geometry::Circle {
            center: self.center,
            radius: self.radius,
        }
    }
}

/// A draggable handle bound to one aspect of a shape's geometry.
///
/// Presses are taken on the marker's own hit-circle; moves and releases are
/// followed on the whole surface so a drag keeps going when the pointer
/// outruns the marker.
#[derive(Clone)]
pub struct Marker {
    state: Rc<RefCell<MarkerState>>,
}

impl std::fmt::Debug for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Marker")
            .field("center", &state.center)
            .field("role", &state.role)
            .field("dragging", &state.drag_origin.is_some())
            .finish_non_exhaustive()
    }
}

impl Marker {
    pub fn create(
        surface: &mut dyn DrawingSurface,
        center: Pos2,
        role: MarkerRole,
        on_move: Option<MoveCallback>,
    ) -> Self {
        Self::create_with_radius(surface, center, MARKER_RADIUS, role, on_move)
    }

    pub fn create_with_radius(
        surface: &mut dyn DrawingSurface,
        center: Pos2,
        radius: f32,
        role: MarkerRole,
        on_move: Option<MoveCallback>,
    ) -> Self {
        let primitive = surface.create_primitive(
            PrimitiveKind::Circle,
            Geometry::Circle { center, radius },
            role.style(),
        );
        let state = Rc::new(RefCell::new(MarkerState {
            center,
            radius,
            role,
            primitive,
            drag_origin: None,
            on_move,
        }));

        let weak = Rc::downgrade(&state);
        surface.on(
            PointerEventKind::PointerDown,
            EventScope::Primitive(primitive),
            handler(&weak, Self::pressed),
        );
        surface.on(
            PointerEventKind::PointerMove,
            EventScope::Surface,
            handler(&weak, Self::dragged),
        );
        surface.on(
            PointerEventKind::PointerUp,
            EventScope::Surface,
            handler(&weak, Self::released),
        );

        Self { state }
    }

    fn pressed(
        state: &Rc<RefCell<MarkerState>>,
        _surface: &mut dyn DrawingSurface,
        event: &PointerEvent,
    ) -> EventFlow {
        let mut state = state.borrow_mut();
        debug!("{:?} marker grabbed at {:?}", state.role, event.pos);
        state.drag_origin = Some(event.pos);
        // Keeps the press from starting a new shape underneath
        EventFlow::Consumed
    }

    fn dragged(
        state: &Rc<RefCell<MarkerState>>,
        surface: &mut dyn DrawingSurface,
        event: &PointerEvent,
    ) -> EventFlow {
        let (center, primitive, geometry, on_move) = {
            let mut state = state.borrow_mut();
            let Some(origin) = state.drag_origin else {
                return EventFlow::Propagate;
            };
            let delta = event.pos - origin;
            state.center += delta;
            state.drag_origin = Some(event.pos);
            (state.center, state.primitive, state.geometry(), state.on_move.clone())
        };

        // The marker borrow is released here so the owner may read it back
        if let Some(on_move) = on_move {
            on_move(surface, center);
        }
        surface.update_geometry(primitive, geometry);
        EventFlow::Propagate
    }

    fn released(
        state: &Rc<RefCell<MarkerState>>,
        _surface: &mut dyn DrawingSurface,
        _event: &PointerEvent,
    ) -> EventFlow {
        let mut state = state.borrow_mut();
        if state.drag_origin.take().is_some() {
            debug!("{:?} marker released at {:?}", state.role, state.center);
        }
        EventFlow::Propagate
    }

    /// Repositions the marker without notifying its owner.
    pub fn move_to(&self, surface: &mut dyn DrawingSurface, center: Pos2) {
        let (primitive, geometry) = {
            let mut state = self.state.borrow_mut();
            state.center = center;
            (state.primitive, state.geometry())
        };
        surface.update_geometry(primitive, geometry);
    }

    pub fn position(&self) -> Pos2 {
        self.state.borrow().center
    }

    pub fn radius(&self) -> f32 {
        self.state.borrow().radius
    }

    pub fn role(&self) -> MarkerRole {
        self.state.borrow().role
    }

    pub fn primitive(&self) -> PrimitiveHandle {
        self.state.borrow().primitive
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag_origin.is_some()
    }
}

fn handler(
    weak: &Weak<RefCell<MarkerState>>,
    action: fn(&Rc<RefCell<MarkerState>>, &mut dyn DrawingSurface, &PointerEvent) -> EventFlow,
) -> PointerHandler {
    let weak = weak.clone();
    Rc::new(move |surface: &mut dyn DrawingSurface, event: &PointerEvent| {
        match weak.upgrade() {
            Some(state) => action(&state, surface, event),
            None => EventFlow::Propagate,
        }
    })
}
