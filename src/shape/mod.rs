use std::cell::RefCell;
use std::rc::{Rc, Weak};

use egui::Pos2;
use log::{debug, info, warn};

use crate::geometry::Geometry;
use crate::id_generator::generate_shape_id;
use crate::input::{PointerEvent, PointerEventKind};
use crate::marker::{Marker, MarkerRole, MoveCallback};
use crate::style::{PrimitiveStyle, StyleProvider};
use crate::surface::{
    DrawingSurface, EventFlow, EventScope, ListenerId, PointerHandler, PrimitiveHandle,
};

mod arc;
mod boxed;
mod curve;

pub use arc::{EllipticalArc, PROVISIONAL_RADIUS_Y};
pub use boxed::BoxShape;
pub use curve::QuadraticCurve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// The shape tools offered by the tool controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    EllipticalArc,
    QuadraticCurve,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Rectangle,
        ShapeKind::Ellipse,
        ShapeKind::EllipticalArc,
        ShapeKind::QuadraticCurve,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::EllipticalArc => "Arc",
            ShapeKind::QuadraticCurve => "Curve",
        }
    }

    pub fn factory(self) -> ShapeFactory {
        match self {
            ShapeKind::Rectangle => create_rectangle,
            ShapeKind::Ellipse => create_ellipse,
            ShapeKind::EllipticalArc => create_elliptical_arc,
            ShapeKind::QuadraticCurve => create_quadratic_curve,
        }
    }
}

/// `Sizing` until the first pointer release, `Editable` forever after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Sizing,
    Editable,
}

/// Builds a shape of one kind at the press point.
pub type ShapeFactory = fn(&mut dyn DrawingSurface, &dyn StyleProvider, Pos2) -> AnyShape;

pub fn create_rectangle(
    surface: &mut dyn DrawingSurface,
    style: &dyn StyleProvider,
    pos: Pos2,
) -> AnyShape {
    AnyShape::Rectangle(BoxShape::create(surface, ShapeKind::Rectangle, style, pos))
}

pub fn create_ellipse(
    surface: &mut dyn DrawingSurface,
    style: &dyn StyleProvider,
    pos: Pos2,
) -> AnyShape {
    AnyShape::Ellipse(BoxShape::create(surface, ShapeKind::Ellipse, style, pos))
}

pub fn create_elliptical_arc(
    surface: &mut dyn DrawingSurface,
    style: &dyn StyleProvider,
    pos: Pos2,
) -> AnyShape {
    AnyShape::EllipticalArc(EllipticalArc::create(surface, style, pos))
}

pub fn create_quadratic_curve(
    surface: &mut dyn DrawingSurface,
    style: &dyn StyleProvider,
    pos: Pos2,
) -> AnyShape {
    AnyShape::QuadraticCurve(QuadraticCurve::create(surface, style, pos))
}

/// What the tool controller and the host need from any shape.
pub trait Shape {
    fn id(&self) -> ShapeId;
    fn kind(&self) -> ShapeKind;
    fn phase(&self) -> Phase;
    /// The anchor point, moved only through marker 0
    fn origin(&self) -> Pos2;
    /// Style captured at creation
    fn style(&self) -> PrimitiveStyle;
    fn primitive(&self) -> PrimitiveHandle;
    /// Anchor first, then far corner or endpoint, then curvature handle
    fn markers(&self) -> Vec<Marker>;
    /// Feeds a pointer event to the sizing state machine. Ignored once editable.
    fn on_pointer_event(
        &self,
        surface: &mut dyn DrawingSurface,
        event: &PointerEvent,
    ) -> EventFlow;
}

/// The shape variants as one tagged type.
#[derive(Debug, Clone)]
pub enum AnyShape {
    Rectangle(BoxShape),
    Ellipse(BoxShape),
    EllipticalArc(EllipticalArc),
    QuadraticCurve(QuadraticCurve),
}

impl AnyShape {
    fn as_shape(&self) -> &dyn Shape {
        match self {
            AnyShape::Rectangle(shape) | AnyShape::Ellipse(shape) => shape,
            AnyShape::EllipticalArc(shape) => shape,
            AnyShape::QuadraticCurve(shape) => shape,
        }
    }

    pub fn as_box(&self) -> Option<&BoxShape> {
        match self {
            AnyShape::Rectangle(shape) | AnyShape::Ellipse(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_arc(&self) -> Option<&EllipticalArc> {
        match self {
            AnyShape::EllipticalArc(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&QuadraticCurve> {
        match self {
            AnyShape::QuadraticCurve(shape) => Some(shape),
            _ => None,
        }
    }
}

impl Shape for AnyShape {
    fn id(&self) -> ShapeId {
        self.as_shape().id()
    }

    fn kind(&self) -> ShapeKind {
        self.as_shape().kind()
    }

    fn phase(&self) -> Phase {
        self.as_shape().phase()
    }

    fn origin(&self) -> Pos2 {
        self.as_shape().origin()
    }

    fn style(&self) -> PrimitiveStyle {
        self.as_shape().style()
    }

    fn primitive(&self) -> PrimitiveHandle {
        self.as_shape().primitive()
    }

    fn markers(&self) -> Vec<Marker> {
        self.as_shape().markers()
    }

    fn on_pointer_event(
        &self,
        surface: &mut dyn DrawingSurface,
        event: &PointerEvent,
    ) -> EventFlow {
        self.as_shape().on_pointer_event(surface, event)
    }
}

/// Implements [`Shape`] for a variant wrapping `state: Rc<RefCell<_>>`.
macro_rules! impl_shape {
    ($variant:ty) => {
        impl $crate::shape::Shape for $variant {
            fn id(&self) -> $crate::shape::ShapeId {
                self.state.borrow().core.id
            }

            fn kind(&self) -> $crate::shape::ShapeKind {
                self.state.borrow().core.kind
            }

            fn phase(&self) -> $crate::shape::Phase {
                self.state.borrow().core.phase
            }

            fn origin(&self) -> egui::Pos2 {
                self.state.borrow().core.origin
            }

            fn style(&self) -> $crate::style::PrimitiveStyle {
                self.state.borrow().core.style
            }

            fn primitive(&self) -> $crate::surface::PrimitiveHandle {
                self.state.borrow().core.primitive
            }

            fn markers(&self) -> Vec<$crate::marker::Marker> {
                self.state.borrow().core.markers.clone()
            }

            fn on_pointer_event(
                &self,
                surface: &mut dyn $crate::surface::DrawingSurface,
                event: &$crate::input::PointerEvent,
            ) -> $crate::surface::EventFlow {
                $crate::shape::handle_pointer(&self.state, surface, event)
            }
        }
    };
}
pub(crate) use impl_shape;

/// Surface listeners a shape holds while it is being sized.
#[derive(Debug)]
struct SizingListeners {
    motion: ListenerId,
    release: ListenerId,
}

/// State shared by every variant.
#[derive(Debug)]
pub(crate) struct ShapeCore {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub style: PrimitiveStyle,
    pub origin: Pos2,
    pub markers: Vec<Marker>,
    pub primitive: PrimitiveHandle,
    pub phase: Phase,
    sizing: Option<SizingListeners>,
}

impl ShapeCore {
    /// Drops the sizing listeners. Returns `false` if they were already gone.
    fn disconnect_sizing(&mut self, surface: &mut dyn DrawingSurface) -> bool {
        let Some(listeners) = self.sizing.take() else {
            return false;
        };
        surface.off(listeners.motion);
        surface.off(listeners.release);
        debug!("{:?} {:?} stopped listening for sizing", self.kind, self.id);
        true
    }
}

type EditAction<S> = fn(&mut S, &mut dyn DrawingSurface, Pos2);

/// Per-variant behaviour driven by the shared sizing/editing machinery.
pub(crate) trait ShapeState: Sized + 'static {
    fn core(&self) -> &ShapeCore;
    fn core_mut(&mut self) -> &mut ShapeCore;

    /// Follows the pointer while sizing
    fn track_pointer(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2);

    /// Commits the size at the release point and adds the remaining markers.
    fn finalize(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2, this: &Weak<RefCell<Self>>);

    fn resize(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2);

    fn move_shape(&mut self, surface: &mut dyn DrawingSurface, pos: Pos2);

    fn adjust_curvature(&mut self, _surface: &mut dyn DrawingSurface, _pos: Pos2) {}
}

/// Creates the primitive, the anchor marker and the sizing listeners, in
/// that order so the anchor stacks above the shape.
pub(crate) fn spawn<S: ShapeState>(
    surface: &mut dyn DrawingSurface,
    kind: ShapeKind,
    style: &dyn StyleProvider,
    origin: Pos2,
    geometry: Geometry,
    build: impl FnOnce(ShapeCore) -> S,
) -> Rc<RefCell<S>> {
    let style = PrimitiveStyle::capture(style);
    let primitive = surface.create_primitive(geometry.kind(), geometry, style);
    let id = generate_shape_id();

    let state = Rc::new_cyclic(|this: &Weak<RefCell<S>>| {
        let anchor = Marker::create(
            surface,
            origin,
            MarkerRole::Anchor,
            Some(marker_callback(this, S::move_shape)),
        );
        RefCell::new(build(ShapeCore {
            id,
            kind,
            style,
            origin,
            markers: vec![anchor],
            primitive,
            phase: Phase::Sizing,
            sizing: None,
        }))
    });

    let motion = surface.on(
        PointerEventKind::PointerMove,
        EventScope::Surface,
        sizing_handler(&state),
    );
    let release = surface.on(
        PointerEventKind::PointerUp,
        EventScope::Surface,
        sizing_handler(&state),
    );
    state.borrow_mut().core_mut().sizing = Some(SizingListeners { motion, release });

    info!("Created {} {:?} at {:?}", kind.label(), id, origin);
    state
}

fn sizing_handler<S: ShapeState>(state: &Rc<RefCell<S>>) -> PointerHandler {
    let weak = Rc::downgrade(state);
    Rc::new(move |surface: &mut dyn DrawingSurface, event: &PointerEvent| {
        match weak.upgrade() {
            Some(state) => handle_pointer(&state, surface, event),
            None => EventFlow::Propagate,
        }
    })
}

pub(crate) fn handle_pointer<S: ShapeState>(
    state: &Rc<RefCell<S>>,
    surface: &mut dyn DrawingSurface,
    event: &PointerEvent,
) -> EventFlow {
    let this = Rc::downgrade(state);
    let Ok(mut shape) = state.try_borrow_mut() else {
        warn!("Shape is busy, dropping {:?}", event.kind);
        return EventFlow::Propagate;
    };
    if shape.core().phase != Phase::Sizing {
        return EventFlow::Propagate;
    }

    match event.kind {
        PointerEventKind::PointerMove => shape.track_pointer(surface, event.pos),
        PointerEventKind::PointerUp => {
            if shape.core_mut().disconnect_sizing(surface) {
                shape.finalize(surface, event.pos, &this);
                let core = shape.core_mut();
                core.phase = Phase::Editable;
                debug!(
                    "{:?} {:?} editable with {} markers",
                    core.kind,
                    core.id,
                    core.markers.len()
                );
            }
        }
        PointerEventKind::PointerDown => {}
    }
    EventFlow::Propagate
}

/// Wraps an edit so it only runs on an editable shape.
pub(crate) fn marker_callback<S: ShapeState>(
    this: &Weak<RefCell<S>>,
    action: EditAction<S>,
) -> MoveCallback {
    let this = this.clone();
    Rc::new(move |surface: &mut dyn DrawingSurface, pos: Pos2| {
        if let Some(state) = this.upgrade() {
            edit(&state, surface, pos, action);
        }
    })
}

pub(crate) fn edit<S: ShapeState>(
    state: &Rc<RefCell<S>>,
    surface: &mut dyn DrawingSurface,
    pos: Pos2,
    action: EditAction<S>,
) {
    let Ok(mut shape) = state.try_borrow_mut() else {
        warn!("Shape is busy, dropping edit at {:?}", pos);
        return;
    };
    if shape.core().phase != Phase::Editable {
        debug!("Ignoring edit of {:?} while sizing", shape.core().id);
        return;
    }
    action(&mut *shape, surface, pos);
}
