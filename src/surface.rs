use std::rc::Rc;

use crate::geometry::{Geometry, PrimitiveKind};
use crate::input::{PointerEvent, PointerEventKind};
use crate::style::PrimitiveStyle;

/// Opaque reference to a primitive hosted by a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveHandle(pub(crate) usize);

/// Subscription handle returned by [`DrawingSurface::on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) usize);

/// What a listener is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventScope {
    /// Every event on the surface
    Surface,
    /// Only events that hit the given primitive
    Primitive(PrimitiveHandle),
}

/// Returned by handlers to let the event continue or stop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Propagate,
    Consumed,
}

pub type PointerHandler = Rc<dyn Fn(&mut dyn DrawingSurface, &PointerEvent) -> EventFlow>;

/// The canvas the shape core draws on and listens to.
///
/// Handlers receive the surface mutably so they can update geometry and
/// (un)register listeners while an event is being dispatched.
pub trait DrawingSurface {
    fn create_primitive(
        &mut self,
        kind: PrimitiveKind,
        geometry: Geometry,
        style: PrimitiveStyle,
    ) -> PrimitiveHandle;

    fn update_geometry(&mut self, handle: PrimitiveHandle, geometry: Geometry);

    fn geometry(&self, handle: PrimitiveHandle) -> Option<&Geometry>;

    fn on(
        &mut self,
        kind: PointerEventKind,
        scope: EventScope,
        handler: PointerHandler,
    ) -> ListenerId;

    /// Removes a listener. Returns `false` if it was not registered.
    fn off(&mut self, id: ListenerId) -> bool;
}
