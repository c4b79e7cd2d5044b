use std::collections::{BTreeMap, HashSet};

use egui::Pos2;
use log::{debug, warn};

use crate::geometry::{Geometry, PrimitiveKind};
use crate::input::{PointerEvent, PointerEventKind};
use crate::style::PrimitiveStyle;
use crate::surface::{
    DrawingSurface, EventFlow, EventScope, ListenerId, PointerHandler, PrimitiveHandle,
};

/// A primitive as stored by the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub geometry: Geometry,
    pub style: PrimitiveStyle,
}

struct Listener {
    id: ListenerId,
    kind: PointerEventKind,
    scope: EventScope,
    handler: PointerHandler,
}

/// In-memory retained scene implementing [`DrawingSurface`].
///
/// Primitives are drawn and stacked in creation order. Pointer events fed to
/// [`Canvas::dispatch`] go first to listeners scoped to primitives under the
/// pointer (topmost first), then to surface-wide listeners in registration
/// order, until a handler consumes the event.
#[derive(Default)]
pub struct Canvas {
    primitives: BTreeMap<PrimitiveHandle, Primitive>,
    listeners: Vec<Listener>,
    /// Ids of `listeners`, for the per-handler check during dispatch
    live: HashSet<ListenerId>,
    next_primitive: usize,
    next_listener: usize,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("primitives", &self.primitives.len())
            .field("listeners", &format!("<{} listeners>", self.listeners.len()))
            .finish()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitive(&self, handle: PrimitiveHandle) -> Option<&Primitive> {
        self.primitives.get(&handle)
    }

    /// All primitives, bottom to top
    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveHandle, &Primitive)> {
        self.primitives.iter().map(|(handle, primitive)| (*handle, primitive))
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.live.contains(&id)
    }

    fn hits(&self, handle: PrimitiveHandle, pos: Pos2) -> bool {
        self.primitives
            .get(&handle)
            .is_some_and(|primitive| primitive.geometry.contains(pos))
    }

    /// Dispatches one pointer event.
    ///
    /// Handlers see a snapshot of the listeners taken when dispatch starts:
    /// listeners added meanwhile wait for the next event and listeners
    /// removed meanwhile are skipped.
    pub fn dispatch(&mut self, event: PointerEvent) -> EventFlow {
        let mut scoped = Vec::new();
        let mut surface_wide = Vec::new();
        for listener in self.listeners.iter().filter(|l| l.kind == event.kind) {
            let entry = (listener.id, listener.handler.clone());
            match listener.scope {
                EventScope::Primitive(handle) => scoped.push((handle, entry)),
                EventScope::Surface => surface_wide.push(entry),
            }
        }
        // Stable sort keeps registration order among one primitive's listeners
        scoped.sort_by(|a, b| b.0.cmp(&a.0));

        for (handle, (id, handler)) in scoped {
            if !self.is_registered(id) || !self.hits(handle, event.pos) {
                continue;
            }
            if handler(self, &event) == EventFlow::Consumed {
                return EventFlow::Consumed;
            }
        }

        for (id, handler) in surface_wide {
            if !self.is_registered(id) {
                continue;
            }
            if handler(self, &event) == EventFlow::Consumed {
                return EventFlow::Consumed;
            }
        }

        EventFlow::Propagate
    }
}

impl DrawingSurface for Canvas {
    fn create_primitive(
        &mut self,
        kind: PrimitiveKind,
        geometry: Geometry,
        style: PrimitiveStyle,
    ) -> PrimitiveHandle {
        if geometry.kind() != kind {
            warn!("Creating {:?} primitive with {:?} geometry", kind, geometry.kind());
        }
        let handle = PrimitiveHandle(self.next_primitive);
        self.next_primitive += 1;
        self.primitives.insert(handle, Primitive { kind, geometry, style });
        handle
    }

    fn update_geometry(&mut self, handle: PrimitiveHandle, geometry: Geometry) {
        match self.primitives.get_mut(&handle) {
            Some(primitive) if primitive.kind == geometry.kind() => primitive.geometry = geometry,
            Some(primitive) => warn!(
                "Ignoring {:?} geometry for {:?} primitive {:?}",
                geometry.kind(),
                primitive.kind,
                handle
            ),
            None => warn!("Geometry update for unknown primitive {:?}", handle),
        }
    }

    fn geometry(&self, handle: PrimitiveHandle) -> Option<&Geometry> {
        self.primitives.get(&handle).map(|primitive| &primitive.geometry)
    }

    fn on(
        &mut self,
        kind: PointerEventKind,
        scope: EventScope,
        handler: PointerHandler,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener { id, kind, scope, handler });
        self.live.insert(id);
        id
    }

    fn off(&mut self, id: ListenerId) -> bool {
        if !self.live.remove(&id) {
            debug!("Listener {:?} was already disconnected", id);
            return false;
        }
        self.listeners.retain(|listener| listener.id != id);
        true
    }
}
