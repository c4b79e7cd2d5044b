use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use crate::input::{PointerEvent, PointerEventKind};
use crate::shape::{AnyShape, ShapeKind};
use crate::style::StyleProvider;
use crate::surface::{DrawingSurface, EventFlow, EventScope, ListenerId};

#[derive(Default)]
struct ToolState {
    selected: Option<ShapeKind>,
    shapes: Vec<AnyShape>,
}

/// Tracks the selected shape tool and creates a shape on every press that
/// reaches the surface unconsumed.
///
/// Shapes are owned here; once created they take their own events and the
/// controller no longer touches them.
#[derive(Clone)]
pub struct ToolController {
    state: Rc<RefCell<ToolState>>,
    listener: ListenerId,
}

impl ToolController {
    pub fn install(surface: &mut dyn DrawingSurface, style: Rc<dyn StyleProvider>) -> Self {
        let state = Rc::new(RefCell::new(ToolState::default()));
        let weak = Rc::downgrade(&state);

        let listener = surface.on(
            PointerEventKind::PointerDown,
            EventScope::Surface,
            Rc::new(move |surface: &mut dyn DrawingSurface, event: &PointerEvent| {
                let Some(state) = weak.upgrade() else {
                    return EventFlow::Propagate;
                };
                let Some(kind) = state.borrow().selected else {
                    return EventFlow::Propagate;
                };

                let shape = kind.factory()(surface, style.as_ref(), event.pos);
                state.borrow_mut().shapes.push(shape);
                EventFlow::Propagate
            }),
        );
        debug!("Tool controller listening as {:?}", listener);

        Self { state, listener }
    }

    pub fn select(&self, kind: Option<ShapeKind>) {
        let mut state = self.state.borrow_mut();
        if state.selected != kind {
            info!("Selected tool: {}", kind.map_or("none", ShapeKind::label));
            state.selected = kind;
        }
    }

    pub fn selected(&self) -> Option<ShapeKind> {
        self.state.borrow().selected
    }

    /// Created shapes, oldest first
    pub fn shapes(&self) -> Vec<AnyShape> {
        self.state.borrow().shapes.clone()
    }

    pub fn shape_count(&self) -> usize {
        self.state.borrow().shapes.len()
    }

    pub fn listener(&self) -> ListenerId {
        self.listener
    }
}

impl std::fmt::Debug for ToolController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ToolController")
            .field("selected", &state.selected)
            .field("shapes", &state.shapes.len())
            .finish()
    }
}
