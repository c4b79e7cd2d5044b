use egui::{Context, Modifiers, Pos2, Rect};

/// The pointer events a drawing surface dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    PointerDown,
    PointerMove,
    PointerUp,
}

/// A pointer event in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub pos: Pos2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, pos: Pos2) -> Self {
        Self {
            kind,
            pos,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn down(pos: Pos2) -> Self {
        Self::new(PointerEventKind::PointerDown, pos)
    }

    pub fn moved(pos: Pos2) -> Self {
        Self::new(PointerEventKind::PointerMove, pos)
    }

    pub fn up(pos: Pos2) -> Self {
        Self::new(PointerEventKind::PointerUp, pos)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Handles converting raw egui input into canvas-space pointer events
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
    /// A primary-button drag that started on the canvas is in progress
    dragging: bool,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
            dragging: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn to_canvas(&self, pos: Pos2) -> Pos2 {
        (pos - self.canvas_rect.min).to_pos2()
    }

    /// Process raw egui input and generate pointer events.
    ///
    /// Moves and releases are reported while a drag that began on the
    /// canvas is active, even once the pointer leaves it.
    pub fn process_input(&mut self, ctx: &Context) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let modifiers = input.modifiers;
            let Some(pos) = input.pointer.latest_pos() else {
                self.last_pointer_pos = None;
                return;
            };
            let over_canvas = self.canvas_rect.contains(pos);

            if input.pointer.primary_pressed() && over_canvas {
                let press_pos = input.pointer.press_origin().unwrap_or(pos);
                let down = PointerEvent::down(self.to_canvas(press_pos));
                events.push(down.with_modifiers(modifiers));
                self.dragging = true;
            }

            if Some(pos) != self.last_pointer_pos && (over_canvas || self.dragging) {
                events.push(PointerEvent::moved(self.to_canvas(pos)).with_modifiers(modifiers));
            }

            if input.pointer.primary_released() && (self.dragging || over_canvas) {
                events.push(PointerEvent::up(self.to_canvas(pos)).with_modifiers(modifiers));
                self.dragging = false;
            }

            self.last_pointer_pos = Some(pos);
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2, Event, PointerButton, RawInput};

    struct Harness {
        ctx: Context,
        handler: InputHandler,
    }

    impl Harness {
        fn new() -> Self {
            let canvas_rect = Rect::from_min_size(pos2(100.0, 50.0), vec2(400.0, 300.0));
            Self {
                ctx: Context::default(),
                handler: InputHandler::new(canvas_rect),
            }
        }

        fn frame(&mut self, events: Vec<Event>) -> Vec<PointerEvent> {
            let input = RawInput {
                events,
                ..Default::default()
            };
            let mut out = Vec::new();
            let _ = self.ctx.run(input, |ctx| out = self.handler.process_input(ctx));
            out
        }

        fn hover(&mut self, pos: Pos2) -> Vec<PointerEvent> {
            self.frame(vec![Event::PointerMoved(pos)])
        }

        fn button(&mut self, pos: Pos2, pressed: bool) -> Vec<PointerEvent> {
            self.frame(vec![Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers: Modifiers::NONE,
            }])
        }
    }

    #[test]
    fn test_drag_continues_off_canvas() {
        let mut harness = Harness::new();
        harness.hover(pos2(200.0, 150.0));

        assert_eq!(
            harness.button(pos2(200.0, 150.0), true),
            vec![PointerEvent::down(pos2(100.0, 100.0))]
        );
        assert_eq!(
            harness.hover(pos2(50.0, 150.0)),
            vec![PointerEvent::moved(pos2(-50.0, 100.0))]
        );
        assert_eq!(
            harness.button(pos2(50.0, 150.0), false),
            vec![PointerEvent::up(pos2(-50.0, 100.0))]
        );

        // The drag is over, so off-canvas motion is quiet again
        assert!(harness.hover(pos2(40.0, 150.0)).is_empty());
    }

    #[test]
    fn test_press_off_canvas_is_ignored() {
        let mut harness = Harness::new();

        assert!(harness.hover(pos2(20.0, 20.0)).is_empty());
        assert!(harness.button(pos2(20.0, 20.0), true).is_empty());
        assert!(harness.hover(pos2(30.0, 30.0)).is_empty());
        assert!(harness.button(pos2(30.0, 30.0), false).is_empty());
    }

    #[test]
    fn test_release_after_pointer_leaves_window() {
        let mut harness = Harness::new();
        harness.hover(pos2(200.0, 150.0));
        harness.button(pos2(200.0, 150.0), true);

        assert!(harness.frame(vec![Event::PointerGone]).is_empty());

        let back = pos2(900.0, 150.0);
        let events = harness.frame(vec![
            Event::PointerMoved(back),
            Event::PointerButton {
                pos: back,
                button: PointerButton::Primary,
                pressed: false,
                modifiers: Modifiers::NONE,
            },
        ]);
        assert_eq!(
            events,
            vec![
                PointerEvent::moved(pos2(800.0, 100.0)),
                PointerEvent::up(pos2(800.0, 100.0)),
            ]
        );
    }
}
