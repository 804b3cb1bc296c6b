use egui::{Context, Pos2, Rect, TouchId, TouchPhase};

/// Raw pointer sample: a mouse position or the active touch points.
///
/// Mouse and single-touch input are handled identically downstream; only
/// the first touch point is used.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse(Pos2),
    Touch(Vec<Pos2>),
}

impl PointerInput {
    pub fn primary_position(&self) -> Option<Pos2> {
        match self {
            PointerInput::Mouse(pos) => Some(*pos),
            PointerInput::Touch(points) => points.first().copied(),
        }
    }
}

/// Pointer events in screen coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pointer: PointerInput,
        /// Whether the press started over the canvas widget
        on_canvas: bool,
    },
    PointerMove {
        pointer: PointerInput,
    },
    PointerUp,
}

/// Handles converting raw egui input into pointer events for the editor
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    touches: Vec<(TouchId, Pos2)>,
    canvas_rect: Option<Rect>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the on-screen rectangle of the canvas widget
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    fn pointer_at(&self, pos: Pos2) -> PointerInput {
        if self.touches.is_empty() {
            PointerInput::Mouse(pos)
        } else {
            PointerInput::Touch(self.touches.iter().map(|(_, p)| *p).collect())
        }
    }

    fn track_touch(&mut self, id: TouchId, phase: TouchPhase, pos: Pos2) {
        match phase {
            TouchPhase::Start | TouchPhase::Move => {
                if let Some(entry) = self.touches.iter_mut().find(|(t, _)| *t == id) {
                    entry.1 = pos;
                } else {
                    self.touches.push((id, pos));
                }
            }
            TouchPhase::End | TouchPhase::Cancel => self.touches.retain(|(t, _)| *t != id),
        }
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            for event in &input.events {
                if let egui::Event::Touch { id, phase, pos, .. } = event {
                    self.track_touch(*id, *phase, *pos);
                }
            }

            let pos = input.pointer.interact_pos();

            if input.pointer.primary_pressed() {
                if let Some(pos) = pos {
                    let on_canvas = self.canvas_rect.is_some_and(|rect| rect.contains(pos));
                    events.push(InputEvent::PointerDown {
                        pointer: self.pointer_at(pos),
                        on_canvas,
                    });
                }
            }

            if let Some(pos) = pos {
                if Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove {
                        pointer: self.pointer_at(pos),
                    });
                }
            }
            self.last_pointer_pos = pos;

            if input.pointer.primary_released() {
                events.push(InputEvent::PointerUp);
            }
        });

        events
    }
}
