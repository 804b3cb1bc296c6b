//! Pointer-driven selection, drag and resize of the scene.
//!
//! The interaction machine only ever sees canvas-pixel positions; mapping
//! from screen space happens in the input layer.
//!
//! # State Transitions
//!
//! ```text
//!                        pointer down on handle
//!              ┌────────────────────────────────────► ResizingElement ─┐
//!              │                                                       │
//! ┌────────────┴──┐      pointer down on element                       │
//! │ Idle/Hovering ├─────────────────────────────────► DraggingElement ─┤ pointer up
//! └────────────┬──┘                                                    │
//!              │         pointer down elsewhere (image loaded)         │
//!              └────────────────────────────────────► DraggingImage ───┤
//!                                                                      │
//!                                  Idle ◄──────────────────────────────┘
//! ```
use egui::{Pos2, Vec2};
use log::debug;

use crate::config::FryConfig;
use crate::geometry::{hit_test, is_point_near_handle};
use crate::id_generator::ElementId;
use crate::scene::Scene;
use crate::text::TextMeasure;

/// What the pointer is over while no button is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Handle(ElementId),
    Element(ElementId),
    Band(ElementId),
    Image,
}

/// Mouse cursor the shell should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Grab,
    Grabbing,
    Move,
    ResizeVertical,
    ResizeDiagonal,
}

impl From<CursorHint> for egui::CursorIcon {
    fn from(hint: CursorHint) -> Self {
        match hint {
            CursorHint::Default => egui::CursorIcon::Default,
            CursorHint::Grab => egui::CursorIcon::Grab,
            CursorHint::Grabbing => egui::CursorIcon::Grabbing,
            CursorHint::Move => egui::CursorIcon::Move,
            CursorHint::ResizeVertical => egui::CursorIcon::ResizeVertical,
            CursorHint::ResizeDiagonal => egui::CursorIcon::ResizeNwSe,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering(HoverTarget),
    DraggingImage,
    DraggingElement(ElementId),
    ResizingElement(ElementId),
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            InteractionState::DraggingImage
                | InteractionState::DraggingElement(_)
                | InteractionState::ResizingElement(_)
        )
    }
}

/// Values captured at pointer-down, valid until pointer-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start_pointer: Pos2,
    /// Element position (normalized) or image origin (pixels)
    pub initial_position: Pos2,
    pub initial_scale: f32,
}

/// Outcome of one pointer event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerResponse {
    pub cursor: CursorHint,
    /// The scene changed and needs a clean redraw
    pub needs_render: bool,
    /// A drag or resize just finished
    pub drag_ended: bool,
}

#[derive(Debug, Default)]
pub struct Interaction {
    state: InteractionState,
    session: Option<DragSession>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    fn transition(&mut self, state: InteractionState) {
        if self.state != state {
            debug!("Interaction {:?} → {:?}", self.state, state);
            self.state = state;
        }
    }

    pub fn pointer_down(
        &mut self,
        pos: Pos2,
        scene: &mut Scene,
        config: &FryConfig,
        measure: &dyn TextMeasure,
    ) -> PointerResponse {
        // The selected element's resize handle wins over everything else
        if let Some(selected) = scene.selected_element() {
            if is_point_near_handle(pos, selected, config, measure) {
                let id = selected.id();
                self.session = Some(DragSession {
                    start_pointer: pos,
                    initial_position: selected.position(),
                    initial_scale: selected.scale().unwrap_or(1.0),
                });
                self.transition(InteractionState::ResizingElement(id));
                return PointerResponse {
                    cursor: CursorHint::ResizeDiagonal,
                    ..PointerResponse::default()
                };
            }
        }

        if let Some(id) = hit_test(scene.elements(), pos, config, measure) {
            let Some(element) = scene.element(id) else {
                return PointerResponse::default();
            };
            let cursor = if element.is_band() {
                CursorHint::ResizeVertical
            } else {
                CursorHint::Move
            };
            self.session = Some(DragSession {
                start_pointer: pos,
                initial_position: element.position(),
                initial_scale: element.scale().unwrap_or(1.0),
            });
            scene.select(Some(id));
            self.transition(InteractionState::DraggingElement(id));
            return PointerResponse {
                cursor,
                needs_render: true,
                drag_ended: false,
            };
        }

        let had_selection = scene.selected().is_some();
        scene.select(None);
        match scene.image() {
            Some(image) => {
                self.session = Some(DragSession {
                    start_pointer: pos,
                    initial_position: image.placement.origin,
                    initial_scale: image.placement.zoom,
                });
                self.transition(InteractionState::DraggingImage);
                PointerResponse {
                    cursor: CursorHint::Grabbing,
                    needs_render: had_selection,
                    drag_ended: false,
                }
            }
            None => {
                self.session = None;
                self.transition(InteractionState::Idle);
                PointerResponse {
                    cursor: CursorHint::Default,
                    needs_render: had_selection,
                    drag_ended: false,
                }
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        pos: Pos2,
        scene: &mut Scene,
        config: &FryConfig,
        measure: &dyn TextMeasure,
    ) -> PointerResponse {
        let Some(session) = self.session.filter(|_| self.state.is_dragging()) else {
            return self.hover(pos, scene, config, measure);
        };
        let delta = pos - session.start_pointer;

        let cursor = match self.state {
            InteractionState::ResizingElement(id) => {
                let scale = session.initial_scale + delta.x / config.resize_sensitivity;
                scene.update_scale(id, scale);
                CursorHint::ResizeDiagonal
            }
            InteractionState::DraggingElement(id) => {
                let frame = config.frame_size();
                let is_band = scene.element(id).is_some_and(|e| e.is_band());
                if is_band {
                    let track = frame.y - config.band_height();
                    let y = session.initial_position.y + delta.y / track;
                    scene.set_position(id, Pos2::new(0.5, y));
                    CursorHint::ResizeVertical
                } else {
                    let moved = session.initial_position + Vec2::new(delta.x / frame.x, delta.y / frame.y);
                    scene.set_position(id, moved);
                    CursorHint::Move
                }
            }
            InteractionState::DraggingImage => {
                scene.pan_image_to(session.initial_position + delta);
                CursorHint::Grabbing
            }
            InteractionState::Idle | InteractionState::Hovering(_) => CursorHint::Default,
        };

        PointerResponse {
            cursor,
            needs_render: true,
            drag_ended: false,
        }
    }

    fn hover(
        &mut self,
        pos: Pos2,
        scene: &Scene,
        config: &FryConfig,
        measure: &dyn TextMeasure,
    ) -> PointerResponse {
        let handle = scene
            .selected_element()
            .filter(|e| is_point_near_handle(pos, e, config, measure))
            .map(|e| HoverTarget::Handle(e.id()));

        let target = handle.or_else(|| {
            hit_test(scene.elements(), pos, config, measure).map(|id| {
                if scene.element(id).is_some_and(|e| e.is_band()) {
                    HoverTarget::Band(id)
                } else {
                    HoverTarget::Element(id)
                }
            })
        });
        let target = target.or_else(|| scene.has_image().then_some(HoverTarget::Image));

        let (state, cursor) = match target {
            Some(target @ HoverTarget::Handle(_)) => {
                (InteractionState::Hovering(target), CursorHint::ResizeDiagonal)
            }
            Some(target @ HoverTarget::Element(_)) => {
                (InteractionState::Hovering(target), CursorHint::Move)
            }
            Some(target @ HoverTarget::Band(_)) => {
                (InteractionState::Hovering(target), CursorHint::ResizeVertical)
            }
            Some(HoverTarget::Image) => {
                (InteractionState::Hovering(HoverTarget::Image), CursorHint::Grab)
            }
            None => (InteractionState::Idle, CursorHint::Default),
        };
        self.transition(state);

        PointerResponse {
            cursor,
            ..PointerResponse::default()
        }
    }

    pub fn pointer_up(&mut self, scene: &Scene) -> PointerResponse {
        let was_dragging = self.state.is_dragging();
        self.session = None;
        self.transition(InteractionState::Idle);
        PointerResponse {
            cursor: if scene.has_image() {
                CursorHint::Grab
            } else {
                CursorHint::Default
            },
            needs_render: false,
            drag_ended: was_dragging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::image::solid_bitmap;
    use crate::text::FixedAdvance;
    use egui::pos2;

    fn setup() -> (Interaction, Scene, FryConfig) {
        let config = FryConfig::default();
        let scene = Scene::new(&config);
        (Interaction::new(), scene, config)
    }

    #[test]
    fn test_drag_free_text_by_pixels() {
        let (mut interaction, mut scene, config) = setup();
        let measure = FixedAdvance(5.0);
        let id = scene.add_free_text();
        scene.select(None);

        let down = interaction.pointer_down(pos2(270.0, 480.0), &mut scene, &config, &measure);
        assert_eq!(down.cursor, CursorHint::Move);
        assert_eq!(interaction.state(), InteractionState::DraggingElement(id));
        assert_eq!(scene.selected(), Some(id));

        let moved = interaction.pointer_move(pos2(324.0, 576.0), &mut scene, &config, &measure);
        assert!(moved.needs_render);
        let pos = scene.element(id).unwrap().position();
        assert!((pos.x - 0.6).abs() < 1e-5);
        assert!((pos.y - 0.6).abs() < 1e-5);

        let up = interaction.pointer_up(&scene);
        assert!(up.drag_ended);
        assert_eq!(interaction.state(), InteractionState::Idle);
    }

    #[test]
    fn test_band_drag_uses_track_height() {
        let (mut interaction, mut scene, config) = setup();
        let measure = FixedAdvance(5.0);
        let id = scene.add_band();

        // Band at y = 0.5 occupies [456, 504]
        interaction.pointer_down(pos2(10.0, 470.0), &mut scene, &config, &measure);
        interaction.pointer_move(pos2(300.0, 470.0 + 91.2), &mut scene, &config, &measure);
        let pos = scene.element(id).unwrap().position();
        assert_eq!(pos.x, 0.5);
        assert!((pos.y - 0.6).abs() < 1e-4);

        interaction.pointer_move(pos2(10.0, 5000.0), &mut scene, &config, &measure);
        assert_eq!(scene.element(id).unwrap().position().y, 1.0);
    }

    #[test]
    fn test_resize_via_handle() {
        let (mut interaction, mut scene, config) = setup();
        let measure = FixedAdvance(5.0);
        let id = scene.add_sticker(solid_bitmap(10, 10, [0, 0, 0, 255]));

        // 162 px square centered at (270, 480): handle at (351, 561)
        let down = interaction.pointer_down(pos2(350.0, 560.0), &mut scene, &config, &measure);
        assert_eq!(down.cursor, CursorHint::ResizeDiagonal);
        assert_eq!(interaction.state(), InteractionState::ResizingElement(id));

        interaction.pointer_move(pos2(390.0, 600.0), &mut scene, &config, &measure);
        let scale = scene.element(id).unwrap().scale().unwrap();
        assert!((scale - 0.5).abs() < 1e-5);

        interaction.pointer_move(pos2(-2000.0, 600.0), &mut scene, &config, &measure);
        assert_eq!(scene.element(id).unwrap().scale(), Some(0.1));
    }

    #[test]
    fn test_empty_space_pans_image_and_clears_selection() {
        let (mut interaction, mut scene, config) = setup();
        let measure = FixedAdvance(5.0);
        scene.load_image(solid_bitmap(800, 600, [0, 0, 0, 255]));
        let sticker = scene.add_sticker(solid_bitmap(10, 10, [0, 0, 0, 255]));
        assert_eq!(scene.selected(), Some(sticker));

        let down = interaction.pointer_down(pos2(20.0, 20.0), &mut scene, &config, &measure);
        assert!(down.needs_render);
        assert_eq!(scene.selected(), None);
        assert_eq!(interaction.state(), InteractionState::DraggingImage);

        interaction.pointer_move(pos2(120.0, 20.0), &mut scene, &config, &measure);
        let origin = scene.image().unwrap().placement.origin;
        assert!((origin.x - -270.0).abs() < 1e-3);
        assert!(origin.y.abs() < 1e-3);
    }

    #[test]
    fn test_no_image_no_drag() {
        let (mut interaction, mut scene, config) = setup();
        let measure = FixedAdvance(5.0);
        interaction.pointer_down(pos2(20.0, 20.0), &mut scene, &config, &measure);
        assert!(!interaction.is_dragging());
        assert!(!interaction.pointer_up(&scene).drag_ended);
    }

    #[test]
    fn test_hover_cursor_hints() {
        let (mut interaction, mut scene, config) = setup();
        let measure = FixedAdvance(5.0);
        assert_eq!(
            interaction.pointer_move(pos2(5.0, 5.0), &mut scene, &config, &measure).cursor,
            CursorHint::Default
        );

        scene.load_image(solid_bitmap(800, 600, [0, 0, 0, 255]));
        let band = scene.add_band();
        scene.set_position(band, pos2(0.5, 0.0));
        let text = scene.add_free_text();

        let at = |interaction: &mut Interaction, scene: &mut Scene, p: Pos2| {
            interaction.pointer_move(p, scene, &config, &measure).cursor
        };
        assert_eq!(at(&mut interaction, &mut scene, pos2(5.0, 10.0)), CursorHint::ResizeVertical);
        assert_eq!(at(&mut interaction, &mut scene, pos2(270.0, 480.0)), CursorHint::Move);
        assert_eq!(at(&mut interaction, &mut scene, pos2(5.0, 700.0)), CursorHint::Grab);
        assert_eq!(interaction.state(), InteractionState::Hovering(HoverTarget::Image));

        // Free text "Text": 4 × 21 = 84 wide, box padded by 20
        let handle = pos2(270.0 + 42.0 + 20.0, 480.0 + 25.2 + 20.0);
        assert_eq!(at(&mut interaction, &mut scene, handle), CursorHint::ResizeDiagonal);
        assert_eq!(
            interaction.state(),
            InteractionState::Hovering(HoverTarget::Handle(text))
        );
    }
}
