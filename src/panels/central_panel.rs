use eframe::egui;

use crate::FryApp;
use crate::geometry::pointer_to_canvas_pixels;
use crate::input::{InputEvent, PointerInput};

/// Largest rect of the frame's aspect ratio that fits in `available`
fn letterbox(available: egui::Rect, frame: egui::Vec2) -> egui::Rect {
    let scale = (available.width() / frame.x).min(available.height() / frame.y);
    egui::Rect::from_center_size(available.center(), frame * scale.max(0.0))
}

pub fn central_panel(app: &mut FryApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::central_panel(&ctx.style()).fill(egui::Color32::from_gray(24)))
        .show(ctx, |ui| {
            let frame_size = app.editor.canvas().size();
            let canvas_rect = letterbox(ui.available_rect_before_wrap(), frame_size);
            app.input.set_canvas_rect(canvas_rect);

            // Claim the area so egui does not treat drags on it as window drags
            ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());

            if let Some(texture) = &app.texture {
                ui.painter().image(
                    texture.id(),
                    canvas_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            handle_input(app, ctx, canvas_rect, frame_size);

            if app.editor.is_busy() {
                let spinner_rect = egui::Rect::from_center_size(
                    canvas_rect.right_top() + egui::vec2(-24.0, 24.0),
                    egui::vec2(24.0, 24.0),
                );
                ui.put(spinner_rect, egui::Spinner::new());
            }

            ctx.set_cursor_icon(app.cursor.into());
        });
}

fn handle_input(app: &mut FryApp, ctx: &egui::Context, canvas_rect: egui::Rect, frame_size: egui::Vec2) {
    let to_canvas = |pointer: &PointerInput| pointer_to_canvas_pixels(pointer, canvas_rect, frame_size);

    for event in app.input.process_input(ctx) {
        match event {
            InputEvent::PointerDown { pointer, on_canvas } => {
                if !on_canvas {
                    continue;
                }
                if let Some(pos) = to_canvas(&pointer) {
                    app.cursor = app.editor.pointer_down(pos).cursor;
                }
            }
            InputEvent::PointerMove { pointer } => {
                let over_canvas = pointer
                    .primary_position()
                    .is_some_and(|pos| canvas_rect.contains(pos));
                if !over_canvas && !app.editor.interaction().is_dragging() {
                    app.cursor = Default::default();
                    continue;
                }
                if let Some(pos) = to_canvas(&pointer) {
                    app.cursor = app.editor.pointer_move(pos).cursor;
                }
            }
            InputEvent::PointerUp => {
                app.cursor = app.editor.pointer_up(app.now).cursor;
            }
        }
    }
}
