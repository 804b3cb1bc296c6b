mod common;

use egui::Pos2;
use fry_studio::{Command, CursorHint, InteractionState};

use common::{editor, solid};

#[test]
fn test_drag_free_text() {
    let mut editor = editor();
    editor.execute(Command::AddFreeText, 0.0);
    let id = editor.scene().selected().unwrap();

    let down = editor.pointer_down(Pos2::new(54.0, 96.0));
    assert_eq!(down.cursor, CursorHint::Move);
    assert_eq!(editor.interaction().state(), InteractionState::DraggingElement(id));

    editor.pointer_move(Pos2::new(64.8, 115.2));
    let pos = editor.scene().element(id).unwrap().position();
    assert!((pos.x - 0.6).abs() < 1e-4);
    assert!((pos.y - 0.6).abs() < 1e-4);

    let up = editor.pointer_up(1.0);
    assert!(up.drag_ended);
    assert_eq!(editor.interaction().state(), InteractionState::Idle);
}

#[test]
fn test_resize_sticker_from_handle() {
    let mut editor = editor();
    editor.execute(Command::AddSticker(solid(10, 10, [0, 200, 0, 255])), 0.0);
    let id = editor.scene().selected().unwrap();

    // Bottom-right corner of the 32.4 px sticker centered on the frame
    let corner = Pos2::new(54.0 + 16.2, 96.0 + 16.2);
    let down = editor.pointer_down(corner);
    assert_eq!(down.cursor, CursorHint::ResizeDiagonal);

    editor.pointer_move(corner + egui::vec2(40.0, 0.0));
    let scale = editor.scene().element(id).unwrap().scale().unwrap();
    assert!((scale - 0.5).abs() < 1e-4);
    editor.pointer_up(0.5);
}

#[test]
fn test_no_pass_starts_while_dragging() {
    let mut editor = editor();
    editor.execute(Command::LoadImage(solid(16, 16, [90, 90, 90, 255])), 0.0);

    editor.pointer_down(Pos2::new(10.0, 10.0));
    assert!(editor.interaction().is_dragging());
    editor.pointer_move(Pos2::new(20.0, 10.0));

    // Deadline lapses mid-drag: nothing starts
    editor.tick(5.0);
    assert!(!editor.is_busy());

    // Release re-arms the debounce and the pass follows
    editor.pointer_up(5.0);
    editor.tick(5.5);
    assert!(editor.is_busy());
}

#[test]
fn test_export_after_pass() {
    let mut editor = editor();
    editor.execute(Command::AddBand, 0.0);
    editor.execute(Command::SetFryLevel(3), 0.0);
    let mut now = 1.0;
    editor.tick(now);
    while editor.is_busy() {
        now += 0.016;
        editor.tick(now);
    }
    let jpeg = editor.export_jpeg().unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}
