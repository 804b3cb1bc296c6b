use std::path::Path;

use eframe::egui;

use crate::FryApp;
use crate::command::Command;
use crate::element::FRY_SCORE_RANGE;
use crate::file_handler::{self, DropMode};
use crate::id_generator::ElementId;
use crate::scene::{MAX_FRY_LEVEL, MAX_TINT_LEVEL, MIN_ZOOM};
use crate::util::timestamp_secs;

// Snapshot of one element for the list, so the scene is not borrowed while
// the widgets run
struct ElementRow {
    id: ElementId,
    label: &'static str,
    text: Option<String>,
    fry_score: f64,
    scale: Option<(f32, std::ops::RangeInclusive<f32>)>,
    selected: bool,
}

pub fn tools_panel(app: &mut FryApp, ctx: &egui::Context) {
    let mut commands = Vec::new();

    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Fry Studio");
            ui.separator();

            source_section(app, ui, &mut commands);
            ui.separator();
            effect_section(app, ui, &mut commands);
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Add band").clicked() {
                    commands.push(Command::AddBand);
                }
                if ui.button("Add text").clicked() {
                    commands.push(Command::AddFreeText);
                }
            });

            egui::ScrollArea::vertical()
                .max_height((ui.available_height() - 90.0).max(120.0))
                .show(ui, |ui| element_list(app, ui, &mut commands));

            ui.separator();
            export_section(app, ui);

            if let Some(status) = &app.status {
                ui.label(status.as_str());
            }
        });

    for command in commands {
        log::debug!("Panel command: {}", command.name());
        app.execute_command(command);
    }
}

fn source_section(app: &mut FryApp, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
    ui.horizontal(|ui| {
        ui.label("Photo");
        ui.text_edit_singleline(&mut app.photo_path);
    });
    ui.horizontal(|ui| {
        ui.label("Sticker");
        ui.text_edit_singleline(&mut app.sticker_path);
    });

    ui.horizontal(|ui| {
        if ui.button("Load photo").clicked() {
            load_into(app, DropMode::Photo, commands);
        }
        if ui.button("Add sticker").clicked() {
            load_into(app, DropMode::Sticker, commands);
        }
    });

    ui.horizontal(|ui| {
        ui.label("Dropped files:");
        ui.radio_value(&mut app.settings.drop_mode, DropMode::Photo, "photo");
        ui.radio_value(&mut app.settings.drop_mode, DropMode::Sticker, "sticker");
    });

    let scene = app.editor.scene();
    let mut zoom_percent = scene.zoom() * 100.0;
    let max_percent = scene.max_zoom() * 100.0;
    let response = ui.add_enabled(
        scene.has_image(),
        egui::Slider::new(&mut zoom_percent, MIN_ZOOM * 100.0..=max_percent)
            .text("Zoom")
            .suffix("%"),
    );
    if response.changed() {
        commands.push(Command::SetZoom(zoom_percent / 100.0));
    }
}

fn load_into(app: &mut FryApp, mode: DropMode, commands: &mut Vec<Command>) {
    let path = match mode {
        DropMode::Photo => app.photo_path.trim().to_owned(),
        DropMode::Sticker => app.sticker_path.trim().to_owned(),
    };
    if path.is_empty() {
        return;
    }
    match file_handler::load_bitmap(Path::new(&path)) {
        Ok(bitmap) => {
            app.status = None;
            commands.push(mode.command(bitmap));
        }
        Err(err) => app.report_error("Could not load image", &err),
    }
}

fn effect_section(app: &mut FryApp, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
    let scene = app.editor.scene();
    let mut fry = scene.fry_level();
    let mut tint = scene.tint_level();

    if ui
        .add(egui::Slider::new(&mut fry, 0..=MAX_FRY_LEVEL).text("Fry"))
        .changed()
    {
        commands.push(Command::SetFryLevel(fry));
    }
    if ui
        .add(egui::Slider::new(&mut tint, 0..=MAX_TINT_LEVEL).text("Tint"))
        .changed()
    {
        commands.push(Command::SetTintLevel(tint));
    }
}

fn element_list(app: &mut FryApp, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
    let scene = app.editor.scene();
    let rows: Vec<ElementRow> = scene
        .elements()
        .iter()
        .map(|element| ElementRow {
            id: element.id(),
            label: element.element_type(),
            text: element.text().map(str::to_owned),
            fry_score: element.fry_score,
            scale: element.scale().zip(element.scale_range()),
            selected: scene.selected() == Some(element.id()),
        })
        .collect();

    if rows.is_empty() {
        ui.weak("No elements");
        return;
    }

    // Topmost first, matching the draw order on the canvas
    for mut row in rows.into_iter().rev() {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(row.selected, format!("{} #{}", row.label, row.id.raw()))
                    .clicked()
                {
                    commands.push(Command::Select(Some(row.id)));
                }
                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                    commands.push(Command::Remove(row.id));
                }
            });

            if let Some(text) = row.text.as_mut() {
                if ui.text_edit_multiline(text).changed() {
                    commands.push(Command::UpdateText {
                        id: row.id,
                        text: text.clone(),
                    });
                }
            }

            if ui
                .add(egui::Slider::new(&mut row.fry_score, FRY_SCORE_RANGE).text("Fry score"))
                .changed()
            {
                commands.push(Command::UpdateFryScore {
                    id: row.id,
                    score: row.fry_score,
                });
            }

            if let Some((mut scale, range)) = row.scale.clone() {
                if ui
                    .add(egui::Slider::new(&mut scale, range).text("Scale"))
                    .changed()
                {
                    commands.push(Command::UpdateScale { id: row.id, scale });
                }
            }
        });
    }
}

fn export_section(app: &mut FryApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label("Export to");
        ui.text_edit_singleline(&mut app.settings.export_dir);
    });
    let busy = app.editor.is_busy();
    if ui
        .add_enabled(!busy, egui::Button::new("Export JPEG"))
        .clicked()
    {
        let dir = Path::new(app.settings.export_dir.trim()).to_path_buf();
        match file_handler::export_frame(&app.editor, &dir, timestamp_secs()) {
            Ok(path) => app.set_status(format!("Saved {}", path.display())),
            Err(err) => app.report_error("Export failed", &err),
        }
    }
}
