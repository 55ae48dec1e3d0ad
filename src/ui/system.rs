use bevy::log::debug;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::file::pick_folder;
use crate::floating::{ActiveMascots, CloseMascot, FloatingMascot, MascotClosed, ShowMascot};
use crate::imaging::load_texture_from_file;
use crate::model::Mascot;
use crate::state::AppState;
use crate::ui::dialogs::render_dialogs;

const STATUS_LIFETIME: Duration = Duration::from_secs(4);
const TILE_WIDTH: f32 = 96.0;
const PREVIEW_SIZE: f32 = 80.0;

/// Primary-window UI: toolbar, mascot gallery, dialogs, status bar, and the
/// active-instances panel.
pub fn ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<AppState>,
    registry: Res<ActiveMascots>,
    floaters: Query<&FloatingMascot>,
    mut show_requests: EventWriter<ShowMascot>,
    mut close_requests: EventWriter<CloseMascot>,
    mut closed: EventReader<MascotClosed>,
) {
    for event in closed.read() {
        state.set_status(format!("Closed '{}'", event.name));
    }
    if let Some((_, when)) = &state.status_message {
        if when.elapsed() >= STATUS_LIFETIME {
            state.status_message = None;
        }
    }

    let ctx = contexts.ctx_mut();
    ensure_previews(ctx, &mut state);

    // Dialogs (rendered first so they appear on top)
    render_dialogs(ctx, &mut state);

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Shimeji Desk");
            ui.separator();
            if ui.button("Import Folder…").clicked() {
                if let Some(folder) = pick_folder() {
                    state.import_from(&folder);
                } else {
                    state.show_import_dialog = true;
                }
            }
            if ui
                .button(format!("Active: {}", registry.len()))
                .on_hover_text("Show the list of active mascots")
                .clicked()
            {
                state.show_active_panel = !state.show_active_panel;
            }
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        match &state.status_message {
            Some((message, _)) => ui.label(message),
            None => ui.label(""),
        };
    });

    // Gallery
    let mascots: Vec<Mascot> = state.catalog.mascots.clone();
    egui::CentralPanel::default().show(ctx, |ui| {
        if mascots.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("No mascots yet");
                    ui.label("Import a folder of sprite frames to get started.");
                });
            });
            return;
        }
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for mascot in &mascots {
                    gallery_tile(
                        ui,
                        &mut state,
                        mascot,
                        &mut show_requests,
                    );
                }
            });
        });
    });

    if state.show_active_panel {
        let mut open = true;
        egui::Window::new("Active Mascots")
            .open(&mut open)
            .default_width(260.0)
            .show(ctx, |ui| {
                if registry.is_empty() {
                    ui.label("No active mascots.");
                    ui.label("Click one in the gallery to set it loose.");
                }
                for entity in registry.iter() {
                    let Ok(floater) = floaters.get(entity) else {
                        continue;
                    };
                    ui.horizontal(|ui| {
                        ui.label(&floater.mascot.name);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Close").clicked() {
                                close_requests.send(CloseMascot { target: entity });
                            }
                        });
                    });
                }
            });
        if !open {
            state.show_active_panel = false;
        }
    }
}

fn gallery_tile(
    ui: &mut egui::Ui,
    state: &mut AppState,
    mascot: &Mascot,
    show_requests: &mut EventWriter<ShowMascot>,
) {
    let tile = ui.vertical(|ui| {
        ui.set_width(TILE_WIDTH);
        let preview_size = egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE);
        match state.preview_textures.get(&mascot.id) {
            Some(texture) => {
                ui.add(egui::Image::new(texture).fit_to_exact_size(preview_size));
            }
            None => {
                let (rect, _) = ui.allocate_exact_size(preview_size, egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, 4.0, egui::Color32::from_gray(60));
            }
        }
        ui.label(&mascot.name);
    });

    let response = tile.response.interact(egui::Sense::click());
    if response.clicked() {
        show_requests.send(ShowMascot {
            mascot: mascot.clone(),
        });
    }
    response.context_menu(|ui| {
        if ui.button("Show").clicked() {
            show_requests.send(ShowMascot {
                mascot: mascot.clone(),
            });
            ui.close_menu();
        }
        if ui.button("Rename").clicked() {
            state.show_rename_dialog = true;
            state.rename_target = Some(mascot.id);
            state.rename_new_name = mascot.name.clone();
            ui.close_menu();
        }
        if ui.button("Delete").clicked() {
            state.show_delete_confirm_dialog = true;
            state.delete_target = Some(mascot.id);
            ui.close_menu();
        }
    });
}

/// Load missing gallery previews (the first frame of each mascot). A mascot
/// whose preview fails to decode is remembered so we don't hit the disk for
/// it every frame.
fn ensure_previews(ctx: &egui::Context, state: &mut AppState) {
    let missing: Vec<(Uuid, PathBuf)> = state
        .catalog
        .mascots
        .iter()
        .filter(|m| !state.preview_textures.contains_key(&m.id))
        .filter(|m| !state.preview_failed.contains(&m.id))
        .filter_map(|m| m.preview_path().map(|p| (m.id, p)))
        .collect();
    for (id, path) in missing {
        match load_texture_from_file(ctx, &format!("preview-{}", id), &path) {
            Ok(texture) => {
                state.preview_textures.insert(id, texture);
            }
            Err(e) => {
                debug!("preview unavailable: {}", e);
                state.preview_failed.insert(id);
            }
        }
    }
}
