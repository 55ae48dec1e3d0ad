use bevy_egui::egui;
use std::path::PathBuf;

use crate::state::AppState;

pub fn render_dialogs(ctx: &egui::Context, state: &mut AppState) {
    // Import dialog (typed path; used where no native folder picker is wired)
    if state.show_import_dialog {
        egui::Window::new("Import Mascot Folder")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Folder of sprite frames to import:");
                ui.text_edit_singleline(&mut state.import_path);
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let has_path = !state.import_path.trim().is_empty();
                    if ui
                        .add_enabled(has_path, egui::Button::new("Import"))
                        .clicked()
                    {
                        let path = PathBuf::from(state.import_path.trim());
                        state.import_from(&path);
                        state.import_path.clear();
                        state.show_import_dialog = false;
                    }
                    if ui.button("Cancel").clicked() {
                        state.import_path.clear();
                        state.show_import_dialog = false;
                    }
                });
            });
    }

    // Rename dialog
    if state.show_rename_dialog {
        egui::Window::new("Rename Mascot")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("New name:");
                    ui.text_edit_singleline(&mut state.rename_new_name);
                });
                ui.horizontal(|ui| {
                    if ui.button("Rename").clicked() {
                        if let Some(id) = state.rename_target.take() {
                            let new_name = state.rename_new_name.clone();
                            state.rename_mascot(id, &new_name);
                        }
                        state.show_rename_dialog = false;
                    }
                    if ui.button("Cancel").clicked() {
                        state.show_rename_dialog = false;
                        state.rename_target = None;
                    }
                });
            });
    }

    // Delete confirmation dialog
    if state.show_delete_confirm_dialog {
        let name = state
            .delete_target
            .and_then(|id| state.catalog.get(id))
            .map(|m| m.name.clone())
            .unwrap_or_default();
        egui::Window::new("Delete Mascot?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Are you sure you want to delete ");
                    ui.label(egui::RichText::new(&name).strong());
                    ui.label("?");
                });
                ui.label("Its stored frames are deleted too. Already-open windows keep running.");
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        if let Some(id) = state.delete_target.take() {
                            state.delete_mascot(id);
                        }
                        state.show_delete_confirm_dialog = false;
                    }
                    if ui.button("Cancel").clicked() {
                        state.show_delete_confirm_dialog = false;
                        state.delete_target = None;
                    }
                });
            });
    }
}
