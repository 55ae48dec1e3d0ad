use bevy::prelude::*;
use bevy::window::ExitCondition;
use bevy_egui::EguiPlugin;

mod file;
mod floating;
mod imaging;
mod model;
mod state;
mod storage;
mod ui;

use crate::floating::{
    activate_opened, animate_mascots, finalize_closing, handle_close, handle_show, move_mascots,
    track_hover, ActiveMascots, CloseMascot, MascotClosed, ShowMascot,
};
use crate::state::AppState;
use crate::ui::{floating_overlay, ui_system};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Shimeji Desk".into(),
                resolution: (900., 600.).into(),
                ..default()
            }),
            // Closing the catalog window takes the mascots with it
            exit_condition: ExitCondition::OnPrimaryClosed,
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .init_resource::<AppState>()
        .init_resource::<ActiveMascots>()
        .add_event::<ShowMascot>()
        .add_event::<CloseMascot>()
        .add_event::<MascotClosed>()
        .add_systems(Startup, setup)
        // One explicit chain: show/close requests raised by the UI systems
        // are handled at the end of the same frame, after every tick system
        // has run, and the Last-schedule finalizer releases windows only
        // once the whole frame is done with them.
        .add_systems(
            Update,
            (
                activate_opened,
                ui_system,
                floating_overlay,
                track_hover,
                animate_mascots,
                move_mascots,
                handle_show,
                handle_close,
            )
                .chain(),
        )
        .add_systems(Last, finalize_closing)
        .run();
}

fn setup(mut commands: Commands, mut state: ResMut<AppState>) {
    commands.spawn(Camera2d);
    *state = AppState::new();
}
