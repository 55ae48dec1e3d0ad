use bevy::prelude::*;
use bevy::window::{CursorEntered, CursorLeft};

use super::instance::FloatingMascot;

/// Routes pointer enter/leave over floating windows to the owning instance.
///
/// Instances are addressed by window entity, never by reference: once an
/// entity leaves `Active` the handlers become no-ops, and once it despawns
/// the lookup simply fails. There is no back-reference to detach and nothing
/// that could keep a closing window alive.
pub fn track_hover(
    mut entered: EventReader<CursorEntered>,
    mut left: EventReader<CursorLeft>,
    mut floaters: Query<&mut FloatingMascot>,
) {
    for event in entered.read() {
        if let Ok(mut floater) = floaters.get_mut(event.window) {
            floater.hover_enter();
        }
    }
    for event in left.read() {
        if let Ok(mut floater) = floaters.get_mut(event.window) {
            floater.hover_exit();
        }
    }
}
