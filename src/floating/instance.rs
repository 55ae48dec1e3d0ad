use bevy::prelude::*;

use super::registry::MascotClosed;
use crate::model::Mascot;

/// Unscaled sprite edge length in logical pixels
pub const BASE_SIZE: f32 = 150.0;
/// Extra window margin that keeps the overlay controls inside the window
pub const CONTROL_MARGIN: f32 = 35.0;
pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 3.0;

/// Where a freshly spawned floating window lands on screen
pub const SPAWN_POSITION: Vec2 = Vec2::new(300.0, 300.0);

/// Window side length for a given scale factor. Floating windows are square:
/// the sprite at `BASE_SIZE * scale` plus a fixed margin for the controls.
pub fn window_side(scale: f32) -> f32 {
    BASE_SIZE * scale.clamp(MIN_SCALE, MAX_SCALE) + CONTROL_MARGIN
}

/// Lifecycle of a floating mascot window.
///
/// Every timer tick and interaction handler checks this before touching
/// state. `Closing` makes them all inert, which covers ticks and events that
/// were already queued when the close request landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Window resources are still being allocated
    #[default]
    Open,
    /// Window mapped, timers running, interactive
    Active,
    /// Teardown requested; ticks and callbacks no longer act
    Closing,
    /// Terminal; the entity despawns right after entering this state
    Closed,
}

/// One on-screen mascot: an always-on-top transparent window that animates
/// through its frames and wanders around the screen. Owns its camera entity
/// and a snapshot of the mascot record, so catalog edits and deletions never
/// reach a window that is already alive.
#[derive(Component)]
pub struct FloatingMascot {
    pub mascot: Mascot,
    pub lifecycle: Lifecycle,
    pub scale: f32,
    /// Window origin in physical screen pixels. Authoritative: every change
    /// is written through to `WindowPosition::At`.
    pub position: Vec2,
    pub hovered: bool,
    /// The 2D camera rendering to this window
    pub camera: Entity,
}

impl FloatingMascot {
    pub fn new(mascot: Mascot, camera: Entity) -> Self {
        Self {
            mascot,
            lifecycle: Lifecycle::Open,
            scale: 1.0,
            position: SPAWN_POSITION,
            hovered: false,
            camera,
        }
    }

    /// Clamp and apply a new scale factor. Ignored unless active; derived
    /// geometry is recomputed by the caller from `window_side`.
    pub fn set_scale(&mut self, new_scale: f32) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.scale = new_scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Translate the window by a relative delta. Drags arrive as many small
    /// deltas, so relative motion composes correctly.
    pub fn drag_by(&mut self, delta: Vec2) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.position += delta;
    }

    pub fn hover_enter(&mut self) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.hovered = true;
    }

    pub fn hover_exit(&mut self) {
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        self.hovered = false;
    }

    /// Begin teardown. Valid from `Open` or `Active`; anything later is a
    /// no-op, so repeated close requests collapse into one. The caller pauses
    /// the timers on a `true` return; the window itself is released by
    /// `finalize_closing` once this frame's in-flight systems have finished.
    pub fn request_close(&mut self) -> bool {
        match self.lifecycle {
            Lifecycle::Open | Lifecycle::Active => {
                self.lifecycle = Lifecycle::Closing;
                self.hovered = false;
                true
            }
            Lifecycle::Closing | Lifecycle::Closed => false,
        }
    }
}

/// `Open -> Active` once the spawned window exists. Spawning happens via
/// commands, so the window entity only becomes visible to this query on the
/// frame after the show request: by then the OS window is mapped.
pub fn activate_opened(mut floaters: Query<&mut FloatingMascot, With<Window>>) {
    for mut floater in &mut floaters {
        if floater.lifecycle == Lifecycle::Open {
            floater.lifecycle = Lifecycle::Active;
        }
    }
}

/// Final teardown step, scheduled in `Last`: every `Update` system that
/// could still route a tick or event at a closing window has finished by the
/// time this runs, so releasing the window cannot race a callback.
pub fn finalize_closing(
    mut commands: Commands,
    mut floaters: Query<(Entity, &mut FloatingMascot)>,
    mut closed: EventWriter<MascotClosed>,
) {
    for (entity, mut floater) in &mut floaters {
        if floater.lifecycle != Lifecycle::Closing {
            continue;
        }
        floater.lifecycle = Lifecycle::Closed;
        // Camera first: it renders to the window being released.
        commands.entity(floater.camera).despawn();
        commands.entity(entity).despawn();
        closed.send(MascotClosed {
            name: floater.mascot.name.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MascotFrame;

    fn sample_mascot() -> Mascot {
        Mascot::new(
            "blob",
            "/data/blob".into(),
            vec![MascotFrame::new("a.png"), MascotFrame::new("b.png")],
        )
    }

    fn active_floater() -> FloatingMascot {
        let mut floater = FloatingMascot::new(sample_mascot(), Entity::PLACEHOLDER);
        floater.lifecycle = Lifecycle::Active;
        floater
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut floater = active_floater();
        for (requested, expected) in [
            (0.05, 0.2),
            (0.2, 0.2),
            (1.37, 1.37),
            (3.0, 3.0),
            (5.0, 3.0),
        ] {
            floater.set_scale(requested);
            assert_eq!(floater.scale, expected);
        }
    }

    #[test]
    fn test_window_side_formula() {
        assert_eq!(window_side(1.0), 185.0);
        assert_eq!(window_side(2.0), 335.0);
        // Out-of-range scales derive geometry from the clamped value
        assert_eq!(window_side(5.0), window_side(3.0));
    }

    #[test]
    fn test_scale_ignored_before_activation() {
        let mut floater = FloatingMascot::new(sample_mascot(), Entity::PLACEHOLDER);
        assert_eq!(floater.lifecycle, Lifecycle::Open);
        floater.set_scale(2.0);
        assert_eq!(floater.scale, 1.0);
    }

    #[test]
    fn test_drag_composes_relative_deltas() {
        let mut floater = active_floater();
        let start = floater.position;
        floater.drag_by(Vec2::new(3.0, -2.0));
        floater.drag_by(Vec2::new(1.0, 1.0));
        assert_eq!(floater.position, start + Vec2::new(4.0, -1.0));
    }

    #[test]
    fn test_hover_ignored_unless_active() {
        let mut floater = FloatingMascot::new(sample_mascot(), Entity::PLACEHOLDER);
        floater.hover_enter();
        assert!(!floater.hovered);

        floater.lifecycle = Lifecycle::Active;
        floater.hover_enter();
        assert!(floater.hovered);
        floater.hover_exit();
        assert!(!floater.hovered);
    }

    #[test]
    fn test_request_close_is_idempotent() {
        let mut floater = active_floater();
        assert!(floater.request_close());
        assert_eq!(floater.lifecycle, Lifecycle::Closing);
        assert!(!floater.request_close());
        assert_eq!(floater.lifecycle, Lifecycle::Closing);
    }

    #[test]
    fn test_close_valid_while_still_opening() {
        let mut floater = FloatingMascot::new(sample_mascot(), Entity::PLACEHOLDER);
        assert!(floater.request_close());
        assert_eq!(floater.lifecycle, Lifecycle::Closing);
    }

    #[test]
    fn test_no_mutation_after_close() {
        let mut floater = active_floater();
        floater.hover_enter();
        floater.request_close();

        let position = floater.position;
        let scale = floater.scale;
        floater.drag_by(Vec2::splat(10.0));
        floater.set_scale(2.5);
        floater.hover_enter();

        assert_eq!(floater.position, position);
        assert_eq!(floater.scale, scale);
        assert!(!floater.hovered);
    }
}
