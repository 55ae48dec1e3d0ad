use bevy::log::info;
use bevy::prelude::*;
use bevy::render::camera::{ClearColorConfig, RenderTarget};
use bevy::window::{WindowLevel, WindowPosition, WindowRef, WindowResolution};

use super::animation::{AnimationClock, FrameDisplay};
use super::instance::{window_side, FloatingMascot, SPAWN_POSITION};
use super::movement::MovementEngine;
use crate::model::Mascot;

/// Ordered set of live floating-mascot window entities, oldest first.
/// Read-only for presentation; only the handlers below mutate it.
#[derive(Resource, Default)]
pub struct ActiveMascots(Vec<Entity>);

impl ActiveMascots {
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }
}

/// Request to spawn a floating window for a mascot. Carries a full snapshot
/// of the record, so the instance never needs to read the catalog again.
#[derive(Event)]
pub struct ShowMascot {
    pub mascot: Mascot,
}

/// Request to close a live floating window
#[derive(Event)]
pub struct CloseMascot {
    pub target: Entity,
}

/// Completion notification, emitted once a window is fully torn down
#[derive(Event)]
pub struct MascotClosed {
    pub name: String,
}

/// Spawns a floating window per show request: the borderless always-on-top
/// transparent window, its dedicated camera, and the instance components.
pub fn handle_show(
    mut commands: Commands,
    mut requests: EventReader<ShowMascot>,
    mut registry: ResMut<ActiveMascots>,
) {
    for request in requests.read() {
        let side = window_side(1.0);
        let window = commands
            .spawn(Window {
                title: request.mascot.name.clone(),
                resolution: WindowResolution::new(side, side),
                resizable: false,
                decorations: false,
                transparent: true,
                window_level: WindowLevel::AlwaysOnTop,
                position: WindowPosition::At(SPAWN_POSITION.as_ivec2()),
                ..default()
            })
            .id();
        let camera = commands
            .spawn((
                Camera2d,
                Camera {
                    target: RenderTarget::Window(WindowRef::Entity(window)),
                    clear_color: ClearColorConfig::Custom(Color::NONE),
                    ..default()
                },
            ))
            .id();
        commands.entity(window).insert((
            FloatingMascot::new(request.mascot.clone(), camera),
            AnimationClock::for_mascot(&request.mascot),
            MovementEngine::random(),
            FrameDisplay::default(),
        ));
        registry.0.push(window);
        info!("showing mascot '{}'", request.mascot.name);
    }
}

/// Processes close requests. The entity leaves the live set *before*
/// teardown starts, so nothing enumerating the registry (the active panel,
/// the toolbar counter) can ever observe a half-closed window. Duplicate
/// requests collapse: `request_close` is a no-op after the first.
pub fn handle_close(
    mut requests: EventReader<CloseMascot>,
    mut registry: ResMut<ActiveMascots>,
    mut floaters: Query<(&mut FloatingMascot, &mut AnimationClock, &mut MovementEngine)>,
) {
    for request in requests.read() {
        registry.0.retain(|&entity| entity != request.target);
        if let Ok((mut floater, mut clock, mut engine)) = floaters.get_mut(request.target) {
            if floater.request_close() {
                clock.timer.pause();
                engine.timer.pause();
            }
        }
    }
}
