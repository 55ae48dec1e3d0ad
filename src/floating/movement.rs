use bevy::prelude::*;
use bevy::window::{Monitor, PrimaryMonitor, WindowPosition};

use super::instance::{FloatingMascot, Lifecycle};

/// Seconds between movement ticks (~60 Hz)
pub const MOVE_INTERVAL: f32 = 0.016;
/// Velocity band in physical pixels per tick
pub const MIN_SPEED: f32 = 1.0;
pub const MAX_SPEED: f32 = 3.0;

/// Per-instance driver that wanders the window around the screen with a
/// DVD-logo bounce
#[derive(Component)]
pub struct MovementEngine {
    pub timer: Timer,
    pub velocity: Vec2,
}

impl MovementEngine {
    /// Magnitude and sign are randomized independently per axis, so mascots
    /// spawned in the same instant still scatter instead of moving in
    /// lockstep.
    pub fn random() -> Self {
        Self {
            timer: Timer::from_seconds(MOVE_INTERVAL, TimerMode::Repeating),
            velocity: Vec2::new(random_component(), random_component()),
        }
    }

    /// One movement tick. Returns the new window position, or `None` when
    /// this tick must not move the window: the instance is not active, or
    /// movement is paused because the pointer is over it.
    pub fn tick(
        &mut self,
        lifecycle: Lifecycle,
        hovered: bool,
        position: Vec2,
        size: Vec2,
        bounds: Rect,
    ) -> Option<Vec2> {
        if lifecycle != Lifecycle::Active {
            return None;
        }
        if hovered {
            return None;
        }
        let (position, velocity) = bounce_step(position, self.velocity, size, bounds);
        self.velocity = velocity;
        Some(position)
    }
}

fn random_component() -> f32 {
    let magnitude = MIN_SPEED + fastrand::f32() * (MAX_SPEED - MIN_SPEED);
    if fastrand::bool() {
        magnitude
    } else {
        -magnitude
    }
}

/// DVD-logo reflection: translate by one velocity step, then for each axis
/// whose screen edge the window crossed, negate that velocity component and
/// clamp the position back into range. Velocity magnitude is preserved.
pub fn bounce_step(position: Vec2, velocity: Vec2, size: Vec2, bounds: Rect) -> (Vec2, Vec2) {
    let mut pos = position + velocity;
    let mut vel = velocity;

    if pos.x <= bounds.min.x || pos.x + size.x >= bounds.max.x {
        vel.x = -vel.x;
        pos.x = pos.x.min(bounds.max.x - size.x).max(bounds.min.x);
    }
    if pos.y <= bounds.min.y || pos.y + size.y >= bounds.max.y {
        vel.y = -vel.y;
        pos.y = pos.y.min(bounds.max.y - size.y).max(bounds.min.y);
    }
    (pos, vel)
}

/// Drives every active mascot's movement engine. Screen bounds are
/// re-queried from the monitor entities on every run, so monitor hot-plug
/// and resolution changes take effect without restarting anything.
pub fn move_mascots(
    time: Res<Time>,
    monitors: Query<(&Monitor, Has<PrimaryMonitor>)>,
    mut floaters: Query<(&mut FloatingMascot, &mut MovementEngine, &mut Window)>,
) {
    for (mut floater, mut engine, mut window) in &mut floaters {
        if floater.lifecycle != Lifecycle::Active {
            continue;
        }
        engine.timer.tick(time.delta());
        let ticks = engine.timer.times_finished_this_tick();
        if ticks == 0 {
            continue;
        }

        let size = Vec2::new(
            window.resolution.physical_width() as f32,
            window.resolution.physical_height() as f32,
        );
        let Some(bounds) = screen_bounds(&monitors, floater.position, size) else {
            continue;
        };

        let mut moved = false;
        for _ in 0..ticks {
            let lifecycle = floater.lifecycle;
            let hovered = floater.hovered;
            if let Some(pos) = engine.tick(lifecycle, hovered, floater.position, size, bounds) {
                floater.position = pos;
                moved = true;
            }
        }
        if moved {
            window.position = WindowPosition::At(floater.position.as_ivec2());
        }
    }
}

/// Visible area of the monitor the window currently occupies, falling back
/// to the primary monitor, then to any monitor at all.
fn screen_bounds(
    monitors: &Query<(&Monitor, Has<PrimaryMonitor>)>,
    position: Vec2,
    size: Vec2,
) -> Option<Rect> {
    let center = position + size / 2.0;
    let mut primary = None;
    let mut any = None;
    for (monitor, is_primary) in monitors.iter() {
        let rect = monitor_rect(monitor);
        if rect.contains(center) {
            return Some(rect);
        }
        if is_primary {
            primary = Some(rect);
        }
        if any.is_none() {
            any = Some(rect);
        }
    }
    primary.or(any)
}

fn monitor_rect(monitor: &Monitor) -> Rect {
    let min = monitor.physical_position.as_vec2();
    let size = Vec2::new(monitor.physical_width as f32, monitor.physical_height as f32);
    Rect::from_corners(min, min + size)
}
