use bevy::prelude::*;
use bevy_egui::egui;
use std::collections::HashMap;

use super::instance::{FloatingMascot, Lifecycle};
use crate::model::{Mascot, MascotFrame};

/// Seconds between animation frames
pub const FRAME_INTERVAL: f32 = 0.5;

/// Per-instance driver that cycles the displayed frame
#[derive(Component)]
pub struct AnimationClock {
    pub timer: Timer,
    pub frame_index: usize,
    /// File name of the frame most recently published for display
    pub published: Option<String>,
}

impl AnimationClock {
    /// Start with the first frame published, so a window shows something
    /// before the first tick fires.
    pub fn for_mascot(mascot: &Mascot) -> Self {
        Self {
            timer: Timer::from_seconds(FRAME_INTERVAL, TimerMode::Repeating),
            frame_index: 0,
            published: mascot.frames.first().map(|f| f.name.clone()),
        }
    }

    /// One tick: advance modulo the frame count and publish the new frame's
    /// file name. Inert unless the instance is active, so a tick that was
    /// already queued when teardown started lands here and does nothing. An
    /// empty frame list leaves everything untouched.
    pub fn tick(&mut self, lifecycle: Lifecycle, frames: &[MascotFrame]) {
        if lifecycle != Lifecycle::Active {
            return;
        }
        if frames.is_empty() {
            return;
        }
        self.frame_index = (self.frame_index + 1) % frames.len();
        self.published = Some(frames[self.frame_index].name.clone());
    }
}

/// Per-window display cache: frame textures uploaded to that window's egui
/// context, keyed by file name, plus whatever is currently on screen. A
/// published frame that fails to decode leaves `current` untouched, so the
/// previous image simply stays up.
#[derive(Component, Default)]
pub struct FrameDisplay {
    pub textures: HashMap<String, egui::TextureHandle>,
    pub current: Option<egui::TextureHandle>,
    /// Last published name we tried to resolve; one decode attempt per
    /// publish, no retry storm on a missing file
    pub last_attempt: Option<String>,
}

/// Drives every active mascot's animation clock
pub fn animate_mascots(
    time: Res<Time>,
    mut clocks: Query<(&FloatingMascot, &mut AnimationClock)>,
) {
    for (floater, mut clock) in &mut clocks {
        if floater.lifecycle != Lifecycle::Active {
            continue;
        }
        clock.timer.tick(time.delta());
        for _ in 0..clock.timer.times_finished_this_tick() {
            clock.tick(floater.lifecycle, &floater.mascot.frames);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(names: &[&str]) -> Vec<MascotFrame> {
        names.iter().map(|name| MascotFrame::new(*name)).collect()
    }

    fn mascot_with(names: &[&str]) -> Mascot {
        Mascot::new("blob", "/data/blob".into(), frames(names))
    }

    #[test]
    fn test_first_frame_published_up_front() {
        let clock = AnimationClock::for_mascot(&mascot_with(&["a.png", "b.png"]));
        assert_eq!(clock.published.as_deref(), Some("a.png"));
        assert_eq!(clock.frame_index, 0);
    }

    #[test]
    fn test_ticks_cycle_through_frames() {
        let frames = frames(&["a.png", "b.png", "c.png"]);
        let mut clock = AnimationClock::for_mascot(&mascot_with(&[]));

        clock.tick(Lifecycle::Active, &frames);
        assert_eq!(clock.frame_index, 1);
        assert_eq!(clock.published.as_deref(), Some("b.png"));

        clock.tick(Lifecycle::Active, &frames);
        clock.tick(Lifecycle::Active, &frames);
        assert_eq!(clock.frame_index, 0);
        assert_eq!(clock.published.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_n_ticks_return_to_start() {
        let frames = frames(&["a.png", "b.png", "c.png", "d.png"]);
        let mut clock = AnimationClock::for_mascot(&mascot_with(&[]));
        clock.frame_index = 2;

        for _ in 0..frames.len() {
            clock.tick(Lifecycle::Active, &frames);
        }
        assert_eq!(clock.frame_index, 2);
    }

    #[test]
    fn test_empty_frame_list_is_inert() {
        let mut clock = AnimationClock::for_mascot(&mascot_with(&[]));
        assert_eq!(clock.published, None);

        clock.tick(Lifecycle::Active, &[]);
        assert_eq!(clock.frame_index, 0);
        assert_eq!(clock.published, None);
    }

    #[test]
    fn test_ticks_after_close_do_not_mutate() {
        let frames = frames(&["a.png", "b.png"]);
        let mut clock = AnimationClock::for_mascot(&mascot_with(&["a.png", "b.png"]));
        clock.tick(Lifecycle::Active, &frames);
        let index = clock.frame_index;
        let published = clock.published.clone();

        clock.tick(Lifecycle::Closing, &frames);
        clock.tick(Lifecycle::Closed, &frames);
        assert_eq!(clock.frame_index, index);
        assert_eq!(clock.published, published);
    }
}
