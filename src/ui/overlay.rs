use bevy::log::debug;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowPosition};
use bevy_egui::{egui, EguiContext};

use crate::floating::animation::{AnimationClock, FrameDisplay};
use crate::floating::instance::{
    window_side, FloatingMascot, Lifecycle, BASE_SIZE, MAX_SCALE, MIN_SCALE,
};
use crate::floating::registry::CloseMascot;
use crate::imaging::load_frame_image;

const CLOSE_BUTTON_SIZE: f32 = 28.0;
const OVERLAY_ROUNDING: f32 = 22.0;

/// Paints every active floating window on its own egui context: the current
/// sprite frame, a full-window drag surface, and — only while the pointer is
/// over the window — the close button and the scale slider.
pub fn floating_overlay(
    mut floaters: Query<
        (
            Entity,
            &mut EguiContext,
            &mut Window,
            &mut FloatingMascot,
            &AnimationClock,
            &mut FrameDisplay,
        ),
        Without<PrimaryWindow>,
    >,
    mut close_requests: EventWriter<CloseMascot>,
) {
    for (entity, mut egui_ctx, mut window, mut floater, clock, mut display) in &mut floaters {
        if floater.lifecycle != Lifecycle::Active {
            continue;
        }
        let ctx = egui_ctx.get_mut();
        resolve_published(ctx, &floater, clock, &mut display);

        let hovered = floater.hovered;
        let sprite_side = BASE_SIZE * floater.scale;
        let scale_factor = window.scale_factor();
        let current = display.current.clone();

        let mut drag_delta = egui::Vec2::ZERO;
        let mut requested_scale = floater.scale;
        let mut close_clicked = false;

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let full = ui.max_rect();

                // The whole window drags; the controls added below sit on
                // top and win input where they overlap.
                let response =
                    ui.interact(full, ui.id().with("drag_surface"), egui::Sense::drag());
                if response.dragged() {
                    drag_delta = response.drag_delta();
                }

                if hovered {
                    ui.painter().rect_filled(
                        full,
                        OVERLAY_ROUNDING,
                        egui::Color32::from_black_alpha(60),
                    );
                }

                if let Some(texture) = &current {
                    let image_rect = egui::Rect::from_center_size(
                        full.center(),
                        egui::vec2(sprite_side, sprite_side),
                    );
                    let uv =
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter()
                        .image(texture.id(), image_rect, uv, egui::Color32::WHITE);
                }

                if hovered {
                    let margin = 6.0;
                    let button_rect = egui::Rect::from_min_size(
                        egui::pos2(
                            full.right() - CLOSE_BUTTON_SIZE - margin,
                            full.top() + margin,
                        ),
                        egui::vec2(CLOSE_BUTTON_SIZE, CLOSE_BUTTON_SIZE),
                    );
                    if ui.put(button_rect, egui::Button::new("✕")).clicked() {
                        close_clicked = true;
                    }

                    let slider_rect = egui::Rect::from_min_max(
                        egui::pos2(full.left() + 12.0, full.bottom() - 26.0),
                        egui::pos2(full.right() - 12.0, full.bottom() - 6.0),
                    );
                    let mut value = requested_scale;
                    ui.put(
                        slider_rect,
                        egui::Slider::new(&mut value, MIN_SCALE..=MAX_SCALE).show_value(false),
                    );
                    requested_scale = value;
                }
            });

        // egui deltas are in logical points; window positions are physical
        if drag_delta != egui::Vec2::ZERO {
            floater.drag_by(Vec2::new(drag_delta.x, drag_delta.y) * scale_factor);
            window.position = WindowPosition::At(floater.position.as_ivec2());
        }
        if (requested_scale - floater.scale).abs() > f32::EPSILON {
            floater.set_scale(requested_scale);
            let side = window_side(floater.scale);
            window.resolution.set(side, side);
        }
        if close_clicked {
            close_requests.send(CloseMascot { target: entity });
        }
    }
}

/// Make sure the most recently published frame is the one on screen. Each
/// published name gets exactly one decode attempt; a frame file that fails
/// to resolve leaves the previous texture in place.
fn resolve_published(
    ctx: &egui::Context,
    floater: &FloatingMascot,
    clock: &AnimationClock,
    display: &mut FrameDisplay,
) {
    let Some(name) = clock.published.as_ref() else {
        return;
    };
    if display.last_attempt.as_deref() == Some(name.as_str()) {
        return;
    }
    display.last_attempt = Some(name.clone());

    if let Some(texture) = display.textures.get(name) {
        display.current = Some(texture.clone());
        return;
    }
    let path = floater.mascot.source_dir.join(name);
    match load_frame_image(&path) {
        Ok(color_image) => {
            let texture =
                ctx.load_texture(name.clone(), color_image, egui::TextureOptions::NEAREST);
            display.textures.insert(name.clone(), texture.clone());
            display.current = Some(texture);
        }
        // Not user-visible: the previous frame simply stays up
        Err(e) => debug!("frame not resolved: {}", e),
    }
}
