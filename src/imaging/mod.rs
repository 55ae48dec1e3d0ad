use bevy_egui::egui;
use std::fs;
use std::path::Path;

const MAX_TEXTURE_SIZE: u32 = 2048;

/// File extensions accepted as animation frames when scanning an imported
/// folder
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode a frame image file into an egui color image
pub fn load_frame_image(path: &Path) -> Result<egui::ColorImage, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| format!("Failed to decode {}: {}", path.display(), e))?;

    // Check if image needs to be resized
    let (width, height) = (img.width(), img.height());
    let img = if width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
        // Calculate new size maintaining aspect ratio
        let scale = (MAX_TEXTURE_SIZE as f32 / width as f32)
            .min(MAX_TEXTURE_SIZE as f32 / height as f32);
        let new_width = (width as f32 * scale) as u32;
        let new_height = (height as f32 * scale) as u32;
        img.resize(new_width, new_height, image::imageops::FilterType::Nearest)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &pixels))
}

/// Load an image file straight into a texture for the given egui context
pub fn load_texture_from_file(
    ctx: &egui::Context,
    name: &str,
    path: &Path,
) -> Result<egui::TextureHandle, String> {
    let color_image = load_frame_image(path)?;
    Ok(ctx.load_texture(
        name,
        color_image,
        egui::TextureOptions::NEAREST, // Pixel art should use nearest neighbor
    ))
}
