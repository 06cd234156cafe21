/// Backing-store resolution is capped at 2x regardless of what the device reports
pub const MAX_PIXEL_RATIO: f64 = 2.0;


/// Camera aspect ratio for a viewport of the given size
#[inline]
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height as f32
}


/// Device pixel ratio clamped to [MAX_PIXEL_RATIO]
#[inline]
pub fn clamped_pixel_ratio(dpr: f64) -> f64 {
    dpr.min(MAX_PIXEL_RATIO)
}


/// Render size for a surface the engine sized at `dpr`, rescaled so the
/// effective pixel ratio never exceeds [MAX_PIXEL_RATIO].
/// `width`/`height` are physical pixels as reported by the engine.
pub fn capped_render_size(width: u32, height: u32, dpr: f64) -> (u32, u32) {
    if dpr <= MAX_PIXEL_RATIO {
        return (width.max(1), height.max(1));
    }
    let scale = MAX_PIXEL_RATIO / dpr;
    let w = (width as f64 * scale).round() as u32;
    let h = (height as f64 * scale).round() as u32;
    (w.max(1), h.max(1))
}
