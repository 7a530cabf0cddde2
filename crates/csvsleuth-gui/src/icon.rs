//! CsvSleuth application icon generator.
//!
//! Produces a procedural icon: a spreadsheet sheet with a four-bar spend
//! chart, one bar per civilisation. Rendered at an arbitrary resolution as
//! RGBA pixel data suitable for use as a window icon.

/// Bar heights (fraction of the plot area) and colours, left to right.
const BARS: [(f32, [u8; 3]); 4] = [
    (0.55, [0x89, 0xb4, 0xfa]),
    (0.85, [0xa6, 0xe3, 0xa1]),
    (0.35, [0xf9, 0xe2, 0xaf]),
    (0.70, [0xf3, 0x8b, 0xa8]),
];

const SHEET: [u8; 3] = [0x2a, 0x2a, 0x3c];
const GRID: [u8; 3] = [0x3a, 0x3a, 0x50];

/// Generate a CsvSleuth icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    egui::IconData {
        rgba: render_icon(size),
        width: size,
        height: size,
    }
}

/// Render the icon into an RGBA pixel buffer (top-to-bottom row order).
pub fn render_icon(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    // Sheet with rounded corners.
    let margin = s * 0.08;
    let corner = s * 0.12;
    // Plot area inside the sheet.
    let plot_left = s * 0.20;
    let plot_right = s * 0.80;
    let plot_bottom = s * 0.80;
    let plot_height = s * 0.58;
    let slot = (plot_right - plot_left) / BARS.len() as f32;
    let grid_step = s * 0.145;

    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            let alpha = rounded_rect_alpha(px, py, margin, s - margin, corner);
            if alpha <= 0.0 {
                continue;
            }

            let mut rgb = SHEET;

            // Faint spreadsheet grid.
            let on_grid = |v: f32| (v - margin) % grid_step < 1.0;
            if on_grid(px) || on_grid(py) {
                rgb = GRID;
            }

            // Bars.
            if px >= plot_left && px < plot_right && py < plot_bottom {
                let i = ((px - plot_left) / slot) as usize;
                let within = (px - plot_left) - i as f32 * slot;
                if let Some(&(height, colour)) = BARS.get(i) {
                    let top = plot_bottom - plot_height * height;
                    if within > slot * 0.15 && within < slot * 0.85 && py >= top {
                        rgb = colour;
                    }
                }
            }

            let idx = ((y * size + x) * 4) as usize;
            pixels[idx] = rgb[0];
            pixels[idx + 1] = rgb[1];
            pixels[idx + 2] = rgb[2];
            pixels[idx + 3] = (alpha * 255.0).clamp(0.0, 255.0) as u8;
        }
    }

    pixels
}

/// Coverage of a square `[lo, hi]²` with rounded corners of radius `r`.
fn rounded_rect_alpha(px: f32, py: f32, lo: f32, hi: f32, r: f32) -> f32 {
    let cx = px.clamp(lo + r, hi - r);
    let cy = py.clamp(lo + r, hi - r);
    let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
    smooth_edge(dist, r)
}

/// Smooth anti-aliased edge (1 → 0 as `dist` crosses `edge`).
fn smooth_edge(dist: f32, edge: f32) -> f32 {
    let d = dist - edge;
    if d < -1.0 {
        1.0
    } else if d > 1.0 {
        0.0
    } else {
        0.5 - d * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_matches_requested_size() {
        let icon = generate_icon(32);
        assert_eq!(icon.rgba.len(), 32 * 32 * 4);
        assert_eq!((icon.width, icon.height), (32, 32));
    }

    #[test]
    fn corners_are_transparent_and_centre_is_opaque() {
        let size = 64;
        let rgba = render_icon(size);
        assert_eq!(rgba[3], 0);
        let centre = (((size / 2) * size + size / 2) * 4 + 3) as usize;
        assert_eq!(rgba[centre], 255);
    }
}
