use std::path::Path as FsPath;

use anyhow::Context;
use glam::{DVec2, Vec2};
use image::{Rgb, RgbImage};
use random_walkers::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Colors and sizes used when drawing a scene.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Size of a single walker panel in pixels.
    pub panel_size: (u32, u32),
    /// Inner padding of each panel in pixels.
    pub margin: u32,
    pub background: [u8; 3],
    pub path_color: [u8; 3],
    /// Color of the straight connector drawn for long-distance walkers.
    pub plane_color: [u8; 3],
    pub obstacle_color: [u8; 3],
    pub start_color: [u8; 3],
    pub end_color: [u8; 3],
    pub separator_color: [u8; 3],
    pub marker_radius: u32,
}

impl RenderConfig {
    pub fn new(panel_size: (u32, u32)) -> Self {
        Self {
            panel_size,
            margin: 16,
            background: [255, 255, 255],
            path_color: [31, 119, 180],
            plane_color: [214, 39, 40],
            obstacle_color: [128, 128, 128],
            start_color: [64, 224, 208],
            end_color: [255, 165, 0],
            separator_color: [210, 210, 210],
            marker_radius: 5,
        }
    }

    pub fn with_background(mut self, color: [u8; 3]) -> Self {
        self.background = color;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_marker_radius(mut self, radius: u32) -> Self {
        self.marker_radius = radius;
        self
    }
}

/// Panel grid for `walkers` panels: one column for a single walker, two otherwise.
pub fn panel_grid(walkers: usize) -> (u32, u32) {
    let columns = if walkers <= 1 { 1 } else { 2 };
    let rows = walkers.div_ceil(2).max(1) as u32;
    (columns, rows)
}

/// Draws every walker of `scene` into its own panel.
pub fn render_scene(scene: &Scene, classifier: &Classifier, config: &RenderConfig) -> RgbImage {
    let (columns, rows) = panel_grid(scene.len());
    let (pw, ph) = config.panel_size;
    let mut img = RgbImage::from_pixel(pw * columns, ph * rows, Rgb(config.background));

    for (i, summary) in scene.summaries(classifier).iter().enumerate() {
        let col = (i % 2) as u32;
        let row = (i / 2) as u32;
        let mut canvas = Canvas::new(&mut img, col * pw, row * ph, pw, ph);
        draw_panel(&mut canvas, summary, config);
    }

    img
}

/// Renders `scene` and writes it as PNG to `out`.
pub fn render_scene_to_png(
    scene: &Scene,
    classifier: &Classifier,
    config: &RenderConfig,
    out: impl AsRef<FsPath>,
) -> anyhow::Result<()> {
    let out = out.as_ref();
    let img = render_scene(scene, classifier, config);
    img.save(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}

fn draw_panel(canvas: &mut Canvas<'_>, summary: &WalkerSummary<'_>, config: &RenderConfig) {
    canvas.outline(config.separator_color);

    let corners: Vec<Vec2> = summary
        .obstacle
        .corners()
        .into_iter()
        .map(|c| DVec2::from(c).as_vec2())
        .collect();
    let drawn: Vec<Vec2> = match summary.classification {
        Classification::Normal => summary.path.iter().map(|p| p.as_vec2()).collect(),
        Classification::LongDistance => vec![summary.start.as_vec2(), summary.end.as_vec2()],
    };
    let transform = PanelTransform::fit(
        drawn.iter().chain(corners.iter()).copied(),
        canvas.size(),
        config.margin,
    );

    let lo = transform.to_px(corners[3]);
    let hi = transform.to_px(corners[1]);
    canvas.fill_rect(lo, hi, config.obstacle_color);

    let color = match summary.classification {
        Classification::Normal => config.path_color,
        Classification::LongDistance => config.plane_color,
    };
    for pair in drawn.windows(2) {
        canvas.line(transform.to_px(pair[0]), transform.to_px(pair[1]), color);
    }

    let r = config.marker_radius as i64;
    canvas.disc(transform.to_px(summary.start.as_vec2()), r, config.start_color);
    canvas.triangle(transform.to_px(summary.end.as_vec2()), r, config.end_color);
}

/// Maps world coordinates into a panel, y up, with a uniform scale.
struct PanelTransform {
    min: Vec2,
    scale: f32,
    offset: Vec2,
    height: f32,
}

impl PanelTransform {
    fn fit(points: impl Iterator<Item = Vec2>, size: (u32, u32), margin: u32) -> Self {
        let (min, max) = points.fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(p), hi.max(p)),
        );
        let (min, max) = if min.is_finite() && max.is_finite() {
            (min, max)
        } else {
            (Vec2::ZERO, Vec2::ONE)
        };
        let extent = (max - min).max(Vec2::ONE);
        let avail = Vec2::new(
            size.0.saturating_sub(2 * margin).max(1) as f32,
            size.1.saturating_sub(2 * margin).max(1) as f32,
        );
        let scale = (avail.x / extent.x).min(avail.y / extent.y);
        // Center the scaled content inside the available area.
        let offset = Vec2::splat(margin as f32) + (avail - extent * scale) * 0.5;
        Self {
            min,
            scale,
            offset,
            height: size.1 as f32,
        }
    }

    fn to_px(&self, p: Vec2) -> (i64, i64) {
        let local = (p - self.min) * self.scale + self.offset;
        (local.x.round() as i64, (self.height - local.y).round() as i64)
    }
}

/// Clipped drawing surface for one panel of the figure.
struct Canvas<'a> {
    img: &'a mut RgbImage,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    fn new(img: &'a mut RgbImage, x0: u32, y0: u32, width: u32, height: u32) -> Self {
        Self {
            img,
            x0,
            y0,
            width,
            height,
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.img
            .put_pixel(self.x0 + x as u32, self.y0 + y as u32, Rgb(color));
    }

    fn outline(&mut self, color: [u8; 3]) {
        let (w, h) = (self.width as i64, self.height as i64);
        for x in 0..w {
            self.put(x, 0, color);
            self.put(x, h - 1, color);
        }
        for y in 0..h {
            self.put(0, y, color);
            self.put(w - 1, y, color);
        }
    }

    fn fill_rect(&mut self, a: (i64, i64), b: (i64, i64), color: [u8; 3]) {
        let (xa, xb) = (a.0.min(b.0), a.0.max(b.0));
        let (ya, yb) = (a.1.min(b.1), a.1.max(b.1));
        for y in ya.max(0)..=yb.min(self.height as i64) {
            for x in xa.max(0)..=xb.min(self.width as i64) {
                self.put(x, y, color);
            }
        }
    }

    /// Bresenham line between two pixel positions.
    fn line(&mut self, from: (i64, i64), to: (i64, i64), color: [u8; 3]) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x, y, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn disc(&mut self, center: (i64, i64), radius: i64, color: [u8; 3]) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.put(center.0 + dx, center.1 + dy, color);
                }
            }
        }
    }

    /// Upward-pointing triangle centered on `center`.
    fn triangle(&mut self, center: (i64, i64), radius: i64, color: [u8; 3]) {
        let rows = 2 * radius;
        for i in 0..=rows {
            // Half-width grows from the apex to the base.
            let half = i / 2;
            let y = center.1 - radius + i;
            for x in (center.0 - half)..=(center.0 + half) {
                self.put(x, y, color);
            }
        }
    }
}
