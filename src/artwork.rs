//! Card artwork: remote PNG decoded to a small pixel grid, rendered with
//! half-block cells. The fallback image is a text bitmap embedded at compile
//! time and pushed through the same pixel path as real artwork.

use std::sync::OnceLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};

/// Fallback bitmap, one char per pixel: r/w/k color keys, `.` transparent.
const FALLBACK_BITMAP: &str = include_str!("../art/fallback.txt");

const FALLBACK_RED: (u8, u8, u8) = (204, 48, 48);
const FALLBACK_WHITE: (u8, u8, u8) = (232, 232, 224);
const FALLBACK_DARK: (u8, u8, u8) = (32, 32, 36);

/// Decoded artwork downscales to at most this many pixels per side.
const MAX_DIM: u32 = 64;
/// Pixels below this alpha render as transparent.
const ALPHA_CUTOFF: u8 = 64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    /// Row-major; `None` is transparent.
    pub pixels: Vec<Option<(u8, u8, u8)>>,
}

impl Artwork {
    fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[(y * self.width + x) as usize]
    }
}

pub fn decode_artwork(bytes: &[u8]) -> Result<Artwork, String> {
    let img = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let img = img.thumbnail(MAX_DIM, MAX_DIM).to_rgba8();
    let (width, height) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|px| {
            let [r, g, b, a] = px.0;
            if a < ALPHA_CUTOFF {
                None
            } else {
                Some((r, g, b))
            }
        })
        .collect();
    Ok(Artwork {
        width,
        height,
        pixels,
    })
}

pub fn fallback_artwork() -> &'static Artwork {
    static FALLBACK: OnceLock<Artwork> = OnceLock::new();
    FALLBACK.get_or_init(|| parse_bitmap(FALLBACK_BITMAP))
}

fn parse_bitmap(bitmap: &str) -> Artwork {
    let rows: Vec<&str> = bitmap.lines().filter(|line| !line.is_empty()).collect();
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as u32;
    let height = rows.len() as u32;
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for row in &rows {
        let mut count = 0;
        for ch in row.chars() {
            pixels.push(match ch {
                'r' => Some(FALLBACK_RED),
                'w' => Some(FALLBACK_WHITE),
                'k' => Some(FALLBACK_DARK),
                _ => None,
            });
            count += 1;
        }
        for _ in count..width {
            pixels.push(None);
        }
    }
    Artwork {
        width,
        height,
        pixels,
    }
}

/// Renders the artwork into at most `max_cols` x `max_rows` text cells,
/// two pixel rows per cell via the upper-half block. Aspect is preserved
/// and the image is never upscaled.
pub fn artwork_lines(art: &Artwork, max_cols: u16, max_rows: u16) -> Vec<Line<'static>> {
    if art.width == 0 || art.height == 0 || max_cols == 0 || max_rows == 0 {
        return Vec::new();
    }
    let max_px_rows = u32::from(max_rows) * 2;
    let scale = f64::from(max_cols as u32)
        .min(f64::from(max_px_rows) * f64::from(art.width) / f64::from(art.height))
        / f64::from(art.width);
    let scale = scale.min(1.0);
    let cols = ((f64::from(art.width) * scale).round() as u32).max(1);
    let px_rows = ((f64::from(art.height) * scale).round() as u32).max(1);
    let rows = px_rows.div_ceil(2);

    let sample = |cx: u32, py: u32| -> Option<(u8, u8, u8)> {
        let sx = (u64::from(cx) * u64::from(art.width) / u64::from(cols)) as u32;
        let sy = (u64::from(py) * u64::from(art.height) / u64::from(px_rows)) as u32;
        art.pixel(sx, sy)
    };

    let mut lines = Vec::with_capacity(rows as usize);
    for row in 0..rows {
        let mut spans = Vec::with_capacity(cols as usize);
        for col in 0..cols {
            let top = sample(col, row * 2);
            let bottom = if row * 2 + 1 < px_rows {
                sample(col, row * 2 + 1)
            } else {
                None
            };
            spans.push(cell_span(top, bottom));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn cell_span(top: Option<(u8, u8, u8)>, bottom: Option<(u8, u8, u8)>) -> Span<'static> {
    match (top, bottom) {
        (Some(t), Some(b)) => Span::styled(
            "▀",
            Style::default().fg(rgb(t)).bg(rgb(b)),
        ),
        (Some(t), None) => Span::styled("▀", Style::default().fg(rgb(t))),
        (None, Some(b)) => Span::styled("▄", Style::default().fg(rgb(b))),
        (None, None) => Span::raw(" "),
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}
