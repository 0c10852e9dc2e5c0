//! Cell raster that effects paint into each frame.

use neonveil_core::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Container, PxSize, Rgb};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use crate::chars::{DOT_GLYPHS, GLOW_GLYPH};

/// Texels fading below this alpha are cleared.
const FADE_CUTOFF: f32 = 0.02;

/// Fraction of a particle's alpha spilled onto neighbouring cells.
const GLOW_FALLOFF: f32 = 0.25;

/// One cell of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texel {
    pub glyph: char,
    pub color: Rgb,
    pub alpha: f32,
}

impl Texel {
    pub const EMPTY: Texel = Texel {
        glyph: ' ',
        color: Rgb::new(0, 0, 0),
        alpha: 0.0,
    };

    pub fn is_lit(&self) -> bool {
        self.alpha > 0.0
    }
}

/// A drawing area sized to its container.
#[derive(Debug, Clone)]
pub struct Surface {
    container: &'static str,
    size: PxSize,
    columns: u16,
    rows: u16,
    texels: Vec<Texel>,
    opacity: f32,
    visible: bool,
}

impl Surface {
    /// Create a surface matching the container's current box.
    pub fn new(container: &Container) -> Self {
        let mut surface = Self {
            container: container.name(),
            size: PxSize::default(),
            columns: 0,
            rows: 0,
            texels: Vec::new(),
            opacity: 1.0,
            visible: true,
        };
        surface.resize(container);
        surface
    }

    /// Re-measure the container. Resizing always clears the surface.
    pub fn resize(&mut self, container: &Container) {
        let area = container.area();
        self.size = container.measure();
        self.columns = area.width;
        self.rows = area.height;
        self.texels = vec![Texel::EMPTY; usize::from(area.width) * usize::from(area.height)];
    }

    /// Name of the container this surface is attached to.
    pub fn container(&self) -> &'static str {
        self.container
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn size(&self) -> PxSize {
        self.size
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn clear(&mut self) {
        self.texels.fill(Texel::EMPTY);
    }

    /// Paint a black overlay of the given alpha over the whole surface.
    ///
    /// Earlier strokes dim instead of vanishing, which leaves trails behind
    /// moving glyphs.
    pub fn fade(&mut self, alpha: f32) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for texel in &mut self.texels {
            texel.alpha *= keep;
            if texel.alpha < FADE_CUTOFF {
                *texel = Texel::EMPTY;
            }
        }
    }

    /// Fill a disc with a one-cell glow halo.
    pub fn plot_disc(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        let Some((col, row)) = self.cell_at(x, y) else {
            return;
        };
        let glyph = match radius {
            r if r < 2.0 => DOT_GLYPHS[0],
            r if r < 3.0 => DOT_GLYPHS[1],
            _ => DOT_GLYPHS[2],
        };
        self.blend(col, row, glyph, color, alpha);

        let glow = alpha * GLOW_FALLOFF;
        for (dc, dr) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
            let (c, r) = (i32::from(col) + dc, i32::from(row) + dr);
            if let (Ok(c), Ok(r)) = (u16::try_from(c), u16::try_from(r)) {
                self.blend(c, r, GLOW_GLYPH, color, glow);
            }
        }
    }

    /// Draw a glyph at full alpha with its baseline at `y`.
    pub fn draw_glyph(&mut self, x: f32, y: f32, glyph: char, color: Rgb) {
        if let Some((col, row)) = self.cell_at(x, y)
            && let Some(texel) = self.texel_mut(col, row)
        {
            *texel = Texel {
                glyph,
                color,
                alpha: 1.0,
            };
        }
    }

    pub fn texel(&self, col: u16, row: u16) -> Option<&Texel> {
        self.index(col, row).map(|i| &self.texels[i])
    }

    /// Number of cells currently holding paint.
    pub fn lit_count(&self) -> usize {
        self.texels.iter().filter(|t| t.is_lit()).count()
    }

    /// Cell containing the pixel, or None when outside the surface.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !(x >= 0.0 && y >= 0.0 && x <= self.size.width && y <= self.size.height) {
            return None;
        }
        if self.columns == 0 || self.rows == 0 {
            return None;
        }
        let col = ((x / CELL_WIDTH_PX) as u16).min(self.columns - 1);
        let row = ((y / CELL_HEIGHT_PX) as u16).min(self.rows - 1);
        Some((col, row))
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.columns && row < self.rows)
            .then(|| usize::from(row) * usize::from(self.columns) + usize::from(col))
    }

    fn texel_mut(&mut self, col: u16, row: u16) -> Option<&mut Texel> {
        self.index(col, row).map(|i| &mut self.texels[i])
    }

    /// Keep the brighter of the existing texel and the new stroke.
    fn blend(&mut self, col: u16, row: u16, glyph: char, color: Rgb, alpha: f32) {
        if let Some(texel) = self.texel_mut(col, row)
            && alpha > texel.alpha
        {
            *texel = Texel {
                glyph,
                color,
                alpha,
            };
        }
    }
}

impl Widget for &Surface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || self.opacity <= 0.0 {
            return;
        }
        let area = area.intersection(buf.area);
        for row in 0..self.rows.min(area.height) {
            for col in 0..self.columns.min(area.width) {
                let Some(texel) = self.texel(col, row) else {
                    continue;
                };
                if !texel.is_lit() {
                    continue;
                }
                let color = texel.color.scale(texel.alpha * self.opacity);
                buf.set_stringn(
                    area.x + col,
                    area.y + row,
                    texel.glyph.to_string(),
                    usize::from(area.width - col),
                    Style::new().fg(color.to_color()),
                );
            }
        }
    }
}
