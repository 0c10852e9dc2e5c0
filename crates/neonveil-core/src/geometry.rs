//! Logical pixel geometry and named effect containers.

use ratatui::layout::Rect;

/// Logical pixels covered by one terminal cell horizontally.
pub const CELL_WIDTH_PX: f32 = 10.0;

/// Logical pixels covered by one terminal cell vertically.
pub const CELL_HEIGHT_PX: f32 = 20.0;

/// Viewports at or below this width are classified as mobile.
pub const MOBILE_BREAKPOINT_PX: f32 = 768.0;

/// A width/height pair in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PxSize {
    pub width: f32,
    pub height: f32,
}

impl PxSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pixel size of a terminal area.
    pub fn from_rect(area: Rect) -> Self {
        Self {
            width: f32::from(area.width) * CELL_WIDTH_PX,
            height: f32::from(area.height) * CELL_HEIGHT_PX,
        }
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A named region of the screen that hosts one effect surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    name: &'static str,
    area: Rect,
}

impl Container {
    /// Container for the floating particle field.
    pub const PARTICLES: &'static str = "floating-particles";
    /// Container for the rain columns.
    pub const RAIN: &'static str = "matrix-rain";

    pub fn new(name: &'static str, area: Rect) -> Self {
        Self { name, area }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Terminal area of the container.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Current box of the container in logical pixels.
    pub fn measure(&self) -> PxSize {
        PxSize::from_rect(self.area)
    }

    /// Move the container to a new area, as after a viewport resize.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_size_from_rect() {
        let size = PxSize::from_rect(Rect::new(0, 0, 80, 24));
        assert_eq!(size.width, 800.0);
        assert_eq!(size.height, 480.0);
    }

    #[test]
    fn test_empty_size() {
        assert!(PxSize::from_rect(Rect::new(0, 0, 0, 10)).is_empty());
        assert!(!PxSize::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_container_measure_follows_area() {
        let mut container = Container::new(Container::RAIN, Rect::new(0, 0, 40, 10));
        assert_eq!(container.measure(), PxSize::new(400.0, 200.0));
        container.set_area(Rect::new(0, 0, 20, 5));
        assert_eq!(container.measure(), PxSize::new(200.0, 100.0));
        assert_eq!(container.name(), "matrix-rain");
    }
}
