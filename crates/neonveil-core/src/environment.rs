//! Immutable snapshot of the viewport classification.

use std::fmt;

use crate::geometry::{MOBILE_BREAKPOINT_PX, PxSize};

/// Viewport state captured at startup and on every resize.
///
/// Components never read ambient globals; they receive the snapshot that was
/// current when they were initialized or resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    viewport: PxSize,
    reduced_motion: bool,
    is_mobile: bool,
}

impl Environment {
    /// Capture a snapshot for the given viewport size and motion preference.
    pub fn capture(viewport: PxSize, reduced_motion: bool) -> Self {
        Self {
            viewport,
            reduced_motion,
            is_mobile: viewport.width <= MOBILE_BREAKPOINT_PX,
        }
    }

    pub fn viewport(&self) -> PxSize {
        self.viewport
    }

    /// Whether the user asked for minimized animation.
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Whether the viewport is at or below the mobile breakpoint.
    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    /// Body classes reflecting this snapshot.
    pub fn body_classes(&self) -> Vec<BodyClass> {
        let mut classes = vec![if self.is_mobile {
            BodyClass::Mobile
        } else {
            BodyClass::Desktop
        }];
        if self.reduced_motion {
            classes.push(BodyClass::ReducedMotion);
        }
        classes
    }
}

/// Document-level state classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyClass {
    Mobile,
    Desktop,
    ReducedMotion,
    FallbackMode,
}

impl BodyClass {
    pub fn as_str(self) -> &'static str {
        match self {
            BodyClass::Mobile => "is-mobile",
            BodyClass::Desktop => "is-desktop",
            BodyClass::ReducedMotion => "reduced-motion",
            BodyClass::FallbackMode => "fallback-mode",
        }
    }
}

impl fmt::Display for BodyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
