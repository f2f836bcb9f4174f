use std::{fmt, str::FromStr};

use crate::{CoreError, CoreResult};

/// Window/framebuffer size in physical pixels. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const DEFAULT: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    pub fn new(width: u32, height: u32) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidViewport(format!("{width}x{height}")));
        }
        Ok(Self { width, height })
    }

    /// Clamp both sides to at least one pixel (minimized windows report 0).
    #[inline]
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Viewport {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidViewport(s.to_owned());
        let (w, h) = s
            .split_once('x')
            .or_else(|| s.split_once('X'))
            .ok_or_else(invalid)?;
        let w = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let h = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Viewport::new(w, h).map_err(|_| invalid())
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_width_by_height() {
        assert_eq!("1280x720".parse::<Viewport>(), Ok(Viewport { width: 1280, height: 720 }));
        assert_eq!("640X480".parse::<Viewport>(), Ok(Viewport { width: 640, height: 480 }));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!("0x600".parse::<Viewport>().is_err());
        assert!("800".parse::<Viewport>().is_err());
        assert!("axb".parse::<Viewport>().is_err());
    }

    #[test]
    fn clamped_never_zero() {
        let v = Viewport::clamped(0, 0);
        assert_eq!((v.width, v.height), (1, 1));
        assert_eq!(Viewport::DEFAULT.aspect(), 800.0 / 600.0);
    }
}
