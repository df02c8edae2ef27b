//! Output resolutions in ffmpeg `W:H` notation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 16:9 resolution for the given width (height rounded down).
    pub fn widescreen(width: u32) -> Self {
        Self {
            width,
            height: width * 9 / 16,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidResolution(s.to_string()))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidResolution(s.to_string()))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidResolution(s.to_string()))?;
        Ok(Self { width, height })
    }
}
