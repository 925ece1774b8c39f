//! Aspect ratio presets and their image API size codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size codes accepted by the image generation endpoint.
pub const SUPPORTED_SIZES: [&str; 3] = ["1024x1024", "1792x1024", "1024x1792"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    #[default]
    Square,
    Landscape,
    Portrait,
    Widescreen,
    Tall,
}

/// Geometry and API size code for one [`AspectRatio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectRatioSpec {
    pub key: AspectRatio,
    pub label: &'static str,
    pub display_ratio: &'static str,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub remote_size_code: &'static str,
}

static REGISTRY: [AspectRatioSpec; 5] = [
    AspectRatioSpec {
        key: AspectRatio::Square,
        label: "Square",
        display_ratio: "1:1",
        pixel_width: 1024,
        pixel_height: 1024,
        remote_size_code: "1024x1024",
    },
    AspectRatioSpec {
        key: AspectRatio::Landscape,
        label: "Landscape",
        display_ratio: "16:9",
        pixel_width: 1792,
        pixel_height: 1024,
        remote_size_code: "1792x1024",
    },
    AspectRatioSpec {
        key: AspectRatio::Portrait,
        label: "Portrait",
        display_ratio: "9:16",
        pixel_width: 1024,
        pixel_height: 1792,
        remote_size_code: "1024x1792",
    },
    AspectRatioSpec {
        key: AspectRatio::Widescreen,
        label: "Widescreen",
        display_ratio: "21:9",
        pixel_width: 1792,
        pixel_height: 1024,
        remote_size_code: "1792x1024",
    },
    AspectRatioSpec {
        key: AspectRatio::Tall,
        label: "Tall Portrait",
        display_ratio: "2:3",
        pixel_width: 1024,
        pixel_height: 1792,
        remote_size_code: "1024x1792",
    },
];

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Widescreen,
        AspectRatio::Tall,
    ];

    /// Look up the registered spec. Every variant has exactly one entry.
    pub fn spec(self) -> &'static AspectRatioSpec {
        &REGISTRY[self as usize]
    }

    pub fn key(self) -> &'static str {
        match self {
            AspectRatio::Square => "square",
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Widescreen => "widescreen",
            AspectRatio::Tall => "tall",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim().to_ascii_lowercase();
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.key() == needle)
            .ok_or_else(|| {
                let keys: Vec<&str> = AspectRatio::ALL.iter().map(|r| r.key()).collect();
                format!(
                    "Unknown aspect ratio '{}'. Expected one of: {}",
                    input,
                    keys.join(", ")
                )
            })
    }
}
