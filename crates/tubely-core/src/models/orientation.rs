use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Open interval of width/height ratios classified as landscape (16:9 is ~1.7778).
const LANDSCAPE_RATIO: (f64, f64) = (1.76, 1.79);
/// Open interval of width/height ratios classified as portrait (9:16 is 0.5625).
const PORTRAIT_RATIO: (f64, f64) = (0.56, 0.57);

/// Coarse aspect classification of a video's first stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Classify a width/height ratio. Both band edges are exclusive.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > LANDSCAPE_RATIO.0 && ratio < LANDSCAPE_RATIO.1 {
            Orientation::Landscape
        } else if ratio > PORTRAIT_RATIO.0 && ratio < PORTRAIT_RATIO.1 {
            Orientation::Portrait
        } else {
            Orientation::Other
        }
    }

    /// Storage key prefix for this orientation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Pixel dimensions of a video stream as reported by the media inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or `None` when either side is zero.
    pub fn ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }

    /// Degenerate dimensions classify as `Other`; the inspector rejects them before this point.
    pub fn orientation(&self) -> Orientation {
        self.ratio()
            .map(Orientation::from_ratio)
            .unwrap_or(Orientation::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_resolutions() {
        assert_eq!(
            Dimensions::new(1920, 1080).orientation(),
            Orientation::Landscape
        );
        assert_eq!(
            Dimensions::new(1280, 720).orientation(),
            Orientation::Landscape
        );
        assert_eq!(
            Dimensions::new(1080, 1920).orientation(),
            Orientation::Portrait
        );
        assert_eq!(Dimensions::new(1024, 768).orientation(), Orientation::Other);
        assert_eq!(Dimensions::new(1080, 1080).orientation(), Orientation::Other);
    }

    #[test]
    fn test_band_edges_are_exclusive() {
        assert_eq!(Orientation::from_ratio(1.76), Orientation::Other);
        assert_eq!(Orientation::from_ratio(1.79), Orientation::Other);
        assert_eq!(Orientation::from_ratio(0.56), Orientation::Other);
        assert_eq!(Orientation::from_ratio(0.57), Orientation::Other);
        assert_eq!(Orientation::from_ratio(1.7601), Orientation::Landscape);
        assert_eq!(Orientation::from_ratio(0.5699), Orientation::Portrait);
    }

    #[test]
    fn test_zero_dimension_has_no_ratio() {
        assert_eq!(Dimensions::new(0, 1080).ratio(), None);
        assert_eq!(Dimensions::new(1920, 0).ratio(), None);
        assert_eq!(Dimensions::new(1920, 0).orientation(), Orientation::Other);
    }

    #[test]
    fn test_orientation_prefix() {
        assert_eq!(Orientation::Landscape.to_string(), "landscape");
        assert_eq!(Orientation::Portrait.as_str(), "portrait");
        assert_eq!(
            serde_json::to_string(&Orientation::Other).unwrap(),
            "\"other\""
        );
    }
}
