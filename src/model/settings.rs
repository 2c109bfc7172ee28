//! Matching settings sent with each sort job

use std::fmt;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Hybrid,
    Similarity,
}

impl MatchMode {
    /// Wire value for the `mode` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Hybrid => "hybrid",
            MatchMode::Similarity => "similarity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchMode::Hybrid => "Hybrid (SVM + Cosine Similarity)",
            MatchMode::Similarity => "Cosine Similarity Only",
        }
    }

    pub fn next(self) -> Self {
        match self {
            MatchMode::Hybrid => MatchMode::Similarity,
            MatchMode::Similarity => MatchMode::Hybrid,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detector {
    #[default]
    Mtcnn,
    Retinaface,
}

impl Detector {
    /// Wire value for the `detector` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            Detector::Mtcnn => "mtcnn",
            Detector::Retinaface => "retinaface",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Detector::Mtcnn => "MTCNN (Recommended)",
            Detector::Retinaface => "RetinaFace",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Detector::Mtcnn => Detector::Retinaface,
            Detector::Retinaface => Detector::Mtcnn,
        }
    }
}

/// Similarity threshold in hundredths, always within [0.25, 0.55]
///
/// Stored as an integer so stepping by 0.01 never drifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(from = "f64")]
pub struct Threshold(u8);

impl Threshold {
    pub const MIN: u8 = 25;
    pub const MAX: u8 = 55;
    pub const DEFAULT: u8 = 42;

    pub fn from_hundredths(hundredths: i32) -> Self {
        Self(hundredths.clamp(Self::MIN as i32, Self::MAX as i32) as u8)
    }

    pub fn hundredths(&self) -> u8 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Move by `steps` hundredths, clamped to the valid range
    pub fn step(self, steps: i32) -> Self {
        Self::from_hundredths(i32::from(self.0) + steps)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self::from_hundredths((value * 100.0).round() as i32)
    }
}

/// Always two decimal digits ("0.42"); also the wire format
impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub mode: MatchMode,
    pub detector: Detector,
    pub threshold: Threshold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.mode, MatchMode::Hybrid);
        assert_eq!(settings.detector, Detector::Mtcnn);
        assert_eq!(settings.threshold.to_string(), "0.42");
    }

    #[test]
    fn test_threshold_clamps_low_and_high() {
        assert_eq!(Threshold::from(0.1).to_string(), "0.25");
        assert_eq!(Threshold::from(0.9).to_string(), "0.55");
        assert_eq!(Threshold::from_hundredths(-4).hundredths(), Threshold::MIN);
    }

    #[test]
    fn test_threshold_rounds_to_hundredths() {
        assert_eq!(Threshold::from(0.306).to_string(), "0.31");
        assert_eq!(Threshold::from(0.42).to_string(), "0.42");
        assert_eq!(Threshold::from(0.3).to_string(), "0.30");
    }

    #[test]
    fn test_threshold_step_stays_in_range() {
        let t = Threshold::from_hundredths(54);
        assert_eq!(t.step(1).to_string(), "0.55");
        assert_eq!(t.step(5).to_string(), "0.55");
        assert_eq!(Threshold::from_hundredths(26).step(-3).to_string(), "0.25");
    }

    #[test]
    fn test_threshold_nan_falls_back_to_default() {
        assert_eq!(Threshold::from(f64::NAN), Threshold::default());
    }

    #[test]
    fn test_cycle_mode_and_detector() {
        assert_eq!(MatchMode::Hybrid.next(), MatchMode::Similarity);
        assert_eq!(MatchMode::Similarity.next(), MatchMode::Hybrid);
        assert_eq!(Detector::Mtcnn.next(), Detector::Retinaface);
        assert_eq!(Detector::Retinaface.next().as_str(), "mtcnn");
    }

    #[test]
    fn test_deserialize_from_yaml() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: MatchMode,
            detector: Detector,
            threshold: Threshold,
        }

        let parsed: Wrapper =
            serde_yaml::from_str("mode: similarity\ndetector: retinaface\nthreshold: 0.5\n").unwrap();
        assert_eq!(parsed.mode, MatchMode::Similarity);
        assert_eq!(parsed.detector, Detector::Retinaface);
        assert_eq!(parsed.threshold.to_string(), "0.50");
    }
}
