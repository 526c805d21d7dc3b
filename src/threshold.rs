use serde_derive::{Deserialize, Serialize};

/// Inclusive depth window `[lo, hi]` selecting which points get a color.
///
/// A depth of 0 is "no reading" and is never inside the window, even when `lo` is 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ThresholdBounds")]
pub struct ThresholdWindow {
    pub lo: f32,
    pub hi: f32,
}

/// Bounds as written in a config file, before clamping.
#[derive(Deserialize)]
#[serde(default)]
struct ThresholdBounds {
    lo: f32,
    hi: f32,
}

impl Default for ThresholdBounds {
    fn default() -> Self {
        let ThresholdWindow { lo, hi } = ThresholdWindow::default();
        Self { lo, hi }
    }
}

impl From<ThresholdBounds> for ThresholdWindow {
    fn from(bounds: ThresholdBounds) -> Self {
        Self::new(bounds.lo, bounds.hi)
    }
}

impl ThresholdWindow {
    /// Both bounds are clamped into [0, 1]. `lo > hi` is allowed and selects nothing.
    pub fn new(lo: f32, hi: f32) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { num::clamp(v, 0.0, 1.0) };
        Self {
            lo: clamp(lo),
            hi: clamp(hi),
        }
    }

    pub fn contains(&self, depth: f32) -> bool {
        depth > 0.0 && depth >= self.lo && depth <= self.hi
    }
}

impl Default for ThresholdWindow {
    fn default() -> Self {
        Self { lo: 0.3, hi: 0.5 }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ThresholdWindow;

    #[rstest]
    #[case(0.3, true)]
    #[case(0.5, true)]
    #[case(0.4, true)]
    #[case(0.3 - 1e-4, false)]
    #[case(0.5 + 1e-4, false)]
    #[case(f32::NAN, false)]
    fn should_use_inclusive_bounds(#[case] depth: f32, #[case] inside: bool) {
        assert_eq!(ThresholdWindow::new(0.3, 0.5).contains(depth), inside);
    }

    #[test]
    fn should_never_include_empty_depth() {
        let window = ThresholdWindow::new(0.0, 1.0);
        assert!(!window.contains(0.0));
        assert!(window.contains(1e-6));
        assert!(window.contains(1.0));
    }

    #[test]
    fn should_clamp_bounds() {
        assert_eq!(ThresholdWindow::new(-1.0, 3.0), ThresholdWindow::new(0.0, 1.0));
        assert!(!ThresholdWindow::new(0.6, 0.4).contains(0.5));
    }

    #[test]
    fn should_default_to_near_range() {
        let window: ThresholdWindow = serde_json::from_str(r#"{"hi": 0.8}"#).unwrap();
        assert_eq!(window, ThresholdWindow { lo: 0.3, hi: 0.8 });
    }

    #[test]
    fn should_clamp_bounds_read_from_json() {
        let window: ThresholdWindow = serde_json::from_str(r#"{"lo": -1, "hi": 5}"#).unwrap();
        assert_eq!(window, ThresholdWindow { lo: 0.0, hi: 1.0 });
    }
}
