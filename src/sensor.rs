use crate::error::Result;
use crate::frame::{ColorFrame, DepthFrame};

/// Lowest tilt a Kinect motor accepts, in degrees.
pub const TILT_MIN_DEGREES: f32 = -31.0;
/// Highest tilt a Kinect motor accepts, in degrees.
pub const TILT_MAX_DEGREES: f32 = 31.0;

/// A depth + color sensor polled once per render tick.
///
/// Depth and color streams run on their own cadence: each `has_new_*` call reports whether
/// a frame arrived since the last fetch of that kind.
pub trait DepthSensor {
    fn has_new_depth_frame(&mut self) -> bool;
    fn depth_frame(&mut self) -> Result<DepthFrame>;
    fn has_new_color_frame(&mut self) -> bool;
    fn color_frame(&mut self) -> Result<ColorFrame>;
    /// Current motor tilt in degrees.
    fn tilt(&self) -> Result<f32>;
    /// Requests a motor tilt in degrees. Out of range values are the sensor's business.
    fn set_tilt(&mut self, degrees: f32) -> Result<()>;
}

/// Last received value of a stream, replaced wholesale on every update.
#[derive(Clone, Debug)]
pub struct LatestFrame<T> {
    value: Option<T>,
    generation: u64,
}

impl<T> LatestFrame<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            generation: 0,
        }
    }

    pub fn replace(&mut self, value: T) {
        self.value = Some(value);
        self.generation += 1;
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Number of values received so far. Changes every time the value is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl<T> Default for LatestFrame<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::LatestFrame;

    #[test]
    fn should_replace_whole_value() {
        let mut cell = LatestFrame::<Vec<u8>>::default();
        assert!(cell.is_empty());
        assert_eq!(cell.generation(), 0);

        cell.replace(vec![1, 2, 3]);
        cell.replace(vec![4]);
        assert_eq!(cell.get(), Some(&vec![4]));
        assert_eq!(cell.generation(), 2);
    }
}
