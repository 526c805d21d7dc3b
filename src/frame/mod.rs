mod depth;
pub use depth::{DepthFrame, SENSOR_HEIGHT, SENSOR_WIDTH};

mod color;
pub use color::ColorFrame;

mod aligned;
pub use aligned::{AlignedColorFrame, NO_COLOR};
