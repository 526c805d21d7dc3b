mod frame_file;
pub use frame_file::{read_color_image, read_depth_image, FrameFileSensor};
