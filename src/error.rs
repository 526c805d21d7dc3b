/// Main error type for the library.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Used when the user pass a logical invalid parameter to a function.
    #[error("Parameter error: {0}")]
    InvalidParameter(String),
    /// Calibration constants that can't describe a real camera pair.
    #[error("Calibration error: {0}")]
    InvalidCalibration(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parser error: {0}")]
    Parser(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Raised by sensor implementations when a frame or the motor can't be reached.
    #[error("Sensor error: {0}")]
    Sensor(String),
}

impl Error {
    /// Create a error with the kind `InvalidParameter`.
    /// # Arguments
    /// * `msg` - The error message.
    pub fn invalid_parameter<T: ToString>(msg: T) -> Self {
        Error::InvalidParameter(msg.to_string())
    }

    pub fn invalid_calibration<T: ToString>(msg: T) -> Self {
        Error::InvalidCalibration(msg.to_string())
    }

    pub fn sensor<T: ToString>(msg: T) -> Self {
        Error::Sensor(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parser(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
