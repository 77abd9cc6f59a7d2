use thiserror::Error;

/// Errors that can occur while building shapes or generating distance fields.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The operation has no implementation for this kind of input.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    /// The output bitmap has the wrong number of channels for the distance mode.
    #[error("Bitmap has {actual} channels but {expected} are required")]
    ChannelMismatch { expected: usize, actual: usize },
    /// A path segment did not start where the previous one ended.
    #[error("Path segment starts at ({x}, {y}), away from the current point")]
    PathDiscontinuity { x: f32, y: f32 },
    /// A path event arrived outside of a sub-path, or a sub-path was never ended.
    #[error("Unexpected path event: {0}")]
    UnexpectedPathEvent(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
