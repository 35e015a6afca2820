use thiserror::Error;

/// Per-frame mapping failures. None of these are fatal: the agent loop logs
/// them and carries on with the next frame.
#[derive(Error, Debug)]
pub enum Error {
    /// Camera frustum or viewport parameters out of valid range; rejected at
    /// configuration time, never mid-computation
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A required landmark was absent from this frame's detection result
    /// (occluded face, no face, or an index beyond the detector output)
    #[error("missing landmark input: {0}")]
    MissingInput(String),

    /// Coincident reference points make the tilt angle undefined
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
