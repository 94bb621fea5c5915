/// Result alias that carries the custom [`SculptorError`] type.
pub type Result<T> = std::result::Result<T, SculptorError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SculptorError {
    /// Input data failed validation before any geometry was attempted.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A modelling operation produced an unusable shape. This is the only
    /// error the generation ladders treat as recoverable.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// A retry ladder ran out of attempts without producing a solid.
    #[error("{stage} construction failed after {attempts} attempts")]
    AttemptsExhausted { stage: &'static str, attempts: u32 },
    /// Wrapper around JSON serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl SculptorError {
    /// Creates an input validation error from the provided message.
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Failure of an individual solid-modelling step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The section outline winds back on itself and cannot be swept.
    #[error("section outline is not star shaped around its centre")]
    NonStarSection,
    /// The section outline has too few usable points to enclose an area.
    #[error("section outline has only {0} usable points")]
    EmptySection(usize),
    /// A fillet radius exceeds the room available at its target.
    #[error("fillet radius {radius:.3} does not fit {place}")]
    FilletTooLarge { radius: f64, place: &'static str },
    /// A length or radius is outside the range an operation can work with.
    #[error("{what} of {value:.4} is unusable")]
    InvalidDimension { what: &'static str, value: f64 },
    /// No stacking seam exists at the requested height.
    #[error("no stacking seam at height {0:.3}")]
    SeamNotFound(f64),
    /// A feature was placed where no face supports it.
    #[error("feature at ({x:.2}, {y:.2}) does not land on a supporting face")]
    DetachedFeature { x: f64, y: f64 },
}
