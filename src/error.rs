use thiserror::Error;

/// Errors raised while turning raw benchmark output into a chart.
///
/// Every variant is fatal for the invocation; the tool never retries. The
/// offending key, index, or path is carried so the bad input can be located.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Input file absent, unreadable, invalid JSON, or structurally not the
    /// declared shape (non-object document, non-numeric series element, ...).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A series key required by the experiment schema is absent.
    #[error("missing series `{0}` in input document")]
    MissingSeries(String),

    /// A series does not match the length established by the first declared key.
    #[error("series `{key}` has {actual} entries, expected {expected}")]
    InconsistentSeriesLength {
        key: String,
        expected: usize,
        actual: usize,
    },

    /// A series key outside the declared table for the experiment.
    #[error("unknown series key `{0}`")]
    UnknownSeriesKey(String),

    /// A multi-iteration document lacks `iter-<i>` for an i in range.
    #[error("missing iteration `iter-{0}`")]
    MissingIteration(usize),

    /// An iteration's key set or sequence length diverges from iteration 0.
    #[error("iteration {iteration} diverges from iteration 0 on series `{key}`")]
    InconsistentIterationSchema { iteration: usize, key: String },

    /// Propagated from the rendering engine or artifact I/O.
    #[error("rendering failed: {0}")]
    RenderingFailed(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
