use thiserror::Error;

/// Failures acquiring display resources. All of these abort startup.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("cannot open display: {path}")]
    DisplayUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot load font: {0}")]
    FontUnavailable(String),
    #[error("cannot load font: {name}: invalid size {size:?}")]
    InvalidFontSize { name: String, size: String },
}
