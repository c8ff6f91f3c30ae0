// Typed errors with thiserror. Binaries wrap these in anyhow and exit 1.

use std::path::PathBuf;

use thiserror::Error;

/// Asset pipeline error types.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("No source image for: {}", .0.join(", "))]
    MissingSources(Vec<String>),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("SVG error: {0}")]
    Svg(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Invalid sheet layout: {0}")]
    InvalidLayout(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sources_lists_ids() {
        let err = PipelineError::MissingSources(vec!["c".to_string(), "d".to_string()]);
        assert_eq!(err.to_string(), "No source image for: c, d");
    }

    #[test]
    fn io_error_names_path() {
        let err = PipelineError::io(
            "art/enemies/x.webp",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let text = err.to_string();
        assert!(text.contains("art/enemies/x.webp"));
        assert!(text.contains("gone"));
    }
}
