use std::path::PathBuf;

/// Fatal conditions. Per-question rejections are not errors; see `parser::Rejection`.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("input file not found: {}", .0.display())]
    InputMissing(PathBuf),
    #[error("failed to load PDF {}: {source}", path.display())]
    Pdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    #[error("failed to read content of page {page}: {source}")]
    PageContent {
        page: usize,
        #[source]
        source: lopdf::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize questions: {0}")]
    Json(#[from] serde_json::Error),
}
