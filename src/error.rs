use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolsError {
    #[error("browser init error: {0}")]
    BrowserInit(String),

    #[error("navigation error: {0}")]
    Navigation(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("file upload error: {0}")]
    Upload(String),

    #[error("javascript error: {0}")]
    JavaScript(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("unexpected page structure: {0}")]
    Parse(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("format error: {0}")]
    Format(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("shape mismatch: row {row} has {got} values, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("length mismatch: got a sequence of {got} values, expected {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("file i/o error: {0}")]
    FileIo(#[from] std::io::Error),
}

impl ToolsError {
    /// Whether a retry loop should try the operation again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolsError::Http(_) | ToolsError::Timeout(_))
    }
}
