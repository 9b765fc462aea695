use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwiftClaimError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("Classifier timed out after {0}s")]
    ClassifyTimeout(u64),

    #[error("Failed to parse classifier response: {0}")]
    ClassifyParse(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF generation error: {0}")]
    PdfGeneration(String),

    #[error("Excel generation error: {0}")]
    ExcelGeneration(String),

    #[error("Invalid claim file: {0}")]
    InvalidClaimFile(String),

    #[error("No receipt images found in: {0}")]
    NoImagesFound(String),

    #[error("CLI execution error: {0}")]
    CliExecution(String),

    #[error(transparent)]
    Common(#[from] swiftclaim_common::Error),
}

pub type Result<T> = std::result::Result<T, SwiftClaimError>;
