#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Invalid JSON response")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Element not found: {0}")]
    MissingElement(&'static str),
    #[error("Attribute {attribute} not found on {element}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("File error")]
    Io(#[from] std::io::Error),
    #[error("Unable to write spreadsheet")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("Unable to read spreadsheet")]
    Read(#[from] calamine::XlsxError),
    #[error("Spreadsheet has no worksheet")]
    NoWorksheet,
    #[error("Too many columns: {0}")]
    TooManyColumns(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Export error")]
    Export(#[from] ExportError),
}
