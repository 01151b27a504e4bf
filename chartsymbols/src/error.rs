use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartSymbolsError {
    #[error("chartsymbols file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read chartsymbols file: {0}")]
    Io(#[from] std::io::Error),

    #[error("chartsymbols XML is malformed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("unexpected root element <{0}>, expected <chartsymbols>")]
    UnexpectedRoot(String),
}
