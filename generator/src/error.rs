use std::path::PathBuf;

use mapgen_chartsymbols::ChartSymbolsError;
use thiserror::Error;

use crate::cli::Format;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Data path missing from configuration file")]
    MissingDataPath,
    #[error("topmark_type must be either floating or rigid, not {0:?}")]
    InvalidTopmarkType(String),
}

impl ConfigError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidTopmarkType(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    ChartSymbols(#[from] ChartSymbolsError),
    #[error(
        "Data format \"{0}\" has not yet been ported to the configuration file. \
         Use the old script to generate your mapfiles"
    )]
    Unsupported(Format),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_topmark_type_has_its_own_exit_code() {
        assert_eq!(ConfigError::InvalidTopmarkType("x".into()).exit_code(), 2);
        assert_eq!(ConfigError::MissingDataPath.exit_code(), 1);
    }

    #[test]
    fn unsupported_formats_are_named() {
        let message = GenerateError::Unsupported(Format::Elevation).to_string();
        assert!(message.starts_with("Data format \"elevation\" has not yet been ported"));
    }
}
