use joincrawl_core::error::CrawlError;
use std::path::PathBuf;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, CliError>;

///
/// CliError
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no query tree configured in {0}")]
    NoQuery(PathBuf),

    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error("cannot encode row: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Read a whole file, keeping the path in the error.
pub fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
