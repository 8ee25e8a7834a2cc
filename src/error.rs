use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 text", path.display())]
    NotUtf8 { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("documents too large to compare ({cells} cells, limit {limit})")]
    TooLarge { cells: usize, limit: usize },
}
