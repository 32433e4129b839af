use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
