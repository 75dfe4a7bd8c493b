use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid similarity matrix: {0}")]
    InvalidMatrix(String),
}
