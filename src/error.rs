use crate::boxes::FourCC;
use crate::parser::ParseError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("parse: {0}")]
    Parse(#[from] ParseError),
    #[error("atom not found: {0}")]
    AtomNotFound(FourCC),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
