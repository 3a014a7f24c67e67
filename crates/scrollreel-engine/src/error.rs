use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("the item list is empty; there is nothing to navigate to")]
    EmptyList,
    #[error("item index {index} is out of range for a list of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("already at the first item")]
    AtStart,
    #[error("already at the last item")]
    AtEnd,
}

pub type Result<T> = std::result::Result<T, EngineError>;
