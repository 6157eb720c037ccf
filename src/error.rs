use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    /// `pop` and `shift` on an empty list report index 0 against length 0.
    #[error("invalid index {index} for list of length {len}")]
    InvalidIndex { index: usize, len: usize },
}
