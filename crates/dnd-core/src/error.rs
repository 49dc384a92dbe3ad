use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DndError {
    /// The height query ran before the list container was ever laid out.
    #[error("row heights are only available after the list has rendered")]
    NotMounted,
    #[error("height query returned {actual} heights for {expected} items")]
    HeightCountMismatch { expected: usize, actual: usize },
    #[error("item is not part of the list")]
    ItemNotFound,
}
