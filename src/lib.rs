#![forbid(unsafe_code)]

pub mod error;
pub mod linked_list;


pub use error::ListError;
pub use linked_list::List;
