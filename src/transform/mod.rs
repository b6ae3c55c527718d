//! Table transformations. Each one borrows its input and returns a new table.

mod clean;
mod merge;
mod rename;

pub use clean::{clean, drop_empty, sanitize_text};
pub use merge::merge;
pub use rename::{parse_mapping_pair, rename, ColumnMapping};
