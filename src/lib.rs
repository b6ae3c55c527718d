//! csvtidy - clean, rename, merge and export CSV tables
//!
//! Load uploaded CSV bytes (with a Latin-1 fallback for non-UTF-8 input),
//! drop empty rows and columns, strip punctuation, rename columns, left-join
//! two tables on a shared key and write the result back out as CSV. Every
//! operation borrows its input table and returns a new one.

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod session;
pub mod transform;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{CellValue, Table};
pub use parser::{load, Loaded, LoadWarning};
pub use session::{Action, Outcome, Session, Slot};
