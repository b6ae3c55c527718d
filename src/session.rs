//! Command handlers: `(state, action) -> state`
//!
//! A [`Session`] holds the tables a user is working on. [`Session::apply`]
//! never modifies the session it is called on; on success it returns the
//! next session, on failure the caller simply keeps the current one.

use std::sync::Arc;

use tracing::info;

use crate::config::{CleanOptions, Config};
use crate::error::{Error, Result};
use crate::model::Table;
use crate::output::Download;
use crate::parser::{load, LoadWarning};
use crate::transform::{self, ColumnMapping};

/// Where an uploaded table is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The table that clean, rename, merge and export act on
    Primary,
    /// The right-hand table of a merge
    Secondary,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Primary => write!(f, "primary"),
            Slot::Secondary => write!(f, "secondary"),
        }
    }
}

/// A user action
#[derive(Debug, Clone)]
pub enum Action {
    /// Load uploaded bytes into a slot, replacing what was there
    Upload { slot: Slot, bytes: Vec<u8> },
    /// Clean the primary table
    Clean(CleanOptions),
    /// Rename columns of the primary table
    Rename(ColumnMapping),
    /// Left-join the secondary table onto the primary one
    Merge { key: String },
    /// Export the primary table
    Export { file_name: String },
}

/// Result of a successful action
#[derive(Debug, Clone)]
pub struct Outcome {
    pub session: Session,
    pub notices: Vec<LoadWarning>,
    pub download: Option<Download>,
}

impl Outcome {
    fn state(session: Session) -> Self {
        Self {
            session,
            notices: Vec::new(),
            download: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    primary: Option<Arc<Table>>,
    secondary: Option<Arc<Table>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table in `slot`, if any
    pub fn table(&self, slot: Slot) -> Option<&Table> {
        match slot {
            Slot::Primary => self.primary.as_deref(),
            Slot::Secondary => self.secondary.as_deref(),
        }
    }

    /// Columns that can be offered as merge keys
    pub fn merge_candidates(&self) -> Vec<String> {
        match (&self.primary, &self.secondary) {
            (Some(left), Some(right)) => left.common_columns(right),
            _ => Vec::new(),
        }
    }

    /// Apply `action` and return the next state
    pub fn apply(&self, action: &Action, config: &Config) -> Result<Outcome> {
        match action {
            Action::Upload { slot, bytes } => {
                let loaded = load(bytes, &config.load)?;
                info!(
                    %slot,
                    rows = loaded.table.row_count(),
                    columns = loaded.table.column_count(),
                    "table uploaded"
                );
                let mut outcome = Outcome::state(self.with_table(*slot, loaded.table));
                outcome.notices = loaded.warnings;
                Ok(outcome)
            }
            Action::Clean(options) => {
                let cleaned = transform::clean(self.require(Slot::Primary)?, options);
                Ok(Outcome::state(self.with_table(Slot::Primary, cleaned)))
            }
            Action::Rename(mapping) => {
                let renamed = transform::rename(self.require(Slot::Primary)?, mapping)?;
                Ok(Outcome::state(self.with_table(Slot::Primary, renamed)))
            }
            Action::Merge { key } => {
                let merged = transform::merge(
                    self.require(Slot::Primary)?,
                    self.require(Slot::Secondary)?,
                    key,
                    &config.merge,
                )?;
                Ok(Outcome::state(self.with_table(Slot::Primary, merged)))
            }
            Action::Export { file_name } => {
                let download =
                    Download::csv(self.require(Slot::Primary)?, file_name.clone(), &config.export)?;
                let mut outcome = Outcome::state(self.clone());
                outcome.download = Some(download);
                Ok(outcome)
            }
        }
    }

    fn require(&self, slot: Slot) -> Result<&Table> {
        self.table(slot).ok_or_else(|| Error::EmptySlot {
            slot: slot.to_string(),
        })
    }

    fn with_table(&self, slot: Slot, table: Table) -> Session {
        let mut next = self.clone();
        match slot {
            Slot::Primary => next.primary = Some(Arc::new(table)),
            Slot::Secondary => next.secondary = Some(Arc::new(table)),
        }
        next
    }
}
