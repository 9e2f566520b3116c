//! In-memory draft of one record during an editing session.

mod actions;
mod defaults;
mod draft;
mod reducers;
mod state;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use actions::FormMutation;
pub use draft::FormDraft;
pub use defaults::{default_item, default_object, default_record, default_value, fill_defaults};
pub use state::{FormStateStore, definition_at};

/// Whether a record is being created, edited, or only viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Add,
    Edit,
    Read,
}

impl Mode {
    pub fn is_editable(self) -> bool {
        !matches!(self, Mode::Read)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Add => write!(f, "add"),
            Mode::Edit => write!(f, "edit"),
            Mode::Read => write!(f, "read"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "add" | "create" => Ok(Mode::Add),
            "edit" => Ok(Mode::Edit),
            "read" | "view" => Ok(Mode::Read),
            other => Err(format!("unknown mode '{other}' (expected add, edit or read)")),
        }
    }
}
