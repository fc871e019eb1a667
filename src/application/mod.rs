pub mod controller;

use std::fmt;

pub use controller::InterfaceDnsController;

/// How a single configuration command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// The tool refused because the entry is already there; not an error.
    AlreadyPresent,
    Failed(String),
}

impl CommandOutcome {
    /// Whether the enclosing sequence may continue.
    pub fn can_continue(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => write!(f, "Command completed successfully."),
            Self::AlreadyPresent => write!(f, "DNS already configured, skipping."),
            Self::Failed(msg) => write!(f, "Error: {}", msg),
        }
    }
}
