use std::fmt;

/// Name of the network adapter every command is issued against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceTarget(String);

#[derive(Debug, thiserror::Error)]
pub enum InterfaceTargetError {
    #[error("Interface name must not be empty")]
    Empty,

    #[error("Interface name must not contain double quotes, got: {0}")]
    InvalidCharacters(String),
}

impl InterfaceTarget {
    pub fn new(name: impl Into<String>) -> Result<Self, InterfaceTargetError> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(InterfaceTargetError::Empty);
        }

        // The name is always passed to netsh wrapped in quotes
        if name.contains('"') {
            return Err(InterfaceTargetError::InvalidCharacters(name));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `name="<iface>"` argument netsh expects.
    pub fn name_arg(&self) -> String {
        format!("name=\"{}\"", self.0)
    }
}

impl Default for InterfaceTarget {
    fn default() -> Self {
        Self("Ethernet".to_string())
    }
}

impl fmt::Display for InterfaceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
