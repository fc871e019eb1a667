use crate::domain::InterfaceTarget;

const CONNECTED_MARKER: &str = "Connected";
const ALREADY_EXISTS_MARKER: &str = "The object already exists";

/// Interprets interface-tool output. Kept separate from the controller so
/// the matching strategy can change without touching the command sequence.
pub trait OutputClassifier {
    /// Whether an interface listing shows the interface as present and up.
    fn is_connected(&self, interface: &InterfaceTarget, listing: &str) -> bool;

    /// Whether a failed set/add only reports an entry that is already there.
    fn is_already_exists(&self, stderr: &str) -> bool;
}

/// Exact-substring matching against English `netsh` messages.
pub struct NetshClassifier;

impl OutputClassifier for NetshClassifier {
    fn is_connected(&self, interface: &InterfaceTarget, listing: &str) -> bool {
        listing.contains(interface.as_str()) && listing.contains(CONNECTED_MARKER)
    }

    fn is_already_exists(&self, stderr: &str) -> bool {
        stderr.contains(ALREADY_EXISTS_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Admin State    State          Type             Interface Name
-------------------------------------------------------------------------
Enabled        Connected      Dedicated        Ethernet
";

    #[test]
    fn test_connected_interface() {
        let ethernet = InterfaceTarget::new("Ethernet").unwrap();
        assert!(NetshClassifier.is_connected(&ethernet, LISTING));
    }

    #[test]
    fn test_missing_connected_marker() {
        let ethernet = InterfaceTarget::new("Ethernet").unwrap();
        let listing = LISTING.replace("Connected", "Disconnected");
        assert!(!NetshClassifier.is_connected(&ethernet, &listing));
    }

    #[test]
    fn test_missing_interface_name() {
        let wifi = InterfaceTarget::new("Wi-Fi").unwrap();
        assert!(!NetshClassifier.is_connected(&wifi, LISTING));
    }

    #[test]
    fn test_already_exists() {
        assert!(NetshClassifier.is_already_exists("The object already exists.\r\n"));
        assert!(!NetshClassifier.is_already_exists("The parameter is incorrect."));
    }
}
