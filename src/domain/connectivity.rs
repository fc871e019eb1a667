/// Result of one `test_connection` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectivityOutcome {
    pub ipv4_ok: bool,
    pub ipv6_ok: bool,
    pub site_ok: bool,
}

impl ConnectivityOutcome {
    /// Internet is reachable over at least one family. The site check is
    /// informational and does not count.
    pub fn is_connected(&self) -> bool {
        self.ipv4_ok || self.ipv6_ok
    }
}
