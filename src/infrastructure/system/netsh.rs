//! Builders for every external command the controller issues.
//!
//! Argument shapes follow what `netsh`, `ipconfig` and `ping` expect on
//! Windows; the interface name is always passed as `name="<iface>"`.

use std::net::IpAddr;

use crate::domain::{InterfaceTarget, IpFamily};

use super::command::CommandLine;

/// Echo requests sent per ICMP probe.
pub const PING_COUNT: u32 = 2;

pub fn show_interface(interface: &InterfaceTarget) -> CommandLine {
    CommandLine::new(
        "netsh",
        [
            "interface".to_string(),
            "show".to_string(),
            "interface".to_string(),
            interface.name_arg(),
        ],
    )
}

pub fn set_primary_dns(interface: &InterfaceTarget, addr: IpAddr) -> CommandLine {
    CommandLine::new(
        "netsh",
        [
            "interface".to_string(),
            family_of(addr).netsh_context().to_string(),
            "set".to_string(),
            "dns".to_string(),
            interface.name_arg(),
            "static".to_string(),
            addr.to_string(),
            "primary".to_string(),
        ],
    )
}

pub fn add_secondary_dns(interface: &InterfaceTarget, addr: IpAddr) -> CommandLine {
    CommandLine::new(
        "netsh",
        [
            "interface".to_string(),
            family_of(addr).netsh_context().to_string(),
            "add".to_string(),
            "dns".to_string(),
            interface.name_arg(),
            addr.to_string(),
            "index=2".to_string(),
        ],
    )
}

pub fn reset_dns_to_dhcp(interface: &InterfaceTarget, family: IpFamily) -> CommandLine {
    CommandLine::new(
        "netsh",
        [
            "interface".to_string(),
            family.netsh_context().to_string(),
            "set".to_string(),
            "dns".to_string(),
            interface.name_arg(),
            "source=dhcp".to_string(),
        ],
    )
}

pub fn show_dns(interface: &InterfaceTarget, family: IpFamily) -> CommandLine {
    show(interface, family, "dns")
}

pub fn show_config(interface: &InterfaceTarget, family: IpFamily) -> CommandLine {
    show(interface, family, "config")
}

pub fn flush_dns() -> CommandLine {
    CommandLine::new("ipconfig", ["/flushdns"])
}

pub fn ping(host: &str) -> CommandLine {
    CommandLine::new(
        "ping",
        ["-n".to_string(), PING_COUNT.to_string(), host.to_string()],
    )
}

fn show(interface: &InterfaceTarget, family: IpFamily, what: &str) -> CommandLine {
    CommandLine::new(
        "netsh",
        [
            "interface".to_string(),
            family.netsh_context().to_string(),
            "show".to_string(),
            what.to_string(),
            interface.name_arg(),
        ],
    )
}

fn family_of(addr: IpAddr) -> IpFamily {
    match addr {
        IpAddr::V4(_) => IpFamily::V4,
        IpAddr::V6(_) => IpFamily::V6,
    }
}
