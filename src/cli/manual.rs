use std::net::IpAddr;

use crate::domain::{DnsProvider, InterfaceTarget, IpFamily};
use crate::infrastructure::config::Config;
use crate::infrastructure::system::netsh;

/// Print the commands this tool runs, so the same change can be made by hand.
pub fn print_reference(config: &Config) {
    let interface = &config.interface;

    println!("\n{}", "=".repeat(60));
    println!("MANUAL COMMANDS FOR '{}':", interface);
    println!("{}", "=".repeat(60));

    println!("View current configuration:");
    println!("   {}", netsh::show_config(interface, IpFamily::V4));
    println!("   {}", netsh::show_config(interface, IpFamily::V6));

    if let Some(provider) = config.providers.first() {
        println!("\nConfigure {}:", provider.name());
        for line in static_commands(interface, provider) {
            println!("   {}", line);
        }
    }

    println!("\nBack to automatic:");
    println!("   {}", netsh::reset_dns_to_dhcp(interface, IpFamily::V4));
    println!("   {}", netsh::reset_dns_to_dhcp(interface, IpFamily::V6));

    println!("\nFlush DNS cache:");
    println!("   {}", netsh::flush_dns());
}

fn static_commands(interface: &InterfaceTarget, provider: &DnsProvider) -> Vec<String> {
    let mut lines = vec![
        netsh::set_primary_dns(interface, IpAddr::V4(provider.ipv4_primary)).to_string(),
        netsh::add_secondary_dns(interface, IpAddr::V4(provider.ipv4_secondary)).to_string(),
    ];
    if let Some((primary, secondary)) = provider.ipv6_pair() {
        lines.push(netsh::set_primary_dns(interface, IpAddr::V6(primary)).to_string());
        lines.push(netsh::add_secondary_dns(interface, IpAddr::V6(secondary)).to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_commands_for_cloudflare() {
        let interface = InterfaceTarget::new("Ethernet").unwrap();
        let lines = static_commands(&interface, &DnsProvider::cloudflare());
        assert_eq!(
            lines,
            vec![
                "netsh interface ipv4 set dns name=\"Ethernet\" static 1.1.1.1 primary",
                "netsh interface ipv4 add dns name=\"Ethernet\" 1.0.0.1 index=2",
                "netsh interface ipv6 set dns name=\"Ethernet\" static 2606:4700:4700::1111 primary",
                "netsh interface ipv6 add dns name=\"Ethernet\" 2606:4700:4700::1001 index=2",
            ]
        );
    }
}
