use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::thread;

use crate::domain::{ConnectivityOutcome, DnsProvider, InterfaceTarget, IpFamily};
use crate::infrastructure::config::Config;
use crate::infrastructure::network::SiteProbe;
use crate::infrastructure::system::netsh;
use crate::infrastructure::system::{
    Browser, CommandLine, CommandRunner, NetshClassifier, OutputClassifier,
};

use super::CommandOutcome;

/// Lines of `show config` output worth showing.
const DETAIL_KEYWORDS: [&str; 4] = ["DNS", "IP", "Endereço", "Configuration"];

/// Sequences interface-tool calls and network probes against the one
/// configured interface. Every call blocks until the tool or probe returns.
pub struct InterfaceDnsController<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
    probe: &'a dyn SiteProbe,
    browser: &'a dyn Browser,
    classifier: &'a dyn OutputClassifier,
}

impl<'a> InterfaceDnsController<'a> {
    pub fn new(
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        probe: &'a dyn SiteProbe,
        browser: &'a dyn Browser,
    ) -> Self {
        Self {
            config,
            runner,
            probe,
            browser,
            classifier: &NetshClassifier,
        }
    }

    pub fn with_classifier(mut self, classifier: &'a dyn OutputClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn interface(&self) -> &InterfaceTarget {
        &self.config.interface
    }

    /// True iff the interface listing names the interface and shows it
    /// connected. Any failure to run the listing counts as "not found".
    pub fn verify_interface_exists(&self) -> bool {
        let interface = self.interface();

        match self.runner.run(&netsh::show_interface(interface)) {
            Ok(result) if result.success() => {
                self.classifier.is_connected(interface, &result.stdout)
            }
            Ok(result) => {
                tracing::warn!(
                    interface = %interface,
                    exit_code = result.exit_code,
                    "Interface listing failed"
                );
                false
            }
            Err(e) => {
                println!("Error checking interface: {}", e);
                tracing::warn!("Interface listing could not run: {}", e);
                false
            }
        }
    }

    pub fn show_interface_details(&self) {
        println!("\nDetails for interface '{}':", self.interface());

        for family in [IpFamily::V4, IpFamily::V6] {
            println!("  {} configuration:", family);
            match self.runner.run(&netsh::show_config(self.interface(), family)) {
                Ok(result) => {
                    result
                        .stdout
                        .lines()
                        .filter(|line| DETAIL_KEYWORDS.iter().any(|k| line.contains(k)))
                        .for_each(|line| println!("   {}", line.trim()));
                }
                Err(e) => {
                    println!("Error showing details: {}", e);
                    return;
                }
            }
        }
    }

    pub fn apply_provider(&self, provider: &DnsProvider) -> bool {
        self.set_static_dns(
            provider.ipv4_primary,
            provider.ipv4_secondary,
            provider.ipv6_primary,
            provider.ipv6_secondary,
        )
    }

    /// Set primary and secondary resolvers, IPv4 first. The IPv6 block runs
    /// only when both IPv6 addresses are given. Stops at the first command
    /// that fails for any reason other than the entry already existing.
    pub fn set_static_dns(
        &self,
        primary: Ipv4Addr,
        secondary: Ipv4Addr,
        ipv6_primary: Option<Ipv6Addr>,
        ipv6_secondary: Option<Ipv6Addr>,
    ) -> bool {
        let interface = self.interface();
        println!("\nConfiguring DNS on interface '{}'...", interface);

        println!("  Configuring IPv4 DNS...");
        let ipv4 = [
            netsh::set_primary_dns(interface, IpAddr::V4(primary)),
            netsh::add_secondary_dns(interface, IpAddr::V4(secondary)),
        ];
        if !self.apply_sequence(&ipv4) {
            return false;
        }

        if let (Some(primary), Some(secondary)) = (ipv6_primary, ipv6_secondary) {
            println!("\n  Configuring IPv6 DNS...");
            let ipv6 = [
                netsh::set_primary_dns(interface, IpAddr::V6(primary)),
                netsh::add_secondary_dns(interface, IpAddr::V6(secondary)),
            ];
            if !self.apply_sequence(&ipv6) {
                return false;
            }
        }

        true
    }

    /// Revert both families to DHCP. Both reverts always run.
    pub fn set_dhcp_dns(&self) -> bool {
        println!("\nRestoring automatic DNS on '{}'...", self.interface());

        let ipv4_ok = self.reset_family(IpFamily::V4);
        let ipv6_ok = self.reset_family(IpFamily::V6);
        ipv4_ok && ipv6_ok
    }

    pub fn flush_dns_cache(&self) -> bool {
        println!("\nFlushing DNS cache...");

        match self.runner.run(&netsh::flush_dns()) {
            Ok(result) if result.success() => {
                println!("DNS cache flushed!");
                true
            }
            Ok(result) => {
                println!("Warning: {}", result.stderr.trim());
                tracing::warn!(exit_code = result.exit_code, "DNS cache flush failed");
                false
            }
            Err(e) => {
                println!("Error flushing cache: {}", e);
                tracing::warn!("DNS cache flush could not run: {}", e);
                false
            }
        }
    }

    /// Ping one IPv4 and one IPv6 host, then check the test site. The
    /// outcome counts as connected when either ping got through.
    pub fn test_connection(&self) -> ConnectivityOutcome {
        println!("\nTesting internet connection...");

        println!("  Testing IPv4...");
        let ipv4_ok = self.ping(&self.config.ipv4_ping_host);
        if ipv4_ok {
            println!("  IPv4 connection: OK!");
        } else {
            println!("  No IPv4 connection");
        }

        println!("  Testing IPv6...");
        let ipv6_ok = self.ping(&self.config.ipv6_ping_host);
        if ipv6_ok {
            println!("  IPv6 connection: OK!");
        } else {
            println!("  No IPv6 connection (normal if the network has no IPv6 support)");
        }

        println!("\nTesting connection to {}...", self.config.test_site);
        let site_ok = self.test_site_connection();

        let outcome = ConnectivityOutcome {
            ipv4_ok,
            ipv6_ok,
            site_ok,
        };
        tracing::debug!(?outcome, "Connection test finished");
        outcome
    }

    /// Resolve the test site's hostname, then GET it. Only a 2xx final
    /// status counts as reachable. Nothing is requested when resolution fails.
    pub fn test_site_connection(&self) -> bool {
        let site = &self.config.test_site;

        println!("  Resolving DNS for {}...", site.host());
        let addrs = match self.probe.resolve(site) {
            Ok(addrs) => addrs,
            Err(e) => {
                println!("  DNS resolution failed");
                tracing::debug!("Resolution failed: {}", e);
                return false;
            }
        };
        if let Some(addr) = addrs.first() {
            println!("  DNS resolved: {}", addr);
        }

        println!("  Testing HTTP connection...");
        match self.probe.fetch(site, &addrs) {
            Ok(200) => {
                println!("  Connection to the site succeeded!");
                true
            }
            Ok(status) if (200..300).contains(&status) => {
                println!("  Site returned status: {}", status);
                true
            }
            Ok(status) => {
                println!("  URL error: HTTP {}", status);
                tracing::debug!(status, "Site answered with an error status");
                false
            }
            Err(e) if e.is_url_error() => {
                println!("  URL error: {}", e);
                false
            }
            Err(e) => {
                println!("  Connection error: {}", e);
                false
            }
        }
    }

    pub fn show_current_dns(&self) {
        println!("\nCurrent DNS on interface '{}':", self.interface());

        for family in [IpFamily::V4, IpFamily::V6] {
            println!("\n  {} DNS:", family);
            match self.runner.run(&netsh::show_dns(self.interface(), family)) {
                Ok(result) if !result.stdout.trim().is_empty() => println!("{}", result.stdout),
                Ok(_) => println!("   Using automatic DNS (DHCP)"),
                Err(e) => {
                    println!("Error reading current DNS: {}", e);
                    return;
                }
            }
        }
    }

    pub fn open_website(&self) -> bool {
        let url = self.config.test_site.url();
        println!("\nOpening {} in the browser...", url);

        match self.browser.open(url) {
            Ok(()) => {
                println!("Site opened in the browser!");
                true
            }
            Err(e) => {
                println!("Error opening the site: {}", e);
                false
            }
        }
    }

    fn apply_sequence(&self, commands: &[CommandLine]) -> bool {
        for command in commands {
            println!("   Running: {}", command);

            let outcome = self.apply(command);
            println!("   {}", outcome);
            if !outcome.can_continue() {
                return false;
            }

            // Give the network stack time to settle between changes
            thread::sleep(self.config.command_pause);
        }
        true
    }

    fn apply(&self, command: &CommandLine) -> CommandOutcome {
        match self.runner.run(command) {
            Ok(result) if result.success() => CommandOutcome::Applied,
            Ok(result) if self.classifier.is_already_exists(&result.stderr) => {
                tracing::debug!(command = %command, "Entry already present");
                CommandOutcome::AlreadyPresent
            }
            Ok(result) => {
                tracing::warn!(
                    command = %command,
                    exit_code = result.exit_code,
                    "Configuration command failed"
                );
                CommandOutcome::Failed(result.stderr.trim().to_string())
            }
            Err(e) => {
                tracing::warn!(command = %command, "Configuration command could not run: {}", e);
                CommandOutcome::Failed(e.to_string())
            }
        }
    }

    fn reset_family(&self, family: IpFamily) -> bool {
        match self.runner.run(&netsh::reset_dns_to_dhcp(self.interface(), family)) {
            Ok(result) if result.success() => {
                println!("{} automatic DNS restored!", family);
                true
            }
            Ok(result) => {
                println!("{} error: {}", family, result.stderr.trim());
                tracing::warn!(
                    family = %family,
                    exit_code = result.exit_code,
                    "DHCP revert failed"
                );
                false
            }
            Err(e) => {
                println!("{} error: {}", family, e);
                tracing::warn!(family = %family, "DHCP revert could not run: {}", e);
                false
            }
        }
    }

    fn ping(&self, host: &str) -> bool {
        match self.runner.run(&netsh::ping(host)) {
            Ok(result) => result.success(),
            Err(e) => {
                tracing::warn!(host, "Ping could not run: {}", e);
                false
            }
        }
    }
}
