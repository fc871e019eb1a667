use std::io::{self, BufRead, Write};

use crate::application::InterfaceDnsController;
use crate::domain::DnsProvider;
use crate::infrastructure::config::Config;

use super::manual;

const YES: [&str; 4] = ["s", "sim", "y", "yes"];
const NO: [&str; 4] = ["n", "não", "nao", "no"];

/// Where the menu loop goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Menu,
    /// Wait for Enter, then show the menu again.
    Pause,
    AskOpenSite,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    InterfaceMissing,
    Completed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MenuChoice<'a> {
    Provider(&'a DnsProvider),
    RestoreDhcp,
    ShowDns,
    TestConnection,
    TestSite,
    Invalid,
}

impl<'a> MenuChoice<'a> {
    pub fn parse(input: &str, config: &'a Config) -> Self {
        let input = input.trim();
        if let Some(provider) = config.provider(input) {
            return Self::Provider(provider);
        }

        match input {
            "4" => Self::RestoreDhcp,
            "5" => Self::ShowDns,
            "6" => Self::TestConnection,
            "7" => Self::TestSite,
            _ => Self::Invalid,
        }
    }
}

/// Yes/no answer, or `None` when the input is neither.
pub fn parse_answer(input: &str) -> Option<bool> {
    let answer = input.trim().to_lowercase();
    if YES.contains(&answer.as_str()) {
        Some(true)
    } else if NO.contains(&answer.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// One interactive run: interface check, then the menu loop.
pub struct Session<'a, R> {
    controller: &'a InterfaceDnsController<'a>,
    input: R,
}

impl<'a, R: BufRead> Session<'a, R> {
    pub fn new(controller: &'a InterfaceDnsController<'a>, input: R) -> Self {
        Self { controller, input }
    }

    pub fn run(&mut self) -> io::Result<SessionEnd> {
        let interface = self.controller.interface();

        if !self.controller.verify_interface_exists() {
            println!("Interface '{}' not found or disconnected!", interface);
            println!("\nCheck:");
            println!("   1. That the network cable is plugged in");
            println!("   2. That the interface is enabled");
            println!("   3. The interface list, from an elevated prompt:");
            println!("      netsh interface show interface");
            return Ok(SessionEnd::InterfaceMissing);
        }
        println!("Interface '{}' found and connected!", interface);

        let mut state = MenuState::Menu;
        while state != MenuState::Done {
            state = self.next(state)?;
        }

        manual::print_reference(self.controller.config());
        Ok(SessionEnd::Completed)
    }

    /// Run one state and return the one after it. End of input ends the
    /// session.
    pub fn next(&mut self, state: MenuState) -> io::Result<MenuState> {
        match state {
            MenuState::Menu => {
                self.print_menu();
                match self.prompt("\nChoose an option: ")? {
                    Some(line) => {
                        let config = self.controller.config();
                        Ok(self.handle(MenuChoice::parse(&line, config)))
                    }
                    None => Ok(MenuState::Done),
                }
            }
            MenuState::Pause => match self.prompt("\nPress Enter to continue...")? {
                Some(_) => Ok(MenuState::Menu),
                None => Ok(MenuState::Done),
            },
            MenuState::AskOpenSite => {
                self.ask_open_site()?;
                Ok(MenuState::Done)
            }
            MenuState::Done => Ok(MenuState::Done),
        }
    }

    fn handle(&self, choice: MenuChoice<'_>) -> MenuState {
        let controller = self.controller;

        match choice {
            MenuChoice::Provider(provider) => {
                println!("\nConfiguring {}...", provider.name());
                controller.show_interface_details();
                if controller.apply_provider(provider) {
                    self.verify_change()
                } else {
                    MenuState::Done
                }
            }
            MenuChoice::RestoreDhcp => {
                println!("\nRestoring automatic DNS...");
                if controller.set_dhcp_dns() {
                    self.verify_change()
                } else {
                    MenuState::Done
                }
            }
            MenuChoice::ShowDns => {
                controller.show_current_dns();
                MenuState::Pause
            }
            MenuChoice::TestConnection => {
                if controller.test_connection().is_connected() {
                    MenuState::AskOpenSite
                } else {
                    MenuState::Pause
                }
            }
            MenuChoice::TestSite => {
                if controller.test_site_connection() {
                    MenuState::AskOpenSite
                } else {
                    MenuState::Pause
                }
            }
            MenuChoice::Invalid => {
                println!("Invalid option!");
                MenuState::Pause
            }
        }
    }

    fn verify_change(&self) -> MenuState {
        self.controller.flush_dns_cache();
        if self.controller.test_connection().is_connected() {
            MenuState::AskOpenSite
        } else {
            MenuState::Done
        }
    }

    fn ask_open_site(&mut self) -> io::Result<()> {
        println!("\n{}", "=".repeat(60));
        println!("CONFIGURATION COMPLETE!");
        println!("{}", "=".repeat(60));

        loop {
            let Some(line) = self.prompt("Open the site in the browser? (Y/N): ")? else {
                return Ok(());
            };
            match parse_answer(&line) {
                Some(true) => {
                    self.controller.open_website();
                    return Ok(());
                }
                Some(false) => {
                    println!("All done! You can close the program.");
                    return Ok(());
                }
                None => println!("Please answer Y (yes) or N (no)"),
            }
        }
    }

    fn print_menu(&self) {
        println!("\nChoose a DNS provider:");
        for provider in &self.controller.config().providers {
            let ipv6 = provider
                .ipv6_primary
                .map(|addr| addr.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   {}. {} (IPv4: {}, IPv6: {})",
                provider.key(),
                provider.name(),
                provider.ipv4_primary,
                ipv6
            );
        }
        println!("   4. Restore automatic DNS (DHCP) - IPv4 and IPv6");
        println!("   5. Show current DNS");
        println!("   6. Test connection (including the test site)");
        println!("   7. Test connection to the site only");
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        print!("{}", message);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Wire the real collaborators together and run a session on stdin.
pub fn execute(config: &Config) -> anyhow::Result<SessionEnd> {
    use crate::infrastructure::network::HttpsSiteProbe;
    use crate::infrastructure::system::{SystemBrowser, SystemCommandRunner};

    let runner = SystemCommandRunner::new();
    let probe = HttpsSiteProbe::new(config.http_timeout, config.insecure_tls)?;
    let browser = SystemBrowser;
    let controller = InterfaceDnsController::new(config, &runner, &probe, &browser);

    let stdin = io::stdin();
    let mut session = Session::new(&controller, stdin.lock());
    Ok(session.run()?)
}
