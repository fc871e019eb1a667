use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use dns_switch::cli::menu;
use dns_switch::domain::InterfaceTarget;
use dns_switch::infrastructure::config::{Config, ConfigStore};
use dns_switch::infrastructure::system::elevation;
use dns_switch::infrastructure::tracing::{TracingOutput, init_tracing};

#[derive(Parser)]
#[command(name = "dns-switch")]
#[command(about = "Switch the DNS resolvers of a Windows network interface")]
#[command(version)]
struct Cli {
    /// Config file (default: DNS_SWITCH_CONFIG or the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interface to configure, overriding the config file
    #[arg(long)]
    interface: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Do not re-launch with administrator privileges
    #[arg(long = "no-elevate")]
    no_elevate: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cfg!(windows) {
        eprintln!("dns-switch only works on Windows");
        return ExitCode::from(1);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let output = match &config.log_file {
        Some(path) => TracingOutput::File(path.clone()),
        None => TracingOutput::Stderr,
    };
    if let Err(e) = init_tracing(cli.verbose, output) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }
    tracing::debug!(?config, "Configuration loaded");

    println!("{}", "=".repeat(60));
    println!("DNS SWITCH - interface '{}'", config.interface);
    println!("Connection test: {}", config.test_site);
    println!("{}", "=".repeat(60));

    if !cli.no_elevate && !elevation::is_elevated() {
        println!("Restarting as Administrator...");
        return match elevation::relaunch_elevated() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(1)
            }
        };
    }

    if let Err(e) = ctrlc::set_handler(|| {
        println!("\nOperation cancelled");
        std::process::exit(0);
    }) {
        tracing::warn!("Failed to install Ctrl-C handler: {}", e);
    }

    if let Err(e) = menu::execute(&config) {
        println!("\nUnexpected error: {:#}", e);
    }

    wait_for_enter("\nPress Enter to exit...");
    ExitCode::SUCCESS
}

fn load_config(cli: &Cli) -> Result<Config> {
    let store = ConfigStore::locate(cli.config.clone());
    let mut config = store.load().with_context(|| match store.path() {
        Some(path) => format!("Failed to load {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    if let Some(name) = &cli.interface {
        config.interface = InterfaceTarget::new(name.as_str())?;
    }

    Ok(config)
}

fn wait_for_enter(message: &str) {
    print!("{}", message);
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
