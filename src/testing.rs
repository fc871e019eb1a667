//! Recording fakes for the controller's collaborators.

use std::cell::{Cell, RefCell};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::domain::TestSite;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::{ProbeError, SiteProbe};
use crate::infrastructure::system::{
    Browser, CommandError, CommandLine, CommandResult, CommandRunner,
};

type Responder = Box<dyn Fn(&CommandLine) -> Result<CommandResult, CommandError>>;

pub fn test_config() -> Config {
    Config {
        command_pause: Duration::ZERO,
        ..Config::default()
    }
}

pub fn ok(stdout: &str) -> Result<CommandResult, CommandError> {
    Ok(CommandResult {
        exit_code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

pub fn failed(exit_code: i32, stderr: &str) -> Result<CommandResult, CommandError> {
    Ok(CommandResult {
        exit_code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

pub struct FakeRunner {
    calls: RefCell<Vec<CommandLine>>,
    respond: Responder,
}

impl FakeRunner {
    pub fn new(
        respond: impl Fn(&CommandLine) -> Result<CommandResult, CommandError> + 'static,
    ) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Every command exits 0; the interface listing shows Ethernet connected.
    pub fn succeeding() -> Self {
        Self::new(|_| ok("Enabled        Connected      Dedicated        Ethernet"))
    }

    /// No command can be started at all.
    pub fn unavailable() -> Self {
        Self::new(|cmd| {
            Err(CommandError::Spawn {
                program: cmd.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandResult, CommandError> {
        self.calls.borrow_mut().push(command.clone());
        (self.respond)(command)
    }
}

pub struct FakeProbe {
    resolves: bool,
    /// `None` means the connection is refused.
    status: Option<u16>,
    resolve_calls: Cell<usize>,
    fetch_calls: Cell<usize>,
}

impl FakeProbe {
    pub fn reachable(status: u16) -> Self {
        Self::with(true, Some(status))
    }

    pub fn refusing() -> Self {
        Self::with(true, None)
    }

    pub fn unresolvable() -> Self {
        Self::with(false, None)
    }

    fn with(resolves: bool, status: Option<u16>) -> Self {
        Self {
            resolves,
            status,
            resolve_calls: Cell::new(0),
            fetch_calls: Cell::new(0),
        }
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.get()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.get()
    }
}

impl SiteProbe for FakeProbe {
    fn resolve(&self, site: &TestSite) -> Result<Vec<IpAddr>, ProbeError> {
        self.resolve_calls.set(self.resolve_calls.get() + 1);
        if self.resolves {
            Ok(vec![IpAddr::V4(Ipv4Addr::new(203, 0, 113, 10))])
        } else {
            Err(ProbeError::Resolve {
                host: site.host().to_string(),
                source: std::io::Error::other("no such host is known"),
            })
        }
    }

    fn fetch(&self, _site: &TestSite, _addrs: &[IpAddr]) -> Result<u16, ProbeError> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        self.status.ok_or_else(|| {
            ProbeError::Connect(std::io::Error::from(std::io::ErrorKind::ConnectionRefused))
        })
    }
}

pub struct FakeBrowser {
    opened: RefCell<Vec<String>>,
    fail: bool,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            opened: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            opened: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Browser for FakeBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        if self.fail {
            return Err(std::io::Error::other("no browser registered"));
        }
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}
