pub mod browser;
pub mod classify;
pub mod command;
pub mod elevation;
pub mod netsh;

pub use browser::{Browser, SystemBrowser};
pub use classify::{NetshClassifier, OutputClassifier};
pub use command::{CommandError, CommandLine, CommandResult, CommandRunner, SystemCommandRunner};
