//! Administrator check and re-launch. `netsh` refuses to change DNS
//! settings from a non-elevated process.

use thiserror::Error;

/// Passed to the elevated child so it never tries to re-launch itself.
pub const NO_ELEVATE_FLAG: &str = "--no-elevate";

#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("Failed to locate the current executable: {0}")]
    CurrentExe(std::io::Error),

    #[error("Failed to request administrator privileges: {0}")]
    Launch(std::io::Error),

    #[error("Administrator privileges were not granted")]
    Declined,
}

#[cfg(windows)]
pub fn is_elevated() -> bool {
    use std::process::{Command, Stdio};

    // `net session` only succeeds for an elevated token
    Command::new("net")
        .arg("session")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}

/// Start an elevated copy of this process with the same arguments.
/// The caller exits afterwards; the elevated copy does the work.
#[cfg(windows)]
pub fn relaunch_elevated() -> Result<(), ElevationError> {
    use std::process::Command;

    let exe = std::env::current_exe().map_err(ElevationError::CurrentExe)?;

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    args.push(NO_ELEVATE_FLAG.to_string());

    let script = start_process_script(&exe.display().to_string(), &args);
    tracing::debug!(script = %script, "Requesting elevation");

    let status = Command::new("powershell")
        .args(["-NoProfile", "-Command", &script])
        .status()
        .map_err(ElevationError::Launch)?;

    if !status.success() {
        return Err(ElevationError::Declined);
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn relaunch_elevated() -> Result<(), ElevationError> {
    Err(ElevationError::Launch(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "elevation is only available on Windows",
    )))
}

#[cfg_attr(not(windows), allow(dead_code))]
fn start_process_script(exe: &str, args: &[String]) -> String {
    let mut script = format!("Start-Process -FilePath {} -Verb RunAs", ps_quote(exe));
    if !args.is_empty() {
        let list: Vec<String> = args.iter().map(|a| ps_quote(a)).collect();
        script.push_str(" -ArgumentList ");
        script.push_str(&list.join(","));
    }
    script
}

/// Single-quoted PowerShell literal; embedded quotes are doubled.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_process_script() {
        let script = start_process_script(
            r"C:\Tools\dns-switch.exe",
            &["--interface".to_string(), "Ethernet 2".to_string()],
        );
        assert_eq!(
            script,
            r"Start-Process -FilePath 'C:\Tools\dns-switch.exe' -Verb RunAs -ArgumentList '--interface','Ethernet 2'"
        );
    }

    #[test]
    fn test_ps_quote_escapes_single_quotes() {
        assert_eq!(ps_quote("O'Brien"), "'O''Brien'");
    }
}
