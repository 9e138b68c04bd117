//! External command execution and system service lifecycle.
//!
//! Commands inherit the terminal and fail with a message naming the
//! program and exit code.

use anyhow::{bail, Context, Result};
use std::ffi::OsStr;
use std::process::{Command, Stdio};
use tracing::debug;

/// Run a program attached to the terminal, failing on a non-zero exit.
pub fn exec_interactive<I, S>(program: &str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<_> = args.into_iter().collect();
    debug!(
        "Exec {} {:?}",
        program,
        args.iter().map(|a| a.as_ref()).collect::<Vec<&OsStr>>()
    );

    let status = Command::new(program)
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute '{}'. Is it installed?", program))?;

    if !status.success() {
        bail!(
            "'{}' failed (exit code {})",
            program,
            status.code().unwrap_or(-1)
        );
    }
    Ok(())
}

/// Restart and enable a systemd unit.
pub fn systemd_start(name: &str) -> Result<()> {
    systemd_start_with(name, |command| exec_interactive("/bin/sh", ["-c", command]))
}

/// [`systemd_start`] with an explicit shell runner.
pub fn systemd_start_with<F>(name: &str, mut sh: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    debug!("Setting up systemd service: {}", name);

    sh(&format!("systemctl restart {}", name)).context("failed to run start cmd")?;
    sh(&format!("systemctl enable {}", name)).context("failed to run enable cmd")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_failure() {
        assert!(exec_interactive("false", [] as [&str; 0]).is_err());
        assert!(exec_interactive("true", [] as [&str; 0]).is_ok());
    }

    #[test]
    fn test_interactive_reports_exit_code() {
        let err = exec_interactive("/bin/sh", ["-c", "exit 3"]).unwrap_err();
        assert_eq!(err.to_string(), "'/bin/sh' failed (exit code 3)");
    }

    #[test]
    fn test_interactive_missing_program() {
        let err = exec_interactive("/nonexistent_path_12345", [] as [&str; 0]).unwrap_err();
        assert!(err.to_string().contains("Is it installed?"));
    }

    #[test]
    fn test_systemd_start_runs_restart_then_enable() {
        let mut seen = Vec::new();
        systemd_start_with("dhcpd", |cmd| {
            seen.push(cmd.to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["systemctl restart dhcpd", "systemctl enable dhcpd"]);
    }

    #[test]
    fn test_systemd_start_wraps_failures() {
        let err = systemd_start_with("tftp", |_| bail!("boom")).unwrap_err();
        assert_eq!(err.to_string(), "failed to run start cmd");

        let err = systemd_start_with("tftp", |cmd| {
            if cmd.contains("enable") {
                bail!("boom")
            }
            Ok(())
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "failed to run enable cmd");
        assert_eq!(err.root_cause().to_string(), "boom");
    }
}
