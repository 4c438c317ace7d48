use anyhow::{Context, Result, bail};
use std::process::{Command, Stdio};

/// Run a command, failing on a non-zero exit
///
/// The child never reads from the terminal and its output goes to stderr,
/// so stdout stays reserved for reports (`--json`).
pub fn run(cmd: &str, args: &[&str]) -> Result<()> {
    log::debug!("running command: {} {}", cmd, args.join(" "));

    let status = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(std::io::stderr()))
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;

    if !status.success() {
        bail!("{} {} exited with {}", cmd, args.join(" "), status);
    }
    Ok(())
}

/// Check if a command exists
pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run `systemctl --user <args>`
pub fn systemctl_user(args: &[&str]) -> Result<()> {
    let mut full = Vec::with_capacity(args.len() + 1);
    full.push("--user");
    full.extend_from_slice(args);
    run("systemctl", &full)
}
