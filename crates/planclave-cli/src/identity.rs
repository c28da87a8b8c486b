use std::process::Command;

use anyhow::{Result, bail};
use planclave_config::IdentityConfig;
use planclave_engine::Identity;

/// Picks each identity field from the first source that has it:
/// command-line flag, then config file, then `git config`.
pub fn resolve(
    email_flag: Option<&str>,
    name_flag: Option<&str>,
    config: Option<&IdentityConfig>,
    git: impl Fn(&str) -> Option<String>,
) -> Result<Identity> {
    let email = pick(email_flag, config.map(|c| c.email.as_str()), || git("user.email"));
    let name = pick(name_flag, config.map(|c| c.name.as_str()), || git("user.name"));
    match (email, name) {
        (Some(email), Some(name)) => Ok(Identity { email, name }),
        _ => bail!(
            "no reviewer identity: pass --email and --name, add an [identity] table to the config, \
             or set git config user.name and user.email"
        ),
    }
}

fn pick(
    flag: Option<&str>,
    config: Option<&str>,
    git: impl FnOnce() -> Option<String>,
) -> Option<String> {
    flag.or(config)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(git)
}

/// Reads one `git config` key; `None` when git is missing or the key is unset.
pub fn git_config(key: &str) -> Option<String> {
    let output = Command::new("git").args(["config", key]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}
