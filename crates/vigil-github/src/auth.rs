//! Credential resolution for the GitHub client.
//!
//! A configured token (flag or environment) always wins; when absent, the
//! `gh` CLI's stored credential is used as a fallback unless disabled.

use std::path::PathBuf;
use std::process::Command;

use crate::error::FetchError;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const GH_EXECUTABLE: &str = "gh";

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    metadata.is_file()
}

/// First PATH entry holding an executable `gh`; `None` when the CLI is
/// not installed.
fn locate_gh() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(GH_EXECUTABLE))
        .find(|candidate| {
            std::fs::metadata(candidate)
                .map(|metadata| is_executable(&metadata))
                .unwrap_or(false)
        })
}

/// Reads the `gh` CLI's stored token. Any failure falls through to `None`;
/// the caller decides whether a missing credential is fatal.
pub fn gh_cli_token() -> Option<String> {
    let gh = locate_gh()?;
    let output = Command::new(gh).args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

pub fn resolve_api_token(
    configured: Option<&str>,
    allow_gh_fallback: bool,
) -> Result<String, FetchError> {
    if let Some(token) = configured.map(str::trim).filter(|token| !token.is_empty()) {
        return Ok(token.to_string());
    }
    if allow_gh_fallback {
        if let Some(token) = gh_cli_token() {
            tracing::debug!("using stored gh cli credential");
            return Ok(token);
        }
    }
    Err(FetchError::MissingToken)
}
