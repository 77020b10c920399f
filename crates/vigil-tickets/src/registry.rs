use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::TicketError;

/// On-disk registry document. Both lists are optional; entries are trimmed
/// and blank entries dropped at load time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub maintainers: Vec<String>,
    #[serde(default)]
    pub bots: Vec<String>,
}

impl RegistryFile {
    pub fn load(path: &Path) -> Result<Self, TicketError> {
        let content = std::fs::read_to_string(path).map_err(|source| TicketError::RegistryIo {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| TicketError::RegistryParse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Build the normalized login set from configuration or CLI values.
fn build_login_set<'a>(logins: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    logins
        .into_iter()
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .map(str::to_string)
        .collect::<HashSet<_>>()
}

/// Public struct `TriageRegistry` used across Vigil components.
///
/// Membership checks are exact string matches: GitHub logins are
/// case-preserved identifiers, not free-form labels.
#[derive(Debug, Clone, Default)]
pub struct TriageRegistry {
    maintainers: HashSet<String>,
    bots: HashSet<String>,
}

impl TriageRegistry {
    pub fn from_lists<'a>(
        maintainers: impl IntoIterator<Item = &'a str>,
        bots: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            maintainers: build_login_set(maintainers),
            bots: build_login_set(bots),
        }
    }

    /// Loads the optional registry file and merges in extra logins supplied
    /// on the command line.
    pub fn load(
        registry_file: Option<&Path>,
        extra_maintainers: &[String],
        extra_bots: &[String],
    ) -> Result<Self, TicketError> {
        let mut file = match registry_file {
            Some(path) => RegistryFile::load(path)?,
            None => RegistryFile::default(),
        };
        file.maintainers.extend(extra_maintainers.iter().cloned());
        file.bots.extend(extra_bots.iter().cloned());
        Ok(Self::from_lists(
            file.maintainers.iter().map(String::as_str),
            file.bots.iter().map(String::as_str),
        ))
    }

    pub fn is_maintainer(&self, login: &str) -> bool {
        self.maintainers.contains(login)
    }

    pub fn is_bot(&self, login: &str) -> bool {
        self.bots.contains(login)
    }

    pub fn maintainer_count(&self) -> usize {
        self.maintainers.len()
    }

    pub fn bot_count(&self) -> usize {
        self.bots.len()
    }
}
