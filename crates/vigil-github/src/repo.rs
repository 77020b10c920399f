use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Public struct `RepoRef` used across Vigil components.
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parses an `owner/name` slug; exactly two non-empty segments.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = raw.trim().split('/').map(str::trim);
        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => bail!("invalid --repo '{raw}', expected owner/name"),
        }
    }

    pub fn as_slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
