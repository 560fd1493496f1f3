use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which answer strategy the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Backend {
    #[serde(rename = "hosted")]
    HostedApi,
    #[serde(rename = "local")]
    LocalRetrieval,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::HostedApi, Backend::LocalRetrieval];

    pub fn id(&self) -> &'static str {
        match self {
            Backend::HostedApi => "hosted",
            Backend::LocalRetrieval => "local",
        }
    }

    /// Label shown in the backend selector.
    pub fn label(&self) -> &'static str {
        match self {
            Backend::HostedApi => "OpenAI GPT-3.5",
            Backend::LocalRetrieval => "Hugging Face Mistral",
        }
    }

    pub fn requires_credential(&self) -> bool {
        matches!(self, Backend::HostedApi)
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Backend::ALL
            .into_iter()
            .find(|b| b.label() == trimmed || b.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                format!(
                    "Invalid backend: {}. Expected one of: {}",
                    trimmed,
                    Backend::ALL
                        .iter()
                        .map(|b| b.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
