//! Theme catalog.
//!
//! The catalog shown to players is static data embedded from `themes.yaml`;
//! the world description fed to the generator lives on [`Theme`] itself.

use std::fmt;
use std::str::FromStr;

use questline_core::error::DomainError;
use serde::{Deserialize, Serialize};

const CATALOG_YAML: &str = include_str!("../../themes.yaml");

/// A supported story setting. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    /// Knights, dragons, and ancient kingdoms.
    MedievalFantasy,
    /// Space travel and alien civilizations.
    SciFiSpace,
    /// Cursed lands and supernatural creatures.
    HorrorGothic,
    /// Megacorporations and neon-lit streets.
    Cyberpunk,
    /// Wasteland survival.
    PostApocalyptic,
    /// Steam power and airships.
    Steampunk,
}

impl Theme {
    /// Every supported theme, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::MedievalFantasy,
        Self::SciFiSpace,
        Self::HorrorGothic,
        Self::Cyberpunk,
        Self::PostApocalyptic,
        Self::Steampunk,
    ];

    /// The stable identifier used on the wire.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::MedievalFantasy => "medieval-fantasy",
            Self::SciFiSpace => "sci-fi-space",
            Self::HorrorGothic => "horror-gothic",
            Self::Cyberpunk => "cyberpunk",
            Self::PostApocalyptic => "post-apocalyptic",
            Self::Steampunk => "steampunk",
        }
    }

    /// World description handed to the narrative generator.
    #[must_use]
    pub fn setting(self) -> &'static str {
        match self {
            Self::MedievalFantasy => {
                "a classic medieval fantasy world with knights, dragons, magic, and ancient kingdoms"
            }
            Self::SciFiSpace => {
                "a futuristic universe with space travel, alien civilizations, advanced technology, and cosmic mysteries"
            }
            Self::HorrorGothic => {
                "a dark gothic land of supernatural creatures, cursed villages, thick fog, and terrifying encounters"
            }
            Self::Cyberpunk => {
                "a cyberpunk dystopia of megacorporations, hackers, cybernetic enhancements, and neon-lit streets"
            }
            Self::PostApocalyptic => {
                "a post-apocalyptic wasteland of mutants, survivors, scarce resources, and the struggle to stay alive"
            }
            Self::Steampunk => {
                "a Victorian age of steam-powered machines, airships, eccentric inventors, and smoky industry"
            }
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Theme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        if id.is_empty() {
            return Err(DomainError::InvalidInput("theme is required".into()));
        }
        Self::ALL
            .into_iter()
            .find(|theme| theme.id() == id)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown theme: {id}")))
    }
}

/// A catalog entry presented to players when choosing a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInfo {
    /// Theme identifier.
    pub id: Theme,
    /// Display name.
    pub name: String,
    /// One-sentence pitch.
    pub description: String,
    /// Decorative icon.
    pub icon: String,
}

/// Returns the static theme catalog.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the embedded catalog is invalid.
pub fn list_themes() -> Result<Vec<ThemeInfo>, DomainError> {
    serde_yaml::from_str(CATALOG_YAML)
        .map_err(|e| DomainError::Infrastructure(format!("theme catalog is invalid: {e}")))
}
