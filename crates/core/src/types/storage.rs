//! Storage locations and recipe difficulty levels.
//!
//! Both enums serialize to the values stored by the hosted backend
//! (`nevera`/`arcon`/`despensa` and `facil`/`medio`/`dificil`).

use serde::{Deserialize, Serialize};

/// Where a food item is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StorageBucket {
    #[default]
    #[serde(rename = "nevera")]
    Refrigerator,
    #[serde(rename = "arcon")]
    Freezer,
    #[serde(rename = "despensa")]
    Pantry,
}

impl StorageBucket {
    /// All buckets in display order.
    pub const ALL: [Self; 3] = [Self::Refrigerator, Self::Freezer, Self::Pantry];

    /// Value stored in the backend's `almacenamiento` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Refrigerator => "nevera",
            Self::Freezer => "arcon",
            Self::Pantry => "despensa",
        }
    }

    /// Human-readable name used in notification text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Refrigerator => "refrigerator",
            Self::Freezer => "freezer",
            Self::Pantry => "pantry",
        }
    }
}

impl std::fmt::Display for StorageBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StorageBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nevera" | "refrigerator" | "fridge" => Ok(Self::Refrigerator),
            "arcon" | "arcón" | "freezer" => Ok(Self::Freezer),
            "despensa" | "pantry" => Ok(Self::Pantry),
            other => Err(format!("invalid storage bucket: {other}")),
        }
    }
}

/// Recipe difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "facil")]
    Easy,
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "dificil")]
    Hard,
}

impl Difficulty {
    /// Value stored in the backend's `nivel` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "facil",
            Self::Medium => "medio",
            Self::Hard => "dificil",
        }
    }

    /// Display label shown on recipe cards and the difficulty filter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Fácil",
            Self::Medium => "Medio",
            Self::Hard => "Difícil",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facil" | "fácil" | "easy" => Ok(Self::Easy),
            "medio" | "medium" => Ok(Self::Medium),
            "dificil" | "difícil" | "hard" => Ok(Self::Hard),
            other => Err(format!("invalid difficulty: {other}")),
        }
    }
}
