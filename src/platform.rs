use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// The storefront/launcher family a program is reached through.
///
/// The platform decides which unlocker variants apply to a program's
/// directories and which DLC kinds its catalog can contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Not associated with any known launcher.
    #[default]
    None,
    /// Paradox Launcher, hosting one or more underlying games.
    Paradox,
    Steam,
    Epic,
    Ubisoft,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::None => "none",
            Platform::Paradox => "paradox",
            Platform::Steam => "steam",
            Platform::Epic => "epic",
            Platform::Ubisoft => "ubisoft",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Platform::None),
            "paradox" => Ok(Platform::Paradox),
            "steam" => Ok(Platform::Steam),
            "epic" => Ok(Platform::Epic),
            "ubisoft" | "uplay" => Ok(Platform::Ubisoft),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

/// How a DLC entry is identified on its store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DlcType {
    Steam,
    /// Steam DLC not listed on the store page (delisted or developer-only).
    SteamHidden,
    EpicCatalogItem,
    EpicEntitlement,
}

/// Word size of a launchable binary, read from its PE header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryType {
    #[default]
    Unknown,
    Bit32,
    Bit64,
}
