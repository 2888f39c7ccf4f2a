use std::path::{Path, PathBuf};
use crate::platform::Platform;

/// One of the known unlocker-API file sets.
///
/// Each kind names the fixed set of files the corresponding shim drops into a
/// game's DLL directory: a 32- and a 64-bit library, the `_o` backups of the
/// originals, a configuration file, and for some kinds extra files predating
/// or extending that convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnlockerKind {
    CreamApi,
    SmokeApi,
    ScreamApi,
    UplayR1,
    UplayR2,
}

impl UnlockerKind {
    /// The unlocker variants that apply to programs of the given platform.
    ///
    /// Paradox hosts both Steam and Epic games, so all of the Steam-facing
    /// and Epic-facing variants apply to it.
    pub fn for_platform(platform: Platform) -> &'static [UnlockerKind] {
        match platform {
            Platform::Steam => &[UnlockerKind::CreamApi, UnlockerKind::SmokeApi],
            Platform::Epic => &[UnlockerKind::ScreamApi],
            Platform::Paradox => &[UnlockerKind::CreamApi, UnlockerKind::SmokeApi, UnlockerKind::ScreamApi],
            Platform::Ubisoft => &[UnlockerKind::UplayR1, UnlockerKind::UplayR2],
            Platform::None => &[],
        }
    }

    /// File names this unlocker touches, relative to a DLL directory.
    pub fn file_names(self) -> &'static [&'static str] {
        match self {
            UnlockerKind::CreamApi => &[
                "steam_api.dll",
                "steam_api_o.dll",
                "steam_api64.dll",
                "steam_api64_o.dll",
                "cream_api.ini",
            ],
            UnlockerKind::SmokeApi => &[
                "steam_api.dll",
                "steam_api_o.dll",
                "steam_api64.dll",
                "steam_api64_o.dll",
                "SmokeAPI.config.json",
                "SmokeAPI.cache.json",
            ],
            UnlockerKind::ScreamApi => &[
                "EOSSDK-Win32-Shipping.dll",
                "EOSSDK-Win32-Shipping_o.dll",
                "EOSSDK-Win64-Shipping.dll",
                "EOSSDK-Win64-Shipping_o.dll",
                "ScreamAPI.json",
            ],
            UnlockerKind::UplayR1 => &[
                "uplay_r1_loader.dll",
                "uplay_r1_loader_o.dll",
                "uplay_r1_loader64.dll",
                "uplay_r1_loader64_o.dll",
                "UplayR1Unlocker.jsonc",
            ],
            // The R2 loader was renamed from uplay_ to upc_; the legacy names
            // come first and have no _o backups.
            UnlockerKind::UplayR2 => &[
                "uplay_r2_loader.dll",
                "uplay_r2_loader64.dll",
                "upc_r2_loader.dll",
                "upc_r2_loader_o.dll",
                "upc_r2_loader64.dll",
                "upc_r2_loader64_o.dll",
                "UplayR2Unlocker.jsonc",
            ],
        }
    }
}

/// Resolves the full candidate paths for an unlocker variant inside `directory`.
///
/// Pure path construction; nothing here touches the filesystem.
pub fn component_paths<P: AsRef<Path>>(kind: UnlockerKind, directory: P) -> Vec<PathBuf> {
    let directory = directory.as_ref();
    kind.file_names().iter().map(|name| directory.join(name)).collect()
}

/// Shipped SDK library names a platform's games carry next to their binaries.
///
/// The scanner treats any directory under an install root containing one of
/// these as a DLL directory worth probing and patching.
pub fn runtime_library_names(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Steam => &["steam_api.dll", "steam_api64.dll"],
        Platform::Epic => &["EOSSDK-Win32-Shipping.dll", "EOSSDK-Win64-Shipping.dll"],
        Platform::Paradox => &[
            "steam_api.dll",
            "steam_api64.dll",
            "EOSSDK-Win32-Shipping.dll",
            "EOSSDK-Win64-Shipping.dll",
        ],
        Platform::Ubisoft => &[
            "uplay_r1_loader.dll",
            "uplay_r1_loader64.dll",
            "uplay_r2_loader.dll",
            "uplay_r2_loader64.dll",
            "upc_r2_loader.dll",
            "upc_r2_loader64.dll",
        ],
        Platform::None => &[],
    }
}
