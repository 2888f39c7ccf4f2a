use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::components::{component_paths, UnlockerKind};
use crate::locks::is_any_file_locked;
use crate::platform::{BinaryType, DlcType, Platform};

/// Proxy DLL name Koaloader hijacks when no other name is configured.
pub const DEFAULT_KOALOADER_PROXY: &str = "version";

/// Identifier-ordered DLC catalog, keyed by the platform-scoped DLC id.
pub type DlcMap = BTreeMap<String, DlcEntry>;

/// A single downloadable-content entry as the store describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DlcEntry {
    pub kind: DlcType,
    pub name: String,
    pub icon: String,
}

impl DlcEntry {
    pub fn new(kind: DlcType, name: &str, icon: &str) -> Self {
        DlcEntry {
            kind,
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// DLC belonging to one game hosted inside a multi-game launcher.
///
/// Only Paradox programs carry these; the launcher itself is the registered
/// program and each hosted game contributes its own catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubProgramDlc {
    pub id: String,
    pub name: String,
    pub dlc: DlcMap,
}

/// One installed game/application reachable through a specific platform.
///
/// Programs are meant to live inside a [`Registry`](crate::registry::Registry);
/// validation removes them from it outright instead of flagging them, and a
/// changed installation is represented by removal and re-discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub platform: Platform,
    /// Platform-scoped identifier; `(platform, id)` is the composite key.
    pub id: String,
    pub name: String,
    /// Installation root; the program is only valid while this exists.
    pub root_directory: PathBuf,
    /// Subdirectories containing launchable binaries, with their word size.
    pub executable_directories: Vec<(PathBuf, BinaryType)>,
    /// Directories unlocker files are written to and probed in.
    pub dll_directories: Vec<PathBuf>,
    /// Derived: at least one DLC (own or extra) is currently selected.
    pub enabled: bool,
    pub koaloader: bool,
    pub koaloader_proxy: Option<String>,
    pub all_dlc: DlcMap,
    pub selected_dlc: DlcMap,
    pub extra_dlc: Vec<SubProgramDlc>,
    pub extra_selected_dlc: Vec<SubProgramDlc>,
}

impl Program {
    pub fn new<P: AsRef<Path>>(platform: Platform, id: &str, name: &str, root_directory: P) -> Self {
        Program {
            platform,
            id: id.to_string(),
            name: name.to_string(),
            root_directory: root_directory.as_ref().to_path_buf(),
            executable_directories: Vec::new(),
            dll_directories: Vec::new(),
            enabled: false,
            koaloader: false,
            koaloader_proxy: None,
            all_dlc: DlcMap::new(),
            selected_dlc: DlcMap::new(),
            extra_dlc: Vec::new(),
            extra_selected_dlc: Vec::new(),
        }
    }

    /// Selects or deselects a DLC entry by id.
    ///
    /// An id not present in `all_dlc` is ignored: the caller may hold stale
    /// UI state and that must never surface as an error. Deselecting an
    /// already-deselected id is equally harmless. `enabled` is recomputed
    /// after every call.
    pub fn toggle_dlc(&mut self, dlc_id: &str, enabled: bool) {
        if let Some(entry) = self.all_dlc.get(dlc_id) {
            if enabled {
                self.selected_dlc.insert(dlc_id.to_string(), entry.clone());
            } else {
                self.selected_dlc.remove(dlc_id);
            }
        }
        self.refresh_enabled();
    }

    /// Selects a DLC of one of the launcher's hosted sub-programs.
    ///
    /// Unknown sub-program or DLC ids are ignored, like [`Self::toggle_dlc`].
    pub fn select_extra_dlc(&mut self, sub_id: &str, dlc_id: &str) {
        let entry = self
            .extra_dlc
            .iter()
            .find(|sub| sub.id == sub_id)
            .and_then(|sub| sub.dlc.get(dlc_id).map(|e| (sub.name.clone(), e.clone())));
        if let Some((sub_name, entry)) = entry {
            match self.extra_selected_dlc.iter_mut().find(|sub| sub.id == sub_id) {
                Some(selected) => {
                    selected.dlc.insert(dlc_id.to_string(), entry);
                }
                None => {
                    let mut dlc = DlcMap::new();
                    dlc.insert(dlc_id.to_string(), entry);
                    self.extra_selected_dlc.push(SubProgramDlc {
                        id: sub_id.to_string(),
                        name: sub_name,
                        dlc,
                    });
                }
            }
        }
        self.refresh_enabled();
    }

    /// Deselects a sub-program DLC; drops the sub-program's selection entry
    /// entirely once its map empties.
    pub fn deselect_extra_dlc(&mut self, sub_id: &str, dlc_id: &str) {
        if let Some(selected) = self.extra_selected_dlc.iter_mut().find(|sub| sub.id == sub_id) {
            selected.dlc.remove(dlc_id);
        }
        self.extra_selected_dlc.retain(|sub| !sub.dlc.is_empty());
        self.refresh_enabled();
    }

    fn refresh_enabled(&mut self) {
        self.enabled = !self.selected_dlc.is_empty() || !self.extra_selected_dlc.is_empty();
    }

    /// The proxy DLL name Koaloader should hijack for this program.
    pub fn koaloader_proxy_name(&self) -> &str {
        self.koaloader_proxy.as_deref().unwrap_or(DEFAULT_KOALOADER_PROXY)
    }

    /// Probes every applicable unlocker path under every DLL directory and
    /// reports whether any is held by a running process.
    ///
    /// Computed on demand and never cached; returns true on the first locked
    /// path found.
    pub fn are_dlls_locked(&self) -> bool {
        for directory in &self.dll_directories {
            for kind in UnlockerKind::for_platform(self.platform) {
                if is_any_file_locked(component_paths(*kind, directory)) {
                    return true;
                }
            }
        }
        false
    }

    /// Checks the installation against disk and the blocklist predicate,
    /// pruning DLL directories that vanished.
    ///
    /// Returns false when the program should be removed from its registry:
    /// blocked, root directory gone, or no DLL directory left.
    pub(crate) fn validate_with<B>(&mut self, is_blocked: &B) -> bool
    where
        B: Fn(&str, &Path) -> bool,
    {
        if is_blocked(&self.name, &self.root_directory) {
            return false;
        }
        if !self.root_directory.is_dir() {
            return false;
        }
        self.dll_directories.retain(|directory| directory.is_dir());
        !self.dll_directories.is_empty()
    }
}
