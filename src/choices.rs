use std::path::{Path, PathBuf};
use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use crate::platform::Platform;
use crate::registry::Registry;

/// The DLC and Koaloader selections a user made, as persisted between runs.
///
/// Selections are stored by `(platform, id)` and DLC key only; they are
/// re-applied through [`toggle_dlc`](crate::program::Program::toggle_dlc), so
/// ids that no longer exist in a program's catalog vanish harmlessly instead
/// of corrupting state.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Choices {
    #[serde(default)]
    pub programs: Vec<ProgramChoice>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ProgramChoice {
    pub platform: Platform,
    pub id: String,
    #[serde(default)]
    pub selected_dlc: Vec<String>,
    #[serde(default)]
    pub koaloader: bool,
    #[serde(default)]
    pub koaloader_proxy: Option<String>,
}

impl Choices {
    /// Loads choices from `path`, falling back to empty choices when the file
    /// is absent or unreadable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        if path.as_ref().exists() {
            let content = std::fs::read_to_string(path).unwrap_or_default();
            toml::from_str(&content).unwrap_or_default()
        } else {
            Choices::default()
        }
    }

    /// Saves the choices to `path` in pretty TOML format, creating parent
    /// directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Records the current selections of every registered program that has
    /// anything worth persisting.
    pub fn capture(registry: &Registry) -> Self {
        let programs = registry
            .iter()
            .filter(|program| program.enabled || program.koaloader)
            .map(|program| ProgramChoice {
                platform: program.platform,
                id: program.id.clone(),
                selected_dlc: program.selected_dlc.keys().cloned().collect(),
                koaloader: program.koaloader,
                koaloader_proxy: program.koaloader_proxy.clone(),
            })
            .collect();
        Choices { programs }
    }

    /// Re-applies the persisted selections onto freshly scanned programs.
    ///
    /// Choices for programs no longer registered are skipped; stale DLC ids
    /// are dropped by the toggle's unknown-id rule.
    pub fn apply(&self, registry: &mut Registry) {
        for choice in &self.programs {
            if let Some(program) = registry.find_mut(choice.platform, &choice.id) {
                program.koaloader = choice.koaloader;
                program.koaloader_proxy = choice.koaloader_proxy.clone();
                for dlc_id in &choice.selected_dlc {
                    program.toggle_dlc(dlc_id, true);
                }
            }
        }
    }
}

/// Path of the choices file inside the user's config directory.
pub fn choices_file() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "dlckit", "dlckit")
        .ok_or_else(|| anyhow!("Could not get project directories"))?;
    Ok(proj_dirs.config_dir().join("choices.toml"))
}
