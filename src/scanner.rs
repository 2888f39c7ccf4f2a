use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use directories::BaseDirs;
use log::warn;
use regex::Regex;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::binary::binary_type;
use crate::components::runtime_library_names;
use crate::platform::{BinaryType, Platform};
use crate::program::Program;
use crate::registry::KnownProgram;

/// Discovers installed programs across every scannable platform.
///
/// A platform whose scan fails is logged and skipped; one broken launcher
/// install must not hide the others. Paradox is not scanned here — its
/// catalog only exists in launcher store data that the network layer
/// supplies.
///
/// Scanned programs carry their directories but an empty DLC catalog; store
/// metadata is populated by external collaborators.
pub fn scan_all() -> Vec<Program> {
    let mut programs = Vec::new();
    for (platform, result) in [
        (Platform::Steam, scan_steam()),
        (Platform::Epic, scan_epic()),
        (Platform::Ubisoft, scan_ubisoft()),
    ] {
        match result {
            Ok(found) => programs.extend(found),
            Err(err) => warn!("{} scan failed: {:#}", platform, err),
        }
    }
    programs
}

/// Derives the allow-list triples for registry validation from a scan result.
pub fn known_programs(programs: &[Program]) -> Vec<KnownProgram> {
    programs
        .iter()
        .map(|program| KnownProgram::new(program.platform, &program.id, &program.name))
        .collect()
}

/// Scans every Steam library folder for installed apps.
pub fn scan_steam() -> Result<Vec<Program>> {
    let Some(root) = steam_root() else {
        return Ok(Vec::new());
    };
    let mut programs = Vec::new();
    for library in library_folders(&root) {
        let steamapps = library.join("steamapps");
        if !steamapps.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&steamapps)?.flatten() {
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !file_name.starts_with("appmanifest_") || !file_name.ends_with(".acf") {
                continue;
            }
            let Ok(manifest) = fs::read_to_string(&path) else {
                continue;
            };
            let Some((id, name, install_dir)) = parse_app_manifest(&manifest) else {
                continue;
            };
            let root_directory = steamapps.join("common").join(install_dir);
            if root_directory.is_dir() {
                programs.push(build_program(Platform::Steam, &id, &name, &root_directory));
            }
        }
    }
    Ok(programs)
}

/// Scans the Epic Games Launcher install manifests.
pub fn scan_epic() -> Result<Vec<Program>> {
    match epic_manifest_dir() {
        Some(dir) if dir.is_dir() => scan_epic_manifests(&dir),
        _ => Ok(Vec::new()),
    }
}

/// Scans the Ubisoft launcher's games directory.
pub fn scan_ubisoft() -> Result<Vec<Program>> {
    match ubisoft_games_dir() {
        Some(dir) if dir.is_dir() => scan_ubisoft_games(&dir),
        _ => Ok(Vec::new()),
    }
}

/// Builds a program skeleton for an install root: DLL directories holding the
/// platform's runtime libraries, executable directories with their word size.
pub fn build_program(platform: Platform, id: &str, name: &str, root_directory: &Path) -> Program {
    let mut program = Program::new(platform, id, name, root_directory);
    program.dll_directories = dll_directories(root_directory, platform);
    program.executable_directories = executable_directories(root_directory);
    program
}

/// Collects the directories under `root` containing one of the platform's
/// shipped SDK libraries, in walk order without duplicates.
pub fn dll_directories(root: &Path, platform: Platform) -> Vec<PathBuf> {
    let names = runtime_library_names(platform);
    let mut directories: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|file_name| names.iter().any(|n| n.eq_ignore_ascii_case(file_name)));
        if !matches {
            continue;
        }
        if let Some(parent) = entry.path().parent() {
            if !directories.iter().any(|d| d == parent) {
                directories.push(parent.to_path_buf());
            }
        }
    }
    directories
}

/// Collects the directories under `root` containing executables, annotated
/// with the word size of the first executable found in each.
pub fn executable_directories(root: &Path) -> Vec<(PathBuf, BinaryType)> {
    let mut directories: Vec<(PathBuf, BinaryType)> = Vec::new();
    for entry in WalkDir::new(root).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let is_exe = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
        if !is_exe {
            continue;
        }
        if let Some(parent) = entry.path().parent() {
            if !directories.iter().any(|(d, _)| d == parent) {
                directories.push((parent.to_path_buf(), binary_type(entry.path())));
            }
        }
    }
    directories
}

fn steam_root() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    #[cfg(windows)]
    {
        candidates.push(PathBuf::from(r"C:\Program Files (x86)\Steam"));
        candidates.push(PathBuf::from(r"C:\Program Files\Steam"));
    }
    if let Some(base) = BaseDirs::new() {
        let home = base.home_dir();
        candidates.push(home.join(".steam").join("steam"));
        candidates.push(home.join(".local").join("share").join("Steam"));
        candidates.push(home.join("Library").join("Application Support").join("Steam"));
    }
    candidates.into_iter().find(|path| path.is_dir())
}

/// The Steam root plus any extra library folders from `libraryfolders.vdf`.
fn library_folders(steam_root: &Path) -> Vec<PathBuf> {
    let mut folders = vec![steam_root.to_path_buf()];
    let vdf_path = steam_root.join("steamapps").join("libraryfolders.vdf");
    if let Ok(content) = fs::read_to_string(vdf_path) {
        let re = Regex::new(r#""path"\s+"(.+?)""#).unwrap();
        for cap in re.captures_iter(&content) {
            if let Some(m) = cap.get(1) {
                let path = PathBuf::from(m.as_str().replace("\\\\", "\\"));
                if !folders.contains(&path) {
                    folders.push(path);
                }
            }
        }
    }
    folders
}

fn parse_app_manifest(content: &str) -> Option<(String, String, String)> {
    let id = vdf_field(content, "appid")?;
    let name = vdf_field(content, "name")?;
    let install_dir = vdf_field(content, "installdir")?;
    Some((id, name, install_dir))
}

fn vdf_field(content: &str, key: &str) -> Option<String> {
    let re = Regex::new(&format!(r#""{}"\s+"(.+?)""#, key)).ok()?;
    re.captures(content)?.get(1).map(|m| m.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct EpicManifest {
    #[serde(rename = "CatalogItemId")]
    catalog_item_id: String,
    #[serde(rename = "DisplayName")]
    display_name: String,
    #[serde(rename = "InstallLocation")]
    install_location: String,
}

fn epic_manifest_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        Some(PathBuf::from(r"C:\ProgramData\Epic\EpicGamesLauncher\Data\Manifests"))
    }
    #[cfg(not(windows))]
    {
        None
    }
}

fn scan_epic_manifests(dir: &Path) -> Result<Vec<Program>> {
    let mut programs = Vec::new();
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let is_item = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("item"));
        if !is_item {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        let Ok(manifest) = serde_json::from_str::<EpicManifest>(&content) else {
            warn!("Skipping unreadable Epic manifest {}", path.display());
            continue;
        };
        let root_directory = PathBuf::from(&manifest.install_location);
        if root_directory.is_dir() {
            programs.push(build_program(
                Platform::Epic,
                &manifest.catalog_item_id,
                &manifest.display_name,
                &root_directory,
            ));
        }
    }
    Ok(programs)
}

fn ubisoft_games_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        Some(PathBuf::from(r"C:\Program Files (x86)\Ubisoft\Ubisoft Game Launcher\games"))
    }
    #[cfg(not(windows))]
    {
        None
    }
}

// The launcher keeps one child directory per installed game; the directory
// name doubles as the platform-scoped id.
fn scan_ubisoft_games(dir: &Path) -> Result<Vec<Program>> {
    let mut programs = Vec::new();
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        programs.push(build_program(Platform::Ubisoft, name, name, &path));
    }
    Ok(programs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const APP_MANIFEST: &str = r#"
"AppState"
{
    "appid"        "480"
    "name"         "Spacewar"
    "installdir"   "Spacewar"
}
"#;

    #[test]
    fn test_parse_app_manifest_fields() {
        let (id, name, install_dir) = parse_app_manifest(APP_MANIFEST).unwrap();
        assert_eq!(id, "480");
        assert_eq!(name, "Spacewar");
        assert_eq!(install_dir, "Spacewar");
    }

    #[test]
    fn test_parse_app_manifest_missing_field() {
        assert!(parse_app_manifest(r#""appid" "480""#).is_none());
    }

    #[test]
    fn test_library_folders_include_root_and_vdf_paths() {
        let dir = tempdir().unwrap();
        let steamapps = dir.path().join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        fs::write(
            steamapps.join("libraryfolders.vdf"),
            r#"
"libraryfolders"
{
    "0"
    {
        "path"    "/mnt/library"
    }
}
"#,
        )
        .unwrap();

        let folders = library_folders(dir.path());
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0], dir.path());
        assert_eq!(folders[1], PathBuf::from("/mnt/library"));
    }

    #[test]
    fn test_dll_directories_finds_runtime_libraries() {
        let dir = tempdir().unwrap();
        let bin = dir.path().join("bin");
        let other = dir.path().join("data");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir_all(&other).unwrap();
        fs::write(bin.join("steam_api64.dll"), b"stub").unwrap();
        fs::write(other.join("assets.pak"), b"stub").unwrap();

        let found = dll_directories(dir.path(), Platform::Steam);
        assert_eq!(found, vec![bin]);
    }

    #[test]
    fn test_dll_directories_deduplicates_parents() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("steam_api.dll"), b"stub").unwrap();
        fs::write(dir.path().join("steam_api64.dll"), b"stub").unwrap();

        let found = dll_directories(dir.path(), Platform::Steam);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_executable_directories_annotate_word_size() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("launcher.exe"), b"stub").unwrap();

        let found = executable_directories(dir.path());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, dir.path());
        assert_eq!(found[0].1, BinaryType::Unknown);
    }

    #[test]
    fn test_scan_epic_manifests_builds_programs() {
        let manifests = tempdir().unwrap();
        let install = tempdir().unwrap();
        fs::write(install.path().join("EOSSDK-Win64-Shipping.dll"), b"stub").unwrap();
        let item = format!(
            r#"{{"CatalogItemId": "abc123", "DisplayName": "Starfall", "InstallLocation": {}}}"#,
            serde_json::to_string(install.path().to_str().unwrap()).unwrap()
        );
        fs::write(manifests.path().join("abc123.item"), item).unwrap();
        fs::write(manifests.path().join("notes.txt"), "ignored").unwrap();

        let programs = scan_epic_manifests(manifests.path()).unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, "abc123");
        assert_eq!(programs[0].name, "Starfall");
        assert_eq!(programs[0].dll_directories, vec![install.path().to_path_buf()]);
    }

    #[test]
    fn test_scan_ubisoft_games_uses_directory_names() {
        let games = tempdir().unwrap();
        fs::create_dir_all(games.path().join("Far Star")).unwrap();
        fs::write(games.path().join("readme.txt"), "ignored").unwrap();

        let programs = scan_ubisoft_games(games.path()).unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, "Far Star");
        assert_eq!(programs[0].platform, Platform::Ubisoft);
    }

    #[test]
    fn test_known_programs_mirror_scan_result() {
        let dir = tempdir().unwrap();
        let programs = vec![build_program(Platform::Steam, "480", "Spacewar", dir.path())];
        let known = known_programs(&programs);
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].platform, Platform::Steam);
        assert_eq!(known[0].id, "480");
        assert_eq!(known[0].name, "Spacewar");
    }
}
