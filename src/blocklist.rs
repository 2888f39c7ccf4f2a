use std::path::Path;
use walkdir::WalkDir;

/// Games that must never be patched, by display name.
pub const PROTECTED_GAMES: &[&str] = &["PAYDAY 2"];

/// Anti-cheat directories whose presence marks an installation as unsafe to
/// touch.
pub const PROTECTED_DIRECTORIES: &[&str] = &["EasyAntiCheat", "BattlEye"];

/// Games that ship an anti-cheat directory but tolerate unlocker files in
/// their install anyway.
pub const PROTECTED_DIRECTORY_EXCEPTIONS: &[&str] = &["Arma 3"];

/// Decides whether an installation is off-limits for patching.
///
/// A program is blocked when its display name is on the protected list, or
/// when its installation contains an anti-cheat directory and the name is not
/// a known exception. Used as the predicate for registry validation.
pub fn is_game_blocked(name: &str, root_directory: &Path) -> bool {
    if PROTECTED_GAMES.iter().any(|game| game.eq_ignore_ascii_case(name)) {
        return true;
    }
    if PROTECTED_DIRECTORY_EXCEPTIONS.iter().any(|game| game.eq_ignore_ascii_case(name)) {
        return false;
    }
    WalkDir::new(root_directory)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_dir())
        .any(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|dir_name| PROTECTED_DIRECTORIES.iter().any(|p| p.eq_ignore_ascii_case(dir_name)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_protected_name_is_blocked() {
        let dir = tempdir().unwrap();
        assert!(is_game_blocked("PAYDAY 2", dir.path()));
        assert!(is_game_blocked("payday 2", dir.path()));
    }

    #[test]
    fn test_clean_installation_is_not_blocked() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        assert!(!is_game_blocked("Spacewar", dir.path()));
    }

    #[test]
    fn test_anti_cheat_directory_blocks() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("engine").join("EasyAntiCheat")).unwrap();
        assert!(is_game_blocked("Spacewar", dir.path()));
    }

    #[test]
    fn test_exception_overrides_anti_cheat_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("BattlEye")).unwrap();
        assert!(is_game_blocked("Spacewar", dir.path()));
        assert!(!is_game_blocked("Arma 3", dir.path()));
    }
}
