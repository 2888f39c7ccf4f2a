use std::path::Path;
use log::warn;
use crate::platform::Platform;
use crate::program::{DlcEntry, Program};

/// An installation the external scanner still sees, identifying a program
/// that is allowed to stay registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownProgram {
    pub platform: Platform,
    pub id: String,
    pub name: String,
}

impl KnownProgram {
    pub fn new(platform: Platform, id: &str, name: &str) -> Self {
        KnownProgram {
            platform,
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// The collection of all live programs.
///
/// Owned by the caller and passed by reference to collaborators; there is no
/// process-wide instance. Mutation is limited to registration (append) and
/// validation (removal) — an installation that changed on disk re-enters
/// through the scanner as a fresh program.
///
/// No internal synchronization: concurrent callers must serialize access, and
/// read paths that may race a validation pass should iterate a [`snapshot`]
/// instead of borrowing the live collection.
///
/// [`snapshot`]: Registry::snapshot
#[derive(Debug, Clone, Default)]
pub struct Registry {
    programs: Vec<Program>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { programs: Vec::new() }
    }

    /// Appends a program, refusing a second registration of the same
    /// `(platform, id)` so the composite key stays unique.
    pub fn register(&mut self, program: Program) {
        if self.find(program.platform, &program.id).is_some() {
            warn!(
                "Ignoring duplicate registration of {}:{} ({})",
                program.platform, program.id, program.name
            );
            return;
        }
        self.programs.push(program);
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Iterates the live collection in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter()
    }

    /// Defensive copy of the current collection, safe to iterate while a
    /// validation pass mutates the registry.
    pub fn snapshot(&self) -> Vec<Program> {
        self.programs.clone()
    }

    /// All programs with at least one DLC selected, from a snapshot.
    pub fn all_enabled(&self) -> Vec<Program> {
        self.snapshot().into_iter().filter(|program| program.enabled).collect()
    }

    pub fn find(&self, platform: Platform, id: &str) -> Option<&Program> {
        self.programs
            .iter()
            .find(|program| program.platform == platform && program.id == id)
    }

    pub fn find_mut(&mut self, platform: Platform, id: &str) -> Option<&mut Program> {
        self.programs
            .iter_mut()
            .find(|program| program.platform == platform && program.id == id)
    }

    /// Resolves a DLC id to the first program of the given platform whose
    /// catalog contains it, in registration order.
    ///
    /// Catalogs are expected to keep DLC ids unique per platform upstream; if
    /// an id is ever duplicated across programs, only the first hit is
    /// returned.
    pub fn dlc_from_platform_id(&self, platform: Platform, dlc_id: &str) -> Option<(&str, &DlcEntry)> {
        self.programs
            .iter()
            .filter(|program| program.platform == platform)
            .find_map(|program| program.all_dlc.get(dlc_id).map(|entry| (program.id.as_str(), entry)))
    }

    /// Validates a single program, removing it when the blocklist predicate
    /// matches, its root directory is gone, or no DLL directory survives
    /// pruning. Returns whether the program is still registered afterwards.
    pub fn validate<B>(&mut self, platform: Platform, id: &str, is_blocked: B) -> bool
    where
        B: Fn(&str, &Path) -> bool,
    {
        let Some(index) = self
            .programs
            .iter()
            .position(|program| program.platform == platform && program.id == id)
        else {
            return false;
        };
        if self.programs[index].validate_with(&is_blocked) {
            true
        } else {
            self.programs.remove(index);
            false
        }
    }

    /// Like [`Self::validate`], but first removes the program when the
    /// scanner's allow-list has no matching `(platform, id)` entry.
    pub fn validate_known<B>(&mut self, platform: Platform, id: &str, known: &[KnownProgram], is_blocked: B) -> bool
    where
        B: Fn(&str, &Path) -> bool,
    {
        if !known.iter().any(|k| k.platform == platform && k.id == id) {
            if let Some(index) = self
                .programs
                .iter()
                .position(|program| program.platform == platform && program.id == id)
            {
                self.programs.remove(index);
            }
            return false;
        }
        self.validate(platform, id, is_blocked)
    }

    /// Validates every registered program in one pass.
    pub fn validate_all<B>(&mut self, is_blocked: B)
    where
        B: Fn(&str, &Path) -> bool,
    {
        self.programs.retain_mut(|program| program.validate_with(&is_blocked));
    }

    /// Validates every registered program against the scanner's allow-list.
    pub fn validate_all_known<B>(&mut self, known: &[KnownProgram], is_blocked: B)
    where
        B: Fn(&str, &Path) -> bool,
    {
        self.programs.retain_mut(|program| {
            known
                .iter()
                .any(|k| k.platform == program.platform && k.id == program.id)
                && program.validate_with(&is_blocked)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DlcType;
    use crate::program::DlcEntry;
    use std::fs;
    use tempfile::tempdir;

    fn never_blocked(_name: &str, _root: &Path) -> bool {
        false
    }

    fn program_with_dlc(platform: Platform, id: &str, dlc_id: &str) -> Program {
        let mut program = Program::new(platform, id, &format!("Game {}", id), "/nonexistent");
        program
            .all_dlc
            .insert(dlc_id.to_string(), DlcEntry::new(DlcType::Steam, &format!("DLC {}", dlc_id), ""));
        program
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = Registry::new();
        registry.register(program_with_dlc(Platform::Steam, "10", "100"));
        assert_eq!(registry.len(), 1);
        assert!(registry.find(Platform::Steam, "10").is_some());
        assert!(registry.find(Platform::Epic, "10").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_refused() {
        let mut registry = Registry::new();
        registry.register(program_with_dlc(Platform::Steam, "10", "100"));
        registry.register(program_with_dlc(Platform::Steam, "10", "200"));
        assert_eq!(registry.len(), 1);
        // first registration wins
        assert!(registry.find(Platform::Steam, "10").unwrap().all_dlc.contains_key("100"));
    }

    #[test]
    fn test_all_enabled_filters_snapshot() {
        let mut registry = Registry::new();
        registry.register(program_with_dlc(Platform::Steam, "10", "100"));
        registry.register(program_with_dlc(Platform::Steam, "20", "200"));
        registry.find_mut(Platform::Steam, "20").unwrap().toggle_dlc("200", true);

        let enabled = registry.all_enabled();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].id, "20");
    }

    #[test]
    fn test_dlc_from_platform_id_first_match() {
        let mut registry = Registry::new();
        registry.register(program_with_dlc(Platform::Steam, "10", "100"));
        registry.register(program_with_dlc(Platform::Steam, "20", "100"));

        let (program_id, entry) = registry.dlc_from_platform_id(Platform::Steam, "100").unwrap();
        assert_eq!(program_id, "10");
        assert_eq!(entry.name, "DLC 100");
    }

    #[test]
    fn test_dlc_from_platform_id_not_found() {
        let mut registry = Registry::new();
        registry.register(program_with_dlc(Platform::Steam, "10", "100"));
        assert!(registry.dlc_from_platform_id(Platform::Steam, "999").is_none());
        assert!(registry.dlc_from_platform_id(Platform::Epic, "100").is_none());
    }

    #[test]
    fn test_validate_removes_missing_root() {
        let mut registry = Registry::new();
        registry.register(program_with_dlc(Platform::Steam, "10", "100"));
        assert!(!registry.validate(Platform::Steam, "10", never_blocked));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_validate_keeps_intact_installation() {
        let dir = tempdir().unwrap();
        let dll_dir = dir.path().join("bin");
        fs::create_dir_all(&dll_dir).unwrap();

        let mut program = Program::new(Platform::Steam, "10", "Spacewar", dir.path());
        program.dll_directories.push(dll_dir.clone());
        let mut registry = Registry::new();
        registry.register(program);

        assert!(registry.validate(Platform::Steam, "10", never_blocked));
        assert_eq!(registry.find(Platform::Steam, "10").unwrap().dll_directories, vec![dll_dir]);
    }

    #[test]
    fn test_validate_prunes_vanished_dll_directories() {
        let dir = tempdir().unwrap();
        let kept = dir.path().join("bin");
        fs::create_dir_all(&kept).unwrap();

        let mut program = Program::new(Platform::Steam, "10", "Spacewar", dir.path());
        program.dll_directories.push(dir.path().join("gone"));
        program.dll_directories.push(kept.clone());
        let mut registry = Registry::new();
        registry.register(program);

        assert!(registry.validate(Platform::Steam, "10", never_blocked));
        assert_eq!(registry.find(Platform::Steam, "10").unwrap().dll_directories, vec![kept]);
    }

    #[test]
    fn test_validate_removes_program_with_no_dll_directories() {
        let dir = tempdir().unwrap();
        let mut program = Program::new(Platform::Steam, "10", "Spacewar", dir.path());
        program.dll_directories.push(dir.path().join("gone"));
        let mut registry = Registry::new();
        registry.register(program);

        assert!(!registry.validate(Platform::Steam, "10", never_blocked));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_validate_respects_blocklist() {
        let dir = tempdir().unwrap();
        let dll_dir = dir.path().join("bin");
        fs::create_dir_all(&dll_dir).unwrap();
        let mut program = Program::new(Platform::Steam, "10", "Spacewar", dir.path());
        program.dll_directories.push(dll_dir);
        let mut registry = Registry::new();
        registry.register(program);

        assert!(!registry.validate(Platform::Steam, "10", |name, _| name == "Spacewar"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_validate_known_removes_unlisted_even_if_intact() {
        let dir = tempdir().unwrap();
        let dll_dir = dir.path().join("bin");
        fs::create_dir_all(&dll_dir).unwrap();
        let mut program = Program::new(Platform::Steam, "10", "Spacewar", dir.path());
        program.dll_directories.push(dll_dir);
        let mut registry = Registry::new();
        registry.register(program);

        let known = vec![KnownProgram::new(Platform::Steam, "20", "Other")];
        assert!(!registry.validate_known(Platform::Steam, "10", &known, never_blocked));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_validate_all_known_keeps_listed_programs() {
        let dir = tempdir().unwrap();
        let dll_dir = dir.path().join("bin");
        fs::create_dir_all(&dll_dir).unwrap();

        let mut listed = Program::new(Platform::Steam, "10", "Spacewar", dir.path());
        listed.dll_directories.push(dll_dir.clone());
        let mut unlisted = Program::new(Platform::Steam, "20", "Delisted", dir.path());
        unlisted.dll_directories.push(dll_dir);

        let mut registry = Registry::new();
        registry.register(listed);
        registry.register(unlisted);

        let known = vec![KnownProgram::new(Platform::Steam, "10", "Spacewar")];
        registry.validate_all_known(&known, never_blocked);
        assert_eq!(registry.len(), 1);
        assert!(registry.find(Platform::Steam, "10").is_some());
    }

    #[test]
    fn test_validate_all_removes_every_stale_program() {
        let mut registry = Registry::new();
        registry.register(program_with_dlc(Platform::Steam, "10", "100"));
        registry.register(program_with_dlc(Platform::Epic, "abc", "200"));
        registry.validate_all(never_blocked);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_is_independent_of_validation() {
        let mut registry = Registry::new();
        registry.register(program_with_dlc(Platform::Steam, "10", "100"));
        let snapshot = registry.snapshot();
        registry.validate_all(never_blocked);
        assert!(registry.is_empty());
        assert_eq!(snapshot.len(), 1);
    }
}
