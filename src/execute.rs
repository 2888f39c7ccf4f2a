use anyhow::{bail, Result};
use colored::Colorize;
use dlckit::blocklist::is_game_blocked;
use dlckit::choices::{choices_file, Choices};
use dlckit::platform::{BinaryType, Platform};
use dlckit::registry::Registry;
use dlckit::scanner::{known_programs, scan_all};
use crate::cli::{DlckitCommand, CLI};

pub fn execute(cli: CLI) -> Result<()> {
    match cli.command {
        DlckitCommand::Scan => {
            execute_scan()
        }
        DlckitCommand::List { verbose } => {
            execute_list(verbose)
        }
        DlckitCommand::Toggle { platform, id, dlc_id, off } => {
            execute_toggle(&platform, &id, &dlc_id, !off)
        }
        DlckitCommand::Locks { platform, id } => {
            execute_locks(&platform, &id)
        }
        DlckitCommand::Validate => {
            execute_validate()
        }
        DlckitCommand::Which { platform, id } => {
            execute_which(&platform, &id)
        }
    }
}

/// Scans, validates against the blocklist, and re-applies persisted choices.
fn load_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    for program in scan_all() {
        registry.register(program);
    }
    registry.validate_all(is_game_blocked);
    let choices = Choices::load_or_default(choices_file()?);
    choices.apply(&mut registry);
    Ok(registry)
}

fn parse_platform(platform: &str) -> Result<Platform> {
    platform.parse::<Platform>().map_err(|e| anyhow::anyhow!(e))
}

pub fn execute_scan() -> Result<()> {
    let registry = load_registry()?;
    if registry.is_empty() {
        println!("No programs found");
        return Ok(());
    }
    for program in registry.iter() {
        println!(
            "{} {}: {}",
            program.platform.to_string().cyan(),
            program.id,
            program.name.bold()
        );
        println!("  root: {}", program.root_directory.display());
    }
    Ok(())
}

pub fn execute_list(verbose: bool) -> Result<()> {
    let registry = load_registry()?;
    if registry.is_empty() {
        println!("No programs found");
        return Ok(());
    }
    for program in registry.snapshot() {
        let state = match program.enabled {
            true => "enabled".green(),
            false => "disabled".dimmed(),
        };
        println!(
            "{} {}: {} [{}]",
            program.platform.to_string().cyan(),
            program.id,
            program.name.bold(),
            state
        );
        if verbose {
            for (dlc_id, entry) in &program.all_dlc {
                let mark = match program.selected_dlc.contains_key(dlc_id) {
                    true => "x",
                    false => " ",
                };
                println!("  [{}] {}: {}", mark, dlc_id, entry.name);
            }
            for directory in &program.dll_directories {
                println!("  dll: {}", directory.display());
            }
            if program.koaloader {
                println!("  koaloader proxy: {}", program.koaloader_proxy_name());
            }
        }
        println!();
    }
    Ok(())
}

pub fn execute_toggle(platform: &str, id: &str, dlc_id: &str, enabled: bool) -> Result<()> {
    let platform = parse_platform(platform)?;
    let mut registry = load_registry()?;
    let Some(program) = registry.find_mut(platform, id) else {
        bail!("Program not found: {}:{}", platform, id);
    };
    if !program.all_dlc.contains_key(dlc_id) {
        println!("{} has no DLC with id {}", program.name, dlc_id);
        return Ok(());
    }
    program.toggle_dlc(dlc_id, enabled);
    match enabled {
        true => println!("Selected {} for {}", dlc_id, program.name),
        false => println!("Deselected {} for {}", dlc_id, program.name),
    }
    Choices::capture(&registry).save(choices_file()?)?;
    Ok(())
}

pub fn execute_locks(platform: &str, id: &str) -> Result<()> {
    let platform = parse_platform(platform)?;
    let registry = load_registry()?;
    let Some(program) = registry.find(platform, id) else {
        bail!("Program not found: {}:{}", platform, id);
    };
    match program.are_dlls_locked() {
        true => println!("{} {}", program.name.bold(), "is in use; patching would clobber live files".red()),
        false => println!("{} {}", program.name.bold(), "is safe to patch".green()),
    }
    Ok(())
}

pub fn execute_validate() -> Result<()> {
    let mut registry = Registry::new();
    let scanned = scan_all();
    let known = known_programs(&scanned);
    for program in scanned {
        registry.register(program);
    }
    let before = registry.snapshot();
    registry.validate_all_known(&known, is_game_blocked);

    let mut removed = 0;
    for program in &before {
        if registry.find(program.platform, &program.id).is_none() {
            println!("{} {}:{} ({})", "removed".red(), program.platform, program.id, program.name);
            removed += 1;
        }
    }
    println!("{} programs valid, {} removed", registry.len(), removed);
    Ok(())
}

pub fn execute_which(platform: &str, id: &str) -> Result<()> {
    let platform = parse_platform(platform)?;
    let registry = load_registry()?;
    let Some(program) = registry.find(platform, id) else {
        bail!("Program not found: {}:{}", platform, id);
    };
    println!("root: {}", program.root_directory.display());
    for directory in &program.dll_directories {
        println!("dll:  {}", directory.display());
    }
    for (directory, binary_type) in &program.executable_directories {
        println!("exe:  {} ({})", directory.display(), binary_type_label(*binary_type));
    }
    Ok(())
}

fn binary_type_label(binary_type: BinaryType) -> &'static str {
    match binary_type {
        BinaryType::Bit32 => "32-bit",
        BinaryType::Bit64 => "64-bit",
        BinaryType::Unknown => "unknown",
    }
}
