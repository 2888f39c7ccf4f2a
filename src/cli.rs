use clap::{Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    #[command(subcommand)]
    pub(crate) command: DlckitCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum DlckitCommand {
    /// Scans launcher installs and lists every discovered program
    Scan,
    /// Lists discovered programs with their persisted DLC selections
    List {
        /// Also show each program's DLC catalog and directories
        #[clap(short, long)]
        verbose: bool,
    },
    /// Selects a DLC for a program and persists the choice
    Toggle {
        /// Platform the program belongs to: steam, epic, ubisoft, paradox
        platform: String,
        /// Platform-scoped program id
        id: String,
        /// DLC id to toggle
        dlc_id: String,
        /// Deselect instead of select
        #[clap(long)]
        off: bool,
    },
    /// Reports whether unlocker files of a program are in use by a running process
    Locks {
        platform: String,
        id: String,
    },
    /// Re-validates every discovered program and reports removals
    Validate,
    /// Outputs the root, DLL and executable directories of a program
    Which {
        platform: String,
        id: String,
    },
}
