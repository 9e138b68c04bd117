//! Show command - displays configuration.

use anyhow::Result;

use crate::config::ControllerConf;

/// Show target for the show command.
pub enum ShowTarget {
    /// Human-readable configuration
    Config,
    /// Configuration as JSON
    ConfigJson,
    /// Resolved NFS export paths
    Exports,
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &ControllerConf) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::ConfigJson => println!("{}", serde_json::to_string_pretty(config)?),
        ShowTarget::Exports => {
            if !config.nfs.enabled {
                println!("NFS is disabled");
            }
            for path in config.nfs_export_paths() {
                println!("{}", path);
            }
        }
    }
    Ok(())
}
