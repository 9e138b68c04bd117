//! Service command - (re)start the provisioning daemons named in the config.

use anyhow::{bail, Result};
use tracing::info;

use crate::config::ControllerConf;
use crate::process;

/// Which service to start.
pub enum ServiceTarget {
    Dhcp,
    Tftp,
    Nfs,
    /// A unit given by name on the command line
    Named(String),
}

/// Execute the service command.
pub fn cmd_service(target: ServiceTarget, config: &ControllerConf) -> Result<()> {
    let (enabled, name) = match target {
        ServiceTarget::Dhcp => (config.dhcp.enabled, config.dhcp.systemd_name.clone()),
        ServiceTarget::Tftp => (config.tftp.enabled, config.tftp.systemd_name.clone()),
        ServiceTarget::Nfs => (config.nfs.enabled, config.nfs.systemd_name.clone()),
        ServiceTarget::Named(name) => (true, name),
    };

    if !enabled {
        info!("Service {} is disabled in configuration, skipping", name);
        return Ok(());
    }
    if name.is_empty() {
        bail!("No systemd name configured for this service");
    }

    process::systemd_start(&name)
}
