//! Controller configuration.
//!
//! Read once at startup from a YAML file and passed by reference to
//! whatever needs it. Every section starts from its `Default` and fields
//! present in the file override it, so a partial section is still fully
//! populated (`nfs.enabled` is `true` unless the file says otherwise).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error};

use crate::ipv4::{Ipv4Error, LeaseRange};
use crate::split::split_valid_paths;

/// Well-known location of the controller configuration.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/warewulf/warewulf.conf";

/// Environment variable that overrides [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_ENV: &str = "VNFSCTL_CONFIG";

/// Path of the configuration file: `$VNFSCTL_CONFIG` if set, else the default.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConf {
    pub comment: String,
    pub ipaddr: String,
    pub netmask: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fqdn: String,
    #[serde(deserialize_with = "section")]
    pub warewulf: WarewulfConf,
    #[serde(deserialize_with = "section")]
    pub dhcp: DhcpConf,
    #[serde(deserialize_with = "section")]
    pub tftp: TftpConf,
    #[serde(deserialize_with = "section")]
    pub nfs: NfsConf,
}

/// A section written as a bare key (`nfs:`) is null in YAML; treat it as absent.
fn section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Core provisioning service settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarewulfConf {
    pub port: u16,
    pub secure: bool,
    #[serde(rename = "update interval")]
    pub update_interval: u32,
    #[serde(rename = "autobuild overlays")]
    pub autobuild_overlays: bool,
    pub syslog: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DhcpConf {
    pub enabled: bool,
    pub template: String,
    #[serde(rename = "range start")]
    pub range_start: String,
    #[serde(rename = "range end")]
    pub range_end: String,
    #[serde(rename = "systemd name")]
    pub systemd_name: String,
    #[serde(rename = "config file")]
    pub config_file: String,
}

impl DhcpConf {
    /// The lease pool described by `range start` / `range end`.
    pub fn lease_range(&self) -> Result<LeaseRange, Ipv4Error> {
        LeaseRange::parse(&self.range_start, &self.range_end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TftpConf {
    pub enabled: bool,
    pub tftproot: String,
    #[serde(rename = "systemd name")]
    pub systemd_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfsConf {
    pub enabled: bool,
    pub exports: Vec<String>,
    #[serde(rename = "exports extended")]
    pub exports_extended: Vec<NfsExportConf>,
    #[serde(rename = "systemd name")]
    pub systemd_name: String,
}

impl Default for NfsConf {
    fn default() -> Self {
        Self {
            enabled: true,
            exports: Vec::new(),
            exports_extended: Vec::new(),
            systemd_name: String::new(),
        }
    }
}

/// An NFS export with explicit options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfsExportConf {
    pub path: String,
    pub options: String,
    pub mount: bool,
}

impl ControllerConf {
    /// Parse a configuration document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document is a valid, all-default configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse controller configuration")
    }

    /// Load configuration from `path`. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load configuration for tools that can run without it.
    ///
    /// A missing or unreadable file is logged and yields `None`.
    pub fn load_optional(path: &Path) -> Option<Self> {
        if !path.is_file() {
            error!("Configuration file not found: {}", path.display());
            return None;
        }
        match Self::load(path) {
            Ok(conf) => Some(conf),
            Err(e) => {
                error!("{:#}", e);
                None
            }
        }
    }

    /// All exported paths: plain exports first, then extended ones.
    ///
    /// A plain entry may list several comma-separated paths; commas that are
    /// part of an existing path name do not split it.
    pub fn nfs_export_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .nfs
            .exports
            .iter()
            .flat_map(|entry| split_valid_paths(entry, ','))
            .collect();
        paths.extend(
            self.nfs
                .exports_extended
                .iter()
                .filter(|export| !export.path.is_empty())
                .map(|export| export.path.clone()),
        );
        paths
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  ipaddr: {}", self.ipaddr);
        println!("  netmask: {}", self.netmask);
        if !self.network.is_empty() {
            println!("  network: {}", self.network);
        }
        if !self.fqdn.is_empty() {
            println!("  fqdn: {}", self.fqdn);
        }
        println!("  warewulf:");
        println!("    port: {}", self.warewulf.port);
        println!("    secure: {}", self.warewulf.secure);
        println!("    update interval: {}", self.warewulf.update_interval);
        println!("    autobuild overlays: {}", self.warewulf.autobuild_overlays);
        println!("    syslog: {}", self.warewulf.syslog);
        println!("  dhcp:");
        println!("    enabled: {}", self.dhcp.enabled);
        println!("    range: {} - {}", self.dhcp.range_start, self.dhcp.range_end);
        println!("    systemd name: {}", self.dhcp.systemd_name);
        println!("  tftp:");
        println!("    enabled: {}", self.tftp.enabled);
        println!("    tftproot: {}", self.tftp.tftproot);
        println!("  nfs:");
        println!("    enabled: {}", self.nfs.enabled);
        for path in self.nfs_export_paths() {
            println!("    export: {}", path);
        }
    }
}
