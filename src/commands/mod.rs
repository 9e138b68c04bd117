//! CLI command handlers.
//!
//! Each submodule handles a group of CLI commands:
//! - `sync` - regenerate VNFS trees, report staleness
//! - `net` - token splitting and IPv4 lease arithmetic
//! - `show` - display configuration
//! - `service` - start configured system services

pub mod net;
pub mod service;
pub mod show;
pub mod sync;

pub use net::{cmd_ip, cmd_leases, cmd_split};
pub use service::cmd_service;
pub use show::cmd_show;
pub use sync::{cmd_status, cmd_sync};
