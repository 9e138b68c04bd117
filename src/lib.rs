//! vnfsctl library: keeps VNFS images and their provisioning configuration
//! in step with their sources.
//!
//! - [`sync`]: staleness detection and ownership-preserving tree copies
//! - [`rebuild`]: per-destination locking and rebuild orchestration
//! - [`split`], [`ipv4`]: value parsing used by configuration code
//! - [`config`]: the controller configuration file

pub mod commands;
pub mod common;
pub mod config;
pub mod ipv4;
pub mod process;
pub mod rebuild;
pub mod split;
pub mod sync;
pub mod timing;
