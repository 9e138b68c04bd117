//! Value helpers exposed on the command line: splitting and address math.

use anyhow::{Context, Result};

use crate::config::ControllerConf;
use crate::ipv4;
use crate::split::Delimiters;

/// Execute the split command, printing one token per line.
pub fn cmd_split(input: &str, delim: &str, escape: &str, paths: bool) -> Result<()> {
    let delimiters = Delimiters::new(delim, escape)?;
    let tokens = if paths {
        delimiters.split_valid_paths(input)
    } else {
        delimiters.split(input)
    };
    for token in tokens {
        println!("{}", token);
    }
    Ok(())
}

/// Execute the ip command.
pub fn cmd_ip(base: &str, offset: u32) -> Result<()> {
    println!("{}", ipv4::increment_ipv4(base, offset)?);
    Ok(())
}

/// Execute the leases command: list the DHCP pool, or its first `limit` addresses.
pub fn cmd_leases(config: &ControllerConf, limit: Option<usize>) -> Result<()> {
    let range = config
        .dhcp
        .lease_range()
        .context("Invalid DHCP range in configuration")?;
    println!(
        "DHCP range {} - {} ({} addresses)",
        range.start(),
        range.end(),
        range.len()
    );
    for addr in range.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("  {}", addr);
    }
    Ok(())
}
