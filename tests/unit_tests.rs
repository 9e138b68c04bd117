//! Unit tests for vnfsctl value helpers and configuration.
//!
//! These exercise pure functions through the public API without touching
//! real provisioning paths.

mod helpers;

use helpers::TestEnv;
use std::fs;
use vnfsctl::config::ControllerConf;
use vnfsctl::ipv4::{increment_ipv4, Ipv4Error, LeaseRange};
use vnfsctl::split::{split_escaped, split_valid_paths, Delimiters, SplitError};

// =============================================================================
// split.rs tests
// =============================================================================

#[test]
fn test_split_escaped_delimiter() {
    assert_eq!(split_escaped("a\\,b,c", ',', '\\'), vec!["a,b", "c"]);
}

#[test]
fn test_split_single_character() {
    assert_eq!(split_escaped("x", ',', '\\'), vec!["x"]);
}

#[test]
fn test_split_preserves_order() {
    let tokens = split_escaped("/home,/opt,/srv/data", ',', '\\');
    assert_eq!(tokens, vec!["/home", "/opt", "/srv/data"]);
}

#[test]
fn test_split_valid_paths_with_comma_in_name() {
    let env = TestEnv::new();
    let odd = env.base_dir.join("exports/a,b");
    fs::create_dir_all(&odd).unwrap();
    let plain = env.base_dir.join("exports/c");
    fs::create_dir_all(&plain).unwrap();

    let input = format!("{},{}", odd.display(), plain.display());
    assert_eq!(
        split_valid_paths(&input, ','),
        vec![odd.display().to_string(), plain.display().to_string()]
    );

    // The generic splitter cuts inside the name.
    assert_eq!(split_escaped(&input, ',', '\\').len(), 3);
}

#[test]
fn test_split_rejects_multichar_delimiter() {
    assert!(matches!(
        Delimiters::new("::", "\\"),
        Err(SplitError::NotSingleChar { what: "delimiter", .. })
    ));
}

// =============================================================================
// ipv4.rs tests
// =============================================================================

#[test]
fn test_increment_ipv4() {
    assert_eq!(increment_ipv4("192.168.1.10", 5).unwrap(), "192.168.1.15");
    assert_eq!(increment_ipv4("192.168.1.250", 10).unwrap(), "192.168.2.4");
}

#[test]
fn test_increment_ipv4_errors() {
    assert!(matches!(
        increment_ipv4("192.168.1.x", 1),
        Err(Ipv4Error::Parse { .. })
    ));
    assert!(matches!(
        increment_ipv4("255.255.255.255", 1),
        Err(Ipv4Error::Overflow { .. })
    ));
}

#[test]
fn test_sequential_leases() {
    let range = LeaseRange::parse("192.168.1.250", "192.168.2.2").unwrap();
    let leases: Vec<String> = range.iter().map(|a| a.to_string()).collect();
    assert_eq!(
        leases,
        vec![
            "192.168.1.250",
            "192.168.1.251",
            "192.168.1.252",
            "192.168.1.253",
            "192.168.1.254",
            "192.168.1.255",
            "192.168.2.0",
            "192.168.2.1",
            "192.168.2.2",
        ]
    );
    for (i, lease) in leases.iter().enumerate() {
        assert_eq!(&increment_ipv4("192.168.1.250", i as u32).unwrap(), lease);
    }
}

// =============================================================================
// config.rs tests
// =============================================================================

#[test]
fn test_nfs_defaults_then_overlay() {
    let conf = ControllerConf::from_yaml("nfs: {}\n").unwrap();
    assert!(conf.nfs.enabled);
    assert!(conf.nfs.exports.is_empty());

    let conf = ControllerConf::from_yaml("nfs:\n  enabled: false\n").unwrap();
    assert!(!conf.nfs.enabled);
}

#[test]
fn test_config_round_trip_through_file() {
    let env = TestEnv::new();
    let path = env.base_dir.join("warewulf.conf");
    fs::write(
        &path,
        "ipaddr: 10.0.0.1\ndhcp:\n  enabled: true\n  range start: 10.0.0.100\n  range end: 10.0.0.199\n",
    )
    .unwrap();

    let conf = ControllerConf::load(&path).unwrap();
    assert!(conf.dhcp.enabled);
    assert_eq!(conf.dhcp.lease_range().unwrap().len(), 100);
    assert!(conf.nfs.enabled);
}

#[test]
fn test_missing_config_is_degraded_not_fatal() {
    let env = TestEnv::new();
    let path = env.base_dir.join("absent.conf");
    assert!(ControllerConf::load_optional(&path).is_none());
    assert!(ControllerConf::load(&path).is_err());
}
