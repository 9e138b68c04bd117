//! IPv4 address arithmetic for DHCP lease pools.
//!
//! Addresses are treated as unsigned 32-bit integers with the first octet
//! most significant. Offsets that leave the 32-bit space are an error,
//! never a wraparound.

use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Ipv4Error {
    #[error("invalid IPv4 address: {input:?}")]
    Parse { input: String },

    #[error("{base} + {offset} overflows the IPv4 address space")]
    Overflow { base: Ipv4Addr, offset: u32 },

    #[error("range start {start} is after range end {end}")]
    InvertedRange { start: Ipv4Addr, end: Ipv4Addr },
}

/// Parse a dotted-quad address.
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr, Ipv4Error> {
    input.trim().parse().map_err(|_| Ipv4Error::Parse {
        input: input.to_string(),
    })
}

/// Add `offset` to `base`, carrying across octets.
pub fn offset_addr(base: Ipv4Addr, offset: u32) -> Result<Ipv4Addr, Ipv4Error> {
    u32::from(base)
        .checked_add(offset)
        .map(Ipv4Addr::from)
        .ok_or(Ipv4Error::Overflow { base, offset })
}

/// Add `offset` to the dotted-quad `start` and format the result.
///
/// ```ignore
/// assert_eq!(increment_ipv4("192.168.1.250", 10)?, "192.168.2.4");
/// ```
pub fn increment_ipv4(start: &str, offset: u32) -> Result<String, Ipv4Error> {
    let base = parse_ipv4(start)?;
    Ok(offset_addr(base, offset)?.to_string())
}

/// An inclusive block of addresses offered to booting nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaseRange {
    start: Ipv4Addr,
    end: Ipv4Addr,
}

impl LeaseRange {
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Result<Self, Ipv4Error> {
        if u32::from(start) > u32::from(end) {
            return Err(Ipv4Error::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range from the `range start` / `range end` strings of a DHCP section.
    pub fn parse(start: &str, end: &str) -> Result<Self, Ipv4Error> {
        Self::new(parse_ipv4(start)?, parse_ipv4(end)?)
    }

    pub fn start(&self) -> Ipv4Addr {
        self.start
    }

    pub fn end(&self) -> Ipv4Addr {
        self.end
    }

    /// Number of addresses in the range (at least 1).
    pub fn len(&self) -> u64 {
        u64::from(u32::from(self.end) - u32::from(self.start)) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        (u32::from(self.start)..=u32::from(self.end)).contains(&u32::from(addr))
    }

    /// The `index`-th address of the range, if it lies inside it.
    pub fn nth(&self, index: u32) -> Option<Ipv4Addr> {
        offset_addr(self.start, index)
            .ok()
            .filter(|addr| self.contains(*addr))
    }

    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> {
        (u32::from(self.start)..=u32::from(self.end)).map(Ipv4Addr::from)
    }
}
