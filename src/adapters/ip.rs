use std::net::{Ipv4Addr, Ipv6Addr};

use smallvec::SmallVec;

use super::{EncodedKey, KeyEncoder};
use crate::bits::cidr_mask;
use crate::error::{Result, TreeError};

/// `a.b.c.d` (a /32) or `a.b.c.d/len`. Host bits past `len` are cleared.
#[derive(Clone, Copy, Debug)]
pub struct Ipv4Key;

/// IPv6 text, optionally `/len`. IPv4 text and IPv4-mapped addresses are
/// rejected so the two families never share a tree by accident.
#[derive(Clone, Copy, Debug)]
pub struct Ipv6Key;

impl KeyEncoder for Ipv4Key {
    fn encode(input: &str) -> Result<EncodedKey> {
        let (addr, bits) = split_prefix(input)?;
        let ip: Ipv4Addr = addr.parse().map_err(|_| invalid_v4(input))?;
        network(&ip.octets(), bits.unwrap_or(32)).ok_or_else(|| invalid_v4(input))
    }
}

impl KeyEncoder for Ipv6Key {
    fn encode(input: &str) -> Result<EncodedKey> {
        let (addr, bits) = split_prefix(input)?;
        let ip: Ipv6Addr = addr.parse().map_err(|_| invalid_v6(input))?;
        if ip.to_ipv4_mapped().is_some() {
            return Err(invalid_v6(input));
        }
        network(&ip.octets(), bits.unwrap_or(128)).ok_or_else(|| invalid_v6(input))
    }
}

fn invalid_v4(input: &str) -> TreeError {
    TreeError::InvalidAddress(format!("invalid v4 address {input}"))
}

fn invalid_v6(input: &str) -> TreeError {
    TreeError::InvalidAddress(format!("invalid v6 address {input}"))
}

/// Splits `addr/len`, rejecting anything but decimal digits after the slash.
fn split_prefix(input: &str) -> Result<(&str, Option<usize>)> {
    let Some((addr, len)) = input.split_once('/') else {
        return Ok((input, None));
    };
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TreeError::InvalidAddress(input.to_owned()));
    }
    let bits = len
        .parse()
        .map_err(|_| TreeError::InvalidAddress(input.to_owned()))?;
    Ok((addr, Some(bits)))
}

/// Masks `octets` down to its first `bits` bits. `None` if `bits` is too wide.
fn network(octets: &[u8], bits: usize) -> Option<EncodedKey> {
    if bits > octets.len() * 8 {
        return None;
    }
    let mask: SmallVec<[u8; 16]> = cidr_mask(bits, octets.len()).into_iter().collect();
    let key = octets.iter().zip(&mask).map(|(o, m)| o & m).collect();
    Some(EncodedKey { key, mask })
}
