//! Base58Check address encoding and validation.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of a script hash in bytes
pub const SCRIPT_HASH_SIZE: usize = 20;

const CHECKSUM_SIZE: usize = 4;

/// Address decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid Base58 string: {0}")]
    Base58(String),

    #[error("Invalid Base58Check checksum")]
    Checksum,

    #[error("Invalid address length: expected 21 bytes, got {0}")]
    Length(usize),

    #[error("Invalid address version: expected {expected:#04x}, got {actual:#04x}")]
    Version { expected: u8, actual: u8 },
}

fn hash256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Converts a script hash to an address for the given version byte.
pub fn to_address(script_hash: &[u8; SCRIPT_HASH_SIZE], version: u8) -> String {
    let mut payload = Vec::with_capacity(1 + SCRIPT_HASH_SIZE + CHECKSUM_SIZE);
    payload.push(version);
    payload.extend_from_slice(script_hash);
    let checksum = hash256(&payload);
    payload.extend_from_slice(&checksum[..CHECKSUM_SIZE]);
    bs58::encode(payload).into_string()
}

/// Decodes an address and returns its script hash.
///
/// Surrounding whitespace is not part of an address and is rejected.
pub fn validate_address(address: &str, version: u8) -> Result<[u8; SCRIPT_HASH_SIZE], AddressError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| AddressError::Base58(e.to_string()))?;

    if bytes.len() < CHECKSUM_SIZE {
        return Err(AddressError::Length(0));
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_SIZE);
    if checksum != &hash256(payload)[..CHECKSUM_SIZE] {
        return Err(AddressError::Checksum);
    }
    if payload.len() != 1 + SCRIPT_HASH_SIZE {
        return Err(AddressError::Length(payload.len()));
    }
    if payload[0] != version {
        return Err(AddressError::Version {
            expected: version,
            actual: payload[0],
        });
    }

    let mut script_hash = [0u8; SCRIPT_HASH_SIZE];
    script_hash.copy_from_slice(&payload[1..]);
    Ok(script_hash)
}

/// Whether `address` decodes for the given version byte.
pub fn is_valid_address(address: &str, version: u8) -> bool {
    validate_address(address, version).is_ok()
}
