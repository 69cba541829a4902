//! # Domain Services
//!
//! Pure functions used by the platform.

use sha3::{Digest, Keccak256};
use shared_types::entities::Address;

/// Computes the address of a component deployed by `deployer` with the given
/// deployment nonce: `keccak256(rlp([deployer, nonce]))[12..]`.
#[must_use]
pub fn compute_contract_address(deployer: Address, nonce: u64) -> Address {
    // Address is a 20-byte string: 0x80 + 20
    let mut content = Vec::with_capacity(30);
    content.push(0x94);
    content.extend_from_slice(deployer.as_bytes());

    if nonce == 0 {
        content.push(0x80);
    } else if nonce < 0x80 {
        content.push(nonce as u8);
    } else {
        let bytes = nonce.to_be_bytes();
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
        content.push(0x80 + (8 - start) as u8);
        content.extend_from_slice(&bytes[start..]);
    }

    // Content never exceeds 55 bytes, so the short list header always applies
    let mut rlp = Vec::with_capacity(content.len() + 1);
    rlp.push(0xc0 + content.len() as u8);
    rlp.extend_from_slice(&content);

    let hash = Keccak256::digest(&rlp);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::new(addr)
}
