//! The two ERC-20 calls the onboarding flow issues: `balanceOf` and `transfer`.

use anyhow::{Result, anyhow, bail};

/// `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
/// `transfer(address,uint256)`
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

const WORD: usize = 32;

/// Parse a `0x`-prefixed 20-byte hex address. Checksum casing is not verified.
pub fn parse_address(raw: &str) -> Result<[u8; 20]> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| anyhow!("address must start with 0x: {trimmed}"))?;
    if digits.len() != 40 {
        bail!("address must be 20 bytes, got {} hex digits", digits.len());
    }

    let mut out = [0_u8; 20];
    hex::decode_to_slice(digits, &mut out).map_err(|err| anyhow!("invalid address hex: {err}"))?;
    Ok(out)
}

pub fn encode_balance_of(owner: &str) -> Result<String> {
    let owner = parse_address(owner)?;
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    push_address_word(&mut data, &owner);
    Ok(format!("0x{}", hex::encode(data)))
}

pub fn encode_transfer(recipient: &str, amount: u128) -> Result<String> {
    let recipient = parse_address(recipient)?;
    let mut data = Vec::with_capacity(4 + 2 * WORD);
    data.extend_from_slice(&TRANSFER_SELECTOR);
    push_address_word(&mut data, &recipient);
    push_uint_word(&mut data, amount);
    Ok(format!("0x{}", hex::encode(data)))
}

/// Decode a single `uint256` return word. Values above `u128::MAX` are rejected.
pub fn decode_uint256(raw: &str) -> Result<u128> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() {
        bail!("empty return data");
    }
    let bytes = hex::decode(digits).map_err(|err| anyhow!("invalid return data hex: {err}"))?;
    if bytes.len() < WORD {
        bail!("return data too short: {} bytes", bytes.len());
    }

    let word = &bytes[..WORD];
    if word[..16].iter().any(|b| *b != 0) {
        bail!("uint256 value does not fit in u128");
    }
    let mut low = [0_u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

fn push_address_word(data: &mut Vec<u8>, address: &[u8; 20]) {
    data.extend_from_slice(&[0_u8; 12]);
    data.extend_from_slice(address);
}

fn push_uint_word(data: &mut Vec<u8>, value: u128) {
    data.extend_from_slice(&[0_u8; 16]);
    data.extend_from_slice(&value.to_be_bytes());
}
