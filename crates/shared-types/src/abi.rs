//! # ABI Codec
//!
//! Function-selector-prefixed argument encoding used for calldata and for the
//! application instruction payload.
//!
//! Layout follows the contract ABI: every static argument occupies one
//! 32-byte word in the head; a dynamic `bytes` argument stores an offset in
//! the head and `length || data (right-padded)` in the tail.

use crate::entities::{Address, Bytes, U256};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Size of one ABI word.
pub const WORD_SIZE: usize = 32;

/// Size of a function selector.
pub const SELECTOR_SIZE: usize = 4;

/// A 4-byte function selector.
pub type Selector = [u8; SELECTOR_SIZE];

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Input shorter than a selector.
    #[error("calldata too short for selector: {0} bytes")]
    MissingSelector(usize),

    /// Read past the end of the buffer.
    #[error("out of bounds read: offset {offset}, len {len}, available {available}")]
    OutOfBounds {
        /// Start of the read.
        offset: usize,
        /// Bytes requested.
        len: usize,
        /// Bytes in the buffer.
        available: usize,
    },

    /// A bool word held something other than 0 or 1.
    #[error("invalid bool word")]
    InvalidBool,

    /// An address word had non-zero high bytes.
    #[error("invalid address word")]
    InvalidAddress,

    /// An offset or length does not fit in memory.
    #[error("word does not fit in usize")]
    Overflow,
}

/// Parameter types understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `uint256`
    Uint,
    /// `bytes`
    Bytes,
}

/// A decoded or to-be-encoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `address`
    Address(Address),
    /// `bool`
    Bool(bool),
    /// `uint256`
    Uint(U256),
    /// `bytes`
    Bytes(Bytes),
}

/// keccak256 of arbitrary data.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Computes the selector of a canonical signature such as `send(address,bytes)`.
#[must_use]
pub fn selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; SELECTOR_SIZE];
    out.copy_from_slice(&hash[..SELECTOR_SIZE]);
    out
}

fn uint_word(value: U256) -> [u8; WORD_SIZE] {
    let mut word = [0u8; WORD_SIZE];
    value.to_big_endian(&mut word);
    word
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}

/// Encodes a tuple of tokens.
#[must_use]
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len() * WORD_SIZE;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        match token {
            Token::Address(a) => head.extend_from_slice(&uint_word(a.to_word())),
            Token::Bool(b) => head.extend_from_slice(&uint_word(U256::from(u8::from(*b)))),
            Token::Uint(v) => head.extend_from_slice(&uint_word(*v)),
            Token::Bytes(data) => {
                let offset = head_len + tail.len();
                head.extend_from_slice(&uint_word(U256::from(offset)));
                tail.extend_from_slice(&uint_word(U256::from(data.len())));
                tail.extend_from_slice(data.as_slice());
                tail.resize(tail.len() + padded_len(data.len()) - data.len(), 0);
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// Encodes `selector || encode(tokens)`.
#[must_use]
pub fn encode_call(selector: Selector, tokens: &[Token]) -> Bytes {
    let mut out = Vec::with_capacity(SELECTOR_SIZE + tokens.len() * WORD_SIZE);
    out.extend_from_slice(&selector);
    out.extend_from_slice(&encode(tokens));
    Bytes::from(out)
}

/// Splits calldata into its selector and argument data.
pub fn split_selector(input: &[u8]) -> Result<(Selector, &[u8]), AbiError> {
    if input.len() < SELECTOR_SIZE {
        return Err(AbiError::MissingSelector(input.len()));
    }
    let mut sel = [0u8; SELECTOR_SIZE];
    sel.copy_from_slice(&input[..SELECTOR_SIZE]);
    Ok((sel, &input[SELECTOR_SIZE..]))
}

fn read(data: &[u8], offset: usize, len: usize) -> Result<&[u8], AbiError> {
    let end = offset.checked_add(len).ok_or(AbiError::Overflow)?;
    data.get(offset..end).ok_or(AbiError::OutOfBounds {
        offset,
        len,
        available: data.len(),
    })
}

fn read_word(data: &[u8], offset: usize) -> Result<U256, AbiError> {
    Ok(U256::from_big_endian(read(data, offset, WORD_SIZE)?))
}

fn word_to_usize(word: U256) -> Result<usize, AbiError> {
    if word > U256::from(usize::MAX) {
        return Err(AbiError::Overflow);
    }
    Ok(word.as_usize())
}

/// Sequential reader over an argument tuple.
///
/// Each accessor consumes the next word; `bytes` follows its offset into
/// the tail. The decoder does not know where the head ends, so reading past
/// the last argument returns tail words. Every read is bounds-checked,
/// `bool` words must be 0 or 1, and `address` words must have zero high
/// bytes.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Decoder<'a> {
    /// Starts reading at the first head word of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn next_word(&mut self) -> Result<U256, AbiError> {
        let word = read_word(self.data, self.position)?;
        self.position += WORD_SIZE;
        Ok(word)
    }

    /// Reads an `address`.
    pub fn address(&mut self) -> Result<Address, AbiError> {
        let word = self.next_word()?;
        if word.bits() > 160 {
            return Err(AbiError::InvalidAddress);
        }
        Ok(Address::from_word(word))
    }

    /// Reads a `bool`.
    pub fn bool(&mut self) -> Result<bool, AbiError> {
        let word = self.next_word()?;
        if word.is_zero() {
            Ok(false)
        } else if word == U256::one() {
            Ok(true)
        } else {
            Err(AbiError::InvalidBool)
        }
    }

    /// Reads a `uint256`.
    pub fn uint(&mut self) -> Result<U256, AbiError> {
        self.next_word()
    }

    /// Reads a dynamic `bytes`.
    pub fn bytes(&mut self) -> Result<Bytes, AbiError> {
        let offset = word_to_usize(self.next_word()?)?;
        let len = word_to_usize(read_word(self.data, offset)?)?;
        let start = offset.checked_add(WORD_SIZE).ok_or(AbiError::Overflow)?;
        Ok(Bytes::from_slice(read(self.data, start, len)?))
    }

    /// Reads one value of the given type.
    pub fn token(&mut self, ty: ParamType) -> Result<Token, AbiError> {
        Ok(match ty {
            ParamType::Address => Token::Address(self.address()?),
            ParamType::Bool => Token::Bool(self.bool()?),
            ParamType::Uint => Token::Uint(self.uint()?),
            ParamType::Bytes => Token::Bytes(self.bytes()?),
        })
    }
}

/// Decodes a tuple of the given types. Trailing data is ignored.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut decoder = Decoder::new(data);
    types.iter().map(|ty| decoder.token(*ty)).collect()
}

/// Decodes a single `address` return value.
pub fn decode_address(data: &[u8]) -> Result<Address, AbiError> {
    Decoder::new(data).address()
}

/// Decodes a single `bool` return value.
pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
    Decoder::new(data).bool()
}

/// Decodes a single `uint256` return value.
pub fn decode_uint(data: &[u8]) -> Result<U256, AbiError> {
    Decoder::new(data).uint()
}
