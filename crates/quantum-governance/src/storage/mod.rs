//! 256-bit keyed word storage and the scalar/array/mapping/bytes codec that
//! matches the original contract's EVM storage layout, so that state
//! computed here is bit-for-bit compatible with a node replaying the same
//! history against the legacy layout.
//!
//! Slot addressing conventions:
//! - A scalar value lives directly at its slot.
//! - A dynamic array's length lives at slot `p`; its elements live at
//!   `keccak(p) + i * struct_size`.
//! - A mapping entry for `key` at position `p` lives at `keccak(key ∥ p)`.
//! - `bytes`/`string` values ≤31 bytes are packed into a single word: the
//!   low byte holds `2 * length`, left-aligned data fills the rest. Longer
//!   values store `2 * length + 1` at the slot and continue the raw bytes,
//!   32 at a time, starting at `keccak(slot)`.

use shared_crypto::keccak256;
use std::collections::HashMap;

/// A 32-byte storage key.
pub type Word = [u8; 32];

/// A minimal key-value store addressed by 32-byte storage slots, mirroring
/// `StateDB.GetState`/`SetState` against a single contract address.
pub trait WordStore: Send + Sync {
    fn get(&self, key: &Word) -> Word;
    fn set(&mut self, key: Word, value: Word);
}

/// An in-memory [`WordStore`], sufficient for tests and for a node that
/// keeps governance state resident (the accessors layer is the boundary a
/// persistent backend would sit behind).
#[derive(Debug, Default, Clone)]
pub struct InMemoryWordStore {
    words: HashMap<Word, Word>,
}

impl WordStore for InMemoryWordStore {
    fn get(&self, key: &Word) -> Word {
        self.words.get(key).copied().unwrap_or([0u8; 32])
    }

    fn set(&mut self, key: Word, value: Word) {
        if value == [0u8; 32] {
            self.words.remove(&key);
        } else {
            self.words.insert(key, value);
        }
    }
}

/// Converts a `u64` slot number into its 32-byte big-endian key.
#[must_use]
pub fn slot(n: u64) -> Word {
    let mut w = [0u8; 32];
    w[24..].copy_from_slice(&n.to_be_bytes());
    w
}

/// Converts an arbitrary byte-width unsigned integer into a 32-byte word.
#[must_use]
pub fn word_from_u64(n: u64) -> Word {
    slot(n)
}

/// Reads a word back out as a `u64`, truncating any higher bits (storage
/// values in this codec never exceed `u64` range for counters/offsets).
#[must_use]
pub fn u64_from_word(w: &Word) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&w[24..]);
    u64::from_be_bytes(buf)
}

/// The base slot for a dynamic array's elements: `keccak(p)`.
#[must_use]
pub fn array_base_loc(p: &Word) -> Word {
    keccak256(p)
}

/// The slot for a mapping entry: `keccak(key ∥ p)`, matching
/// `getMapLoc(pos, key)` where `key` may be shorter than 32 bytes (e.g. a
/// 20-byte address) and is hashed exactly as supplied.
#[must_use]
pub fn map_loc(p: &Word, key: &[u8]) -> Word {
    let packed: Vec<u8> = key.iter().copied().chain(p.iter().copied()).collect();
    keccak256(&packed)
}

/// Adds a `u64` offset to a base slot (treating both as big-endian u256).
#[must_use]
pub fn add_offset(base: &Word, offset: u64) -> Word {
    let mut n = primitive_types::U256::from_big_endian(base);
    n = n.saturating_add(primitive_types::U256::from(offset));
    let mut out = [0u8; 32];
    n.to_big_endian(&mut out);
    out
}

/// Reads a length-prefixed byte string starting at `loc`, using the
/// short/long packing convention described at module level.
pub fn read_bytes(store: &dyn WordStore, loc: &Word) -> Vec<u8> {
    let raw = store.get(loc);
    let length_byte = raw[31];

    if length_byte % 2 == 0 {
        let length = (length_byte / 2) as usize;
        return raw[..length].to_vec();
    }

    let raw_length = primitive_types::U256::from_big_endian(&raw);
    let length = ((raw_length - primitive_types::U256::one()) / primitive_types::U256::from(2u8))
        .as_u64() as usize;

    let data_loc = array_base_loc(loc);
    let chunks = length.div_ceil(32);
    let mut data = Vec::with_capacity(chunks * 32);
    for i in 0..chunks as u64 {
        let chunk_loc = add_offset(&data_loc, i);
        data.extend_from_slice(&store.get(&chunk_loc));
    }
    data.truncate(length);
    data
}

/// Writes a length-prefixed byte string at `loc`.
pub fn write_bytes(store: &mut dyn WordStore, loc: &Word, data: &[u8]) {
    let length = data.len();

    if length == 0 {
        store.set(*loc, [0u8; 32]);
        return;
    }

    if length < 32 {
        let mut word = [0u8; 32];
        word[..length].copy_from_slice(data);
        word[31] = (length as u8) * 2;
        store.set(*loc, word);
        return;
    }

    let stored_length = primitive_types::U256::from(length as u64) * primitive_types::U256::from(2u8)
        + primitive_types::U256::one();
    let mut len_word = [0u8; 32];
    stored_length.to_big_endian(&mut len_word);
    store.set(*loc, len_word);

    let data_loc = array_base_loc(loc);
    let chunks = length.div_ceil(32);
    for i in 0..chunks {
        let chunk_loc = add_offset(&data_loc, i as u64);
        let start = i * 32;
        let end = ((i + 1) * 32).min(length);
        let mut word = [0u8; 32];
        word[..end - start].copy_from_slice(&data[start..end]);
        store.set(chunk_loc, word);
    }
}

/// Reads element `index` of the 2D byte array rooted at position `pos`
/// (used for per-round DKG master-public-key and complaint lists).
pub fn read_2d_byte_array(store: &dyn WordStore, pos: &Word, index: u64) -> Vec<Vec<u8>> {
    let base_loc = array_base_loc(pos);
    let loc = add_offset(&base_loc, index);

    let array_length = u64_from_word(&store.get(&loc));
    let data_loc = array_base_loc(&loc);

    (0..array_length)
        .map(|i| {
            let element_loc = add_offset(&data_loc, i);
            read_bytes(store, &element_loc)
        })
        .collect()
}

/// Appends `data` as a new element of the 2D byte array rooted at `pos`.
pub fn append_to_2d_byte_array(store: &mut dyn WordStore, pos: &Word, index: u64, data: &[u8]) {
    let base_loc = array_base_loc(pos);
    let loc = add_offset(&base_loc, index);

    let array_length = u64_from_word(&store.get(&loc));
    store.set(loc, word_from_u64(array_length + 1));

    let data_loc = array_base_loc(&loc);
    let element_loc = add_offset(&data_loc, array_length);
    write_bytes(store, &element_loc, data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_bytes_roundtrip() {
        let mut store = InMemoryWordStore::default();
        let loc = slot(100);
        write_bytes(&mut store, &loc, b"hello world");
        assert_eq!(read_bytes(&store, &loc), b"hello world".to_vec());
    }

    #[test]
    fn test_long_bytes_roundtrip() {
        let mut store = InMemoryWordStore::default();
        let loc = slot(200);
        let data: Vec<u8> = (0..100u16).map(|i| (i % 256) as u8).collect();
        write_bytes(&mut store, &loc, &data);
        assert_eq!(read_bytes(&store, &loc), data);
    }

    #[test]
    fn test_empty_bytes_roundtrip() {
        let mut store = InMemoryWordStore::default();
        let loc = slot(300);
        write_bytes(&mut store, &loc, b"");
        assert_eq!(read_bytes(&store, &loc), Vec::<u8>::new());
    }

    #[test]
    fn test_map_loc_differs_by_key() {
        let p = slot(1);
        let a = map_loc(&p, b"alice");
        let b = map_loc(&p, b"bob");
        assert_ne!(a, b);
    }

    #[test]
    fn test_2d_byte_array_append_and_read() {
        let mut store = InMemoryWordStore::default();
        let pos = slot(7);
        append_to_2d_byte_array(&mut store, &pos, 3, b"mpk-one");
        append_to_2d_byte_array(&mut store, &pos, 3, b"mpk-two");
        let elements = read_2d_byte_array(&store, &pos, 3);
        assert_eq!(elements, vec![b"mpk-one".to_vec(), b"mpk-two".to_vec()]);
    }
}
