//! Minimal hand-written RLP encode/decode, scoped to [`Block`] — the one
//! wire type the lattice needs to serialize for gossip/storage. General
//! transaction/account RLP belongs to the EVM-execution layer, not here.

use crate::domain::{Block, Hash, Position, Witness};

/// Computes the canonical hash of a block's content (everything except
/// the hash field itself and the signature, which is produced over
/// this same hash).
#[must_use]
pub fn block_hash(b: &Block) -> Hash {
    let mut body = Vec::new();
    encode_u64(u64::from(b.position.chain_id), &mut body);
    encode_u64(b.position.height, &mut body);
    encode_u64(b.timestamp, &mut body);
    for ack in &b.acks {
        encode_u64(u64::from(ack.chain_id), &mut body);
        encode_u64(ack.height, &mut body);
    }
    encode_bytes(&b.parent_hash.0, &mut body);
    encode_u64(b.witness.height, &mut body);
    encode_bytes(&b.witness.data, &mut body);
    encode_bytes(&b.payload, &mut body);
    encode_bytes(&b.proposer, &mut body);
    Hash(shared_crypto::keccak256(&body))
}

fn encode_bytes(data: &[u8], out: &mut Vec<u8>) {
    if data.len() == 1 && data[0] < 0x80 {
        out.push(data[0]);
        return;
    }
    if data.len() < 56 {
        out.push(0x80 + data.len() as u8);
    } else {
        let len_bytes = data.len().to_be_bytes();
        let len_bytes = trim_leading_zeros(&len_bytes);
        out.push(0xb7 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
    out.extend_from_slice(data);
}

fn encode_list(items: &[u8], out: &mut Vec<u8>) {
    if items.len() < 56 {
        out.push(0xc0 + items.len() as u8);
    } else {
        let len_bytes = items.len().to_be_bytes();
        let len_bytes = trim_leading_zeros(&len_bytes);
        out.push(0xf7 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
    out.extend_from_slice(items);
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    &bytes[first_nonzero..]
}

fn encode_u64(n: u64, out: &mut Vec<u8>) {
    if n == 0 {
        out.push(0x80);
        return;
    }
    let bytes = n.to_be_bytes();
    encode_bytes(trim_leading_zeros(&bytes), out);
}

/// Encodes a [`Block`] as an RLP list, field order matching its struct
/// declaration order.
#[must_use]
pub fn encode_block(b: &Block) -> Vec<u8> {
    let mut body = Vec::new();
    encode_bytes(&b.hash.0, &mut body);
    encode_u64(u64::from(b.position.chain_id), &mut body);
    encode_u64(b.position.height, &mut body);
    encode_u64(b.timestamp, &mut body);

    let mut acks_body = Vec::new();
    for ack in &b.acks {
        let mut ack_item = Vec::new();
        encode_u64(u64::from(ack.chain_id), &mut ack_item);
        encode_u64(ack.height, &mut ack_item);
        let mut wrapped = Vec::new();
        encode_list(&ack_item, &mut wrapped);
        acks_body.extend_from_slice(&wrapped);
    }
    encode_list(&acks_body, &mut body);

    encode_bytes(&b.parent_hash.0, &mut body);
    encode_u64(b.witness.height, &mut body);
    encode_bytes(&b.witness.data, &mut body);
    encode_bytes(&b.payload, &mut body);
    encode_bytes(&b.proposer, &mut body);
    encode_bytes(&b.signature, &mut body);

    let mut out = Vec::new();
    encode_list(&body, &mut out);
    out
}

/// Errors decoding an RLP-encoded block.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RlpDecodeError {
    #[error("unexpected end of RLP input")]
    UnexpectedEof,
    #[error("malformed RLP length prefix")]
    MalformedLength,
    #[error("field count mismatch")]
    FieldCountMismatch,
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn next_item(&mut self) -> Result<&'a [u8], RlpDecodeError> {
        if self.pos >= self.data.len() {
            return Err(RlpDecodeError::UnexpectedEof);
        }
        let prefix = self.data[self.pos];
        if prefix < 0x80 {
            self.pos += 1;
            return Ok(&self.data[self.pos - 1..self.pos]);
        }
        if prefix <= 0xb7 {
            let len = (prefix - 0x80) as usize;
            let start = self.pos + 1;
            let end = start + len;
            self.pos = end;
            return self.data.get(start..end).ok_or(RlpDecodeError::UnexpectedEof);
        }
        if prefix <= 0xbf {
            let len_of_len = (prefix - 0xb7) as usize;
            let len_start = self.pos + 1;
            let len_bytes = self
                .data
                .get(len_start..len_start + len_of_len)
                .ok_or(RlpDecodeError::MalformedLength)?;
            let len = be_bytes_to_usize(len_bytes);
            let start = len_start + len_of_len;
            let end = start + len;
            self.pos = end;
            return self.data.get(start..end).ok_or(RlpDecodeError::UnexpectedEof);
        }
        Err(RlpDecodeError::MalformedLength)
    }

    /// Enters a list payload, returning a sub-cursor over its contents.
    fn enter_list(&mut self) -> Result<Cursor<'a>, RlpDecodeError> {
        if self.pos >= self.data.len() {
            return Err(RlpDecodeError::UnexpectedEof);
        }
        let prefix = self.data[self.pos];
        if prefix < 0xc0 {
            return Err(RlpDecodeError::MalformedLength);
        }
        if prefix <= 0xf7 {
            let len = (prefix - 0xc0) as usize;
            let start = self.pos + 1;
            let end = start + len;
            self.pos = end;
            let body = self.data.get(start..end).ok_or(RlpDecodeError::UnexpectedEof)?;
            return Ok(Cursor::new(body));
        }
        let len_of_len = (prefix - 0xf7) as usize;
        let len_start = self.pos + 1;
        let len_bytes = self
            .data
            .get(len_start..len_start + len_of_len)
            .ok_or(RlpDecodeError::MalformedLength)?;
        let len = be_bytes_to_usize(len_bytes);
        let start = len_start + len_of_len;
        let end = start + len;
        self.pos = end;
        let body = self.data.get(start..end).ok_or(RlpDecodeError::UnexpectedEof)?;
        Ok(Cursor::new(body))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }
}

fn be_bytes_to_usize(bytes: &[u8]) -> usize {
    let mut buf = [0u8; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    u64::from_be_bytes(buf) as usize
}

fn item_to_u64(item: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf[8 - item.len()..].copy_from_slice(item);
    u64::from_be_bytes(buf)
}

/// Decodes a [`Block`] from its RLP encoding.
pub fn decode_block(data: &[u8]) -> Result<Block, RlpDecodeError> {
    let mut cursor = Cursor::new(data);
    let mut fields = cursor.enter_list()?;

    let hash_bytes = fields.next_item()?;
    let mut hash = [0u8; 32];
    hash[32 - hash_bytes.len()..].copy_from_slice(hash_bytes);

    let chain_id = item_to_u64(fields.next_item()?) as u32;
    let height = item_to_u64(fields.next_item()?);
    let timestamp = item_to_u64(fields.next_item()?);

    let mut acks = Vec::new();
    let mut acks_cursor = fields.enter_list()?;
    while !acks_cursor.at_end() {
        let mut ack_fields = acks_cursor.enter_list()?;
        let ack_chain = item_to_u64(ack_fields.next_item()?) as u32;
        let ack_height = item_to_u64(ack_fields.next_item()?);
        acks.push(Position { chain_id: ack_chain, height: ack_height });
    }

    let parent_hash_bytes = fields.next_item()?;
    let mut parent_hash = [0u8; 32];
    parent_hash[32 - parent_hash_bytes.len()..].copy_from_slice(parent_hash_bytes);

    let witness_height = item_to_u64(fields.next_item()?);
    let witness_data = fields.next_item()?.to_vec();
    let payload = fields.next_item()?.to_vec();

    let proposer_bytes = fields.next_item()?;
    let mut proposer = [0u8; 20];
    proposer[20 - proposer_bytes.len()..].copy_from_slice(proposer_bytes);

    let signature = fields.next_item()?.to_vec();

    if !fields.at_end() {
        return Err(RlpDecodeError::FieldCountMismatch);
    }

    Ok(Block {
        hash: Hash(hash),
        position: Position { chain_id, height },
        timestamp,
        acks,
        parent_hash: Hash(parent_hash),
        witness: Witness { height: witness_height, data: witness_data },
        payload,
        proposer,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block {
            hash: Hash([1u8; 32]),
            position: Position { chain_id: 2, height: 100 },
            timestamp: 1_690_000_000,
            acks: vec![
                Position { chain_id: 0, height: 99 },
                Position { chain_id: 1, height: 50 },
            ],
            parent_hash: Hash([2u8; 32]),
            witness: Witness { height: 42, data: vec![9, 9, 9] },
            payload: vec![1, 2, 3, 4, 5],
            proposer: [7u8; 20],
            signature: vec![0xaa; 65],
        }
    }

    #[test]
    fn test_block_hash_is_deterministic() {
        let block = sample_block();
        assert_eq!(block_hash(&block).0, block_hash(&block).0);
    }

    #[test]
    fn test_block_hash_changes_with_payload() {
        let mut block = sample_block();
        let original = block_hash(&block);
        block.payload.push(0xff);
        assert_ne!(block_hash(&block).0, original.0);
    }

    #[test]
    fn test_block_hash_ignores_signature() {
        let mut block = sample_block();
        let original = block_hash(&block);
        block.signature = vec![0xbb; 65];
        assert_eq!(block_hash(&block).0, original.0);
    }

    #[test]
    fn test_block_rlp_roundtrip() {
        let block = sample_block();
        let encoded = encode_block(&block);
        let decoded = decode_block(&encoded).unwrap();
        assert_eq!(decoded.hash.0, block.hash.0);
        assert_eq!(decoded.position, block.position);
        assert_eq!(decoded.timestamp, block.timestamp);
        assert_eq!(decoded.acks, block.acks);
        assert_eq!(decoded.payload, block.payload);
        assert_eq!(decoded.proposer, block.proposer);
    }

    #[test]
    fn test_empty_payload_roundtrip() {
        let mut block = sample_block();
        block.payload = Vec::new();
        block.acks = Vec::new();
        let encoded = encode_block(&block);
        let decoded = decode_block(&encoded).unwrap();
        assert!(decoded.payload.is_empty());
        assert!(decoded.acks.is_empty());
    }

    #[test]
    fn test_truncated_input_errors() {
        let block = sample_block();
        let encoded = encode_block(&block);
        let truncated = &encoded[..encoded.len() - 5];
        assert!(decode_block(truncated).is_err());
    }
}
