//! Typed façade over the raw storage codec: one method per entity
//! operation, matching the original contract's `GovernanceStateHelper`
//! surface (offset maps stored as `real_offset + 1` so that zero means
//! "absent", swap-with-last removal for nodes/delegators).

use crate::domain::{Address, BoundedString, Bytes, Configuration, Delegator, Hash32, Node, Owner};
use crate::storage::{
    self, add_offset, array_base_loc, map_loc, slot, u64_from_word, word_from_u64, WordStore,
};
use primitive_types::U256;

// Slot numbering mirrors the original contract's declaration order: each
// top-level state variable claims the next sequential slot.
const NODES_LOC: u64 = 0;
const NODES_OFFSET_BY_ADDRESS_LOC: u64 = 1;
const NODES_OFFSET_BY_ID_LOC: u64 = 2;
const DELEGATORS_LOC: u64 = 3;
const DELEGATORS_OFFSET_LOC: u64 = 4;
const CRS_LOC: u64 = 5;
const ROUND_HEIGHT_LOC: u64 = 6;
const DKG_MASTER_PKS_LOC: u64 = 7;
const DKG_COMPLAINTS_LOC: u64 = 8;
const DKG_MPK_READY_LOC: u64 = 9;
const DKG_MPK_READYS_COUNT_LOC: u64 = 10;
const DKG_FINALIZED_LOC: u64 = 11;
const DKG_FINALIZEDS_COUNT_LOC: u64 = 12;
const FINE_VALUES_LOC: u64 = 13;
const FINE_RECORDS_LOC: u64 = 14;
const OWNER_LOC: u64 = 15;
const CONFIG_LOC: u64 = 16; // Configuration fields occupy CONFIG_LOC..CONFIG_LOC+13.
const DKG_MASTER_PK_BY_NODE_LOC: u64 = 29;

const NODE_STRUCT_SIZE: u64 = 9;
const DELEGATOR_STRUCT_SIZE: u64 = 3;

fn u256_to_word(n: U256) -> storage::Word {
    let mut w = [0u8; 32];
    n.to_big_endian(&mut w);
    w
}

fn word_to_u256(w: &storage::Word) -> U256 {
    U256::from_big_endian(w)
}

fn word_to_address(w: &storage::Word) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&w[12..]);
    Address::new(bytes)
}

fn address_to_word(a: Address) -> storage::Word {
    let mut w = [0u8; 32];
    w[12..].copy_from_slice(&a.0);
    w
}

fn word_to_hash32(w: &storage::Word) -> Hash32 {
    Hash32::new(*w)
}

/// Typed accessors over a [`WordStore`], bundling the full set of
/// governance entity operations.
pub struct GovernanceAccessors<'s> {
    store: &'s mut dyn WordStore,
}

impl<'s> GovernanceAccessors<'s> {
    pub fn new(store: &'s mut dyn WordStore) -> Self {
        Self { store }
    }

    // --- Nodes -----------------------------------------------------

    #[must_use]
    pub fn len_nodes(&self) -> u64 {
        u64_from_word(&self.store.get(&slot(NODES_LOC)))
    }

    #[must_use]
    pub fn node(&self, index: u64) -> Node {
        let array_base = array_base_loc(&slot(NODES_LOC));
        let element_base = add_offset(&array_base, index * NODE_STRUCT_SIZE);

        let owner = word_to_address(&self.store.get(&element_base));
        let public_key = Bytes::from(storage::read_bytes(self.store, &add_offset(&element_base, 1)));
        let staked = word_to_u256(&self.store.get(&add_offset(&element_base, 2)));
        let fined = word_to_u256(&self.store.get(&add_offset(&element_base, 3)));
        let name = BoundedString::new(
            String::from_utf8_lossy(&storage::read_bytes(self.store, &add_offset(&element_base, 4)))
                .into_owned(),
            32,
        )
        .unwrap_or_default();
        let email = BoundedString::new(
            String::from_utf8_lossy(&storage::read_bytes(self.store, &add_offset(&element_base, 5)))
                .into_owned(),
            32,
        )
        .unwrap_or_default();
        let location = BoundedString::new(
            String::from_utf8_lossy(&storage::read_bytes(self.store, &add_offset(&element_base, 6)))
                .into_owned(),
            32,
        )
        .unwrap_or_default();
        let url = BoundedString::new(
            String::from_utf8_lossy(&storage::read_bytes(self.store, &add_offset(&element_base, 7)))
                .into_owned(),
            128,
        )
        .unwrap_or_default();
        let unstaked = word_to_u256(&self.store.get(&add_offset(&element_base, 8))) > U256::zero();

        Node {
            owner,
            public_key,
            staked,
            fined,
            name,
            email,
            location,
            url,
            unstaked,
        }
    }

    pub fn update_node(&mut self, index: u64, n: &Node) {
        let array_base = array_base_loc(&slot(NODES_LOC));
        let element_base = add_offset(&array_base, index * NODE_STRUCT_SIZE);

        self.store.set(element_base, address_to_word(n.owner));
        storage::write_bytes(self.store, &add_offset(&element_base, 1), n.public_key.as_ref());
        self.store.set(add_offset(&element_base, 2), u256_to_word(n.staked));
        self.store.set(add_offset(&element_base, 3), u256_to_word(n.fined));
        storage::write_bytes(self.store, &add_offset(&element_base, 4), n.name.as_str().as_bytes());
        storage::write_bytes(self.store, &add_offset(&element_base, 5), n.email.as_str().as_bytes());
        storage::write_bytes(self.store, &add_offset(&element_base, 6), n.location.as_str().as_bytes());
        storage::write_bytes(self.store, &add_offset(&element_base, 7), n.url.as_str().as_bytes());
        self.store.set(
            add_offset(&element_base, 8),
            word_from_u64(u64::from(n.unstaked)),
        );
    }

    pub fn push_node(&mut self, n: &Node) -> u64 {
        let len = self.len_nodes();
        self.store.set(slot(NODES_LOC), word_from_u64(len + 1));
        self.update_node(len, n);
        len
    }

    /// Removes the last node slot, zeroing it out (EVM leaves a clean slot
    /// behind rather than truncating storage).
    pub fn pop_last_node(&mut self) {
        let len = self.len_nodes();
        let new_len = len.saturating_sub(1);
        self.store.set(slot(NODES_LOC), word_from_u64(new_len));
        self.update_node(
            new_len,
            &Node {
                owner: Address::ZERO,
                public_key: Bytes::new(),
                staked: U256::zero(),
                fined: U256::zero(),
                name: BoundedString::default(),
                email: BoundedString::default(),
                location: BoundedString::default(),
                url: BoundedString::default(),
                unstaked: false,
            },
        );
    }

    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        (0..self.len_nodes()).map(|i| self.node(i)).collect()
    }

    #[must_use]
    pub fn qualified_nodes(&self, min_stake: U256) -> Vec<Node> {
        self.nodes()
            .into_iter()
            .filter(|n| n.is_qualified(min_stake))
            .collect()
    }

    /// Returns `None` when the address has no registered node (the
    /// original contract encodes this as `offset == -1`; the zero-means-
    /// absent convention below makes that explicit instead).
    #[must_use]
    pub fn nodes_offset_by_address(&self, addr: Address) -> Option<u64> {
        let loc = map_loc(&slot(NODES_OFFSET_BY_ADDRESS_LOC), &addr.0);
        let raw = u64_from_word(&self.store.get(&loc));
        raw.checked_sub(1)
    }

    pub fn put_nodes_offset_by_address(&mut self, addr: Address, offset: u64) {
        let loc = map_loc(&slot(NODES_OFFSET_BY_ADDRESS_LOC), &addr.0);
        self.store.set(loc, word_from_u64(offset + 1));
    }

    pub fn delete_nodes_offset_by_address(&mut self, addr: Address) {
        let loc = map_loc(&slot(NODES_OFFSET_BY_ADDRESS_LOC), &addr.0);
        self.store.set(loc, [0u8; 32]);
    }

    #[must_use]
    pub fn nodes_offset_by_id(&self, id: Hash32) -> Option<u64> {
        let loc = map_loc(&slot(NODES_OFFSET_BY_ID_LOC), &id.0);
        let raw = u64_from_word(&self.store.get(&loc));
        raw.checked_sub(1)
    }

    pub fn put_nodes_offset_by_id(&mut self, id: Hash32, offset: u64) {
        let loc = map_loc(&slot(NODES_OFFSET_BY_ID_LOC), &id.0);
        self.store.set(loc, word_from_u64(offset + 1));
    }

    pub fn delete_nodes_offset_by_id(&mut self, id: Hash32) {
        let loc = map_loc(&slot(NODES_OFFSET_BY_ID_LOC), &id.0);
        self.store.set(loc, [0u8; 32]);
    }

    /// Registers both the by-address and by-id offset maps for a freshly
    /// pushed node.
    pub fn put_node_offsets(&mut self, n: &Node, id: Hash32, offset: u64) {
        self.put_nodes_offset_by_id(id, offset);
        self.put_nodes_offset_by_address(n.owner, offset);
    }

    // --- Delegators --------------------------------------------------

    #[must_use]
    pub fn len_delegators(&self, node_addr: Address) -> u64 {
        let loc = map_loc(&slot(DELEGATORS_LOC), &node_addr.0);
        u64_from_word(&self.store.get(&loc))
    }

    #[must_use]
    pub fn delegator(&self, node_addr: Address, offset: u64) -> Delegator {
        let loc = map_loc(&slot(DELEGATORS_LOC), &node_addr.0);
        let array_base = array_base_loc(&loc);
        let element_base = add_offset(&array_base, offset * DELEGATOR_STRUCT_SIZE);

        Delegator {
            owner: word_to_address(&self.store.get(&element_base)),
            value: word_to_u256(&self.store.get(&add_offset(&element_base, 1))),
            undelegated_at: word_to_u256(&self.store.get(&add_offset(&element_base, 2))),
        }
    }

    pub fn update_delegator(&mut self, node_addr: Address, offset: u64, d: &Delegator) {
        let loc = map_loc(&slot(DELEGATORS_LOC), &node_addr.0);
        let array_base = array_base_loc(&loc);
        let element_base = add_offset(&array_base, offset * DELEGATOR_STRUCT_SIZE);

        self.store.set(element_base, address_to_word(d.owner));
        self.store.set(add_offset(&element_base, 1), u256_to_word(d.value));
        self.store
            .set(add_offset(&element_base, 2), u256_to_word(d.undelegated_at));
    }

    pub fn push_delegator(&mut self, node_addr: Address, d: &Delegator) -> u64 {
        let len = self.len_delegators(node_addr);
        let loc = map_loc(&slot(DELEGATORS_LOC), &node_addr.0);
        self.store.set(loc, word_from_u64(len + 1));
        self.update_delegator(node_addr, len, d);
        len
    }

    pub fn pop_last_delegator(&mut self, node_addr: Address) {
        let len = self.len_delegators(node_addr);
        let new_len = len.saturating_sub(1);
        let loc = map_loc(&slot(DELEGATORS_LOC), &node_addr.0);
        self.store.set(loc, word_from_u64(new_len));
        self.update_delegator(
            node_addr,
            new_len,
            &Delegator {
                owner: Address::ZERO,
                value: U256::zero(),
                undelegated_at: U256::zero(),
            },
        );
    }

    #[must_use]
    pub fn delegators_offset(&self, node_addr: Address, delegator: Address) -> Option<u64> {
        let pos = slot(DELEGATORS_OFFSET_LOC);
        let mut key = Vec::with_capacity(40);
        key.extend_from_slice(&node_addr.0);
        key.extend_from_slice(&delegator.0);
        let loc = map_loc(&pos, &key);
        let raw = u64_from_word(&self.store.get(&loc));
        raw.checked_sub(1)
    }

    pub fn put_delegator_offset(&mut self, node_addr: Address, delegator: Address, offset: u64) {
        let pos = slot(DELEGATORS_OFFSET_LOC);
        let mut key = Vec::with_capacity(40);
        key.extend_from_slice(&node_addr.0);
        key.extend_from_slice(&delegator.0);
        let loc = map_loc(&pos, &key);
        self.store.set(loc, word_from_u64(offset + 1));
    }

    pub fn delete_delegators_offset(&mut self, node_addr: Address, delegator: Address) {
        let pos = slot(DELEGATORS_OFFSET_LOC);
        let mut key = Vec::with_capacity(40);
        key.extend_from_slice(&node_addr.0);
        key.extend_from_slice(&delegator.0);
        let loc = map_loc(&pos, &key);
        self.store.set(loc, [0u8; 32]);
    }

    // --- CRS / rounds --------------------------------------------------

    #[must_use]
    pub fn round(&self) -> u64 {
        self.len_crs().saturating_sub(1)
    }

    #[must_use]
    pub fn len_crs(&self) -> u64 {
        u64_from_word(&self.store.get(&slot(CRS_LOC)))
    }

    #[must_use]
    pub fn crs(&self, round: u64) -> Hash32 {
        let base = array_base_loc(&slot(CRS_LOC));
        word_to_hash32(&self.store.get(&add_offset(&base, round)))
    }

    pub fn push_crs(&mut self, value: Hash32) {
        let len = self.len_crs();
        self.store.set(slot(CRS_LOC), word_from_u64(len + 1));
        let base = array_base_loc(&slot(CRS_LOC));
        self.store.set(add_offset(&base, len), value.0);
    }

    #[must_use]
    pub fn len_round_height(&self) -> u64 {
        u64_from_word(&self.store.get(&slot(ROUND_HEIGHT_LOC)))
    }

    #[must_use]
    pub fn round_height(&self, round: u64) -> U256 {
        let base = array_base_loc(&slot(ROUND_HEIGHT_LOC));
        word_to_u256(&self.store.get(&add_offset(&base, round)))
    }

    pub fn push_round_height(&mut self, height: U256) {
        let len = self.len_round_height();
        self.store.set(slot(ROUND_HEIGHT_LOC), word_from_u64(len + 1));
        let base = array_base_loc(&slot(ROUND_HEIGHT_LOC));
        self.store.set(add_offset(&base, len), u256_to_word(height));
    }

    // --- DKG artifacts --------------------------------------------------

    #[must_use]
    pub fn dkg_master_public_keys(&self, round: u64) -> Vec<Bytes> {
        storage::read_2d_byte_array(self.store, &slot(DKG_MASTER_PKS_LOC), round)
            .into_iter()
            .map(Bytes::from)
            .collect()
    }

    pub fn push_dkg_master_public_key(&mut self, round: u64, mpk: &[u8]) {
        storage::append_to_2d_byte_array(self.store, &slot(DKG_MASTER_PKS_LOC), round, mpk);
    }

    /// The master public key `proposer_id` submitted for `round`, if any.
    /// Indexed separately from the flat `dkg_master_public_keys` list so a
    /// complaint against a specific proposer can be checked against the
    /// exact share it names.
    #[must_use]
    pub fn dkg_master_public_key_by_node(&self, round: u64, proposer_id: Hash32) -> Option<Bytes> {
        let base = array_base_loc(&slot(DKG_MASTER_PK_BY_NODE_LOC));
        let round_loc = add_offset(&base, round);
        let loc = map_loc(&round_loc, &proposer_id.0);
        let data = storage::read_bytes(self.store, &loc);
        if data.is_empty() {
            None
        } else {
            Some(Bytes::from(data))
        }
    }

    pub fn put_dkg_master_public_key_by_node(&mut self, round: u64, proposer_id: Hash32, mpk: &[u8]) {
        let base = array_base_loc(&slot(DKG_MASTER_PK_BY_NODE_LOC));
        let round_loc = add_offset(&base, round);
        let loc = map_loc(&round_loc, &proposer_id.0);
        storage::write_bytes(self.store, &loc, mpk);
    }

    #[must_use]
    pub fn dkg_complaints(&self, round: u64) -> Vec<Bytes> {
        storage::read_2d_byte_array(self.store, &slot(DKG_COMPLAINTS_LOC), round)
            .into_iter()
            .map(Bytes::from)
            .collect()
    }

    pub fn push_dkg_complaint(&mut self, round: u64, complaint: &[u8]) {
        storage::append_to_2d_byte_array(self.store, &slot(DKG_COMPLAINTS_LOC), round, complaint);
    }

    #[must_use]
    pub fn dkg_mpk_ready(&self, round: u64, addr: Address) -> bool {
        let base = array_base_loc(&slot(DKG_MPK_READY_LOC));
        let round_loc = add_offset(&base, round);
        let loc = map_loc(&round_loc, &addr.0);
        u64_from_word(&self.store.get(&loc)) != 0
    }

    pub fn put_dkg_mpk_ready(&mut self, round: u64, addr: Address, ready: bool) {
        let base = array_base_loc(&slot(DKG_MPK_READY_LOC));
        let round_loc = add_offset(&base, round);
        let loc = map_loc(&round_loc, &addr.0);
        self.store.set(loc, word_from_u64(u64::from(ready)));
    }

    #[must_use]
    pub fn dkg_mpk_readys_count(&self, round: u64) -> u64 {
        let base = array_base_loc(&slot(DKG_MPK_READYS_COUNT_LOC));
        u64_from_word(&self.store.get(&add_offset(&base, round)))
    }

    pub fn inc_dkg_mpk_readys_count(&mut self, round: u64) {
        let base = array_base_loc(&slot(DKG_MPK_READYS_COUNT_LOC));
        let loc = add_offset(&base, round);
        let count = u64_from_word(&self.store.get(&loc));
        self.store.set(loc, word_from_u64(count + 1));
    }

    #[must_use]
    pub fn dkg_finalized(&self, round: u64, addr: Address) -> bool {
        let base = array_base_loc(&slot(DKG_FINALIZED_LOC));
        let round_loc = add_offset(&base, round);
        let loc = map_loc(&round_loc, &addr.0);
        u64_from_word(&self.store.get(&loc)) != 0
    }

    pub fn put_dkg_finalized(&mut self, round: u64, addr: Address, finalized: bool) {
        let base = array_base_loc(&slot(DKG_FINALIZED_LOC));
        let round_loc = add_offset(&base, round);
        let loc = map_loc(&round_loc, &addr.0);
        self.store.set(loc, word_from_u64(u64::from(finalized)));
    }

    #[must_use]
    pub fn dkg_finalizeds_count(&self, round: u64) -> u64 {
        let base = array_base_loc(&slot(DKG_FINALIZEDS_COUNT_LOC));
        u64_from_word(&self.store.get(&add_offset(&base, round)))
    }

    pub fn inc_dkg_finalizeds_count(&mut self, round: u64) {
        let base = array_base_loc(&slot(DKG_FINALIZEDS_COUNT_LOC));
        let loc = add_offset(&base, round);
        let count = u64_from_word(&self.store.get(&loc));
        self.store.set(loc, word_from_u64(count + 1));
    }

    // --- Fines --------------------------------------------------

    #[must_use]
    pub fn fine_value(&self, report_type: u64) -> U256 {
        let base = array_base_loc(&slot(FINE_VALUES_LOC));
        word_to_u256(&self.store.get(&add_offset(&base, report_type)))
    }

    pub fn set_fine_value(&mut self, report_type: u64, value: U256) {
        let base = array_base_loc(&slot(FINE_VALUES_LOC));
        self.store.set(add_offset(&base, report_type), u256_to_word(value));
    }

    #[must_use]
    pub fn fine_records(&self, payload_hash: Hash32) -> bool {
        let loc = map_loc(&slot(FINE_RECORDS_LOC), &payload_hash.0);
        u64_from_word(&self.store.get(&loc)) != 0
    }

    pub fn set_fine_records(&mut self, payload_hash: Hash32, fined: bool) {
        let loc = map_loc(&slot(FINE_RECORDS_LOC), &payload_hash.0);
        self.store.set(loc, word_from_u64(u64::from(fined)));
    }

    // --- Owner / configuration --------------------------------------

    #[must_use]
    pub fn owner(&self) -> Owner {
        Owner(word_to_address(&self.store.get(&slot(OWNER_LOC))))
    }

    pub fn set_owner(&mut self, owner: Address) {
        self.store.set(slot(OWNER_LOC), address_to_word(owner));
    }

    #[must_use]
    pub fn configuration(&self) -> Configuration {
        let get = |i: u64| word_to_u256(&self.store.get(&add_offset(&slot(CONFIG_LOC), i)));
        Configuration {
            min_stake: get(0),
            lockup_period: get(1),
            block_reward: get(2),
            block_gas_limit: get(3),
            num_chains: get(4).as_u32(),
            lambda_ba: get(5),
            lambda_dkg: get(6),
            k: get(7).as_u32(),
            phi_ratio: get(8),
            notary_set_size: get(9).as_u32(),
            dkg_set_size: get(10).as_u32(),
            round_interval: get(11),
            min_block_interval: get(12),
        }
    }

    pub fn update_configuration(&mut self, cfg: &Configuration) {
        let mut set = |i: u64, v: U256| self.store.set(add_offset(&slot(CONFIG_LOC), i), u256_to_word(v));
        set(0, cfg.min_stake);
        set(1, cfg.lockup_period);
        set(2, cfg.block_reward);
        set(3, cfg.block_gas_limit);
        set(4, U256::from(cfg.num_chains));
        set(5, cfg.lambda_ba);
        set(6, cfg.lambda_dkg);
        set(7, U256::from(cfg.k));
        set(8, cfg.phi_ratio);
        set(9, U256::from(cfg.notary_set_size));
        set(10, U256::from(cfg.dkg_set_size));
        set(11, cfg.round_interval);
        set(12, cfg.min_block_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryWordStore;

    fn sample_node(owner: Address) -> Node {
        Node {
            owner,
            public_key: Bytes::from(vec![1, 2, 3]),
            staked: U256::from(100u64),
            fined: U256::zero(),
            name: BoundedString::new("alice", 32).unwrap(),
            email: BoundedString::new("a@example.com", 32).unwrap(),
            location: BoundedString::new("nowhere", 32).unwrap(),
            url: BoundedString::new("http://example.com", 128).unwrap(),
            unstaked: false,
        }
    }

    #[test]
    fn test_push_and_read_node_roundtrip() {
        let mut store = InMemoryWordStore::default();
        let mut acc = GovernanceAccessors::new(&mut store);
        let owner = Address::new([9u8; 20]);
        let node = sample_node(owner);
        let offset = acc.push_node(&node);
        assert_eq!(offset, 0);
        assert_eq!(acc.len_nodes(), 1);
        let read_back = acc.node(0);
        assert_eq!(read_back.owner, owner);
        assert_eq!(read_back.staked, U256::from(100u64));
        assert_eq!(read_back.name.as_str(), "alice");
    }

    #[test]
    fn test_offset_plus_one_convention() {
        let mut store = InMemoryWordStore::default();
        let mut acc = GovernanceAccessors::new(&mut store);
        let addr = Address::new([1u8; 20]);
        assert_eq!(acc.nodes_offset_by_address(addr), None);
        acc.put_nodes_offset_by_address(addr, 0);
        assert_eq!(acc.nodes_offset_by_address(addr), Some(0));
        acc.delete_nodes_offset_by_address(addr);
        assert_eq!(acc.nodes_offset_by_address(addr), None);
    }

    #[test]
    fn test_pop_last_node_swap_pattern() {
        let mut store = InMemoryWordStore::default();
        let mut acc = GovernanceAccessors::new(&mut store);
        let a = sample_node(Address::new([1u8; 20]));
        let b = sample_node(Address::new([2u8; 20]));
        acc.push_node(&a);
        acc.push_node(&b);
        // Simulate removing index 0 by moving the last element into it.
        let last = acc.node(1);
        acc.update_node(0, &last);
        acc.pop_last_node();
        assert_eq!(acc.len_nodes(), 1);
        assert_eq!(acc.node(0).owner, Address::new([2u8; 20]));
    }

    #[test]
    fn test_dkg_mpk_ready_and_count() {
        let mut store = InMemoryWordStore::default();
        let mut acc = GovernanceAccessors::new(&mut store);
        let addr = Address::new([3u8; 20]);
        assert!(!acc.dkg_mpk_ready(1, addr));
        acc.put_dkg_mpk_ready(1, addr, true);
        acc.inc_dkg_mpk_readys_count(1);
        assert!(acc.dkg_mpk_ready(1, addr));
        assert_eq!(acc.dkg_mpk_readys_count(1), 1);
    }

    #[test]
    fn test_crs_round_tracking() {
        let mut store = InMemoryWordStore::default();
        let mut acc = GovernanceAccessors::new(&mut store);
        assert_eq!(acc.round(), u64::MAX); // len=0 underflow sentinel, before genesis CRS is pushed
        acc.push_crs(Hash32::new([7u8; 32]));
        assert_eq!(acc.round(), 0);
        assert_eq!(acc.crs(0), Hash32::new([7u8; 32]));
    }
}
