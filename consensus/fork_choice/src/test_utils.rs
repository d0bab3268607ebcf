//! A minimal in-memory [`ForkChoiceStore`] used by this crate's and the attestation pool's
//! integration tests. Scores heads by raw attestation weight rather than LMD-GHOST proper; good
//! enough to exercise the pool's ingest/pack/select-head flow without pulling in a real
//! proto-array implementation.

use crate::ForkChoiceStore;
use std::collections::HashMap;
use types::{Checkpoint, EthSpec, Hash256, Slot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStoreError {
    UnknownBlock(Hash256),
}

struct BlockInfo {
    parent_root: Hash256,
    slot: Slot,
    weight: u64,
}

/// Weighs each known block by the number of distinct attesting indices seen for it and picks the
/// heaviest leaf (a block with no known children), breaking ties by root for determinism.
pub struct TestForkChoiceStore {
    blocks: HashMap<Hash256, BlockInfo>,
    children: HashMap<Hash256, Vec<Hash256>>,
    voters: HashMap<Hash256, std::collections::HashSet<u64>>,
    finalized_checkpoint: Checkpoint,
    safe_root: Hash256,
}

impl TestForkChoiceStore {
    pub fn new(genesis_root: Hash256) -> Self {
        let mut blocks = HashMap::new();
        blocks.insert(
            genesis_root,
            BlockInfo {
                parent_root: genesis_root,
                slot: Slot::new(0),
                weight: 0,
            },
        );
        Self {
            blocks,
            children: HashMap::new(),
            voters: HashMap::new(),
            finalized_checkpoint: Checkpoint {
                epoch: Default::default(),
                root: genesis_root,
            },
            safe_root: genesis_root,
        }
    }
}

impl<E: EthSpec> ForkChoiceStore<E> for TestForkChoiceStore {
    type Error = TestStoreError;

    fn process_block(
        &mut self,
        block_root: Hash256,
        parent_root: Hash256,
        block_slot: Slot,
        _justified_checkpoint: Checkpoint,
        finalized_checkpoint: Checkpoint,
    ) -> Result<(), Self::Error> {
        if !self.blocks.contains_key(&parent_root) {
            return Err(TestStoreError::UnknownBlock(parent_root));
        }
        self.blocks.insert(
            block_root,
            BlockInfo {
                parent_root,
                slot: block_slot,
                weight: 0,
            },
        );
        self.children.entry(parent_root).or_default().push(block_root);
        self.finalized_checkpoint = finalized_checkpoint;
        Ok(())
    }

    fn on_attestation(
        &mut self,
        _slot: Slot,
        block_root: Hash256,
        attesting_indices: &[u64],
        _wall_slot: Slot,
    ) -> Result<(), Self::Error> {
        let block = self
            .blocks
            .get(&block_root)
            .ok_or(TestStoreError::UnknownBlock(block_root))?;
        let _ = block;
        let voters = self.voters.entry(block_root).or_default();
        for &index in attesting_indices {
            voters.insert(index);
        }
        let weight = voters.len() as u64;
        self.blocks.get_mut(&block_root).unwrap().weight = weight;
        Ok(())
    }

    fn get_head(&mut self, _wall_slot: Slot) -> Result<Hash256, Self::Error> {
        let leaves: Vec<Hash256> = self
            .blocks
            .keys()
            .copied()
            .filter(|root| !self.children.contains_key(root))
            .collect();
        let head = leaves
            .into_iter()
            .max_by_key(|root| {
                let weight = self.blocks.get(root).map(|b| b.weight).unwrap_or(0);
                (weight, *root)
            })
            .unwrap_or(self.finalized_checkpoint.root);
        self.safe_root = head;
        Ok(head)
    }

    fn get_safe_beacon_block_root(&self) -> Hash256 {
        self.safe_root
    }

    fn prune(&mut self) -> Result<(), Self::Error> {
        let finalized_slot = self
            .blocks
            .get(&self.finalized_checkpoint.root)
            .map(|b| b.slot)
            .unwrap_or(Slot::new(0));
        self.blocks
            .retain(|root, info| info.slot >= finalized_slot || *root == self.finalized_checkpoint.root);
        Ok(())
    }
}
