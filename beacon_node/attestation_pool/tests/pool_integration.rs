use attestation_pool::{ChainDag, Pool, PoolConfig, Quarantine, WallTime};
use bls::{generate_deterministic_keypair, AggregateSignature, CookedSignature};
use fork_choice::test_utils::TestForkChoiceStore;
use fork_choice::ForkChoice;
use std::collections::HashMap;
use types::{
    AggregationBits, Attestation, AttestationBase, AttestationData, AttestationElectra,
    ChainSpec, Checkpoint, CommitteeBits, Epoch, EthSpec, Hash256, MinimalEthSpec, Slot,
};

type E = MinimalEthSpec;

/// A tiny in-memory DAG test double: every registered root is considered known and shares the
/// same exec-payload hash bookkeeping. Good enough to exercise `select_head` and the packer's
/// compatibility checks without pulling in real state processing.
struct InMemoryDag {
    exec_hashes: HashMap<Hash256, Hash256>,
}

impl InMemoryDag {
    fn new(genesis: Hash256) -> Self {
        let mut exec_hashes = HashMap::new();
        exec_hashes.insert(genesis, Hash256::repeat_byte(0xee));
        Self { exec_hashes }
    }

    fn register(&mut self, root: Hash256, exec_hash: Hash256) {
        self.exec_hashes.insert(root, exec_hash);
    }
}

impl ChainDag<E> for InMemoryDag {
    type BlockRef = Hash256;
    type EpochRef = ();
    type State = Slot;

    fn state_slot(&self, state: &Self::State) -> Slot {
        *state
    }

    fn get_finalized_epoch_ref(&self) -> Self::EpochRef {}

    fn get_epoch_ref(&self, _block_ref: &Self::BlockRef, _epoch: Epoch, _prefer_finalized: bool) -> Option<Self::EpochRef> {
        Some(())
    }

    fn get_block_ref(&self, root: Hash256) -> Option<Self::BlockRef> {
        self.exec_hashes.contains_key(&root).then_some(root)
    }

    fn at_slot(&self, block_ref: &Self::BlockRef, _slot: Slot) -> Option<Self::BlockRef> {
        Some(*block_ref)
    }

    fn block_root(&self, block_ref: &Self::BlockRef) -> Hash256 {
        *block_ref
    }

    fn head(&self) -> Self::BlockRef {
        *self.exec_hashes.keys().next().expect("genesis always registered")
    }

    fn finalized_head(&self) -> Self::BlockRef {
        self.head()
    }

    fn load_execution_block_hash(&self, block_ref: &Self::BlockRef) -> Option<Hash256> {
        self.exec_hashes.get(block_ref).copied()
    }

    fn dependent_root(&self, _state: &Self::State, _epoch: Epoch) -> Hash256 {
        Hash256::zero()
    }

    fn check_attestation(&self, _state: &Self::State, _data: &AttestationData, _bits_len: usize) -> bool {
        true
    }

    fn check_attestation_compatible(&self, _state: &Self::State, _target_epoch: Epoch, _target_root: Hash256) -> bool {
        true
    }
}

#[derive(Default)]
struct RecordingQuarantine {
    missing: Vec<Hash256>,
}

impl Quarantine for RecordingQuarantine {
    fn add_missing(&mut self, root: Hash256) {
        self.missing.push(root);
    }
}

fn test_pool(spec: &ChainSpec, genesis: Hash256) -> Pool<E, TestForkChoiceStore> {
    let store = TestForkChoiceStore::new(genesis);
    let fork_choice = ForkChoice::new(store, genesis);
    let log = slog::Logger::root(slog::Discard, slog::o!());
    Pool::new(PoolConfig::default(), spec, fork_choice, (), log)
}

fn vote_data(slot: u64, index: u64, block_root: Hash256) -> AttestationData {
    AttestationData {
        slot: Slot::new(slot),
        index,
        beacon_block_root: block_root,
        source: Checkpoint::default(),
        target: Checkpoint {
            epoch: Epoch::new(0),
            root: block_root,
        },
    }
}

/// Builds a singleton-bit phase0 attestation plus the cooked signature `Pool::add` needs to fold
/// it in.
fn base_vote(committee_len: usize, voter: usize, data: AttestationData, seed: u64) -> (Attestation<E>, CookedSignature) {
    let (sk, _pk) = generate_deterministic_keypair(seed);
    let cooked: CookedSignature = sk.sign(b"vote").into();
    let mut bits = AggregationBits::<E>::with_capacity(committee_len).unwrap();
    bits.set(voter, true).unwrap();
    let mut agg = AggregateSignature::infinity();
    agg.aggregate(&cooked);
    let attestation = Attestation::Base(AttestationBase {
        aggregation_bits: bits,
        data,
        signature: agg,
    });
    (attestation, cooked)
}

/// As [`base_vote`], for an electra singleton-committee attestation.
fn electra_vote(
    committee_len: usize,
    committee_index: u64,
    voter: usize,
    data: AttestationData,
    seed: u64,
) -> (Attestation<E>, CookedSignature) {
    let (sk, _pk) = generate_deterministic_keypair(seed);
    let cooked: CookedSignature = sk.sign(b"vote").into();
    let mut bits = AggregationBits::<E>::with_capacity(committee_len).unwrap();
    bits.set(voter, true).unwrap();
    let mut agg = AggregateSignature::infinity();
    agg.aggregate(&cooked);
    let mut committee_bits = CommitteeBits::<E>::new();
    committee_bits.set(committee_index as usize, true).unwrap();
    let attestation = Attestation::Electra(AttestationElectra {
        aggregation_bits: bits,
        committee_bits,
        data: data.with_index_zeroed(),
        signature: agg,
    });
    (attestation, cooked)
}

#[test]
fn phase0_votes_are_aggregated_and_packed() {
    let spec = ChainSpec::minimal();
    let genesis = Hash256::repeat_byte(1);
    let mut pool = test_pool(&spec, genesis);
    let dag = InMemoryDag::new(genesis);

    let data = vote_data(2, 0, genesis);
    let (att_a, cooked_a) = base_vote(8, 0, data, 1);
    let (att_b, cooked_b) = base_vote(8, 1, data, 2);

    let wall_time = WallTime { slot: Slot::new(2) };
    pool.add(att_a, 8, &[10], cooked_a, wall_time);
    pool.add(att_b, 8, &[11], cooked_b, wall_time);

    let packed = pool.pack_phase0(&dag, &Slot::new(3), &spec);
    assert_eq!(packed.len(), 1);
    match &packed[0] {
        Attestation::Base(att) => assert_eq!(att.aggregation_bits.num_set_bits(), 2),
        Attestation::Electra(_) => panic!("expected a phase0 attestation"),
    }
}

#[test]
fn duplicate_vote_does_not_grow_the_entry() {
    let spec = ChainSpec::minimal();
    let genesis = Hash256::repeat_byte(1);
    let mut pool = test_pool(&spec, genesis);

    let data = vote_data(2, 0, genesis);
    let (att, cooked) = base_vote(8, 0, data, 1);
    let wall_time = WallTime { slot: Slot::new(2) };

    pool.add(att.clone(), 8, &[10], cooked.clone(), wall_time);
    pool.add(att, 8, &[10], cooked, wall_time);

    let resident = pool.iter_attestations(attestation_pool::Schema::Base, Some(Slot::new(2)), Some(0));
    assert_eq!(resident.len(), 1, "duplicate ingestion must not duplicate the single voter");
}

#[test]
fn electra_votes_from_disjoint_committees_consolidate_on_packing() {
    let spec = ChainSpec::minimal();
    let genesis = Hash256::repeat_byte(1);
    let mut pool = test_pool(&spec, genesis);
    let dag = InMemoryDag::new(genesis);

    let data_committee_0 = vote_data(2, 0, genesis);
    let data_committee_1 = vote_data(2, 1, genesis);
    let (att_a, cooked_a) = electra_vote(8, 0, 0, data_committee_0, 11);
    let (att_b, cooked_b) = electra_vote(8, 1, 0, data_committee_1, 12);

    let wall_time = WallTime { slot: Slot::new(2) };
    pool.add(att_a, 8, &[20], cooked_a, wall_time);
    pool.add(att_b, 8, &[21], cooked_b, wall_time);

    let packed = pool.pack_electra(&dag, &Slot::new(3), &spec);
    assert_eq!(packed.len(), 1, "disjoint-committee votes for the same data consolidate into one attestation");
    match &packed[0] {
        Attestation::Electra(att) => {
            let committees_set = att.committee_bits.iter().filter(|&b| b).count();
            assert_eq!(committees_set, 2);
            assert_eq!(att.aggregation_bits.num_set_bits(), 2);
        }
        Attestation::Base(_) => panic!("expected an electra attestation"),
    }
}

#[test]
fn select_head_quarantines_unknown_roots() {
    let spec = ChainSpec::minimal();
    let genesis = Hash256::repeat_byte(1);
    let unknown_child = Hash256::repeat_byte(2);
    let mut pool = test_pool(&spec, genesis);
    let dag = InMemoryDag::new(genesis);
    let mut quarantine = RecordingQuarantine::default();

    pool.add_fork_choice(unknown_child, genesis, Slot::new(1), Checkpoint::default(), Checkpoint::default());
    pool.add_fork_choice_votes(Slot::new(1), &[1, 2, 3], unknown_child, WallTime { slot: Slot::new(1) });

    let head = pool.select_head(&dag, &mut quarantine, WallTime { slot: Slot::new(1) });
    assert_eq!(head, None);
    assert_eq!(quarantine.missing, vec![unknown_child]);
}

#[test]
fn select_head_resolves_a_known_root() {
    let spec = ChainSpec::minimal();
    let genesis = Hash256::repeat_byte(1);
    let child = Hash256::repeat_byte(3);
    let mut pool = test_pool(&spec, genesis);
    let mut dag = InMemoryDag::new(genesis);
    dag.register(child, Hash256::repeat_byte(0xaa));
    let mut quarantine = RecordingQuarantine::default();

    pool.add_fork_choice(child, genesis, Slot::new(1), Checkpoint::default(), Checkpoint::default());
    pool.add_fork_choice_votes(Slot::new(1), &[1, 2, 3], child, WallTime { slot: Slot::new(1) });

    let head = pool
        .select_head(&dag, &mut quarantine, WallTime { slot: Slot::new(1) })
        .expect("child is known to the dag");
    assert_eq!(head.head, child);
    assert!(quarantine.missing.is_empty());
}
