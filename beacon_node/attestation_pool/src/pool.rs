use crate::config::PoolConfig;
use crate::dag::{ChainDag, Quarantine};
use crate::entry::{materialize_attestation, Entry};
use crate::packer::pack_phase0;
use crate::packer_electra::pack_electra;
use crate::{candidate_ring::CandidateRing, metrics};
use bls::CookedSignature;
use fork_choice::{ForkChoice, ForkChoiceStore};
use slog::{debug, error, trace, warn, Logger};
use std::time::Instant;
use types::{
    Attestation, AttestationData, BeaconHead, ChainSpec, Checkpoint, EthSpec, Hash256, Slot,
};

/// Host-provided hooks invoked after an attestation is durably folded into the pool.
/// Either may be absent.
pub trait Observer<E: EthSpec> {
    fn on_phase0_attestation_added(&self, _attestation: &Attestation<E>) {}
    fn on_electra_attestation_added(&self, _attestation: &Attestation<E>) {}
}

impl<E: EthSpec> Observer<E> for () {}

/// The wall-clock instant ingestion and packing are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    pub slot: Slot,
}

/// Everything the naive aggregation pool owns: two parallel candidate rings, the fork-choice façade the pool
/// drives, and the host-provided seams it reads or writes through on every call.
pub struct Pool<E, T, O = ()>
where
    E: EthSpec,
    T: ForkChoiceStore<E>,
    O: Observer<E>,
{
    config: PoolConfig,
    phase0: CandidateRing<E>,
    electra: CandidateRing<E>,
    fork_choice: ForkChoice<T, E>,
    observer: O,
    log: Logger,
}

impl<E, T, O> Pool<E, T, O>
where
    E: EthSpec,
    T: ForkChoiceStore<E>,
    O: Observer<E>,
{
    pub fn new(config: PoolConfig, spec: &ChainSpec, fork_choice: ForkChoice<T, E>, observer: O, log: Logger) -> Self {
        let window = spec.attestation_lookback();
        Self {
            config,
            phase0: CandidateRing::new(window),
            electra: CandidateRing::new(window),
            fork_choice,
            observer,
            log,
        }
    }

    pub fn fork_choice(&self) -> &ForkChoice<T, E> {
        &self.fork_choice
    }

    /// Ingests a single validated vote. `committee_len` sizes a freshly-created `Entry`.
    /// Precondition: `attestation` has already been fully validated (signature against
    /// `cooked_sig`, committee membership, shuffling) and, for electra, carries a singleton
    /// `committee_bits`.
    pub fn add(
        &mut self,
        attestation: Attestation<E>,
        committee_len: usize,
        attesting_indices: &[u64],
        cooked_sig: CookedSignature,
        wall_time: WallTime,
    ) {
        let window = self.phase0.window();
        if !self.phase0.advance(wall_time.slot) || !self.electra.advance(wall_time.slot) {
            error!(self.log, "Clock regression rejected"; "wall_slot" => wall_time.slot.as_u64(), "window" => window);
            return;
        }

        let Some(committee_index) = attestation.committee_index() else {
            debug!(self.log, "Dropping attestation with non-singleton committee bits");
            metrics::inc_counter_vec(&metrics::ATTESTATIONS_RECEIVED_TOTAL, &["malformed"]);
            return;
        };
        let schema = if attestation.is_electra() {
            crate::schema::Schema::Electra
        } else {
            crate::schema::Schema::Base
        };
        // Entries key their own `data.index` as the committee index for both schemas; the
        // zeroing required for electra's on-wire `AttestationData` is applied only when an
        // entry's validations are later materialized back into an `Attestation`.
        let mut data = *attestation.data();
        data.index = committee_index;
        let bits = attestation.aggregation_bits().clone();

        let (ring, fingerprint) = match schema {
            crate::schema::Schema::Base => (&mut self.phase0, data.phase0_fingerprint()),
            crate::schema::Schema::Electra => (&mut self.electra, data.electra_fingerprint(committee_index)),
        };

        let Some(index) = ring.candidate_index(data.slot) else {
            debug!(self.log, "Stale attestation slot dropped"; "slot" => data.slot.as_u64());
            metrics::inc_counter_vec(&metrics::ATTESTATIONS_RECEIVED_TOTAL, &["stale_slot"]);
            return;
        };

        let bucket = ring.bucket_mut(index);
        if !bucket.contains_key(&fingerprint) && bucket.len() >= self.config.max_attestations_per_slot {
            debug!(self.log, "Attestation bucket full, dropping new vote"; "slot" => data.slot.as_u64());
            metrics::inc_counter_vec(&metrics::ATTESTATIONS_RECEIVED_TOTAL, &["bucket_full"]);
            return;
        }
        let entry = bucket
            .entry(fingerprint)
            .or_insert_with(|| Entry::new(data, committee_len));

        if !entry.insert(&bits, cooked_sig) {
            trace!(self.log, "Duplicate vote ignored");
            metrics::inc_counter_vec(&metrics::ATTESTATIONS_RECEIVED_TOTAL, &["duplicate"]);
            return;
        }
        metrics::inc_counter_vec(&metrics::ATTESTATIONS_RECEIVED_TOTAL, &["accepted"]);

        if let Err(e) = self
            .fork_choice
            .on_attestation(data.slot, data.beacon_block_root, attesting_indices, wall_time.slot)
        {
            error!(self.log, "Fork choice rejected attestation vote"; "error" => format!("{e:?}"));
        }

        match schema {
            crate::schema::Schema::Base => self.observer.on_phase0_attestation_added(&attestation),
            crate::schema::Schema::Electra => self.observer.on_electra_attestation_added(&attestation),
        }
    }

    /// Packs a block's worth of phase0 attestations.
    pub fn pack_phase0<D: ChainDag<E>>(&mut self, dag: &D, state: &D::State, spec: &ChainSpec) -> Vec<Attestation<E>> {
        let start = Instant::now();
        let result = pack_phase0(&mut self.phase0, dag, state, spec);
        self.record_packing_metrics(start, "phase0", result.len());
        result
    }

    /// Packs a block's worth of electra attestations, including cross-committee consolidation.
    pub fn pack_electra<D: ChainDag<E>>(&mut self, dag: &D, state: &D::State, spec: &ChainSpec) -> Vec<Attestation<E>> {
        let start = Instant::now();
        let result = pack_electra(&mut self.electra, dag, state, spec);
        self.record_packing_metrics(start, "electra", result.len());
        result
    }

    fn record_packing_metrics(&self, start: Instant, schema: &'static str, count: usize) {
        metrics::set_float_gauge(&metrics::BLOCK_ATTESTATION_PACKING_TIME, start.elapsed().as_secs_f64());
        metrics::inc_counter_vec(&metrics::ATTESTATIONS_PACKED_TOTAL, &[schema]);
        debug!(self.log, "Packed attestations into block"; "schema" => schema, "count" => count);
    }

    /// Returns the best known aggregate for a single vote. Electra aggregates returned
    /// here always carry a singleton `committee_bits`; cross-committee consolidation only happens
    /// during block packing.
    pub fn get_aggregated(&mut self, data: &AttestationData, committee_index: Option<u64>) -> Option<Attestation<E>> {
        let schema = if committee_index.is_some() {
            crate::schema::Schema::Electra
        } else {
            crate::schema::Schema::Base
        };
        let (ring, fingerprint) = match schema {
            crate::schema::Schema::Base => (&mut self.phase0, data.phase0_fingerprint()),
            crate::schema::Schema::Electra => {
                let index = committee_index.expect("electra lookups always carry a committee index");
                (&mut self.electra, data.electra_fingerprint(index))
            }
        };
        let index = ring.candidate_index(data.slot)?;
        let entry = ring.bucket_mut(index).get_mut(&fingerprint)?;
        entry.update_aggregates();
        let best = entry
            .aggregates()
            .iter()
            .max_by_key(|v| v.aggregation_bits.num_set_bits())?;
        Some(entry.to_attestation(best, schema))
    }

    /// Yields one synthetic single-voter attestation per recorded single, then each stored
    /// aggregate, for every in-window entry matching the filters.
    pub fn iter_attestations(
        &mut self,
        schema: crate::schema::Schema,
        slot: Option<Slot>,
        committee_index: Option<u64>,
    ) -> Vec<Attestation<E>> {
        let ring = match schema {
            crate::schema::Schema::Base => &mut self.phase0,
            crate::schema::Schema::Electra => &mut self.electra,
        };
        let mut out = Vec::new();
        let start = ring.starting_slot().as_u64();
        let end = start + ring.window() as u64;
        for raw_slot in start..end {
            if let Some(wanted) = slot {
                if wanted.as_u64() != raw_slot {
                    continue;
                }
            }
            let Some(index) = ring.candidate_index(Slot::new(raw_slot)) else {
                continue;
            };
            for entry in ring.bucket_mut(index).values_mut() {
                if let Some(wanted) = committee_index {
                    if entry.data.index != wanted {
                        continue;
                    }
                }
                for validation in entry.singles_snapshot() {
                    out.push(materialize_attestation(&entry.data, &validation, schema));
                }
                for validation in entry.aggregates() {
                    out.push(materialize_attestation(&entry.data, validation, schema));
                }
            }
        }
        out
    }

    /// Registers a new block with the driven fork-choice store.
    pub fn add_fork_choice(
        &mut self,
        block_root: Hash256,
        parent_root: Hash256,
        block_slot: Slot,
        justified_checkpoint: Checkpoint,
        finalized_checkpoint: Checkpoint,
    ) {
        if let Err(e) = self.fork_choice.process_block(
            block_root,
            parent_root,
            block_slot,
            justified_checkpoint,
            finalized_checkpoint,
        ) {
            error!(self.log, "Fork choice rejected block"; "error" => format!("{e:?}"), "block_root" => format!("{block_root:?}"));
        }
    }

    /// Forwards a batch of votes implied by a block's attestations.
    pub fn add_fork_choice_votes(&mut self, slot: Slot, attesting_indices: &[u64], block_root: Hash256, wall_time: WallTime) {
        if let Err(e) = self.fork_choice.on_attestation(slot, block_root, attesting_indices, wall_time.slot) {
            error!(self.log, "Fork choice rejected votes"; "error" => format!("{e:?}"));
        }
    }

    /// Resolves the current head, quarantining it if the DAG does not yet know the resolved root.
    pub fn select_head<D, Q>(&mut self, dag: &D, quarantine: &mut Q, wall_time: WallTime) -> Option<BeaconHead>
    where
        D: ChainDag<E>,
        Q: Quarantine,
    {
        let root = match self.fork_choice.get_head(wall_time.slot) {
            Ok(root) => root,
            Err(e) => {
                error!(self.log, "Fork choice head resolution failed"; "error" => format!("{e:?}"));
                return None;
            }
        };

        let Some(head_ref) = dag.get_block_ref(root) else {
            warn!(self.log, "Head resolved to unknown root, quarantining"; "root" => format!("{root:?}"));
            quarantine.add_missing(root);
            return None;
        };

        let finalized_exec_block_hash = dag
            .load_execution_block_hash(&dag.finalized_head())
            .unwrap_or_default();
        let safe_root = self.fork_choice.get_safe_beacon_block_root();
        let safe_exec_block_hash = dag
            .get_block_ref(safe_root)
            .and_then(|safe_ref| dag.load_execution_block_hash(&safe_ref))
            .unwrap_or(finalized_exec_block_hash);

        debug!(self.log, "Head selected"; "head" => format!("{:?}", dag.block_root(&head_ref)));
        Some(BeaconHead {
            head: dag.block_root(&head_ref),
            safe_exec_block_hash,
            finalized_exec_block_hash,
        })
    }

    /// Discards fork-choice bookkeeping at or before the current finalized checkpoint.
    pub fn prune(&mut self) {
        if let Err(e) = self.fork_choice.prune() {
            error!(self.log, "Fork choice prune failed"; "error" => format!("{e:?}"));
        }
    }
}

