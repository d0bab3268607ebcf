//! A single-threaded naive aggregation pool: maintains the antichain of non-overlapping
//! aggregate votes per distinct `AttestationData`, drives block packing by greedy max-coverage
//! selection, and forwards accepted votes to a driven fork-choice store.

mod candidate_ring;
mod config;
mod coverage;
mod dag;
mod entry;
mod metrics;
mod packer;
mod packer_electra;
mod pool;
mod schema;

pub use candidate_ring::CandidateRing;
pub use config::PoolConfig;
pub use coverage::CoverageCache;
pub use dag::{ChainDag, Quarantine};
pub use entry::Entry;
pub use pool::{Observer, Pool, WallTime};
pub use schema::Schema;
