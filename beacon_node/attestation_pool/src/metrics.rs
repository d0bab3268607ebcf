pub use lighthouse_metrics::*;

use lazy_static::lazy_static;

lazy_static! {
    /// Wall-clock seconds the most recent call to a packer spent selecting attestations for a
    /// block. A gauge, not a histogram: callers care about the latest packing latency, not a
    /// distribution across many blocks.
    pub static ref BLOCK_ATTESTATION_PACKING_TIME: Result<Gauge> = try_create_float_gauge(
        "attestation_pool_block_attestation_packing_time",
        "Time taken to pack attestations into a block, in seconds"
    );

    pub static ref ATTESTATIONS_RECEIVED_TOTAL: Result<IntCounterVec> = try_create_int_counter_vec(
        "attestation_pool_attestations_received_total",
        "Count of attestations handed to Pool::add, by outcome",
        &["outcome"]
    );

    pub static ref ATTESTATIONS_PACKED_TOTAL: Result<IntCounterVec> = try_create_int_counter_vec(
        "attestation_pool_attestations_packed_total",
        "Count of attestations returned by a packer, by schema",
        &["schema"]
    );
}
