//! Cache and store metrics.

use metrics::{counter, describe_counter};

/// Metric names.
pub mod names {
    pub const CACHE_HITS: &str = "userbase_cache_hits_total";
    pub const CACHE_MISSES: &str = "userbase_cache_misses_total";
    pub const CACHE_LOOKUP_FAILURES: &str = "userbase_cache_lookup_failures_total";
    pub const CACHE_WRITE_FAILURES: &str = "userbase_cache_write_failures_total";
    pub const STORE_READS: &str = "userbase_store_reads_total";
    pub const USERS_CREATED: &str = "userbase_users_created_total";
}

/// Register metric descriptions with the installed recorder.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS, "User lookups answered by the cache");
    describe_counter!(names::CACHE_MISSES, "User lookups the cache could not answer");
    describe_counter!(
        names::CACHE_LOOKUP_FAILURES,
        "Cache lookups that failed and fell through to the store"
    );
    describe_counter!(
        names::CACHE_WRITE_FAILURES,
        "Cache writes that failed, labelled by path (fetch, create)"
    );
    describe_counter!(names::STORE_READS, "User lookups sent to the store");
    describe_counter!(names::USERS_CREATED, "Users inserted into the store");
}

pub(crate) fn record_cache_hit() {
    counter!(names::CACHE_HITS).increment(1);
}

pub(crate) fn record_cache_miss() {
    counter!(names::CACHE_MISSES).increment(1);
}

pub(crate) fn record_cache_lookup_failure() {
    counter!(names::CACHE_LOOKUP_FAILURES).increment(1);
}

pub(crate) fn record_cache_write_failure(path: &'static str) {
    counter!(names::CACHE_WRITE_FAILURES, "path" => path).increment(1);
}

pub(crate) fn record_store_read() {
    counter!(names::STORE_READS).increment(1);
}

pub(crate) fn record_user_created() {
    counter!(names::USERS_CREATED).increment(1);
}
