//! Synthetic Workload
//!
//! A deterministic mix of plain writes, expiring writes and reads used by the
//! driver binary to exercise the cache engine.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CacheStore, Clock};

/// Summary of one workload run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkloadReport {
    pub operations: usize,
    pub max_size: usize,
    pub key_space: u64,
    pub sets: u64,
    pub expiring_sets: u64,
    pub gets: u64,
    pub hits: u64,
    pub final_size: usize,
    pub elapsed_us: u64,
}

/// Runs `operations` steps against `cache`.
///
/// Step `i` touches key `i % key_space`, where the key space is twice the
/// cache capacity so that eviction happens continuously:
/// - `i % 3 == 0`: set without TTL
/// - `i % 3 == 1`: set with `ttl_seconds`
/// - `i % 7 == 0`: get
///
/// # Arguments
/// * `cache` - The cache to exercise
/// * `operations` - Number of steps to run
/// * `ttl_seconds` - TTL for the expiring writes
pub fn run_workload<C: Clock>(
    cache: &mut CacheStore<u64, String, C>,
    operations: usize,
    ttl_seconds: i64,
) -> WorkloadReport {
    let key_space = (cache.max_size() as u64).saturating_mul(2);
    let mut report = WorkloadReport {
        operations,
        max_size: cache.max_size(),
        key_space,
        ..WorkloadReport::default()
    };

    info!(operations, key_space, ttl_seconds, "Starting workload");
    let started = Instant::now();

    for i in 0..operations as u64 {
        let key = i % key_space;
        match i % 3 {
            0 => {
                cache.set(key, i.to_string(), 0);
                report.sets += 1;
            }
            1 => {
                cache.set(key, i.to_string(), ttl_seconds);
                report.sets += 1;
                report.expiring_sets += 1;
            }
            _ => {}
        }
        if i % 7 == 0 {
            report.gets += 1;
            if cache.get(&key).is_some() {
                report.hits += 1;
            }
        }
    }

    report.elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    report.final_size = cache.len();
    debug!(?report, "Workload finished");
    report
}
