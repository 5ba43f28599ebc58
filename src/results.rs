//! Parsing and aggregation of benchmark result files.
//!
//! A result file holds one header line of space-separated `key=value`
//! tokens describing the dataset and algorithm, then one line per
//! measurement run. Unrecognized keys are warned about and ignored so the
//! benchmark binary can grow new counters without breaking older tooling.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::stats;

/// One measurement run: elapsed nanoseconds plus optional operation
/// counters reported by instrumented builds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerfRun {
    pub nsec: u32,
    pub cmp: Option<u64>,
    pub swap: Option<u64>,
}

/// All runs of one (dataset, algorithm) benchmark invocation.
#[derive(Clone, Debug)]
pub struct PerfResult {
    pub key_type: String,
    pub key_nr: u64,
    pub presort: String,
    pub algo: String,
    pub runs: Vec<PerfRun>,
}

fn split_token(token: &str) -> Result<(&str, &str), String> {
    token
        .split_once('=')
        .ok_or_else(|| format!("malformed token {token:?}"))
}

impl PerfResult {
    /// Parse a result file. Structural damage (missing header fields, an
    /// unparsable value, a run without a time) is an error; unknown keys
    /// are merely warned about.
    pub fn parse(path: &Path) -> Result<Self, String> {
        let file = File::open(path).map_err(|e| format!("open {}: {e}", path.display()))?;
        let mut lines = BufReader::new(file).lines();

        let header = lines
            .next()
            .ok_or_else(|| format!("{}: empty result file", path.display()))?
            .map_err(|e| format!("read {}: {e}", path.display()))?;

        let mut key_type = None;
        let mut key_nr = None;
        let mut presort = None;
        let mut algo = None;

        for token in header.split(' ').filter(|t| !t.is_empty()) {
            let (prop, val) = split_token(token)?;
            match prop {
                "type" => key_type = Some(val.to_string()),
                "keynr" => {
                    key_nr = Some(
                        val.parse::<u64>()
                            .map_err(|e| format!("keynr {val:?}: {e}"))?,
                    )
                }
                "presort" => presort = Some(val.to_string()),
                "algo" => algo = Some(val.to_string()),
                _ => eprintln!("unknown header property {prop}"),
            }
        }

        let mut runs = Vec::new();
        for line in lines {
            let line = line.map_err(|e| format!("read {}: {e}", path.display()))?;
            if line.is_empty() {
                continue;
            }

            let mut nsec = None;
            let mut cmp = None;
            let mut swap = None;
            for token in line.split(' ').filter(|t| !t.is_empty()) {
                let (prop, val) = split_token(token)?;
                match prop {
                    "nsec" => {
                        nsec = Some(
                            val.parse::<u32>()
                                .map_err(|e| format!("nsec {val:?}: {e}"))?,
                        )
                    }
                    "cmp" => {
                        cmp = Some(val.parse::<u64>().map_err(|e| format!("cmp {val:?}: {e}"))?)
                    }
                    "swap" => {
                        swap = Some(
                            val.parse::<u64>()
                                .map_err(|e| format!("swap {val:?}: {e}"))?,
                        )
                    }
                    _ => eprintln!("unknown run property {prop}"),
                }
            }

            runs.push(PerfRun {
                nsec: nsec.ok_or_else(|| format!("{}: run line without nsec", path.display()))?,
                cmp,
                swap,
            });
        }

        Ok(PerfResult {
            key_type: key_type
                .ok_or_else(|| format!("{}: header without type", path.display()))?,
            key_nr: key_nr.ok_or_else(|| format!("{}: header without keynr", path.display()))?,
            presort: presort
                .ok_or_else(|| format!("{}: header without presort", path.display()))?,
            algo: algo.ok_or_else(|| format!("{}: header without algo", path.display()))?,
            runs,
        })
    }

    /// Outlier-filtered mean run time in nanoseconds.
    ///
    /// Recomputed on each call; result files hold at most a few hundred
    /// runs, so caching buys nothing.
    pub fn average_nsec(&self, threshold: f64) -> Result<f64, String> {
        let nsecs: Vec<u32> = self.runs.iter().map(|r| r.nsec).collect();
        stats::filtered_mean(&nsecs, threshold)
    }
}

/// In-memory collection of parsed results, grouped on demand.
#[derive(Default)]
pub struct ResultSet {
    results: Vec<PerfResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, result: PerfResult) {
        self.results.push(result);
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Load every `.txt` file in a directory, skipping corrupted files with
    /// a warning rather than aborting the aggregation.
    pub fn load_dir(dir: &Path) -> Result<Self, String> {
        let entries =
            std::fs::read_dir(dir).map_err(|e| format!("read {}: {e}", dir.display()))?;

        let mut set = ResultSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| format!("read {}: {e}", dir.display()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }

            match PerfResult::parse(&path) {
                Ok(result) => set.register(result),
                Err(e) => eprintln!("{} file is corrupted, skipping... ({e})", path.display()),
            }
        }

        Ok(set)
    }

    /// Sorted unique presort scheme names present in the set.
    pub fn presorts(&self) -> Vec<String> {
        let mut presorts: Vec<String> = self.results.iter().map(|r| r.presort.clone()).collect();
        presorts.sort();
        presorts.dedup();
        presorts
    }

    /// Sorted unique algorithm names present in the set.
    pub fn algorithms(&self) -> Vec<String> {
        let mut algos: Vec<String> = self.results.iter().map(|r| r.algo.clone()).collect();
        algos.sort();
        algos.dedup();
        algos
    }

    /// Results matching the given presort scheme and algorithm, ordered by
    /// key count.
    pub fn select(&self, presort: &str, algo: &str) -> Vec<&PerfResult> {
        let mut selected: Vec<&PerfResult> = self
            .results
            .iter()
            .filter(|r| r.presort == presort && r.algo == algo)
            .collect();
        selected.sort_by_key(|r| r.key_nr);
        selected
    }
}
