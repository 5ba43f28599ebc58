//! Driver for the external sort benchmark binary.
//!
//! The binary under test is a separate executable taking a dataset path, an
//! algorithm name and a loop count, and printing one `key=value` formatted
//! measurement line per loop on stdout. The driver captures that output and
//! prepends the dataset header line so the result can be written straight to
//! a `.txt` result file.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use clap::ValueEnum;

use crate::datfile;
use crate::keygen::Presort;

/// Hard cap on a single benchmark invocation.
pub const BENCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Sorting algorithms the benchmark binary implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortAlgo {
    Insertion,
    Selection,
    Bubble,
    Merge,
}

impl SortAlgo {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortAlgo::Insertion => "insertion",
            SortAlgo::Selection => "selection",
            SortAlgo::Bubble => "bubble",
            SortAlgo::Merge => "merge",
        }
    }
}

impl std::fmt::Display for SortAlgo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the benchmark binary against an already generated dataset and return
/// its captured stdout.
///
/// Fails if the process cannot be spawned, exits nonzero, or overruns
/// [`BENCH_TIMEOUT`] (the process is killed in that case).
pub fn run_bench(
    bin_path: &Path,
    data_path: &Path,
    algo: SortAlgo,
    loop_nr: u64,
) -> Result<String, String> {
    let mut child = Command::new(bin_path)
        .arg(data_path)
        .arg(algo.as_str())
        .arg(loop_nr.to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| format!("spawn {}: {e}", bin_path.display()))?;

    // Drain stdout on a separate thread so a chatty benchmark cannot fill
    // the pipe and deadlock against our wait loop.
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| "benchmark stdout not captured".to_string())?;
    let reader = thread::spawn(move || {
        let mut out = String::new();
        stdout.read_to_string(&mut out).map(|_| out)
    });

    let deadline = Instant::now() + BENCH_TIMEOUT;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(format!(
                        "{}: benchmark timed out after {}s",
                        bin_path.display(),
                        BENCH_TIMEOUT.as_secs()
                    ));
                }
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => return Err(format!("wait on {}: {e}", bin_path.display())),
        }
    };

    let output = reader
        .join()
        .map_err(|_| "benchmark output reader panicked".to_string())?
        .map_err(|e| format!("read benchmark output: {e}"))?;

    if !status.success() {
        return Err(format!(
            "{}: benchmark exited with {status}",
            bin_path.display()
        ));
    }

    Ok(output)
}

/// Run one benchmark and format the full result text: the dataset header
/// line followed by the per-run measurement lines, empty lines skipped.
pub fn run_and_format(
    bin_path: &Path,
    dir_path: &Path,
    key_nr: u64,
    presort: Presort,
    algo: SortAlgo,
    loop_nr: u64,
) -> Result<String, String> {
    let data_path = datfile::data_file_path(dir_path, key_nr, presort);
    let output = run_bench(bin_path, &data_path, algo, loop_nr)?;

    let mut result = format!("type=int keynr={key_nr} presort={presort} algo={algo}\n");
    for line in output.lines().filter(|l| !l.is_empty()) {
        result.push_str(line);
        result.push('\n');
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algo_names_match_the_binary_interface() {
        assert_eq!(SortAlgo::Insertion.as_str(), "insertion");
        assert_eq!(SortAlgo::Merge.to_string(), "merge");
    }

    #[test]
    fn missing_binary_is_an_error() {
        let err = run_bench(
            Path::new("/nonexistent/sort-bench"),
            Path::new("/tmp/none.dat"),
            SortAlgo::Bubble,
            1,
        )
        .unwrap_err();
        assert!(err.contains("spawn"), "unexpected error: {err}");
    }
}
