// Support tooling for sorting / AVL tree performance assessment: dataset
// synthesis, benchmark driving, result aggregation and plotting, and
// xunit report translation. The sort and tree binaries under test live in
// a separate repository and are driven as subprocesses.

pub mod avl;
pub mod datfile;
pub mod keygen;
pub mod plot;
pub mod results;
pub mod runner;
pub mod stats;
pub mod xunit;

// Export the main types
pub use avl::avl_min_count;
pub use datfile::{data_file_base, data_file_path, read_keys, write_keys};
pub use keygen::{Presort, MAX_KEY_NR};
pub use results::{PerfResult, PerfRun, ResultSet};
pub use runner::{SortAlgo, BENCH_TIMEOUT};
pub use stats::DEFAULT_OUTLIER_THRESHOLD;
pub use xunit::XunitReport;
