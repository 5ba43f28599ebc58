use std::path::PathBuf;

use clap::Parser;

use sortperf::plot;
use sortperf::results::ResultSet;
use sortperf::runner::SortAlgo;

/// Plot sorting performance results by algorithm.
#[derive(Parser)]
#[command(name = "plotpt", version)]
struct Args {
    /// Directory holding the .txt result files; the chart lands there too
    #[arg(value_name = "OUT_DIR")]
    dir_path: PathBuf,

    /// Sorting algorithm
    #[arg(value_name = "ALGORITHM", value_enum)]
    algo: SortAlgo,

    /// Also print the aggregated data points to standard output
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let set = ResultSet::load_dir(&args.dir_path)?;
    if set.is_empty() {
        return Err(format!("no result files in {}", args.dir_path.display()).into());
    }

    if args.interactive {
        for series in plot::algo_series(&set, args.algo.as_str()) {
            println!("presort={}", series.presort);
            for (keys, usec) in &series.points {
                println!("  keynr={keys:.0} usec={usec:.3}");
            }
        }
    }

    let path = plot::plot_algo(&args.dir_path, args.algo.as_str(), &set)?;
    println!("{}", path.display());

    Ok(())
}
