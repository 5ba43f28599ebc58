use std::path::PathBuf;

use clap::Parser;

use sortperf::keygen::{Presort, MAX_KEY_NR};
use sortperf::runner::{self, SortAlgo};

/// Sort input integer data file for performance assessment.
#[derive(Parser)]
#[command(name = "sortpt", version)]
struct Args {
    /// Binary file to execute
    #[arg(value_name = "BIN_FILE")]
    bin_path: PathBuf,

    /// Output directory where the data file lives
    #[arg(value_name = "OUT_DIR")]
    dir_path: PathBuf,

    /// Number of keys of the input dataset
    #[arg(value_name = "KEY_NR")]
    key_nr: u64,

    /// Presorting scheme
    #[arg(value_name = "PRESORT", value_enum)]
    presort: Presort,

    /// Sorting algorithm
    #[arg(value_name = "ALGORITHM", value_enum)]
    algo: SortAlgo,

    /// Number of measurement loops to run
    #[arg(value_name = "LOOP_NR")]
    loop_nr: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.key_nr > MAX_KEY_NR {
        let mut cmd = <Args as clap::CommandFactory>::command();
        cmd.error(
            clap::error::ErrorKind::ValueValidation,
            "argument KEY_NR: invalid number of keys specified",
        )
        .exit();
    }

    let result = runner::run_and_format(
        &args.bin_path,
        &args.dir_path,
        args.key_nr,
        args.presort,
        args.algo,
        args.loop_nr,
    )?;
    print!("{result}");

    Ok(())
}
