use std::path::PathBuf;

use clap::Parser;

use sortperf::keygen::{self, Presort, MAX_KEY_NR};
use sortperf::{datfile, plot};

/// Generate integer data for sorting performance assessment.
#[derive(Parser)]
#[command(name = "mkintdat", version)]
struct Args {
    /// Output directory where to generate data
    #[arg(value_name = "OUT_DIR")]
    dir_path: PathBuf,

    /// Number of keys to generate
    #[arg(value_name = "KEY_NR")]
    key_nr: u64,

    /// Presorting scheme
    #[arg(value_name = "PRESORT", value_enum)]
    presort: Presort,

    /// Skip rendering the dataset ordering chart
    #[arg(long)]
    no_plot: bool,
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

    let keys = keygen::generate(args.presort, args.key_nr as usize);

    let data_path = datfile::data_file_path(&args.dir_path, args.key_nr, args.presort);
    datfile::write_keys(&data_path, &keys)?;

    if !args.no_plot {
        let base = args
            .dir_path
            .join(datfile::data_file_base(args.key_nr, args.presort));
        plot::plot_ordering(
            &keys,
            &format!("presort: {} #keys: {}", args.presort, args.key_nr),
            &base,
        )?;
    }

    Ok(())
}
