use std::path::PathBuf;

use clap::Parser;

use sortperf::xunit::XunitReport;

/// Translate xunit compliant XML file to reStructuredText.
#[derive(Parser)]
#[command(name = "xunit2rst", version)]
struct Args {
    /// XSD schema used to validate input XML file
    #[arg(value_name = "XSD_PATH")]
    xsd: PathBuf,

    /// XML file input to convert
    #[arg(value_name = "XML_PATH")]
    xml: PathBuf,

    /// Report name used for the top-level table
    #[arg(long, default_value = "sortperf")]
    name: String,
}

fn main() {
    let args = Args::parse();

    let report = match XunitReport::load(&args.xml, &args.xsd) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Failed to validate XML input: {e}");
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = report.translate(&args.name, &mut out) {
        eprintln!("Failed to translate XML input: {e}");
        std::process::exit(1);
    }
}
