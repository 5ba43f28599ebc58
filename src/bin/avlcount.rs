use clap::Parser;

use sortperf::avl::avl_min_count;

/// Print the minimum number of nodes an AVL tree of the given height holds.
#[derive(Parser)]
#[command(name = "avlcount", version)]
struct Args {
    /// Tree height
    #[arg(value_name = "HEIGHT")]
    height: u64,
}

fn main() {
    let args = Args::parse();
    println!("{}", avl_min_count(args.height));
}
