use anyhow::Result;
use plot::Opts;
use structopt::StructOpt;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let opts = Opts::from_args();
    plot::start(opts)?;

    Ok(())
}
