//! mke-client - command line access to an MKE control plane

use mke_client::cli::{Args, Runner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_args();

    let runner = Runner::new(args)?;
    if let Err(e) = runner.run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
