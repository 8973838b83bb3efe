use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ec2emu::server::GatewayServer;
use ec2emu::{Emulator, EmulatorConfig};

#[derive(Parser)]
#[command(name = "ec2emu", about = "In-memory AWS EC2 API emulator", version)]
struct Cli {
    /// Address to bind the gateway to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8550)]
    port: u16,

    /// Region stamped onto created resources
    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Owner account ID stamped onto created resources
    #[arg(long = "account-id", default_value = "123456789012")]
    account_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let emulator = Arc::new(Emulator::with_config(EmulatorConfig::new(
        cli.region,
        cli.account_id,
    )));
    GatewayServer::new(emulator, &cli.host, cli.port).run().await
}
