use anyhow::{bail, Result};
use audience_sheet::{
    activate::{self, ActivationRequest, Channel, Dsp},
    fetch, report, spawn_load, Config,
};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Province-level audience summary from the published audience sheet.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Sheet query endpoint (overrides SHEET_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// HTTP timeout in seconds (overrides SHEET_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the sheet and print the per-province summary.
    Summary {
        /// Print the published JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Simulate pushing the segment to a DSP.
    Activate {
        #[arg(long)]
        dsp: Dsp,
        #[arg(long)]
        channel: Channel,
        #[arg(long)]
        advertiser: String,
        /// Insertion order id
        #[arg(long = "io")]
        io_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.url.as_deref(), cli.timeout_secs)?;

    // ─── logging ─────────────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    match cli.command.unwrap_or(Command::Summary { json: false }) {
        Command::Summary { json } => {
            let client = fetch::build_client(config.timeout)?;
            info!(url = %config.sheet_url, "loading sheet data");
            let mut handle = spawn_load(client, config.sheet_url.clone());
            let data = handle.settled().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else if data.error.is_none() {
                print!("{}", report::render_table(&data));
            }
            if let Some(err) = data.error {
                error!(error = %err, "sheet load failed");
                bail!("error loading data: {}", err);
            }
            info!(provinces = data.data.len(), "done");
        }

        Command::Activate {
            dsp,
            channel,
            advertiser,
            io_id,
        } => {
            let request = ActivationRequest {
                dsp,
                channel,
                advertiser,
                insertion_order_id: io_id,
            };
            info!(advertiser = %request.advertiser, "pushing segment");
            let activation = activate::push_segment(request, activate::PUSH_DELAY).await;
            println!("Successfully pushed to DSP");
            println!("Reference ID: {}", activation.reference_id);
            println!("DSP:          {}", activation.request.dsp);
            println!("Channel:      {}", activation.request.channel);
            println!("Advertiser:   {}", activation.request.advertiser);
            println!("IO ID:        {}", activation.request.insertion_order_id);
        }
    }

    Ok(())
}
