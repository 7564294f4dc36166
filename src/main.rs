//! Dice Entropy CLI
//!
//! Runs the die-rolling HTTP service, or exercises the generator
//! in-process.

use std::net::{IpAddr, SocketAddr};

use clap::{Parser, Subcommand};
use dice_entropy::{
    analysis::{DistributionThresholds, FaceDistribution},
    generator::DieGenerator,
    pool::PoolConfig,
    service::{DiceServer, ServiceConfig, DEFAULT_PORT},
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "dice-entropy", version, about = "Entropy-pool die rolling service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default).
    Serve {
        /// Address to listen on.
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        /// Port to listen on.
        #[arg(long, short, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Roll in-process and report the face distribution.
    Simulate {
        /// Number of rolls.
        #[arg(long, short = 'n', default_value_t = 1000)]
        rolls: u64,
        /// Skip host counters when sampling entropy.
        #[arg(long)]
        no_host_metrics: bool,
    },
    /// Print the current entropy pool state as JSON.
    Entropy,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Serve { host, port }) => {
            serve(ServiceConfig {
                bind_addr: SocketAddr::new(host, port),
            })
            .await
        }
        None => match ServiceConfig::from_env() {
            Ok(config) => serve(config).await,
            Err(e) => Err(e.to_string()),
        },
        Some(Command::Simulate {
            rolls,
            no_host_metrics,
        }) => {
            simulate(rolls, !no_host_metrics);
            Ok(())
        }
        Some(Command::Entropy) => print_entropy(),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn serve(config: ServiceConfig) -> Result<(), String> {
    info!("Dice Entropy v{}", dice_entropy::VERSION);

    let server = DiceServer::new(config, DieGenerator::new()).map_err(|e| e.to_string())?;
    server.run().await.map_err(|e| e.to_string())
}

fn simulate(rolls: u64, host_metrics: bool) {
    info!("Starting simulation: {} rolls", rolls);

    let mut generator = DieGenerator::with_config(PoolConfig {
        host_metrics,
        ..Default::default()
    });

    let started = std::time::Instant::now();
    let mut dist = FaceDistribution::new();
    for i in 0..rolls {
        dist.record(generator.roll());
        if (i + 1) % 1000 == 0 {
            info!("Completed {} rolls", i + 1);
        }
    }
    let elapsed = started.elapsed();

    println!("Total rolls: {}", dist.total());
    println!("Duration: {:.2?}", elapsed);
    if dist.total() > 0 {
        println!(
            "Average time per roll: {:.2?}",
            elapsed / u32::try_from(dist.total()).unwrap_or(u32::MAX)
        );
    }

    println!();
    println!("Expected frequency per face: {:.2}", dist.expected());
    println!("Face | Count | Percentage | Deviation");
    println!("-----|-------|------------|----------");
    for face in dist.faces() {
        println!(
            "  {}  | {:>5} | {:>9.2}% | {:>8.2}%",
            face.face, face.count, face.percentage, face.deviation
        );
    }

    println!();
    println!("Mean: {:.3} (expected: 3.5)", dist.mean());
    println!("Standard deviation: {:.3} (expected: ~1.708)", dist.std_dev());
    println!("Variance: {:.3} (expected: ~2.917)", dist.variance());
    println!("Chi-square (5 dof): {:.3}", dist.chi_square());

    println!();
    println!("Maximum deviation: {:.2}%", dist.max_deviation());
    println!("Verdict: {}", dist.verdict(&DistributionThresholds::default()));
}

fn print_entropy() -> Result<(), String> {
    let generator = DieGenerator::new();
    let json =
        serde_json::to_string_pretty(&generator.entropy_info()).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}
