mod pipeline;
mod render;

use clap::{Parser, Subcommand};
use storepulse_view::{select_store, DetailResolver};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storepulse-cli")]
#[command(about = "Store POS uptime and health from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stores with uptime and health tier, optionally filtered.
    Stores {
        /// Exact store number to show.
        #[arg(long, default_value = "")]
        search: String,
        /// Store type code, e.g. FL or RK.
        #[arg(long = "type", default_value = "")]
        type_code: String,
        /// Minimum health score (inclusive).
        #[arg(long, default_value = "")]
        min_health: String,
        #[arg(long)]
        json: bool,
    },
    /// Select a store and resolve its device details.
    Select {
        store: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the dashboard link for a store.
    Link { store: String },
    /// List known store type codes.
    Types,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = storepulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("storepulse-cli: no command given, see --help");
        return Ok(());
    };

    let session = pipeline::load_session(&config)?;
    let mut reconciler = session.reconciler;

    match command {
        Commands::Stores {
            search,
            type_code,
            min_health,
            json,
        } => {
            pipeline::validate_type_code(&session.store_types, &type_code)?;
            reconciler.set_search(&search);
            reconciler.set_type_code(&type_code);
            reconciler.set_min_health(&min_health);
            let visible = reconciler.visible();
            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                for store in &visible {
                    println!("{}", render::store_line(store, &session.store_types));
                }
                println!("{} of {} stores", visible.len(), reconciler.stores().len());
            }
        }
        Commands::Select { store, json } => {
            let resolver = DetailResolver::from_config(&config, &session.facets)?;
            tracing::info!(store, source = %resolver.kind(), "resolving store details");
            match reconciler.select_and_resolve(&store, &resolver).await {
                Some(selected) if json => {
                    println!("{}", serde_json::to_string_pretty(selected)?);
                }
                Some(selected) => println!("{}", render::selection(selected)),
                None => println!("no store with number '{}'", store.trim()),
            }
        }
        Commands::Link { store } => {
            let Some(record) = select_store(reconciler.stores(), &store) else {
                anyhow::bail!("no store with number '{}'", store.trim());
            };
            println!(
                "{}",
                storepulse_core::dashboard_link(
                    record,
                    &config.dashboard_url,
                    &config.dashboard_variable
                )
            );
        }
        Commands::Types => {
            for store_type in &session.store_types.store_types {
                println!("{:<3} {}", store_type.code, store_type.description);
            }
        }
    }

    Ok(())
}
