// Main entry point
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tour_rewards::application;
use tour_rewards::domain::model::{User, UserRecord};
use tour_rewards::infrastructure::config::{self, load_config};
use tour_rewards::infrastructure::providers::CatalogFile;
use tour_rewards::interfaces::cli::Cli;
use tour_rewards::presentation::report;
use tour_rewards::presentation::theme::Theme;
use tour_rewards::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Spawn signal handler task
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            eprintln!("\nInterrupted, shutting down...");
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }

    let Some(catalog_path) = cli.catalog.as_deref() else {
        eprintln!("{}", "Please provide an attraction catalog with --catalog".red());
        std::process::exit(1);
    };

    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);
    let state = AppState::new(&CatalogFile::new(catalog_path), config).await?;

    if let Some(miles) = cli.buffer {
        state.engine.set_proximity_buffer(miles)?;
    } else if cli.max_buffer {
        state.engine.set_proximity_buffer_to_max();
    }

    let users = match cli.users.as_deref() {
        Some(path) => load_users(path).await?,
        None => Vec::new(),
    };

    // Use select! to handle shutdown during the run
    tokio::select! {
        result = run(&state, &cli, &users, &theme) => {
            result?;
        }
        _ = shutdown_rx => {
            eprintln!("Reward calculation interrupted");
        }
    }

    if cli.status {
        print_status(&state).await;
    }

    state.engine.shutdown().await;
    Ok(())
}

async fn run(state: &AppState, cli: &Cli, users: &[User], theme: &Theme) -> anyhow::Result<()> {
    if users.is_empty() {
        return Ok(());
    }

    let pb = if cli.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(users.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} users ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let summary = application::batch::calculate_rewards_for_all(
        &state.engine,
        users,
        cli.concurrency,
        |_, _| pb.inc(1),
    )
    .await?;
    pb.finish_and_clear();

    let limit = state.config.read().await.engine.nearby_limit;
    if cli.json {
        let mut out = Vec::with_capacity(users.len());
        for user in users {
            let nearby = if cli.nearby {
                application::nearby::nearby_attractions(&state.engine, user, limit).await?
            } else {
                None
            };
            out.push(serde_json::json!({
                "user_id": user.user_id(),
                "user_name": user.user_name(),
                "rewards": user.user_rewards(),
                "nearby": nearby,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for user in users {
        print!("{}", report::format_user_rewards(user, theme));
        if cli.nearby {
            if let Some(nearby) =
                application::nearby::nearby_attractions(&state.engine, user, limit).await?
            {
                print!("{}", report::format_nearby(&nearby, theme));
            }
        }
    }
    print!("{}", report::format_summary(&summary, theme));

    Ok(())
}

async fn load_users(path: &Path) -> anyhow::Result<Vec<User>> {
    let content = tokio::fs::read_to_string(path).await?;
    let records: Vec<UserRecord> = serde_json::from_str(&content)?;
    Ok(records.into_iter().map(User::from).collect())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_level()));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn print_status(state: &AppState) {
    println!("{}", "tour-rewards Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let engine = &state.engine;
    println!(
        "Catalog: {} attractions in {} grid cells",
        engine.index().len(),
        engine.index().cell_count()
    );
    println!("Workers: {}", engine.workers());
    println!("Proximity buffer: {} mi", engine.proximity_buffer());

    let stats = engine.cache_stats();
    println!(
        "Reward cache: {} entries ({} hits, {} misses)",
        stats.entries, stats.hits, stats.misses
    );
    println!("Distance cache: {} entries", engine.index().cached_distances());

    let config = state.config.read().await;
    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );
    if let Some(deadline) = config.engine.deadline() {
        println!("Deadline: {:?}", deadline);
    } else {
        println!("Deadline: none");
    }
}
