// Snake draft entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the ranked list
// 4. Create mpsc channels
// 5. Build the engine and spawn the app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use snake_draft_core::config;
use snake_draft_core::source::{EntitySource, FileSource};
use snake_draft_tui::app;
use snake_draft_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Snake draft starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} parties, {} rounds, human party {}, {:?} auto-pick delay",
        config.draft.parties,
        config.draft.rounds,
        config.draft.human_party,
        config.auto_pick_delay
    );

    // 3. Load the ranked list
    let source = FileSource::new(&config.source_path);
    let records = source
        .fetch()
        .await
        .with_context(|| format!("failed to load rankings from {}", config.source_path))?;
    info!("Loaded {} records from {}", records.len(), config.source_path);

    // 4. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (auto_tx, auto_rx) = mpsc::channel(16);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. Build the engine and spawn the app logic task
    let app_state =
        app::AppState::new(config, records, auto_tx).context("invalid draft configuration")?;
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, auto_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI (blocks until 'q' or Ctrl+C)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Snake draft shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("snake-draft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snake_draft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
