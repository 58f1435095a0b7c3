// Playoff analysis entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries the report)
// 2. Load config
// 3. Clear the console if configured
// 4. Run the pipeline and print the report

use std::io::stdout;

use anyhow::Context;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tracing::{error, info, warn};

use playoff_analysis::config;
use playoff_analysis::pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Playoff analysis starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: input={}, output={}, min_season={}",
        config.data_paths.input, config.output.directory, config.cleaning.min_season
    );

    // 3. Clear the console
    if config.console.clear_on_start {
        if let Err(e) = execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0)) {
            warn!("Could not clear console: {}", e);
        }
    }

    // 4. Run the pipeline
    let pipeline = Pipeline::new(config).context("failed to prepare pipeline")?;
    let report = match pipeline.run() {
        Ok(report) => report,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(anyhow::Error::new(e).context("analysis pipeline failed"));
        }
    };

    println!("{report}");
    info!(
        "Playoff analysis finished; outputs in {}",
        pipeline.output_dir().display()
    );
    Ok(())
}

/// Initialize tracing to log to a file so stdout only carries the report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("playoff-analysis.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("playoff_analysis=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
