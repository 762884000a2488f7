use std::process::ExitCode;

use clap::Parser;
use gemwatch::cli::{Cli, Command, RunArgs};
use gemwatch::config::Config;
use gemwatch::error::Result;
use gemwatch::pipeline;
use gemwatch::report::{Renderer, Sink, TeeSink};
use gemwatch::source::HttpSource;
use gemwatch::store::SnapshotStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("GEMWATCH_LOG")
                .from_env_lossy(),
        )
        .init();
}

fn open_sink(config: &Config) -> TeeSink {
    let Some(path) = &config.log_file else {
        return TeeSink::stdout();
    };

    match TeeSink::stdout().with_log_file(path) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::warn!(path = %path.display(), "log file unavailable, reporting to stdout only: {e}");
            TeeSink::stdout()
        }
    }
}

fn execute(command: Command, config: &Config, sink: &mut dyn Sink) -> Result<()> {
    let store = SnapshotStore::new(&config.snapshot_dir);
    let renderer = Renderer::new(config.image_url_template.as_str());

    match command {
        Command::Run(_) => {
            let source = HttpSource::new(
                config.landing_url.as_str(),
                config.catalog_pattern.clone(),
                config.timeout,
            )?;
            let today = chrono::Local::now().date_naive();
            let outcome = pipeline::run(&source, &store, today, &renderer, sink)?;
            tracing::info!(?outcome, "run complete");
        }
        Command::List => pipeline::list(&store, sink)?,
        Command::Diff(args) => {
            let dates = args.from.zip(args.to);
            pipeline::diff_stored(&store, dates, &renderer, sink)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let _ = TeeSink::stdout().emit(&format!("An error occurred: {e}"));
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli(&cli);

    let command = cli.command.unwrap_or(Command::Run(RunArgs::default()));
    let mut sink = match &command {
        Command::Run(args) => {
            config.apply_run_args(args);
            open_sink(&config)
        }
        Command::List | Command::Diff(_) => TeeSink::stdout(),
    };

    match execute(command, &config, &mut sink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            let _ = sink.emit(&format!("An error occurred: {e}"));
            ExitCode::FAILURE
        }
    }
}
