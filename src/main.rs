use clap::Parser;
use dewtrack::cli::commands::Cli;
use dewtrack::cli::handlers;
use dewtrack::io::config_io::read_config;
use dewtrack::io::logging::init_file_logging;
use dewtrack::io::paths::DataDir;
use dewtrack::model::TrackerConfig;

fn main() {
    let cli = Cli::parse();
    let data_dir = DataDir::discover(cli.data_dir.as_deref());

    // Subcommands run on defaults when config.toml is broken, so that
    // `dew config set` can still repair it. The TUI refuses to start.
    let mut config_warning = None;
    let config = match read_config(&data_dir.config_path()) {
        Ok(c) => c,
        Err(e) if cli.command.is_some() => {
            eprintln!("warning: {}; using default settings", e);
            config_warning = Some(e.to_string());
            TrackerConfig::default()
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_file_logging(&data_dir.log_path(), config.log.level.as_deref()) {
        eprintln!("warning: logging disabled ({})", e);
    }
    tracing::debug!(data_dir = %data_dir.root().display(), "starting");
    if let Some(warning) = config_warning {
        tracing::warn!(error = %warning, "config ignored; using defaults");
    }

    let result = match cli.command {
        // No subcommand → launch TUI
        None => dewtrack::tui::run(&data_dir, config),
        Some(_) => handlers::dispatch(cli, data_dir),
    };
    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
