use clap::{Parser, Subcommand};
use sales_forecast::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use sales_forecast::dashboard::{load_artifacts, load_dataset};
use sales_forecast::features::MAX_SOCIAL_MENTIONS;
use sales_forecast::render::{render_debug, render_options, render_text};
use sales_forecast::{LinearModel, Selection, Session};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for unreadable data, model or configuration
const EXIT_STARTUP: u8 = 1;
/// Exit code for a failed prediction cycle
const EXIT_PREDICTION: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "crumbl",
    about = "Crumbl cookie sales predictor",
    long_about = "Predict cookie sales for a scenario, derive production recommendations and print sales insights.",
    after_help = "Examples:\n  crumbl predict --flavor Oreo --weather Sunny --location Provo --holiday --social-mentions 40\n  crumbl options\n  crumbl inspect"
)]
struct Cli {
    #[arg(long, global = true, help = "Path to crumbl.toml")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Historical sales CSV")]
    data: Option<PathBuf>,

    #[arg(long, global = true, help = "Model artifact (JSON)")]
    model: Option<PathBuf>,

    #[arg(long, global = true, help = "Feature schema artifact (JSON array)")]
    features: Option<PathBuf>,

    #[arg(long, global = true, help = "Log level (trace|debug|info|warn|error)")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Generate a prediction with recommendations and chart datasets")]
    Predict {
        #[arg(long)]
        flavor: String,
        #[arg(long)]
        weather: String,
        #[arg(long)]
        location: String,
        #[arg(long, help = "Holiday week")]
        holiday: bool,
        #[arg(
            long,
            default_value_t = 0,
            value_parser = clap::value_parser!(u32).range(0..=MAX_SOCIAL_MENTIONS as i64),
            help = "Expected social media mentions"
        )]
        social_mentions: u32,
        #[arg(long, help = "Emit the report as JSON")]
        json: bool,
        #[arg(long, help = "Write chart datasets as CSV files into this directory")]
        export_dir: Option<PathBuf>,
    },
    #[command(about = "List the values each selector accepts")]
    Options,
    #[command(about = "Show dataset columns, sample rows and expected model features")]
    Inspect,
    #[command(about = "Fail when a selectable value has no feature column")]
    Check,
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let strict_check = matches!(cli.command, Command::Check);
    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides {
            data_path: cli.data.clone(),
            model_path: cli.model.clone(),
            features_path: cli.features.clone(),
            strict_schema: strict_check.then_some(true),
            log_level: cli.log_level.clone(),
        },
    };

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration failed: {err}");
            return ExitCode::from(EXIT_STARTUP);
        }
    };
    init_logging(&config);

    let dataset = match load_dataset(&config.data) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("Data loading failed: {err}");
            return ExitCode::from(EXIT_STARTUP);
        }
    };
    let (schema, model) = match load_artifacts(&config.model) {
        Ok(artifacts) => artifacts,
        Err(err) => {
            eprintln!("Model loading failed: {err}");
            return ExitCode::from(EXIT_STARTUP);
        }
    };
    let session = match Session::new(
        dataset,
        schema,
        model,
        config.recommendations,
        config.model.strict_schema,
    ) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Startup failed: {err}");
            return ExitCode::from(EXIT_STARTUP);
        }
    };

    match cli.command {
        Command::Predict {
            flavor,
            weather,
            location,
            holiday,
            social_mentions,
            json,
            export_dir,
        } => {
            let selection = Selection::new(flavor, weather, location)
                .with_holiday(holiday)
                .with_social_mentions(social_mentions);
            predict(&session, &selection, json, export_dir)
        }
        Command::Options => {
            print!("{}", render_options(&session.options()));
            ExitCode::SUCCESS
        }
        Command::Inspect => {
            print!("{}", render_debug(&session.debug_summary()));
            ExitCode::SUCCESS
        }
        Command::Check => {
            println!(
                "Feature schema covers all {} flavors, {} weather conditions and {} locations",
                session.dataset().flavors().len(),
                session.dataset().weathers().len(),
                session.dataset().locations().len()
            );
            ExitCode::SUCCESS
        }
    }
}

fn predict(
    session: &Session<LinearModel>,
    selection: &Selection,
    json: bool,
    export_dir: Option<PathBuf>,
) -> ExitCode {
    let report = match session.run(selection) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "prediction failed");
            eprintln!("Prediction error: {err}");
            return ExitCode::from(EXIT_PREDICTION);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(err) => {
                eprintln!("Prediction error: {err}");
                return ExitCode::from(EXIT_PREDICTION);
            }
        }
    } else {
        print!("{}", render_text(&report));
    }

    if let Some(dir) = export_dir {
        match report.charts.export_csv(&dir) {
            Ok(paths) => {
                for path in paths {
                    tracing::info!(path = %path.display(), "exported chart dataset");
                }
            }
            Err(err) => {
                eprintln!("Chart export failed: {err}");
                return ExitCode::from(EXIT_PREDICTION);
            }
        }
    }

    ExitCode::SUCCESS
}
