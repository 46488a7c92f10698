mod app;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use dressday_core::AppError;
use dressday_outfit::{Age, Gender, Profile, Timeframe};

use crate::app::App;

#[derive(Debug, Parser)]
#[command(
    name = "dressday",
    about = "What should I wear today?",
    long_about = "Weather-aware outfit suggestions for children, spoken at their level.",
    after_help = "Examples:\n  dressday --lat 42.36 --lon -71.06 --age 4 --gender girl\n  dressday --lat 42.36 --lon -71.06 --age 10 --gender boy --prompt \"Do I need an umbrella?\" --json"
)]
struct Cli {
    #[arg(long, allow_negative_numbers = true, help = "Latitude in degrees")]
    lat: f64,

    #[arg(long, allow_negative_numbers = true, help = "Longitude in degrees")]
    lon: f64,

    #[arg(long, value_parser = parse_age, help = "Child's age: 4, 7 or 10")]
    age: Age,

    #[arg(long, value_parser = parse_gender, help = "girl or boy")]
    gender: Gender,

    #[arg(long, help = "The child's question, up to 500 characters")]
    prompt: Option<String>,

    #[arg(long, help = "morning, afternoon, evening or today")]
    timeframe: Option<Timeframe>,

    #[arg(long, help = "Skip the LLM and use the built-in rules")]
    no_llm: bool,

    #[arg(long, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[arg(long, help = "Emit the full result as JSON")]
    json: bool,
}

fn parse_age(value: &str) -> Result<Age, String> {
    let years: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Age::try_from(years)
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    match value.trim().to_lowercase().as_str() {
        "girl" => Ok(Gender::Girl),
        "boy" => Ok(Gender::Boy),
        other => Err(format!("unknown gender '{other}', expected girl or boy")),
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = App::load_config(cli.config.as_deref())?;
    let app = App::new(config, !cli.no_llm)?;

    let profile = Profile::new("cli", cli.age, cli.gender);
    let result = app
        .recommend(cli.lat, cli.lon, profile, cli.prompt, cli.timeframe)
        .await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).map_err(anyhow::Error::from)?;
        println!("{json}");
    } else {
        println!("{}", result.spoken_response);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dressday_core::init()?;
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
