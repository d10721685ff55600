//! WeatherPro command-line interface

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use weatherpro::api::AppState;
use weatherpro::models::{WeatherKind, describe_wmo_code};
use weatherpro::units::display_temp;
use weatherpro::{
    FjallBackend, ForecastService, IpLocator, ResolvedWeather, TemperatureUnit, WeatherProConfig,
    WeatherProError, web,
};

#[derive(Parser)]
#[command(name = "weatherpro")]
#[command(author, version, about = "Weather lookup with forecasts and favorites", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up current weather and forecast for a city
    Weather {
        /// City name (defaults to the configured city)
        city: Option<String>,

        /// Display temperatures in Fahrenheit
        #[arg(short, long)]
        fahrenheit: bool,
    },

    /// Look up weather for the device's approximate position
    Locate {
        /// Display temperatures in Fahrenheit
        #[arg(short, long)]
        fahrenheit: bool,
    },

    /// Manage the favorites list
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },

    /// Serve the JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// List saved favorites
    List,
    /// Add the city if absent, remove it if present
    Toggle {
        /// City name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let message = err
            .downcast_ref::<WeatherProError>()
            .map(WeatherProError::user_message)
            .unwrap_or_else(|| err.to_string());
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = WeatherProConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config, cli.verbose);

    let backend = FjallBackend::open(config.store_path())?;
    let mut service = ForecastService::new(&config, Box::new(backend))?;

    match cli.command.unwrap_or(Commands::Weather {
        city: None,
        fahrenheit: false,
    }) {
        Commands::Weather { city, fahrenheit } => {
            if fahrenheit {
                service.set_unit(TemperatureUnit::Fahrenheit);
            }
            let city = city.unwrap_or_else(|| config.defaults.city.clone());
            let resolved = service.lookup_city(&city).await?;
            print_weather(&service, &resolved);
        }
        Commands::Locate { fahrenheit } => {
            if fahrenheit {
                service.set_unit(TemperatureUnit::Fahrenheit);
            }
            let locator = IpLocator::new(&config)?;
            let resolved = service.locate(&locator).await?;
            print_weather(&service, &resolved);
        }
        Commands::Favorites { action } => match action {
            FavoritesCommand::List => {
                let names = service.favorites().names();
                if names.is_empty() {
                    println!("No favorites saved.");
                } else {
                    for name in names {
                        println!("{name}");
                    }
                }
            }
            FavoritesCommand::Toggle { name } => {
                let is_favorite = service.favorites_mut().toggle(&name)?;
                if is_favorite {
                    println!("Saved '{name}' to favorites.");
                } else {
                    println!("Removed '{name}' from favorites.");
                }
            }
        },
        Commands::Serve { port } => {
            web::run(AppState::new(service), port).await?;
        }
    }

    Ok(())
}

fn print_weather(service: &ForecastService, resolved: &ResolvedWeather) {
    let unit = service.unit();
    let unit_symbol = match unit {
        TemperatureUnit::Celsius => "°C",
        TemperatureUnit::Fahrenheit => "°F",
    };
    let current = &resolved.snapshot.current;
    let favorite_marker = if service.favorites().is_favorite(&resolved.location.name) {
        " ♥"
    } else {
        ""
    };

    println!("{}{}", resolved.location.name, favorite_marker);
    println!(
        "  {} — {}{unit_symbol} (feels like {}{unit_symbol})",
        describe_wmo_code(current.weather_code),
        display_temp(current.temperature_2m, unit),
        display_temp(current.apparent_temperature, unit),
    );
    println!(
        "  Humidity {:.0}%  Wind {:.1} km/h",
        current.relative_humidity_2m, current.wind_speed_10m
    );

    let outlook = service.hourly_outlook();
    if !outlook.is_empty() {
        println!("\nNext 24 hours:");
        for entry in &outlook {
            let kind = WeatherKind::from_wmo_code(entry.weather_code);
            println!(
                "  {:>5}  {:>4}{unit_symbol}  {}",
                entry.hour_label(),
                display_temp(entry.temperature_2m, unit),
                kind.icon_name(),
            );
        }
    }

    let days = resolved.snapshot.daily.days();
    if !days.is_empty() {
        println!("\n7-day forecast:");
        for day in &days {
            let kind = WeatherKind::from_wmo_code(day.weather_code);
            println!(
                "  {}  {:>4}{unit_symbol} / {:>4}{unit_symbol}  {}",
                day.day_label(),
                display_temp(day.temperature_2m_max, unit),
                display_temp(day.temperature_2m_min, unit),
                kind.icon_name(),
            );
        }
    }
}

fn init_tracing(config: &WeatherProConfig, verbose: bool) {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
