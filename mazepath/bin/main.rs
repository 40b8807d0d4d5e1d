use std::process::ExitCode;

use log::{debug, info, log_enabled, Level};
use mazepath::{config::RunConfig, load_map, PathFinder, PathFinderState};

fn main() -> Result<ExitCode, anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| mazepath::config::DEFAULT_CONFIG_PATH.to_string());
    let config = RunConfig::load(&config_path)?;

    let map = load_map(&config.image)?;
    info!("searching from {} to {}", config.start, config.goal);

    let mut finder = PathFinder::new(&map, config.start, config.goal)?;
    if let Some(max) = config.max_expansions {
        finder = finder.with_max_expansions(max);
    }

    let (state, visited) = finder.finish(&map);
    if log_enabled!(Level::Debug) {
        debug!("distances from {}:\n{}", config.start, visited);
    }

    match state {
        PathFinderState::PathFound(result) => {
            println!("shortest path: {} steps", result.distance);
            if config.print_path {
                for point in &result.path {
                    println!("{}", point);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        PathFinderState::BudgetExhausted => {
            println!(
                "gave up after {} expansions",
                config.max_expansions.unwrap_or_default()
            );
            Ok(ExitCode::from(3))
        }
        _ => {
            println!("no path between {} and {}", config.start, config.goal);
            Ok(ExitCode::from(2))
        }
    }
}
