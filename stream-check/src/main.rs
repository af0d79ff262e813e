use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::Duration;

mod output;
mod scenarios;
mod sse_client;

use output::print_test_summary;
use scenarios::Target;

#[derive(Parser)]
#[command(name = "stream-check")]
#[command(about = "Verifies the Datastar patch streams of a running server")]
struct Cli {
    /// Base URL of the server (e.g., http://localhost:4000)
    #[arg(long, default_value = "http://localhost:4000")]
    base_url: String,

    /// Delay signal in milliseconds sent with each streaming request
    #[arg(long, default_value_t = 0)]
    delay: u64,

    /// Seconds to wait for a stream to finish
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Scenario to run
    #[arg(long, value_enum, default_value = "all")]
    scenario: ScenarioChoice,

    /// Print every received event
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone)]
enum ScenarioChoice {
    /// Typing effect via element patches
    ElementPatches,
    /// Typing effect via signal patches
    SignalPatches,
    /// Single script execution event
    ExecuteScript,
    /// Static demo page
    Index,
    /// Run every scenario
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    let target = Target {
        base_url: cli.base_url.trim_end_matches('/').to_string(),
        delay_ms: cli.delay,
        timeout: Duration::from_secs(cli.timeout_secs),
        verbose: cli.verbose,
    };

    println!("{}", "=== STREAM CHECK ===".bright_white().bold());
    println!("{} Target {} (delay {}ms)", "→".blue(), target.base_url, target.delay_ms);

    let mut results = Vec::new();

    match cli.scenario {
        ScenarioChoice::ElementPatches => results.push(scenarios::test_element_patches(&target).await),
        ScenarioChoice::SignalPatches => results.push(scenarios::test_signal_patches(&target).await),
        ScenarioChoice::ExecuteScript => results.push(scenarios::test_execute_script(&target).await),
        ScenarioChoice::Index => results.push(scenarios::test_index(&target).await),
        ScenarioChoice::All => {
            results.push(scenarios::test_element_patches(&target).await);
            results.push(scenarios::test_signal_patches(&target).await);
            results.push(scenarios::test_execute_script(&target).await);
            results.push(scenarios::test_index(&target).await);
        }
    }

    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(&results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All checks passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some checks failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
