use clap::Parser;
use colored::*;
use customer_router::cli::{Args, setup_logging};
use customer_router::constants::exit_codes;
use customer_router::{Pipeline, RunSummary};
use std::process;

fn main() {
    // Connection URLs may live in a local .env file
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    setup_logging(&args);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(exit_codes::ABORTED);
    });

    let result = runtime.block_on(run(&args));

    match result {
        Ok(summary) => {
            print_summary(&summary);
            process::exit(summary.exit_code());
        }
        Err(error) => {
            eprintln!("{} {:#}", "Error:".red().bold(), error);
            process::exit(exit_codes::ABORTED);
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<RunSummary> {
    use anyhow::Context;

    let config = args
        .load_config()
        .context("Failed to load configuration")?;
    let mut pipeline = Pipeline::from_config(&config, args.skip_load)
        .context("Invalid pipeline configuration")?;

    let summary = pipeline.run().await?;
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "Run summary".bold());
    println!("{}", summary.stats.summary());

    for (country, count) in &summary.bucket_counts {
        println!("  {:<8} {} records", country.to_string().cyan(), count);
    }

    for extract in &summary.extracts {
        println!(
            "  {} {} ({} records)",
            "wrote".green(),
            extract.path.display(),
            extract.records
        );
    }

    for load in &summary.loads {
        println!(
            "  {} {} rows into {}.{} ({} skipped, {:.2}s)",
            "loaded".green(),
            load.inserted,
            load.destination,
            load.table,
            load.skipped(),
            load.elapsed.as_secs_f64()
        );
    }

    if let Some(path) = &summary.metadata_path {
        println!("  {} {}", "report".green(), path.display());
    }

    for failure in &summary.failures {
        println!("  {} {}", "failed".red().bold(), failure);
    }

    let status = if summary.is_clean() {
        "completed".green().bold()
    } else {
        "completed with failures".yellow().bold()
    };
    println!(
        "Pipeline {} in {:.2}s",
        status,
        summary.elapsed.as_secs_f64()
    );
}
