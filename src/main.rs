use clap::Parser;
use formpilot::cli::commands::{cmd_classify, cmd_fill, cmd_scan};
use formpilot::cli::config::{load_config, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }),
    )
    .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Fill {
            url,
            profile,
            job_title,
            employer,
            format,
            output,
            no_ai,
            no_screening,
            no_screening_defaults,
            undo_on_failure,
            delay_ms,
            trace,
        } => {
            let all_ok = cmd_fill(
                &url,
                &profile,
                job_title.as_deref(),
                employer.as_deref(),
                &format,
                output.as_deref(),
                no_ai,
                no_screening,
                no_screening_defaults,
                undo_on_failure,
                delay_ms,
                trace.as_deref(),
                &config,
                cli.ai_endpoint.as_deref(),
                cli.ai_key.as_deref(),
                cli.verbose,
            )?;
            if !all_ok {
                std::process::exit(1);
            }
        }
        Commands::Scan { url, format } => {
            cmd_scan(&url, &format, &config, cli.verbose)?;
        }
        Commands::Classify { input, format } => {
            cmd_classify(&input, &format)?;
        }
    }

    Ok(())
}
