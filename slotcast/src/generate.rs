use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tokio_util::sync::CancellationToken;

use slotcast_core::error::Error;
use slotcast_core::models::GenerateResponse;
use slotcast_core::*;

/// Generate a lineup for a channel and output it in JSON.
///
/// The process exits with a non-zero status code when the schedule of the
/// channel is invalid.  The error message is still written in the output.
#[derive(Args, Debug)]
pub struct CommandLine {
    /// Channel number.
    #[arg(long)]
    pub(crate) channel: u32,

    /// Output file.
    ///
    /// The contents will be output to STDOUT if the output file is not specified.
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}

pub async fn main(config: Arc<config::Config>, cl: &CommandLine) -> Result<(), Error> {
    let channel = config.find_channel(cl.channel)?;
    let programs = channel.load_programs()?;
    let schedule = channel.load_schedule()?;
    tracing::info!(
        channel.number = channel.number,
        channel.name = %channel.name,
        programs.len = programs.len(),
        "Generating lineup..."
    );

    let cancel_token = CancellationToken::new();
    let mut generator = LineupGenerator::new().with_cancel_token(cancel_token.clone());
    if let Some(seed) = config.generator.seed {
        generator = generator.with_seed(seed);
    }

    let timer = config.generator.timeout.map(|timeout| {
        let cancel_token = cancel_token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!(
                timeout = %humantime::format_duration(timeout),
                "Cancel lineup generation"
            );
            cancel_token.cancel();
        })
    });

    let result = generator.generate(&programs, &schedule).await;
    if let Some(timer) = timer {
        timer.abort();
    }

    let response = GenerateResponse::from_result(result)?;
    match response {
        GenerateResponse::Lineup(ref lineup) => {
            tracing::info!(
                lineup.len = lineup.programs.len(),
                lineup.start_time = %lineup.start_time,
                "Generated"
            );
        }
        GenerateResponse::UserError { ref user_error } => {
            tracing::error!(%user_error, "Invalid schedule");
        }
    }

    let contents = serde_json::to_string(&response)?;
    match cl.output {
        Some(ref file) => tokio::fs::write(file, contents).await?,
        None => println!("{contents}"),
    }

    if response.is_user_error() {
        std::process::exit(1);
    }
    Ok(())
}
