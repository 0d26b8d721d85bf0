mod check;
mod generate;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use slotcast_core::error::Error;
use slotcast_core::tracing_ext::init_tracing;
use slotcast_core::*;

#[derive(Parser)]
#[command(about, version)]
struct Opt {
    /// Path to a configuration file in a YAML format.
    ///
    /// The SLOTCAST_CONFIG environment variable is used if this option is not
    /// specified.
    #[arg(short, long, env = "SLOTCAST_CONFIG")]
    config: PathBuf,

    /// Logging format.
    #[arg(
        long,
        env = "SLOTCAST_LOG_FORMAT",
        value_parser = ["text", "json"],
        default_value = "text",
    )]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Generate(generate::CommandLine),
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let opt = Opt::parse();

    init_tracing(&opt.log_format);

    let config = config::load(&opt.config);

    match opt.command {
        Command::Generate(ref cl) => generate::main(config, cl).await,
        Command::Check => check::main(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::CommandFactory;

    #[test]
    fn test_opt() {
        Opt::command().debug_assert();
    }

    #[test]
    fn test_parse() {
        let opt = Opt::try_parse_from([
            "slotcast",
            "--config",
            "/config.yml",
            "generate",
            "--channel",
            "3",
        ])
        .unwrap();
        assert_eq!(opt.log_format, "text");
        assert_matches!(opt.command, Command::Generate(cl) => {
            assert_eq!(cl.channel, 3);
            assert!(cl.output.is_none());
        });

        let result = Opt::try_parse_from([
            "slotcast",
            "--config",
            "/config.yml",
            "--log-format",
            "xml",
            "check",
        ]);
        assert!(result.is_err());
    }
}
