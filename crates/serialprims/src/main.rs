mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "serialprims", version, about = "Typed serial channel CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::RecordKind;

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from([
            "serialprims",
            "listen",
            "/dev/ttyUSB0",
            "--baud",
            "115200",
            "--record",
            "u32",
            "--count",
            "16",
        ])
        .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.port.port, "/dev/ttyUSB0");
                assert_eq!(args.port.baud, 115_200);
                assert_eq!(args.record, RecordKind::U32);
                assert_eq!(args.count, Some(16));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_send_values() {
        let cli = Cli::try_parse_from([
            "serialprims",
            "send",
            "COM3",
            "--record",
            "i16",
            "--values",
            "1,-2,3",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.record, RecordKind::I16);
                assert_eq!(
                    args.values,
                    Some(vec!["1".to_string(), "-2".to_string(), "3".to_string()])
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "serialprims",
            "send",
            "/dev/ttyS0",
            "--hex",
            "0102",
            "--data",
            "hello",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unknown_record_type() {
        let err = Cli::try_parse_from(["serialprims", "listen", "/dev/ttyS0", "--record", "u128"])
            .expect_err("unknown record type should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
