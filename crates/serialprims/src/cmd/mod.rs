use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use serialprims_channel::{record_size, SerialChannel};
use serialprims_transport::{SerialConfig, DEFAULT_BAUD_RATE};

use crate::exit::{channel_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Receive records from a port and print them.
    Listen(ListenArgs),
    /// Send one run of records or raw bytes to a port.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args),
        Command::Version(args) => version::run(args),
    }
}

/// Element type used to interpret the byte stream (native endianness).
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    U8,
    U16,
    U32,
    U64,
    I16,
    I32,
    F32,
    F64,
}

impl RecordKind {
    pub fn name(self) -> &'static str {
        match self {
            RecordKind::U8 => "u8",
            RecordKind::U16 => "u16",
            RecordKind::U32 => "u32",
            RecordKind::U64 => "u64",
            RecordKind::I16 => "i16",
            RecordKind::I32 => "i32",
            RecordKind::F32 => "f32",
            RecordKind::F64 => "f64",
        }
    }

    pub fn size(self) -> usize {
        match self {
            RecordKind::U8 => record_size::<u8>(),
            RecordKind::U16 => record_size::<u16>(),
            RecordKind::U32 => record_size::<u32>(),
            RecordKind::U64 => record_size::<u64>(),
            RecordKind::I16 => record_size::<i16>(),
            RecordKind::I32 => record_size::<i32>(),
            RecordKind::F32 => record_size::<f32>(),
            RecordKind::F64 => record_size::<f64>(),
        }
    }
}

#[derive(Args, Debug)]
pub struct PortArgs {
    /// Port identifier (e.g. /dev/ttyUSB0, COM3).
    pub port: String,
    /// Baud rate (8N1 framing is fixed).
    #[arg(long, short = 'b', default_value_t = DEFAULT_BAUD_RATE, env = "SERIALPRIMS_BAUD")]
    pub baud: u32,
}

impl PortArgs {
    pub fn open(&self) -> CliResult<SerialChannel> {
        SerialChannel::open(&SerialConfig::new(&self.port, self.baud))
            .map_err(|err| channel_error("open failed", err))
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub port: PortArgs,
    /// Record type to decode.
    #[arg(long, short = 'r', value_enum, default_value = "u8")]
    pub record: RecordKind,
    /// Exit after receiving N records.
    #[arg(long)]
    pub count: Option<usize>,
    /// Delay between polls when nothing is buffered (e.g. 10ms, 1s).
    #[arg(long, default_value = "10ms")]
    pub interval: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub port: PortArgs,
    /// Comma-separated values, encoded as --record.
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["data", "hex", "file"])]
    pub values: Option<Vec<String>>,
    /// Record type for --values.
    #[arg(long, short = 'r', value_enum, default_value = "u8")]
    pub record: RecordKind,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["values", "hex", "file"])]
    pub data: Option<String>,
    /// Hex payload (e.g. "de ad be ef" or 0xdeadbeef).
    #[arg(long, conflicts_with_all = ["values", "data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["values", "data", "hex"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("  ").is_err());
    }

    #[test]
    fn record_sizes_match_types() {
        assert_eq!(RecordKind::U8.size(), 1);
        assert_eq!(RecordKind::I16.size(), 2);
        assert_eq!(RecordKind::F32.size(), 4);
        assert_eq!(RecordKind::U64.size(), 8);
        assert_eq!(RecordKind::F64.name(), "f64");
    }
}
