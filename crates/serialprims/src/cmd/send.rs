use std::fmt::Display;
use std::fs;
use std::str::FromStr;

use serialprims_channel::Record;
use tracing::info;

use crate::cmd::{PortArgs, RecordKind, SendArgs};
use crate::exit::{channel_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let sent = match &args.values {
        Some(values) => send_values(&args.port, args.record, values)?,
        None => {
            let payload = resolve_payload(&args)?;
            send_records(&args.port, &payload)?
        }
    };

    info!(port = %args.port.port, records = sent, "sent");
    Ok(SUCCESS)
}

fn send_values(port: &PortArgs, kind: RecordKind, values: &[String]) -> CliResult<usize> {
    match kind {
        RecordKind::U8 => send_records(port, &parse_values::<u8>(values)?),
        RecordKind::U16 => send_records(port, &parse_values::<u16>(values)?),
        RecordKind::U32 => send_records(port, &parse_values::<u32>(values)?),
        RecordKind::U64 => send_records(port, &parse_values::<u64>(values)?),
        RecordKind::I16 => send_records(port, &parse_values::<i16>(values)?),
        RecordKind::I32 => send_records(port, &parse_values::<i32>(values)?),
        RecordKind::F32 => send_records(port, &parse_values::<f32>(values)?),
        RecordKind::F64 => send_records(port, &parse_values::<f64>(values)?),
    }
}

fn send_records<R: Record>(port: &PortArgs, records: &[R]) -> CliResult<usize> {
    let channel = port.open()?;
    channel
        .write(records)
        .map_err(|err| channel_error("send failed", err))?;
    Ok(records.len())
}

fn parse_values<R>(values: &[String]) -> CliResult<Vec<R>>
where
    R: FromStr,
    R::Err: Display,
{
    values
        .iter()
        .map(|value| {
            value.trim().parse::<R>().map_err(|err| {
                CliError::new(DATA_INVALID, format!("invalid value {value:?}: {err}"))
            })
        })
        .collect()
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        });
    }
    Err(CliError::new(
        USAGE,
        "one of --values, --data, --hex or --file is required",
    ))
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .split_whitespace()
        .map(|part| part.strip_prefix("0x").unwrap_or(part))
        .collect();

    if digits.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "hex payload has an odd number of digits"));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CliError::new(USAGE, format!("invalid hex payload: {input}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_spaced_and_prefixed() {
        assert_eq!(parse_hex("de ad be ef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(parse_hex("0x0102").unwrap(), vec![1, 2]);
        assert_eq!(parse_hex("0xAB 0xcd").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert_eq!(parse_hex("abc").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("zz").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("é1").unwrap_err().code, USAGE);
    }

    #[test]
    fn parse_values_by_record_type() {
        let values = vec!["1".to_string(), " 2 ".to_string(), "65535".to_string()];
        assert_eq!(parse_values::<u16>(&values).unwrap(), vec![1, 2, 65535]);

        let err = parse_values::<u8>(&values).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn parse_values_floats() {
        let values = vec!["-1.5".to_string(), "2".to_string()];
        assert_eq!(parse_values::<f32>(&values).unwrap(), vec![-1.5, 2.0]);
    }
}
