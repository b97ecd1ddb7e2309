use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::BytesMut;
use serialprims_channel::{encode_records, record_size, Record, SerialChannel, BUFFER_CAPACITY};
use tracing::info;

use crate::cmd::{parse_duration, ListenArgs, RecordKind};
use crate::exit::{receive_error, CliError, CliResult, SUCCESS};
use crate::output::{print_batch, OutputFormat, RecordBatch};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    if args.count == Some(0) {
        return Ok(SUCCESS);
    }
    let channel = args.port.open()?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    info!(port = %channel.port_name(), record = args.record.name(), "listening");
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let max = match args.count {
            Some(count) => count.saturating_sub(printed),
            None => BUFFER_CAPACITY,
        };

        let batch = drain(&channel, args.record, max, format);
        if !batch.is_empty() {
            print_batch(&batch, channel.port_name(), args.record, format);
            printed = printed.saturating_add(batch.len());

            if let Some(count) = args.count {
                if printed >= count {
                    return Ok(SUCCESS);
                }
            }
            continue;
        }

        // Only report the failure once everything buffered before it was printed.
        if let Some(err) = channel.error() {
            return Err(receive_error("receive failed", err));
        }

        std::thread::sleep(interval);
    }

    Ok(SUCCESS)
}

fn drain(
    channel: &SerialChannel,
    kind: RecordKind,
    max: usize,
    format: OutputFormat,
) -> RecordBatch {
    let keep_raw = matches!(format, OutputFormat::Raw);
    match kind {
        RecordKind::U8 => drain_as::<u8>(channel, max, keep_raw),
        RecordKind::U16 => drain_as::<u16>(channel, max, keep_raw),
        RecordKind::U32 => drain_as::<u32>(channel, max, keep_raw),
        RecordKind::U64 => drain_as::<u64>(channel, max, keep_raw),
        RecordKind::I16 => drain_as::<i16>(channel, max, keep_raw),
        RecordKind::I32 => drain_as::<i32>(channel, max, keep_raw),
        RecordKind::F32 => drain_as::<f32>(channel, max, keep_raw),
        RecordKind::F64 => drain_as::<f64>(channel, max, keep_raw),
    }
}

fn drain_as<R>(channel: &SerialChannel, max: usize, keep_raw: bool) -> RecordBatch
where
    R: Record + Into<serde_json::Value>,
{
    let records: Vec<R> = channel.read_vec(max);
    let raw = if keep_raw {
        let mut raw = BytesMut::with_capacity(records.len() * record_size::<R>());
        encode_records(&records, &mut raw);
        raw.to_vec()
    } else {
        Vec::new()
    };

    RecordBatch {
        values: records.into_iter().map(Into::into).collect(),
        raw,
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
