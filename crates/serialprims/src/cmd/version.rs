use serialprims_channel::{BUFFER_CAPACITY, RECEIVE_CHUNK_SIZE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("serialprims {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: serialprims");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("SERIALPRIMS_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("framing: 8N1");
    println!("buffer_capacity: {BUFFER_CAPACITY}");
    println!("receive_chunk: {RECEIVE_CHUNK_SIZE}");

    Ok(SUCCESS)
}
