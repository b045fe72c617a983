use std::process::ExitCode;

use log::debug;
use udpsum::{input, DatagramDecoder, PacketError, ScanMode};

/// Environment variable selecting how the UDP region is located.
const SCAN_ENV: &str = "UDPSUM_SCAN";

async fn run(arg: Option<String>) -> Result<String, PacketError> {
    let scan = match std::env::var(SCAN_ENV) {
        Ok(value) => value.parse::<ScanMode>()?,
        Err(_) => ScanMode::default(),
    };

    let hex = input::resolve(arg.as_deref()).await?;
    let decoder = DatagramDecoder::builder().scan(scan).build();
    decoder.decode(&hex)?.report()
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    // Last argument wins, as with `udpsum <hex | file.txt>`.
    let arg = std::env::args().skip(1).last();

    match run(arg).await {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("{}: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
