//! sunglobe - zone clock driving the globe's day/night terminator
//!
//! Environment:
//! - `RUST_LOG` - log filter (default `info`)
//! - `SUNGLOBE_LOG_JSON=1` - JSON logs on stderr
//! - `SUNGLOBE_SINK=json` - emit every frame as a JSON line instead of the
//!   single-line clock display

use sunglobe_runtime::{
    init_tracing, Driver, DriverConfig, JsonLinesSink, LogFormat, TerminalSink,
};
use sunglobe_time::{HttpTimeSource, SystemClock};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing(LogFormat::from_env())?;

    let config = DriverConfig::default();
    let source = HttpTimeSource::new(&config.sync)?;
    tracing::info!(endpoint = source.endpoint(), "using time service");

    let mut driver = Driver::new(config, source, SystemClock);
    tracing::debug!(
        radius = driver.layout().radius,
        aspect = driver.camera().aspect(),
        "globe layout"
    );

    match std::env::var("SUNGLOBE_SINK").as_deref() {
        Ok("json") => {
            let mut sink = JsonLinesSink::new(std::io::stdout().lock());
            driver.run(&mut sink).await;
        }
        _ => {
            let mut sink = TerminalSink::stdout();
            driver.run(&mut sink).await;
        }
    }

    Ok(())
}
