use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use kabuka_lib::{EventSink, JsonlEventSink, ServiceConfig};
use serde_json::{Map, Value};

pub const DEFAULT_TRACKING_LOG: &str = "logs/tracking.log";

#[derive(Args)]
pub struct TrackArgs {
    /// Event type, e.g. page_track or error_log
    pub event_type: String,

    /// Event field as key=value. Values that parse as JSON keep their type.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

pub fn run(args: &TrackArgs, config: &ServiceConfig) -> Result<()> {
    let path = config
        .tracking_log
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACKING_LOG));

    let mut fields = Map::new();
    for raw in &args.fields {
        let (key, value) = parse_field(raw)?;
        fields.insert(key, value);
    }

    JsonlEventSink::new(&path).record(&args.event_type, fields)?;
    tracing::info!(event = %args.event_type, path = %path.display(), "event recorded");
    Ok(())
}

fn parse_field(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("invalid field {:?}: expected KEY=VALUE", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("invalid field {:?}: empty key", raw);
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
