//! # SCS Input Probe
//!
//! Attaches read-only to a running plugin's region and prints one frame,
//! decoded exactly as the host would see it.
//!
//! # Usage
//!
//! ```bash
//! # Default lane assist layout over SCSControls
//! scs_input_probe
//!
//! # Custom layout, machine-readable output
//! scs_input_probe --config scs_input.toml --json
//! ```

#![deny(warnings)]

use clap::Parser;
use scs_common::config::{ConfigLoader, PluginConfig};
use scs_common::schema::InputSchema;
use scs_common::value::InputValue;
use scs_input::{InputEnumerator, InputEvent};
use scs_shared_memory::{RegionId, SharedMemoryRegion};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{Level, debug, error};
use tracing_subscriber::EnvFilter;

/// Print the current frame of an SCS input region
#[derive(Parser, Debug)]
#[command(name = "scs_input_probe")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Print the current frame of an SCS input shared memory region")]
#[command(long_about = None)]
struct Args {
    /// Plugin configuration file. Defaults to $SCS_INPUT_CONFIG, then the
    /// built-in lane assist layout.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the frame as a JSON array
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// One decoded input, as printed.
#[derive(Debug, Serialize)]
struct ProbeLine<'a> {
    index: u32,
    name: &'a str,
    value: InputValue,
}

fn main() {
    if let Err(e) = run() {
        error!("Probe failed: {}", e);
        eprintln!("scs_input_probe: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(&args);

    let config = match &args.config {
        Some(path) => PluginConfig::load(path)?,
        None => PluginConfig::from_env()?,
    };
    config.validate()?;
    let schema = config.schema()?;

    let id = RegionId::from(&config.region);
    let region = SharedMemoryRegion::open_existing(&id, schema.region_size())?;
    debug!("Attached to {} ({} bytes)", region.id(), region.size());

    let mut enumerator = InputEnumerator::new(schema, region.size())?;
    let events = enumerator.drain_frame(&region);
    let lines = probe_lines(enumerator.schema(), &events);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        for line in &lines {
            println!("{:>3} {:<16} {}", line.index, line.name, line.value);
        }
    }
    Ok(())
}

fn probe_lines<'a>(schema: &'a InputSchema, events: &[InputEvent]) -> Vec<ProbeLine<'a>> {
    events
        .iter()
        .filter_map(|event| {
            let descriptor = schema.get(event.input_index as usize)?;
            Some(ProbeLine {
                index: event.input_index,
                name: &descriptor.name,
                value: event.value,
            })
        })
        .collect()
}

/// Log to stderr so stdout carries only the frame.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use scs_common::value::encode_all;

    #[test]
    fn test_probe_lines_follow_schema_names() {
        let schema = InputSchema::lane_assist();
        let image = encode_all(&[
            InputValue::Float(0.25),
            InputValue::Float(1.5),
            InputValue::Float(0.0),
            InputValue::Bool(true),
            InputValue::Bool(false),
        ]);
        let mut enumerator = InputEnumerator::new(schema.clone(), image.len()).unwrap();
        let events = enumerator.drain_frame(image.as_slice());

        let lines = probe_lines(&schema, &events);
        let names: Vec<_> = lines.iter().map(|l| l.name).collect();
        assert_eq!(
            names,
            vec!["steering", "aforward", "abackward", "lblinkerh", "rblinkerh"]
        );
        assert_eq!(lines[1].value, InputValue::Float(1.0));
    }

    #[test]
    fn test_json_output_shape() {
        let schema = InputSchema::lane_assist();
        let events = [InputEvent {
            input_index: 3,
            value: InputValue::Bool(true),
        }];
        let json = serde_json::to_value(probe_lines(&schema, &events)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "index": 3, "name": "lblinkerh", "value": true }])
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["scs_input_probe", "--config", "a.toml", "--json"]);
        assert_eq!(args.config, Some(PathBuf::from("a.toml")));
        assert!(args.json);
        assert!(!args.verbose);
    }
}
