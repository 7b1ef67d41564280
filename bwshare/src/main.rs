/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use bwshare::config::{DeviceOverride, SimulationConfig};
use bwshare::device::{DeviceId, SharingPolicy};
use bwshare::registry::DeviceRegistry;
use bwshare::slot::SlotClock;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Bandwidth sharing simulator.
///
/// Example:
///   bwshare -p statistical -b 80 -n 2 --demand 1=60 --demand 2=40
///   bwshare -p tdm --tdm-ticks 8 --slot-ms 250
#[derive(Debug, Parser)]
#[command(
    name = "bwshare",
    about = "Bandwidth sharing simulator – split a link across devices under five policies",
    long_about = None,
)]
struct Cli {
    /// Path to a YAML simulation file.  Command-line values override it.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Total link capacity in Mbps.
    #[arg(short = 'b', long = "capacity")]
    capacity: Option<f64>,

    /// Number of devices.
    #[arg(short = 'n', long = "devices")]
    devices: Option<usize>,

    /// Sharing policy.
    #[arg(short = 'p', long = "policy", value_enum)]
    policy: Option<SharingPolicy>,

    /// Demand override, `ID=MBPS`.  Repeatable.
    #[arg(long = "demand", value_name = "ID=MBPS", value_parser = parse_assignment::<f64>)]
    demands: Vec<(DeviceId, f64)>,

    /// Priority override, `ID=N` (1 is highest).  Repeatable.
    #[arg(long = "priority", value_name = "ID=N", value_parser = parse_assignment::<u32>)]
    priorities: Vec<(DeviceId, u32)>,

    /// Also print the allocation under every policy.
    #[arg(long = "compare", default_value_t = false)]
    compare: bool,

    /// Rotate the TDM slot this many times (TDM policy only).
    #[arg(long = "tdm-ticks", default_value_t = 0)]
    tdm_ticks: u32,

    /// TDM slot length in milliseconds.
    #[arg(long = "slot-ms")]
    slot_ms: Option<u64>,
}

/// Parse `ID=VALUE`.
fn parse_assignment<T>(s: &str) -> Result<(DeviceId, T), String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{s}'"))?;
    let id = id
        .trim()
        .parse::<DeviceId>()
        .map_err(|e| format!("invalid device id '{id}': {e}"))?;
    let value = value
        .trim()
        .parse::<T>()
        .map_err(|e| format!("invalid value '{value}': {e}"))?;
    Ok((id, value))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // ── Resolve configuration ─────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => match SimulationConfig::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Failed to load simulation configuration: {:#}", e);
                process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };
    apply_cli_overrides(&mut config, &cli);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {:#}", e);
        process::exit(1);
    }

    info!(
        capacity_mbps = config.settings.capacity,
        device_count  = config.settings.device_count,
        policy        = %config.settings.policy,
        tdm_slot_ms   = config.tdm_slot.as_millis() as u64,
        "Configuration"
    );

    // ── Build the device set and run the first pass ───────────────────────────
    let mut registry = match config.build_registry() {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to initialise simulation: {:#}", e);
            process::exit(1);
        }
    };

    print!("{}", registry.report().render_table());

    if cli.compare {
        if let Err(e) = print_comparison(&mut registry) {
            error!("Policy comparison failed: {:#}", e);
            process::exit(1);
        }
    }

    if cli.tdm_ticks > 0 {
        if registry.policy() == SharingPolicy::Tdm {
            run_tdm_slots(&registry, config.tdm_slot, cli.tdm_ticks).await;
        } else {
            warn!(policy = %registry.policy(), "--tdm-ticks ignored: active policy is not tdm");
        }
    }
}

fn apply_cli_overrides(config: &mut SimulationConfig, cli: &Cli) {
    if let Some(capacity) = cli.capacity {
        config.settings.capacity = capacity;
    }
    if let Some(count) = cli.devices {
        config.settings.device_count = count;
    }
    if let Some(policy) = cli.policy {
        config.settings.policy = policy;
    }
    if let Some(ms) = cli.slot_ms {
        config.tdm_slot = Duration::from_millis(ms);
    }
    for &(id, demand) in &cli.demands {
        config.devices.push(DeviceOverride {
            id,
            demand_mbps: Some(demand),
            priority: None,
        });
    }
    for &(id, priority) in &cli.priorities {
        config.devices.push(DeviceOverride {
            id,
            demand_mbps: None,
            priority: Some(priority),
        });
    }
}

/// Print the current device set under every policy, then restore the
/// original one.
fn print_comparison(registry: &mut DeviceRegistry) -> anyhow::Result<()> {
    let original = registry.policy();
    for policy in SharingPolicy::ALL {
        if policy == original {
            continue;
        }
        println!();
        print!("{}", registry.set_policy(policy)?.render_table());
    }
    registry.set_policy(original)?;
    Ok(())
}

/// Rotate the TDM slot on a fixed cadence and print which device owns the
/// link.  Allocation is not recomputed here.
async fn run_tdm_slots(registry: &DeviceRegistry, slot: Duration, ticks: u32) {
    let devices = registry.devices();
    let mut clock = SlotClock::new(slot);
    let mut interval = tokio::time::interval(clock.interval());

    println!();
    info!(ticks, slot_ms = clock.interval().as_millis() as u64, "TDM slot rotation");

    // first tick completes immediately
    interval.tick().await;
    for step in 0..=ticks {
        if step > 0 {
            interval.tick().await;
            clock.tick(devices.len());
        }
        match clock.active(devices.len()) {
            Some(i) => {
                let d = &devices[i];
                println!(
                    "  slot {:>3}: {} transmitting at {:.1} Mbps",
                    step,
                    d.name,
                    registry.capacity()
                );
            }
            None => println!("  slot {:>3}: idle (no devices)", step),
        }
    }
}
