//! scenario-dump — Build a display tree from a JSON scenario snapshot and
//! print a per-station summary. Debug/QA utility for inspecting what the
//! builder produces without a rendering surface attached.

use clap::Parser;
use std::fs;

use wavedisplay::display::interval::format_instant;
use wavedisplay::{build_display_tree, DisplayInputs, DisplayTheme, ThemeVariant};

#[derive(Parser)]
#[command(
    name = "scenario-dump",
    version,
    about = "Build a waveform display tree from a JSON scenario snapshot"
)]
struct Cli {
    /// Input scenario JSON (a serialized DisplayInputs)
    #[arg(short, long)]
    r#in: String,

    /// Theme variant: light or dark
    #[arg(long, default_value = "light")]
    theme: String,

    /// Verbose mode
    #[arg(short, long, default_value_t = false)]
    verb: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verb { "debug" } else { "info" }),
    )
    .format_timestamp_secs()
    .init();

    let variant = ThemeVariant::from_name(&cli.theme)
        .ok_or_else(|| format!("unknown theme {:?} (expected light or dark)", cli.theme))?;
    let theme = DisplayTheme::from_variant(variant);

    let json = fs::read_to_string(&cli.r#in)?;
    let inputs: DisplayInputs = serde_json::from_str(&json)?;
    log::info!(
        "loaded scenario {:?}: {} station(s), {} detection(s), {} event(s)",
        cli.r#in,
        inputs.stations.len(),
        inputs.signal_detections.len(),
        inputs.events.len()
    );

    let tree = build_display_tree(&inputs, &theme, None)?;

    println!(
        "display tree: {} station(s), sort {}, view {}",
        tree.len(),
        inputs.sort,
        inputs.view_interval
    );
    for station in &tree {
        let default = &station.default_channel;
        println!(
            "  {:<8} offset {:+8.3}s  picks {:2}  predicted {:2}  windows {:2}  masks {}  {}",
            station.id,
            default.time_offset_sec,
            default.picks.len(),
            default.predicted_phases.len(),
            default.selection_windows.len(),
            if station.has_qc_masks { "yes" } else { "no " },
            match station.distance_km {
                Some(d) => format!("{d:.1} km"),
                None => "-".to_string(),
            },
        );
        for pick in &default.picks {
            println!(
                "      pick {:<4} at {}  ({:?})",
                pick.phase,
                format_instant(pick.time),
                pick.status
            );
        }
        for channel in &station.detail_channels {
            println!(
                "      {:<12} picks {:2}  masks {:2}",
                channel.label,
                channel.picks.len(),
                channel.masks.len()
            );
        }
    }

    Ok(())
}
