// File: crates/demo/src/main.rs
// Summary: Demo loads an event CSV (+ optional overrides JSON), renders a static PNG and a playback frame sequence.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use pulse_core::{
    render_to_png, theme, CategoricalPayload, PlaybackState, PulseChart, RenderOptions, SettingsOverrides, TextShaper,
    Viewport,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Simulated wall time between two playback frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);
const MAX_FRAMES: usize = 600;

fn main() -> Result<()> {
    env_logger::init();

    // Args: [events.csv] [overrides.json]; theme from PULSE_THEME (light/dark)
    let mut args = std::env::args().skip(1);
    let csv_path = PathBuf::from(args.next().unwrap_or_else(|| "crates/demo/data/sample_events.csv".to_string()));
    let overrides_path = args.next().map(PathBuf::from);

    let payload = if csv_path.exists() {
        println!("Using input file: {}", csv_path.display());
        load_events_csv(&csv_path).with_context(|| format!("failed to load CSV '{}'", csv_path.display()))?
    } else {
        println!("{} not found; using generated events", csv_path.display());
        generated_payload()
    };
    println!("Loaded {} rows", payload.row_count());

    let overrides = match &overrides_path {
        Some(p) => {
            let text = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            SettingsOverrides::from_json(&text).with_context(|| format!("parsing {}", p.display()))?
        }
        None => SettingsOverrides::default(),
    };
    log::debug!("overrides: {:?}", overrides);

    let theme = theme::find(&std::env::var("PULSE_THEME").unwrap_or_default());
    let viewport = Viewport::default();
    let mut chart = PulseChart::new(theme, Box::new(TextShaper::new()));
    chart.update(&payload, &overrides, viewport).context("payload rejected")?;
    if let Some(data) = chart.data() {
        println!("Converted into {} series ({} points)", data.series.len(), data.point_count());
    }

    let opts = RenderOptions::for_viewport(&viewport);
    let out_static = out_name_with(&csv_path, "static");
    render_to_png(&chart.frame(), &opts, &out_static)?;
    println!("Wrote {}", out_static.display());

    // Playback: step simulated time and write one PNG per frame until the run ends.
    let frames_dir = PathBuf::from("target/out/frames");
    chart.play();
    let mut written = 0usize;
    while chart.state() != PlaybackState::Ready && written < MAX_FRAMES {
        let out = frames_dir.join(format!("frame_{written:04}.png"));
        render_to_png(&chart.frame(), &opts, &out)?;
        if written % 25 == 0 {
            println!(
                "  frame {written}: {:?} at {} ({:.0}%)",
                chart.state(),
                chart.progress_label().unwrap_or_default(),
                chart.progress_fraction() * 100.0
            );
        }
        written += 1;
        chart.advance(FRAME_INTERVAL);
    }
    println!("Wrote {written} playback frames to {}", frames_dir.display());

    Ok(())
}

/// Produce output file name like target/out/pulse_<stem>_<suffix>.png
fn out_name_with(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    let mut out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).ok();
    out.push(format!("pulse_{stem}_{suffix}.png"));
    out
}

/// Load `timestamp,value[,title,description,size]` rows.
fn load_events_csv(path: &Path) -> Result<CategoricalPayload> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    println!("Headers: {:?}", headers);

    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
    let i_time = idx(&["timestamp", "time", "date", "datetime"]);
    let i_value = idx(&["value", "y", "measure"]);
    let i_title = idx(&["title", "event"]);
    let i_desc = idx(&["description", "desc"]);
    let i_size = idx(&["size", "weight"]);
    let (Some(i_time), Some(i_value)) = (i_time, i_value) else {
        anyhow::bail!("CSV needs a timestamp and a value column");
    };

    let mut stamps = Vec::new();
    let mut values = Vec::new();
    let mut titles = Vec::new();
    let mut descriptions = Vec::new();
    let mut sizes = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let text = |i: Option<usize>| {
            i.and_then(|ix| rec.get(ix))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let number = |i: Option<usize>| text(i).and_then(|s| s.parse::<f64>().ok());

        stamps.push(rec.get(i_time).and_then(parse_time_ms));
        values.push(number(Some(i_value)));
        titles.push(text(i_title));
        descriptions.push(text(i_desc));
        sizes.push(number(i_size));
    }

    Ok(CategoricalPayload::temporal(stamps, values)
        .with_titles(titles)
        .with_descriptions(descriptions)
        .with_sizes(sizes))
}

/// Epoch milliseconds from epoch seconds/ms or a `YYYY-MM-DD HH:MM:SS` (UTC) string.
fn parse_time_ms(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        if n > 10_i64.pow(11) {
            return Some(n as f64);
        } // epoch ms
        return Some(n as f64 * 1000.0); // epoch sec
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
}

/// Two bursts of minute samples an hour apart, with a few events.
fn generated_payload() -> CategoricalPayload {
    let base = 1_709_283_600_000.0; // 2024-03-01 09:00 UTC
    let minutes: Vec<f64> = (0..20).chain(80..100).map(f64::from).collect();
    let stamps = minutes.iter().map(|m| Some(base + m * 60_000.0)).collect();
    let values = minutes.iter().map(|m| Some(20.0 + (m * 0.4).sin() * 8.0)).collect();
    let titles = (0..minutes.len())
        .map(|i| match i {
            5 => Some("Deploy".to_string()),
            12 => Some("Alert".to_string()),
            27 => Some("Recovery".to_string()),
            _ => None,
        })
        .collect();
    CategoricalPayload::temporal(stamps, values).with_titles(titles)
}
