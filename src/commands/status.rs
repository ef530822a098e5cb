use crate::config::{PackageConfig, load_config};
use crate::engine::time_until_next_check;
use crate::error::Result;
use crate::state::{StateRoot, Watermarks};
use crate::traits::{Clock, SystemClock};
use crate::ui;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct PackageStatus<'a> {
    name: &'a str,
    #[serde(flatten)]
    watermarks: Watermarks,
    next_check_in: i64,
}

pub fn run(config_path: &Path, package: Option<&str>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let names: Vec<String> = package.map(str::to_string).into_iter().collect();
    let selected = super::select_packages(&config, &names)?;

    let root = StateRoot::new(config.settings.state_dir.clone());
    let now = SystemClock.now();

    let mut rows = Vec::with_capacity(selected.len());
    for package in selected {
        rows.push(collect(&root, package, now)?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    ui::keyval("State", &root.path().display().to_string());
    for row in &rows {
        print_row(row);
    }
    Ok(())
}

fn collect<'a>(root: &StateRoot, package: &'a PackageConfig, now: i64) -> Result<PackageStatus<'a>> {
    let watermarks = match root.existing(&package.name)? {
        Some(state) => state.watermarks()?,
        None => Watermarks::default(),
    };
    let next_check_in = time_until_next_check(watermarks.last_checked, package.interval_secs, now);
    Ok(PackageStatus {
        name: &package.name,
        watermarks,
        next_check_in,
    })
}

fn print_row(row: &PackageStatus<'_>) {
    let w = &row.watermarks;
    ui::header(row.name);
    ui::keyval("  Last checked", &format_timestamp(w.last_checked));
    ui::keyval("  Last build", &format_timestamp(w.last_build_started));
    ui::keyval("  Built version", &format_timestamp(w.last_success));
    if w.last_failed > 0 {
        ui::keyval("  Failed version", &format_timestamp(w.last_failed));
    }
    if !w.last_maintainer.is_empty() {
        ui::keyval("  Maintainer", &w.last_maintainer);
    }
    ui::keyval("  Next check", &format_delta(row.next_check_in));
}

fn format_timestamp(ts: i64) -> String {
    if ts <= 0 {
        return "never".to_string();
    }
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn format_delta(secs: i64) -> String {
    if secs <= 0 {
        return "due now".to_string();
    }
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("in {}s", s),
        (0, _) => format!("in {}m {}s", m, s),
        _ => format!("in {}h {}m", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_timestamp(0), "never");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn deltas_render_coarsely() {
        assert_eq!(format_delta(0), "due now");
        assert_eq!(format_delta(42), "in 42s");
        assert_eq!(format_delta(125), "in 2m 5s");
        assert_eq!(format_delta(90_000), "in 25h 0m");
    }

    #[test]
    fn json_rows_flatten_watermarks() {
        let row = PackageStatus {
            name: "yay",
            watermarks: Watermarks {
                last_success: 1000,
                ..Watermarks::default()
            },
            next_check_in: 0,
        };
        let value = serde_json::to_value(&row).expect("serialize");
        assert_eq!(value["name"], "yay");
        assert_eq!(value["last_success"], 1000);
        assert_eq!(value["next_check_in"], 0);
    }
}
