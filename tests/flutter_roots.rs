use std::fs;
use std::path::PathBuf;

use vg_roots::app::pipeline::{analyze_batch, analyze_file};
use vg_roots::domain::{ColumnMap, ModeSelection, ModeSeries, RootSet};
use vg_roots::error::{AnalysisError, ShapeError};
use vg_roots::io::{
    chart_from_series, read_chart_json, series_from_chart, write_chart_json, write_roots_report,
};
use vg_roots::report::{format_roots, format_run_summary};

const VELOCITIES: [f64; 8] = [100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0];

/// Damping per mode:
/// - mode 1 crosses once, between 250 and 300
/// - mode 2 stays stable
/// - mode 3 crosses three times
fn dampings() -> [[f64; 8]; 3] {
    [
        VELOCITIES.map(|v| (v - 275.0) / 1000.0),
        [-0.05; 8],
        [-0.02, 0.02, -0.02, -0.03, -0.04, -0.05, 0.05, 0.05],
    ]
}

/// One solver row: `[kfreq, 1/kfreq, velocity, damping, frequency, eigr, eigi]`.
fn row(mode: usize, step: usize) -> Vec<f64> {
    let v = VELOCITIES[step];
    let g = dampings()[mode][step];
    let f = 4.0 * (mode + 1) as f64 - v / 500.0;
    vec![0.1, 10.0, v, g, f, g * f, f * 6.283]
}

fn assert_close(a: impl IntoIterator<Item = f64>, b: impl IntoIterator<Item = f64>) {
    let (a, b): (Vec<f64>, Vec<f64>) = (a.into_iter().collect(), b.into_iter().collect());
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert!((x - y).abs() <= 1e-12 * x.abs().max(1.0), "{x} != {y}");
    }
}

fn assert_same_series(a: &ModeSeries, b: &ModeSeries) {
    assert_eq!(a.frequencies.shape(), b.frequencies.shape());
    assert_eq!(a.dampings.shape(), b.dampings.shape());
    assert_close(a.velocities.iter().copied(), b.velocities.iter().copied());
    assert_close(a.frequencies.iter().copied(), b.frequencies.iter().copied());
    assert_close(a.dampings.iter().copied(), b.dampings.iter().copied());
}

fn assert_same_roots(a: &RootSet, b: &RootSet) {
    assert_eq!(a.num_modes(), b.num_modes());
    for ((ma, ra), (mb, rb)) in a.iter().zip(b.iter()) {
        assert_eq!(ma, mb);
        assert_close(ra.iter().copied(), rb.iter().copied());
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vg-it-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_flat_json(dir: &PathBuf, name: &str) -> PathBuf {
    let data: Vec<f64> = (0..3)
        .flat_map(|mode| (0..8).flat_map(move |step| row(mode, step)))
        .collect();
    let doc = serde_json::json!({ "shape": [3, 8, 7], "data": data, "title": "Wing flutter" });
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
    path
}

fn write_csv(dir: &PathBuf, name: &str) -> PathBuf {
    let mut text = String::from("mode,step,kfreq,inv_kfreq,velocity,damping,frequency,eigr,eigi\n");
    // Reverse order: row order in the file must not matter.
    for mode in (0..3).rev() {
        for step in (0..8).rev() {
            let values: Vec<String> = row(mode, step).iter().map(|v| v.to_string()).collect();
            text.push_str(&format!("{mode},{step},{}\n", values.join(",")));
        }
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn finds_roots_for_every_mode() {
    let dir = scratch_dir("roots");
    let path = write_flat_json(&dir, "wing.json");

    let output = analyze_file(&path, &ColumnMap::default()).unwrap();

    assert_eq!(output.shape, [3, 8, 7]);
    assert_eq!(output.title, "Wing flutter");
    assert_eq!(output.roots.num_modes(), 3);

    let mode1 = output.roots.get(0);
    assert_eq!(mode1.len(), 1);
    assert!((mode1[0] - 275.0).abs() < 1e-9);

    assert!(output.roots.get(1).is_empty());

    let mode3 = output.roots.get(2);
    assert_eq!(mode3.len(), 3);
    for (got, want) in mode3.iter().zip([125.0, 175.0, 375.0]) {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }

    assert_eq!(
        format_roots(&output.roots),
        "Mode  1: 275.000\nMode  3: 125.000, 175.000, 375.000\n"
    );
    let summary = format_run_summary(&output);
    assert!(summary.contains("Critical: mode 3 at 125.000"));
}

#[test]
fn csv_and_json_exports_agree() {
    let dir = scratch_dir("formats");
    let json = write_flat_json(&dir, "wing.json");
    let csv = write_csv(&dir, "wing.csv");

    let outcomes = analyze_batch(&[json, csv], &ColumnMap::default());
    let a = outcomes[0].result.as_ref().unwrap();
    let b = outcomes[1].result.as_ref().unwrap();

    assert_same_series(&a.series, &b.series);
    assert_same_roots(&a.roots, &b.roots);
}

#[test]
fn shifted_columns_are_configurable() {
    let dir = scratch_dir("columns");
    // Only `[velocity, damping, frequency]`, as some exports trim the table.
    let rows: Vec<Vec<Vec<f64>>> = (0..3)
        .map(|mode| (0..8).map(|step| row(mode, step)[2..5].to_vec()).collect())
        .collect();
    let path = dir.join("trimmed.json");
    fs::write(&path, serde_json::to_string(&rows).unwrap()).unwrap();

    let err = analyze_file(&path, &ColumnMap::default()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Structural {
            source: ShapeError::ColumnOutOfRange { .. },
            ..
        }
    ));
    assert!(err.to_string().starts_with(&path.display().to_string()));

    let columns = ColumnMap {
        velocity: 0,
        damping: 1,
        frequency: 2,
    };
    let output = analyze_file(&path, &columns).unwrap();
    assert_eq!(output.roots.unstable_modes(), vec![0, 2]);
}

#[test]
fn exports_round_trip_through_disk() {
    let dir = scratch_dir("exports");
    let path = write_flat_json(&dir, "wing.json");
    let output = analyze_file(&path, &ColumnMap::default()).unwrap();

    let out_dir = dir.join("out");
    fs::create_dir_all(&out_dir).unwrap();

    let report = write_roots_report(&out_dir, &output.source, &output.roots).unwrap();
    assert_eq!(report, out_dir.join("wing.txt"));
    assert_eq!(
        fs::read_to_string(&report).unwrap(),
        "Mode  1: 275.000\nMode  3: 125.000, 175.000, 375.000\n"
    );

    let chart = chart_from_series(
        "wing.json",
        &output.series,
        &output.roots,
        &ModeSelection::new(vec![2]),
    );
    let chart_path = out_dir.join("wing.chart.json");
    write_chart_json(&chart_path, &chart).unwrap();

    let loaded = read_chart_json(&chart_path).unwrap();
    assert_eq!(loaded.modes.modes(), &[2]);
    assert_same_roots(&loaded.roots, &output.roots);
    assert_same_series(&series_from_chart(&loaded).unwrap(), &output.series);
}
