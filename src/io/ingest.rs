//! Results tensor loading.
//!
//! This module is the boundary with the solver-output parser: it reads a
//! tensor that has already been extracted from the solver's results and
//! exported as JSON or CSV. It does not know anything about the solver's
//! native format.
//!
//! Supported layouts:
//! - JSON nested array: `[[[f64; columns]; steps]; modes]`
//! - JSON object: `{ "shape": [modes, steps, columns], "data": [...] }` (row-major)
//! - CSV: header row, then one row per `(mode, step)`: `mode, step, c0, c1, ...`

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ResultsTensor;
use crate::error::{AnalysisError, ShapeError};

/// Suffixes of files this tool writes itself; never picked up as inputs.
const EXPORT_SUFFIXES: [&str; 2] = [".chart.json", ".series.csv"];

/// A tensor plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedTensor {
    pub path: PathBuf,
    pub tensor: ResultsTensor,
    /// Optional run title carried by JSON exports.
    pub title: Option<String>,
}

impl LoadedTensor {
    /// Title for charts: the embedded title, else the file name.
    pub fn display_name(&self) -> String {
        self.title.clone().unwrap_or_else(|| file_name(&self.path))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TensorJson {
    Nested(Vec<Vec<Vec<f64>>>),
    Flat {
        shape: [usize; 3],
        data: Vec<f64>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        subcase: Option<String>,
    },
}

/// Load a results tensor, choosing the layout by file extension.
pub fn load_tensor(path: &Path) -> Result<LoadedTensor, AnalysisError> {
    if !path.is_file() {
        return Err(AnalysisError::parse(
            path,
            format!("could not find the file: {}", path.display()),
        ));
    }

    match extension(path).as_deref() {
        Some("json") => load_json(path),
        Some("csv") => load_csv(path),
        _ => Err(AnalysisError::parse(
            path,
            "unsupported tensor file (expected .json or .csv)",
        )),
    }
}

/// List tensor files (`.json`, `.csv`) directly inside `dir`, sorted by name.
///
/// Files written by this tool (`*.chart.json`, `*.series.csv`) are skipped.
pub fn discover_tensor_files(dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AnalysisError::parse(dir, format!("failed to read directory: {e}")))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| AnalysisError::parse(dir, format!("failed to read directory: {e}")))?;
        let path = entry.path();
        if !path.is_file() || !is_tensor_file(&path) {
            continue;
        }
        out.push(path);
    }

    out.sort();
    log::debug!("discovered {} tensor file(s) in {}", out.len(), dir.display());
    Ok(out)
}

fn is_tensor_file(path: &Path) -> bool {
    let name = file_name(path).to_ascii_lowercase();
    if EXPORT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        return false;
    }
    matches!(extension(path).as_deref(), Some("json" | "csv"))
}

fn load_json(path: &Path) -> Result<LoadedTensor, AnalysisError> {
    let file = File::open(path)
        .map_err(|e| AnalysisError::parse(path, format!("failed to open tensor JSON: {e}")))?;
    let parsed: TensorJson = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AnalysisError::parse(path, format!("invalid tensor JSON: {e}")))?;

    let (tensor, title) = match parsed {
        TensorJson::Nested(rows) => (ResultsTensor::from_nested(rows), None),
        TensorJson::Flat {
            shape,
            data,
            title,
            subcase,
        } => {
            let title = match (title, subcase) {
                (Some(t), Some(s)) => Some(format!("{t} (subcase {s})")),
                (Some(t), None) => Some(t),
                (None, Some(s)) => Some(format!("{} (subcase {s})", file_name(path))),
                (None, None) => None,
            };
            (ResultsTensor::from_flat(shape, data), title)
        }
    };

    let tensor = tensor.map_err(|e| AnalysisError::structural(path, e))?;
    Ok(LoadedTensor {
        path: path.to_path_buf(),
        tensor,
        title,
    })
}

fn load_csv(path: &Path) -> Result<LoadedTensor, AnalysisError> {
    let file = File::open(path)
        .map_err(|e| AnalysisError::parse(path, format!("failed to open tensor CSV: {e}")))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(file);

    let mut cells: Vec<(usize, usize, Vec<f64>)> = Vec::new();
    let mut num_columns: Option<usize> = None;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record =
            result.map_err(|e| AnalysisError::parse(path, format!("line {line}: CSV parse error: {e}")))?;

        if record.len() < 3 {
            return Err(AnalysisError::parse(
                path,
                format!("line {line}: expected `mode, step` followed by at least one value"),
            ));
        }

        let mode = parse_index(&record[0], "mode", line, path)?;
        let step = parse_index(&record[1], "step", line, path)?;
        let values = record
            .iter()
            .skip(2)
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|_| AnalysisError::parse(path, format!("line {line}: invalid number `{s}`")))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let expected = *num_columns.get_or_insert(values.len());
        if values.len() != expected {
            return Err(AnalysisError::structural(
                path,
                ShapeError::JaggedColumns {
                    mode,
                    step,
                    expected,
                    found: values.len(),
                },
            ));
        }
        cells.push((mode, step, values));
    }

    let tensor = assemble_cells(cells, num_columns.unwrap_or(0))
        .map_err(|e| AnalysisError::structural(path, e))?;

    Ok(LoadedTensor {
        path: path.to_path_buf(),
        tensor,
        title: None,
    })
}

/// Place `(mode, step, values)` cells into a regular tensor.
///
/// The shape is `(max mode + 1, max step + 1, num_columns)`; every cell of
/// that grid must be supplied exactly once. The grid is checked against the
/// cells actually read before anything is allocated for it.
fn assemble_cells(
    mut cells: Vec<(usize, usize, Vec<f64>)>,
    num_columns: usize,
) -> Result<ResultsTensor, ShapeError> {
    let mut seen = HashSet::with_capacity(cells.len());
    let mut num_modes = 0usize;
    let mut num_steps = 0usize;

    for &(mode, step, _) in &cells {
        if !seen.insert((mode, step)) {
            return Err(ShapeError::DuplicateCell { mode, step });
        }
        let (Some(modes), Some(steps)) = (mode.checked_add(1), step.checked_add(1)) else {
            return Err(ShapeError::IndexOverflow { mode, step });
        };
        num_modes = num_modes.max(modes);
        num_steps = num_steps.max(steps);
    }

    // Cells are unique and inside the grid, so any other size means holes.
    if num_modes.checked_mul(num_steps) != Some(cells.len()) {
        let (mode, step) = first_missing_cell(&seen, num_steps);
        return Err(ShapeError::MissingCell { mode, step });
    }

    cells.sort_unstable_by_key(|&(mode, step, _)| (mode, step));
    let data = cells.into_iter().flat_map(|(_, _, values)| values).collect();

    ResultsTensor::from_flat([num_modes, num_steps, num_columns], data)
}

/// First row-major `(mode, step)` absent from `seen`.
///
/// Only called when the grid has more cells than `seen`, so a hole exists
/// within the first `seen.len() + 1` positions.
fn first_missing_cell(seen: &HashSet<(usize, usize)>, num_steps: usize) -> (usize, usize) {
    (0..=seen.len())
        .map(|idx| (idx / num_steps, idx % num_steps))
        .find(|cell| !seen.contains(cell))
        .unwrap_or_default()
}

fn parse_index(raw: &str, what: &str, line: usize, path: &Path) -> Result<usize, AnalysisError> {
    raw.parse::<usize>().map_err(|_| {
        AnalysisError::parse(
            path,
            format!("line {line}: `{what}` must be a non-negative integer, got `{raw}`"),
        )
    })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vg-ingest-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_nested_json() {
        let dir = scratch_dir("nested");
        let path = write(&dir, "run.json", "[[[1,2],[3,4]],[[5,6],[7,8]]]");

        let loaded = load_tensor(&path).unwrap();
        assert_eq!(loaded.tensor.shape(), [2, 2, 2]);
        assert_eq!(loaded.tensor.get(1, 0, 1), 6.0);
        assert_eq!(loaded.display_name(), "run.json");
    }

    #[test]
    fn loads_flat_json_with_title() {
        let dir = scratch_dir("flat");
        let path = write(
            &dir,
            "flat.json",
            r#"{"shape":[1,2,3],"data":[1,2,3,4,5,6],"title":"Wing","subcase":"1"}"#,
        );

        let loaded = load_tensor(&path).unwrap();
        assert_eq!(loaded.tensor.shape(), [1, 2, 3]);
        assert_eq!(loaded.tensor.get(0, 1, 2), 6.0);
        assert_eq!(loaded.display_name(), "Wing (subcase 1)");
    }

    #[test]
    fn jagged_json_is_structural() {
        let dir = scratch_dir("jagged");
        let path = write(&dir, "bad.json", "[[[1,2],[3,4]],[[5,6]]]");

        let err = load_tensor(&path).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Structural {
                source: ShapeError::JaggedSteps { mode: 1, .. },
                ..
            }
        ));
    }

    #[test]
    fn loads_csv_in_any_row_order() {
        let dir = scratch_dir("csv");
        let path = write(
            &dir,
            "run.csv",
            "mode,step,v,g\n1,1,20,-0.1\n0,0,10,0.2\n0,1,20,0.1\n1,0,10,-0.3\n",
        );

        let loaded = load_tensor(&path).unwrap();
        assert_eq!(loaded.tensor.shape(), [2, 2, 2]);
        assert_eq!(loaded.tensor.get(0, 0, 1), 0.2);
        assert_eq!(loaded.tensor.get(1, 1, 0), 20.0);
    }

    #[test]
    fn csv_missing_cell_is_structural() {
        let dir = scratch_dir("csv-missing");
        let path = write(&dir, "run.csv", "mode,step,v\n0,0,1\n0,1,2\n1,0,3\n");

        let err = load_tensor(&path).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Structural {
                source: ShapeError::MissingCell { mode: 1, step: 1 },
                ..
            }
        ));
    }

    #[test]
    fn csv_huge_indices_are_structural() {
        let dir = scratch_dir("csv-huge");
        let overflow = write(&dir, "max.csv", "mode,step,v\n18446744073709551615,0,1\n");
        let err = load_tensor(&overflow).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Structural {
                source: ShapeError::IndexOverflow {
                    mode: usize::MAX,
                    step: 0
                },
                ..
            }
        ));

        // A 4e9 x 4e9 grid with one cell is reported without sizing the grid.
        let sparse = write(&dir, "sparse.csv", "mode,step,v\n4000000000,4000000000,1\n");
        let err = load_tensor(&sparse).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Structural {
                source: ShapeError::MissingCell { mode: 0, step: 0 },
                ..
            }
        ));
    }

    #[test]
    fn csv_duplicate_cell_is_structural() {
        let dir = scratch_dir("csv-dup");
        let path = write(&dir, "run.csv", "mode,step,v\n0,0,1\n0,1,2\n0,0,3\n");

        let err = load_tensor(&path).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Structural {
                source: ShapeError::DuplicateCell { mode: 0, step: 0 },
                ..
            }
        ));
    }

    #[test]
    fn csv_bad_number_is_a_parse_error() {
        let dir = scratch_dir("csv-nan");
        let path = write(&dir, "run.csv", "mode,step,v\n0,0,abc\n");

        let err = load_tensor(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = load_tensor(Path::new("/nonexistent/wing.json")).unwrap_err();
        assert!(err.to_string().contains("could not find the file"));
    }

    #[test]
    fn discovery_skips_exports_and_other_files() {
        let dir = scratch_dir("discover");
        write(&dir, "b.csv", "");
        write(&dir, "a.JSON", "");
        write(&dir, "a.chart.json", "");
        write(&dir, "a.series.csv", "");
        write(&dir, "notes.txt", "");

        let files = discover_tensor_files(&dir).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.JSON", "b.csv"]);
    }
}
