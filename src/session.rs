//! Shortening of a recorded session directory.
//!
//! A session directory holds two aligned tables:
//! - `frames.trajectories.htsv`: per-frame tracking measurements
//! - `frames.trialInfo.htsv`: per-frame trial metadata
//!
//! Both are cut to the same frame window, the heading column of the
//! trajectory window is replaced by its circularly smoothed values, and the
//! results are written as `short.frames.*.htsv` in the same directory.

use crate::config::Config;
use crate::core::smoothing::{smooth_with_kernel, GaussianKernel};
use crate::core::windowing::{extract, WindowSpec};
use crate::error::{Result, ShortenError};
use crate::provenance::{RunManifest, TableRecord, MANIFEST_FILE};
use crate::table::{read_table, render_table, Table};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Trajectory table file name.
pub const TRAJECTORIES_FILE: &str = "frames.trajectories.htsv";

/// Trial-info table file name.
pub const TRIAL_INFO_FILE: &str = "frames.trialInfo.htsv";

/// Prefix added to output file names.
pub const OUTPUT_PREFIX: &str = "short.";

/// Parameters for shortening a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenParams {
    pub window: WindowSpec,
    pub sigma: f64,
    pub angle_column: String,
    pub write_index: bool,
    pub write_manifest: bool,
}

impl ShortenParams {
    /// Validate a configuration and turn it into parameters.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            window: config.validate()?,
            sigma: config.sigma,
            angle_column: config.angle_column.clone(),
            write_index: config.write_index,
            write_manifest: config.write_manifest,
        })
    }
}

impl Default for ShortenParams {
    fn default() -> Self {
        Self {
            window: WindowSpec::default(),
            sigma: crate::core::DEFAULT_SIGMA,
            angle_column: crate::config::DEFAULT_ANGLE_COLUMN.to_string(),
            write_index: true,
            write_manifest: true,
        }
    }
}

/// The two windowed tables of a session.
#[derive(Debug, Clone)]
pub struct ShortenedTables {
    /// Trajectory window with the heading column smoothed
    pub trajectories: Table,
    /// Trial-info window, untouched
    pub trial_info: Table,
}

/// Result of shortening one session directory.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Session directory
    pub dir: PathBuf,
    /// Files written, in write order
    pub outputs: Vec<PathBuf>,
    /// Provenance of the run
    pub manifest: RunManifest,
}

impl SessionOutcome {
    /// Rows read from both source tables.
    pub fn rows_read(&self) -> usize {
        self.manifest.tables.iter().map(|t| t.source_rows).sum()
    }

    /// Rows written to both output tables.
    pub fn rows_written(&self) -> usize {
        self.manifest.rows_written()
    }
}

/// Format a smoothed angle the way numeric cells are written elsewhere
/// in these files (always with a fractional part).
pub fn format_angle(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        text + ".0"
    }
}

/// Cut both tables to the window and smooth the heading column.
///
/// The source tables are not modified. Fails before producing anything if
/// the parameters are invalid or the heading column is missing or unparsable.
pub fn shorten_tables(
    trajectories: &Table,
    trial_info: &Table,
    params: &ShortenParams,
) -> Result<ShortenedTables> {
    let kernel = GaussianKernel::new(params.sigma)?;

    if trajectories.column(&params.angle_column).is_none() {
        return Err(ShortenError::MissingColumn {
            table: trajectories.name().to_string(),
            column: params.angle_column.clone(),
        });
    }

    if trajectories.row_count() != trial_info.row_count() {
        warn!(
            trajectories = trajectories.row_count(),
            trial_info = trial_info.row_count(),
            "tables have different row counts; slicing both by position"
        );
    }

    let mut short_traj = extract(trajectories, params.window);
    let short_info = extract(trial_info, params.window);

    let angles = short_traj.numeric_column(&params.angle_column)?;
    let smoothed = smooth_with_kernel(&angles, &kernel)?;
    short_traj.replace_column(
        &params.angle_column,
        smoothed.into_iter().map(format_angle).collect(),
    )?;

    debug!(
        rows = short_traj.row_count(),
        column = %params.angle_column,
        "smoothed heading column"
    );

    Ok(ShortenedTables {
        trajectories: short_traj,
        trial_info: short_info,
    })
}

/// Output path for a source file name inside `dir`.
pub fn output_path(dir: &Path, source_file: &str) -> PathBuf {
    dir.join(format!("{OUTPUT_PREFIX}{source_file}"))
}

/// Shorten the session stored in `dir`.
///
/// Every output is rendered in memory first and then committed together, so
/// a failure leaves no partial outputs behind.
pub fn shorten_session(dir: &Path, params: &ShortenParams) -> Result<SessionOutcome> {
    let traj_path = dir.join(TRAJECTORIES_FILE);
    let info_path = dir.join(TRIAL_INFO_FILE);

    let trajectories = read_table(&traj_path, "trajectories")?;
    let trial_info = read_table(&info_path, "trial_info")?;

    let shortened = shorten_tables(&trajectories, &trial_info, params)?;

    let mut manifest = RunManifest::new(
        params.window,
        params.sigma,
        &params.angle_column,
        params.write_index,
    );

    let mut files = Vec::new();
    for (source_file, source, short) in [
        (TRAJECTORIES_FILE, &trajectories, &shortened.trajectories),
        (TRIAL_INFO_FILE, &trial_info, &shortened.trial_info),
    ] {
        let path = output_path(dir, source_file);
        manifest.record_table(TableRecord {
            role: source.name().to_string(),
            source: source_file.to_string(),
            output: file_name(&path),
            source_rows: source.row_count(),
            output_rows: short.row_count(),
            columns: short.column_count(),
        });
        files.push((path, render_table(short, params.write_index)));
    }

    if params.write_manifest {
        let json = manifest
            .to_json()
            .map_err(|e| ShortenError::io(dir.join(MANIFEST_FILE), std::io::Error::other(e)))?;
        files.push((dir.join(MANIFEST_FILE), json));
    }

    commit_files(&files)?;

    info!(
        session = %dir.display(),
        trajectories = shortened.trajectories.row_count(),
        trial_info = shortened.trial_info.row_count(),
        "saved shortened session"
    );

    Ok(SessionOutcome {
        dir: dir.to_path_buf(),
        outputs: files.into_iter().map(|(path, _)| path).collect(),
        manifest,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        let _ = std::fs::remove_file(path);
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write every file to a temporary sibling, then rename them all into place.
///
/// On failure the temporaries and any outputs already renamed are removed.
fn commit_files(files: &[(PathBuf, String)]) -> Result<()> {
    let temps: Vec<PathBuf> = files.iter().map(|(path, _)| temp_path(path)).collect();

    for ((_, content), temp) in files.iter().zip(&temps) {
        if let Err(e) = std::fs::write(temp, content) {
            remove_all(&temps);
            return Err(ShortenError::io(temp, e));
        }
    }

    for (i, ((path, _), temp)) in files.iter().zip(&temps).enumerate() {
        if let Err(e) = std::fs::rename(temp, path) {
            let committed: Vec<PathBuf> = files[..i].iter().map(|(p, _)| p.clone()).collect();
            remove_all(&committed);
            remove_all(&temps[i..]);
            return Err(ShortenError::io(path, e));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_table;

    fn trajectories() -> Table {
        let mut text = String::from("frame\tcentroid_position.x\thead_direction.value\n");
        for i in 0..20 {
            let heading = if i % 2 == 0 { "359.0" } else { "1.0" };
            text.push_str(&format!("{i}\t0.{i:03}\t{heading}\n"));
        }
        parse_table("trajectories", &text).unwrap()
    }

    fn trial_info() -> Table {
        let mut text = String::from("trial_phase\tgoal\n");
        for i in 0..20 {
            text.push_str(&format!("ITI\tgoal_{i}\n"));
        }
        parse_table("trial_info", &text).unwrap()
    }

    fn params(start: usize, length: usize) -> ShortenParams {
        ShortenParams {
            window: WindowSpec::new(start, length).unwrap(),
            ..ShortenParams::default()
        }
    }

    #[test]
    fn test_shorten_tables_aligns_windows() {
        let out = shorten_tables(&trajectories(), &trial_info(), &params(5, 4)).unwrap();

        assert_eq!(out.trajectories.index(), &[5, 6, 7, 8]);
        assert_eq!(out.trial_info.index(), &[5, 6, 7, 8]);
        assert_eq!(out.trial_info.row(0), Some(vec!["ITI", "goal_5"]));
    }

    #[test]
    fn test_shorten_tables_smooths_heading_only() {
        let traj = trajectories();
        let out = shorten_tables(&traj, &trial_info(), &params(2, 6)).unwrap();

        let x = out.trajectories.column("centroid_position.x").unwrap();
        assert_eq!(x.values, traj.slice_rows(2..8).column("centroid_position.x").unwrap().values);

        for value in out.trajectories.numeric_column("head_direction.value").unwrap() {
            let distance = value.min(360.0 - value);
            assert!(distance < 2.0, "{value} not near 0");
        }

        // Source table untouched
        assert_eq!(traj.row(2), Some(vec!["2", "0.002", "359.0"]));
    }

    #[test]
    fn test_shorten_tables_empty_window() {
        let out = shorten_tables(&trajectories(), &trial_info(), &params(100, 10)).unwrap();
        assert!(out.trajectories.is_empty());
        assert!(out.trial_info.is_empty());
        assert_eq!(out.trajectories.column_count(), 3);
    }

    #[test]
    fn test_shorten_tables_missing_column() {
        let p = ShortenParams {
            angle_column: "heading".to_string(),
            ..params(0, 5)
        };
        let err = shorten_tables(&trajectories(), &trial_info(), &p).unwrap_err();
        assert!(err.is_missing_input());
    }

    #[test]
    fn test_shorten_tables_invalid_sigma() {
        let p = ShortenParams {
            sigma: -1.0,
            ..params(0, 5)
        };
        assert!(matches!(
            shorten_tables(&trajectories(), &trial_info(), &p),
            Err(ShortenError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_format_angle() {
        assert_eq!(format_angle(45.0), "45.0");
        assert_eq!(format_angle(359.5), "359.5");
        assert_eq!(format_angle(0.0), "0.0");
    }

    #[test]
    fn test_format_angle_tiny_values_stay_decimal() {
        assert_eq!(format_angle(1e-7), "0.0000001");
        assert_eq!(format_angle(3.2e-6), "0.0000032");

        let value = 359.999_999_999_876_5;
        let text = format_angle(value);
        assert!(!text.contains('e'));
        assert_eq!(text.parse::<f64>().unwrap(), value);
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("/data/session"), TRAJECTORIES_FILE);
        assert_eq!(
            path,
            PathBuf::from("/data/session/short.frames.trajectories.htsv")
        );
    }

    #[test]
    fn test_commit_files_cleans_up_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.htsv");
        let bad = dir.path().join("missing_dir").join("b.htsv");

        let files = vec![(good.clone(), "a\n".to_string()), (bad, "b\n".to_string())];
        assert!(commit_files(&files).is_err());

        assert!(!good.exists());
        assert!(!temp_path(&good).exists());
    }
}
