//! Resolution of input paths to trip CSV files
//!
//! An input may be a single file, a directory (searched recursively for
//! `.csv` files) or a glob pattern. Directory walks are protected against
//! symlink cycles and runaway depth.

use crate::{Result, TripError};
use glob::glob;
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum recursion depth to prevent stack overflow
const MAX_RECURSION_DEPTH: usize = 100;

/// Whether `path` has a `.csv` extension (case-insensitive)
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Expand one input (file, directory or glob pattern) to the trip files it
/// names, sorted and without duplicates.
///
/// A plain file is returned as-is whatever its extension; directories and
/// glob matches only contribute `.csv` files. A glob pattern that matches
/// no trip file is an error, like a missing path.
pub fn expand_input_path(input: &str) -> Result<Vec<PathBuf>> {
    let mut visited = HashSet::new();
    let mut files = Vec::new();

    if input.contains('*') || input.contains('?') || input.contains('[') {
        let matches = glob(input)
            .map_err(|e| TripError::Config(format!("invalid glob pattern '{}': {}", input, e)))?;
        for entry in matches {
            let path = entry.map_err(|e| {
                TripError::Config(format!("error expanding glob pattern '{}': {}", input, e))
            })?;
            if path.is_dir() {
                files.extend(find_csv_files_with_depth(&path, &mut visited, 1)?);
            } else if is_csv_file(&path) {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(TripError::Config(format!(
                "no trip files match pattern: {}",
                input
            )));
        }
    } else {
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            files.extend(find_csv_files_with_depth(path, &mut visited, 0)?);
        } else {
            return Err(TripError::Config(format!(
                "input path does not exist: {}",
                input
            )));
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Recursively find all `.csv` files below `dir`
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut visited = HashSet::new();
    let mut files = find_csv_files_with_depth(dir, &mut visited, 0)?;
    files.sort();
    Ok(files)
}

fn find_csv_files_with_depth(
    dir_path: &Path,
    visited: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<Vec<PathBuf>> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(TripError::Config(format!(
            "maximum directory depth exceeded ({}) at {}",
            MAX_RECURSION_DEPTH,
            dir_path.display()
        )));
    }

    let mut csv_files = Vec::new();

    let canonical_dir = match dir_path.canonicalize() {
        Ok(dir) => dir,
        Err(e) => {
            warn!("cannot resolve directory '{}': {}", dir_path.display(), e);
            return Ok(csv_files);
        }
    };
    if !visited.insert(canonical_dir.clone()) {
        // Already walked through another link
        return Ok(csv_files);
    }

    let entries = match fs::read_dir(&canonical_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot read directory '{}': {}", canonical_dir.display(), e);
            return Ok(csv_files);
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(
                    "cannot read entry in directory '{}': {}",
                    canonical_dir.display(),
                    e
                );
                continue;
            }
        };

        if path.is_dir() {
            csv_files.extend(find_csv_files_with_depth(&path, visited, depth + 1)?);
        } else if path.is_file() && is_csv_file(&path) {
            debug!("found trip file {}", path.display());
            csv_files.push(path);
        }
    }

    Ok(csv_files)
}
