//! Interactive data-file picker.
//!
//! Kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `distfit` and choose a file" UX
//!
//! Candidates are `*.csv` and `*.txt` (plain value lists) under the current
//! working directory.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth when searching for data files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

const DATA_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// Prompt on stdin/stdout for a data file under the working directory.
///
/// Accepts a number from the list or an explicit path; `q` cancels.
pub fn prompt_for_data_path() -> Result<PathBuf, AppError> {
    let files = discover_data_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv/.txt files found. Provide data with `--values`, `-f <file>` or `--synthetic <family>`.",
        ));
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    choose_from(&files, &mut input, &mut output)
}

fn choose_from<R: BufRead, W: Write>(files: &[PathBuf], input: &mut R, out: &mut W) -> Result<PathBuf, AppError> {
    let io_err = |e: io::Error| AppError::new(2, format!("Failed to talk to the terminal: {e}"));

    writeln!(out, "Found {} data file(s):", files.len()).map_err(io_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(out, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(io_err)?;
    }

    loop {
        write!(out, "Select a file by number (1-{}) or type a path (q to quit): ", files.len())
            .map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let mut line = String::new();
        let bytes = input.read_line(&mut line).map_err(io_err)?;
        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a data file with `-f <file>`.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_data_path(&files[choice - 1]);
            }
            writeln!(out, "Invalid choice: {choice}. Enter a number between 1 and {}.", files.len())
                .map_err(io_err)?;
            continue;
        }

        match validate_data_path(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(out, "{err}").map_err(io_err)?,
        }
    }
}

/// Validate that `path` is an existing `.csv` or `.txt` file.
pub fn validate_data_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("Data file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_data_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv or .txt file (got: {}).", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// `true` for `*.csv` (case-insensitive); other files are read as value lists.
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Data files under `root`, sorted for a stable menu.
pub fn discover_data_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, DEFAULT_SEARCH_DEPTH, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn walk(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                walk(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_data_extension(&path) {
            out.push(path);
        }
    }
}

fn has_data_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DATA_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d)))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules" | "debug")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
