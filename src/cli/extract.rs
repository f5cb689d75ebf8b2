//! Extract command implementation.
//!
//! Batch metadata extraction with parallel processing. Inputs may be
//! files, directories (walked recursively) or `-` for a newline-separated
//! path list on stdin. Per-file failures are logged and skipped; the batch
//! itself only fails on unusable arguments.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rayon::prelude::*;
use serde_json::{Map, Value as JsonValue};

use crate::cli::ExtractArgs;
use crate::config::VisumConfig;
use crate::core::is_shutdown;
use crate::logger::ProgressLine;
use crate::{debug, log};
use crate::meta::{self, ExtractOptions, VisualMetadataRecord, mimetype};
use crate::utils::plural_count;

/// Execute extract command
pub fn run_extract(args: &ExtractArgs, config: &VisumConfig) -> Result<()> {
    let files = collect_image_files(&args.paths)?;
    if files.is_empty() {
        log!("extract"; "no image files found");
        return Ok(());
    }

    let options = merge_options(config, args);

    log!("extract"; "processing {}", plural_count(files.len(), "file"));

    let records = extract_files(&files, args, &options);

    log!("extract"; "extracted {}", plural_count(records.len(), "record"));

    output_records(&records, args)
}

/// Merge config file values with CLI overrides. Flags win.
fn merge_options(config: &VisumConfig, args: &ExtractArgs) -> ExtractOptions {
    let mut options = config.extract.to_options();
    if let Some(k) = args.colors {
        options.palette_size = k;
    }
    options
}

fn extract_files(
    files: &[PathBuf],
    args: &ExtractArgs,
    options: &ExtractOptions,
) -> Vec<(PathBuf, VisualMetadataRecord)> {
    let progress = ProgressLine::new(&[("images", files.len())]);
    let declared = args.mimetype.as_deref();

    let records: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            if is_shutdown() {
                return None;
            }
            let result = extract_one(file, declared, options);
            progress.inc("images");
            match result {
                Ok(record) => {
                    debug!("extract"; "{} ({})", file.display(), record.mimetype);
                    Some((file.clone(), record))
                }
                Err(e) => {
                    log!("warn"; "skipping {}: {:#}", file.display(), e);
                    None
                }
            }
        })
        .collect();

    progress.finish();
    records
}

fn extract_one(
    file: &Path,
    declared: Option<&str>,
    options: &ExtractOptions,
) -> Result<VisualMetadataRecord> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    Ok(meta::extract_metadata(&bytes, declared, options)?)
}

// ============================================================================
// Input Collection
// ============================================================================

/// Collect image files based on CLI paths
fn collect_image_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    // Handle stdin case: read paths from stdin when `-` is passed
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    let mut files = Vec::new();
    for path in &paths {
        if path.is_file() {
            if mimetype::from_path(path).is_some() {
                files.push(path.clone());
            } else {
                anyhow::bail!("not a supported image file: {}", path.display());
            }
        } else if path.is_dir() {
            files.extend(collect_dir_images(path));
        } else {
            anyhow::bail!("path not found: {}", path.display());
        }
    }

    // Walk order is not deterministic; sorted paths keep output stable.
    files.sort();
    files.dedup();
    Ok(files)
}

/// Collect all image files from a directory recursively
fn collect_dir_images(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| mimetype::from_path(p).is_some())
        .collect()
}

/// Read file paths from stdin, one per line
fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    let mut paths = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }

    Ok(paths)
}

// ============================================================================
// Output Formatting
// ============================================================================

/// Serialize records: a bare record for a single result, otherwise a JSON
/// object keyed by path.
fn output_records(records: &[(PathBuf, VisualMetadataRecord)], args: &ExtractArgs) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let output = if let [(_, only)] = records {
        serde_json::to_value(only)?
    } else {
        let mut map = Map::new();
        for (path, record) in records {
            map.insert(
                path.to_string_lossy().into_owned(),
                serde_json::to_value(record)?,
            );
        }
        JsonValue::Object(map)
    };

    let formatted = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)
            .with_context(|| format!("failed to create {}", output_path.display()))?;
        writeln!(file, "{}", formatted)?;
        log!("extract"; "wrote output to {}", output_path.display());
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"x").unwrap();
        path
    }

    fn default_args() -> ExtractArgs {
        ExtractArgs {
            paths: Vec::new(),
            colors: None,
            mimetype: None,
            pretty: false,
            output: None,
        }
    }

    fn sample_record() -> VisualMetadataRecord {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        meta::extract_metadata(&buf.into_inner(), None, &ExtractOptions::default()).unwrap()
    }

    #[test]
    fn test_collect_directory_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.png");
        let b = touch(&dir, "b.svg");
        let c = touch(&dir, "sub/c.webp");
        touch(&dir, "notes.txt");

        let files = collect_image_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![a, b, c]);
    }

    #[test]
    fn test_collect_deduplicates_overlapping_inputs() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.png");

        let files = collect_image_files(&[dir.path().to_path_buf(), a.clone()]).unwrap();
        assert_eq!(files, vec![a]);
    }

    #[test]
    fn test_collect_rejects_unsupported_file() {
        let dir = TempDir::new().unwrap();
        let txt = touch(&dir, "notes.txt");

        let err = collect_image_files(&[txt]).unwrap_err();
        assert!(err.to_string().contains("not a supported image file"));
    }

    #[test]
    fn test_collect_rejects_missing_path() {
        let err = collect_image_files(&[PathBuf::from("/no/such/file.png")]).unwrap_err();
        assert!(err.to_string().contains("path not found"));
    }

    #[test]
    fn test_palette_size_flag_wins_over_config() {
        let config = VisumConfig::default();
        let args = ExtractArgs {
            colors: Some(3),
            ..default_args()
        };
        assert_eq!(merge_options(&config, &args).palette_size, 3);
        assert_eq!(
            merge_options(&config, &default_args()).palette_size,
            ExtractOptions::default().palette_size
        );
    }

    #[test]
    fn test_single_record_outputs_bare_object() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.json");
        let args = ExtractArgs {
            output: Some(out.clone()),
            ..default_args()
        };

        let records = vec![(PathBuf::from("a.png"), sample_record())];
        output_records(&records, &args).unwrap();

        let parsed: JsonValue = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert!(parsed.get("mimetype").is_some());
    }

    #[test]
    fn test_multiple_records_output_keyed_by_path() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.json");
        let args = ExtractArgs {
            output: Some(out.clone()),
            ..default_args()
        };

        let records = vec![
            (PathBuf::from("a.png"), sample_record()),
            (PathBuf::from("b.png"), sample_record()),
        ];
        output_records(&records, &args).unwrap();

        let parsed: JsonValue = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert!(parsed.get("a.png").and_then(|r| r.get("mimetype")).is_some());
        assert!(parsed.get("b.png").is_some());
    }
}
