//! Rendering and saving converted records.
//!
//! The saved file is the records concatenated as-is; each record already
//! ends with a line feed. The preview shows every record followed by an
//! extra line break so blocks are visually separated.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, DEFAULT_EXTENSION, DEFAULT_OUTPUT_NAME};
use crate::error::{SaveError, SaveResult};

/// Where and how much was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedOutput {
    pub path: PathBuf,
    pub bytes_written: usize,
}

/// Exact file payload: records concatenated with no separator.
pub fn render_output(records: &[String]) -> String {
    records.concat()
}

/// Preview text: each record followed by a line break.
pub fn render_preview(records: &[String]) -> String {
    let mut preview = String::with_capacity(records.iter().map(|r| r.len() + 1).sum());
    for record in records {
        preview.push_str(record);
        preview.push('\n');
    }
    preview
}

/// `<name>.csv`, keeping any dots already in `name`.
fn output_file_name(name: &str) -> String {
    format!("{}.{}", name, DEFAULT_EXTENSION)
}

/// Resolve the file a save should land in.
///
/// - A directory gets `<output_name>.csv` inside it.
/// - A path without extension gets `.csv` appended.
pub fn resolve_destination(path: &Path, output_name: &str) -> PathBuf {
    if path.is_dir() {
        return path.join(output_file_name(output_name));
    }
    if path.extension().is_none() {
        return path.with_extension(DEFAULT_EXTENSION);
    }
    path.to_path_buf()
}

/// Default destination for a source: same directory and stem, `.csv` extension.
///
/// A source that is already a `.csv` gets `<stem>.converted.csv` so a save
/// never lands on the file it was read from. A source without a file name
/// falls back to `<output_name>.csv`.
pub fn default_destination(source: &Path, output_name: &str) -> PathBuf {
    let Some(stem) = source.file_stem() else {
        return PathBuf::from(output_file_name(output_name));
    };

    let is_csv = source
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(DEFAULT_EXTENSION));
    if is_csv {
        return source.with_file_name(output_file_name(&format!("{}.converted", stem.to_string_lossy())));
    }
    source.with_extension(DEFAULT_EXTENSION)
}

/// Destination for a CLI save of `input`.
///
/// An explicit file path is used as given (plus `.csv` when it has no
/// extension). A directory, or no path at all, goes through the configured
/// output name and never resolves to `input` itself.
pub fn destination_for(input: &Path, output: Option<&Path>, config: &AppConfig) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => {
            let resolved = resolve_destination(path, &config.output_name);
            if same_file(&resolved, input) {
                default_destination(&resolved, &config.output_name)
            } else {
                resolved
            }
        }
        Some(path) => resolve_destination(path, &config.output_name),
        None => default_destination(input, &config.output_name),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Write records to `path`, truncating any existing file.
pub fn save_output(records: &[String], path: &Path) -> SaveResult<SavedOutput> {
    save_output_named(records, path, DEFAULT_OUTPUT_NAME)
}

/// Like [`save_output`], with the file name used when `path` is a directory.
pub fn save_output_named(records: &[String], path: &Path, output_name: &str) -> SaveResult<SavedOutput> {
    if records.is_empty() {
        return Err(SaveError::NothingToSave);
    }

    let destination = resolve_destination(path, output_name);
    let payload = render_output(records);

    fs::write(&destination, payload.as_bytes()).map_err(|source| SaveError::Io {
        path: destination.clone(),
        source,
    })?;

    Ok(SavedOutput {
        path: destination,
        bytes_written: payload.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::convert;

    #[test]
    fn test_render_output_concatenates() {
        let records = convert("A(m)B(m)C(m)D\nE(m)F");
        assert_eq!(render_output(&records), "1\nA;B\nC;D\n2\nE;F\n\n");
    }

    #[test]
    fn test_render_preview_separates_blocks() {
        let records = convert("A(m)B(m)C(m)D\nE(m)F");
        assert_eq!(render_preview(&records), "1\nA;B\nC;D\n\n2\nE;F\n\n\n");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let records = convert("12 345,6 (m) 7 (m) 8,9 (m) 0\nsecond line\n");

        let saved = save_output(&records, &dir.path().join("result.csv")).unwrap();
        let written = std::fs::read(&saved.path).unwrap();

        assert_eq!(written, render_output(&records).into_bytes());
        assert_eq!(saved.bytes_written, written.len());
    }

    #[test]
    fn test_save_adds_csv_extension() {
        let dir = tempfile::tempdir().unwrap();
        let records = convert("A");

        let saved = save_output(&records, &dir.path().join("result")).unwrap();
        assert_eq!(saved.path, dir.path().join("result.csv"));
        assert!(saved.path.exists());
    }

    #[test]
    fn test_save_into_directory_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let records = convert("A");

        let saved = save_output(&records, dir.path()).unwrap();
        assert_eq!(saved.path, dir.path().join("output.csv"));
    }

    #[test]
    fn test_save_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");
        std::fs::write(&path, "x".repeat(1000)).unwrap();

        let records = convert("A");
        save_output(&records, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1\nA;\n\n");
    }

    #[test]
    fn test_nothing_to_save() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_output(&[], &dir.path().join("result.csv"));
        assert!(matches!(result, Err(SaveError::NothingToSave)));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let records = convert("A");
        let result = save_output(&records, &dir.path().join("missing").join("out.csv"));
        assert!(matches!(result, Err(SaveError::Io { .. })));
    }

    #[test]
    fn test_default_destination() {
        assert_eq!(
            default_destination(Path::new("data/lines.txt"), "output"),
            PathBuf::from("data/lines.csv")
        );
        assert_eq!(default_destination(Path::new(""), "survey"), PathBuf::from("survey.csv"));
    }

    #[test]
    fn test_default_destination_never_overwrites_csv_source() {
        let input = Path::new("d/lines.csv");
        let destination = default_destination(input, "output");
        assert_ne!(destination, input);
        assert_eq!(destination, PathBuf::from("d/lines.converted.csv"));

        // Same file on case-insensitive filesystems
        let upper = default_destination(Path::new("d/LINES.CSV"), "output");
        assert_eq!(upper, PathBuf::from("d/LINES.converted.csv"));
    }

    #[test]
    fn test_directory_save_keeps_dotted_output_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_destination(dir.path(), "survey.v2"),
            dir.path().join("survey.v2.csv")
        );
    }

    #[test]
    fn test_destination_for_default_next_to_input() {
        let config = AppConfig::default();
        assert_eq!(
            destination_for(Path::new("data/lines.txt"), None, &config),
            PathBuf::from("data/lines.csv")
        );
    }

    #[test]
    fn test_destination_for_csv_input_is_not_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lines.csv");
        std::fs::write(&input, "A(m)B").unwrap();

        let destination = destination_for(&input, None, &AppConfig::default());
        assert_ne!(destination, input);

        let records = convert("A(m)B");
        save_output(&records, &destination).unwrap();
        assert_eq!(std::fs::read_to_string(&input).unwrap(), "A(m)B");
    }

    #[test]
    fn test_destination_for_directory_uses_configured_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_lookup(|key| {
            (key == crate::config::OUTPUT_NAME_VAR).then(|| "survey.v2".to_string())
        });

        let destination = destination_for(Path::new("lines.txt"), Some(dir.path()), &config);
        assert_eq!(destination, dir.path().join("survey.v2.csv"));
    }

    #[test]
    fn test_destination_for_directory_avoids_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("output.csv");
        std::fs::write(&input, "A").unwrap();

        let destination = destination_for(&input, Some(dir.path()), &AppConfig::default());
        assert_eq!(destination, dir.path().join("output.converted.csv"));
    }

    #[test]
    fn test_destination_for_explicit_file() {
        let config = AppConfig::default();
        assert_eq!(
            destination_for(Path::new("lines.txt"), Some(Path::new("out/result")), &config),
            PathBuf::from("out/result.csv")
        );
        assert_eq!(
            destination_for(Path::new("lines.txt"), Some(Path::new("out/result.txt")), &config),
            PathBuf::from("out/result.txt")
        );
    }
}
