//! File discovery, loading, output path resolution and writing.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use props_core::{parse_bytes, ParseOptions, PropertyTable, PropsError, PropsResult};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Load a properties file.
///
/// Missing files, undecodable content and files without any key all fail;
/// a successfully returned table always has at least one key.
pub fn load_properties(path: &Path, options: ParseOptions) -> PropsResult<PropertyTable> {
    if !path.is_file() {
        return Err(PropsError::FileNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    let table = parse_bytes(&bytes, path, options)?;
    if table.is_empty() {
        return Err(PropsError::EmptyResult(path.to_path_buf()));
    }
    debug!(path = %path.display(), keys = table.len(), "loaded properties");
    Ok(table)
}

/// `*.properties` files directly inside `dir`, sorted by path.
pub fn list_properties_files(dir: &Path) -> PropsResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "properties") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Where the cleaned output of one input goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    /// Append to the file instead of replacing it.
    pub append: bool,
}

/// Resolve the output file for `input`.
///
/// - no output: `sorted_<name>` in the working directory;
/// - an existing directory inside the working directory: `<dir>/sorted_<name>`;
/// - a `*.properties` path: that file, appended to in batch mode.
///
/// Anything else cannot be used and yields `None`.
pub fn resolve_output(input: &Path, output: Option<&Path>, batch: bool, cwd: &Path) -> Option<OutputTarget> {
    let sorted_name = format!("sorted_{}", input.file_name()?.to_string_lossy());

    let Some(output) = output else {
        return Some(OutputTarget {
            path: PathBuf::from(sorted_name),
            append: false,
        });
    };

    if is_dir_within(output, cwd) {
        return Some(OutputTarget {
            path: output.join(sorted_name),
            append: false,
        });
    }

    if output.extension().is_some_and(|ext| ext == "properties") {
        return Some(OutputTarget {
            path: output.to_path_buf(),
            append: batch,
        });
    }

    None
}

fn is_dir_within(dir: &Path, cwd: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    let base = cwd.canonicalize().unwrap_or_else(|_| cwd.to_path_buf());
    let resolved = if dir.is_absolute() {
        dir.canonicalize()
    } else {
        base.join(dir).canonicalize()
    };
    resolved.is_ok_and(|resolved| resolved.starts_with(&base))
}

/// Write `content` to `path`, appending or replacing.
pub fn save_output(path: &Path, content: &str, append: bool) -> PropsResult<()> {
    let write_err = |source| PropsError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    debug!(path = %path.display(), bytes = content.len(), append, "output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file() {
        let err = load_properties(Path::new("/nonexistent/x.properties"), ParseOptions::default()).unwrap_err();
        assert!(matches!(err, PropsError::FileNotFound(_)));
    }

    #[test]
    fn load_comment_only_file_is_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.properties");
        std::fs::write(&path, "# only a comment\n").unwrap();
        assert!(matches!(
            load_properties(&path, ParseOptions::default()),
            Err(PropsError::EmptyResult(_))
        ));
    }

    #[test]
    fn load_non_utf8_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.properties");
        std::fs::write(&path, b"name=caf\xe9\n").unwrap();
        assert!(matches!(
            load_properties(&path, ParseOptions::default()),
            Err(PropsError::Decode { .. })
        ));
    }

    #[test]
    fn load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.properties");
        std::fs::write(&path, "a=1\nb=2\n").unwrap();
        let table = load_properties(&path, ParseOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn lists_only_direct_properties_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.properties"), "b=1").unwrap();
        std::fs::write(dir.path().join("a.properties"), "a=1").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.properties"), "c=1").unwrap();

        let files = list_properties_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.properties", "b.properties"]);
    }

    #[test]
    fn default_output_is_sorted_prefix_in_cwd() {
        let cwd = tempfile::tempdir().unwrap();
        let target = resolve_output(Path::new("in/app.properties"), None, false, cwd.path()).unwrap();
        assert_eq!(target.path, PathBuf::from("sorted_app.properties"));
        assert!(!target.append);
    }

    #[test]
    fn output_directory_inside_cwd() {
        let cwd = tempfile::tempdir().unwrap();
        let out = cwd.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let target = resolve_output(Path::new("app.properties"), Some(out.as_path()), true, cwd.path()).unwrap();
        assert_eq!(target.path, out.join("sorted_app.properties"));
        assert!(!target.append);
    }

    #[test]
    fn output_directory_outside_cwd_is_rejected() {
        let cwd = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        assert!(resolve_output(Path::new("app.properties"), Some(elsewhere.path()), false, cwd.path()).is_none());
    }

    #[test]
    fn properties_output_appends_in_batch() {
        let cwd = tempfile::tempdir().unwrap();
        let out = Path::new("merged.properties");

        let single = resolve_output(Path::new("a.properties"), Some(out), false, cwd.path()).unwrap();
        assert!(!single.append);
        let batch = resolve_output(Path::new("a.properties"), Some(out), true, cwd.path()).unwrap();
        assert!(batch.append);
        assert_eq!(batch.path, out);
    }

    #[test]
    fn unusable_output_is_none() {
        let cwd = tempfile::tempdir().unwrap();
        assert!(resolve_output(Path::new("a.properties"), Some(Path::new("out.txt")), false, cwd.path()).is_none());
    }

    #[test]
    fn save_replaces_or_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.properties");

        save_output(&path, "one\n", false).unwrap();
        save_output(&path, "two\n", true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");

        save_output(&path, "three\n", false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three\n");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/out.properties");
        assert!(matches!(save_output(&path, "x", false), Err(PropsError::Write { .. })));
    }
}
