use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::io::remote;
use crate::types::MinificationResult;

/// Sibling map file for an output, e.g. `out.css` -> `out.css.map`.
pub fn source_map_path(output: &Path) -> PathBuf {
    let mut name: OsString = output.as_os_str().to_owned();
    name.push(".map");
    PathBuf::from(name)
}

/// Write one result to `output`, or to `stdout` when no path is given.
pub fn write_result<W: Write>(
    result: &MinificationResult,
    output: Option<&Path>,
    remove_inlined: bool,
    stdout: &mut W,
) -> Result<()> {
    match output {
        None => {
            stdout.write_all(result.styles.as_bytes())?;
            stdout.flush()?;
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            match &result.source_map {
                Some(map) => {
                    let map_path = source_map_path(path);
                    let map_name = map_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let content = format!("{}\n/*# sourceMappingURL={} */", result.styles, map_name);
                    fs::write(path, content)?;
                    fs::write(&map_path, map.as_bytes())?;
                    info!("Wrote {:?} and {:?}", path, map_path);
                }
                None => {
                    fs::write(path, result.styles.as_bytes())?;
                    info!("Wrote {:?}", path);
                }
            }
        }
    }

    if remove_inlined {
        for location in result.inlined.iter().filter(|l| !remote::is_remote(l)) {
            debug!("Removing inlined file {}", location);
            fs::remove_file(location)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn map_path_appends_extension() {
        assert_eq!(source_map_path(Path::new("dist/out.css")), PathBuf::from("dist/out.css.map"));
    }

    #[test]
    fn writes_to_stdout_without_output() {
        let result = MinificationResult {
            styles: "a{color:red}".into(),
            ..MinificationResult::default()
        };
        let mut stdout = Vec::new();
        write_result(&result, None, false, &mut stdout).unwrap();
        assert_eq!(stdout, b"a{color:red}");
    }

    #[test]
    fn writes_file_and_sibling_map_creating_directories() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested/deeper/out.css");
        let result = MinificationResult {
            styles: "a{color:red}".into(),
            source_map: Some("{\"version\":3}".into()),
            ..MinificationResult::default()
        };
        let mut stdout = Vec::new();
        write_result(&result, Some(&output), false, &mut stdout).unwrap();

        assert!(stdout.is_empty());
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "a{color:red}\n/*# sourceMappingURL=out.css.map */"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("nested/deeper/out.css.map")).unwrap(),
            "{\"version\":3}"
        );
    }

    #[test]
    fn removes_inlined_local_files() {
        let dir = TempDir::new().unwrap();
        let inlined = dir.path().join("part.css");
        fs::write(&inlined, "a{}").unwrap();
        let result = MinificationResult {
            styles: "a{}".into(),
            inlined: vec![inlined.display().to_string(), "https://example.com/x.css".into()],
            ..MinificationResult::default()
        };
        let output = dir.path().join("out.css");
        write_result(&result, Some(&output), true, &mut Vec::new()).unwrap();
        assert!(output.exists());
        assert!(!inlined.exists());
    }

    #[test]
    fn failed_removal_propagates() {
        let dir = TempDir::new().unwrap();
        let result = MinificationResult {
            inlined: vec![dir.path().join("gone.css").display().to_string()],
            ..MinificationResult::default()
        };
        let err = write_result(&result, Some(&dir.path().join("out.css")), true, &mut Vec::new());
        assert!(matches!(err, Err(crate::Error::Io(_))));
    }
}
