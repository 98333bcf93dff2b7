//! Expansion of positional path patterns into concrete input files.
//!
//! Patterns prefixed with `!` are exclusions and form one ignore set shared by
//! every positive pattern. A positive pattern that matches nothing is kept as a
//! literal path so the failure surfaces when the file is opened.
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::error::{Error, Result};

pub fn expand_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let (positive, negative): (Vec<&str>, Vec<&str>) = patterns
        .iter()
        .map(AsRef::as_ref)
        .partition(|p| !p.starts_with('!'));
    let negative: Vec<&str> = negative.iter().map(|p| &p[1..]).collect();

    let ignore = build_ignore_set(&negative)?;

    let mut files = Vec::new();
    for pattern in positive {
        let matches = expand_one(pattern, &ignore)?;
        if matches.is_empty() {
            if ignore.is_match(pattern) {
                continue;
            }
            debug!("Pattern {:?} matched nothing, keeping it as a literal path", pattern);
            files.push(PathBuf::from(pattern));
        } else {
            files.extend(matches);
        }
    }
    Ok(files)
}

fn expand_one(pattern: &str, ignore: &GlobSet) -> Result<Vec<PathBuf>> {
    if !has_glob_meta(pattern) {
        let path = Path::new(pattern);
        if path.exists() && !ignore.is_match(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Ok(Vec::new());
    }

    let matcher = compile(pattern)?.compile_matcher();
    let root = glob_root(pattern);
    let depth = walk_depth(pattern, &root);

    let mut candidates = Vec::new();
    let display = if root == Path::new(".") && !pattern.starts_with("./") {
        PathBuf::new()
    } else {
        root.clone()
    };
    let walker = Walker {
        depth,
        dotfiles: wants_dotfiles(pattern, &root),
    };
    walker.walk(&root, &display, 1, &mut candidates);

    let mut matched: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|p| matcher.is_match(p) && !ignore.is_match(p))
        .collect();
    matched.sort();
    Ok(matched)
}

fn compile(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|err| Error::Pattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })
}

fn build_ignore_set(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile(pattern)?);
    }
    builder.build().map_err(|err| Error::Pattern {
        pattern: patterns.join(", "),
        message: err.to_string(),
    })
}

/// Directory walk below a glob root. Symlinked directories are not entered
/// and dot entries are skipped unless the pattern names one.
struct Walker {
    depth: Option<usize>,
    dotfiles: bool,
}

impl Walker {
    fn walk(&self, dir: &Path, display: &Path, level: usize, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            if !self.dotfiles && name.to_string_lossy().starts_with('.') {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            let shown = display.join(&name);
            if file_type.is_dir() {
                if self.depth.is_none_or(|d| level < d) {
                    self.walk(&path, &shown, level + 1, out);
                }
            } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                out.push(shown);
            }
        }
    }
}

/// Whether a segment below the glob root starts with `.`, e.g. `a/.*.css`.
fn wants_dotfiles(pattern: &str, root: &Path) -> bool {
    let tail = if root == Path::new(".") && !pattern.starts_with("./") {
        pattern
    } else {
        let root = root.to_string_lossy();
        pattern.strip_prefix(root.as_ref()).unwrap_or(pattern)
    };
    tail.split(['/', '\\'])
        .any(|seg| seg.starts_with('.') && seg != "." && seg != "..")
}

fn has_glob_meta(pattern: &str) -> bool {
    pattern.chars().any(|c| matches!(c, '*' | '?' | '[' | '{'))
}

/// Deepest directory level the walk needs to visit; `None` for `**`.
fn walk_depth(pattern: &str, root: &Path) -> Option<usize> {
    if pattern.contains("**") {
        return None;
    }
    let count = |s: &str| {
        s.split(['/', '\\'])
            .filter(|seg| !seg.is_empty() && *seg != ".")
            .count()
    };
    let root_segments = count(&root.to_string_lossy());
    Some(count(pattern).saturating_sub(root_segments).max(1))
}

/// Longest literal directory prefix of a glob pattern.
fn glob_root(pattern: &str) -> PathBuf {
    let first_meta = pattern
        .char_indices()
        .find(|(_, ch)| matches!(ch, '*' | '?' | '[' | '{'))
        .map(|(idx, _)| idx)
        .unwrap_or(pattern.len());

    let prefix = &pattern[..first_meta];
    let trimmed = prefix.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return if pattern.starts_with('/') {
            PathBuf::from("/")
        } else {
            PathBuf::from(".")
        };
    }
    if trimmed.len() < prefix.len() {
        return PathBuf::from(&prefix[..trimmed.len() + 1]);
    }
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => PathBuf::from(&trimmed[..=idx]),
        None => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/nested")).unwrap();
        fs::write(dir.path().join("a/one.css"), "a{}").unwrap();
        fs::write(dir.path().join("a/skip.css"), "b{}").unwrap();
        fs::write(dir.path().join("a/two.css"), "c{}").unwrap();
        fs::write(dir.path().join("a/notes.txt"), "").unwrap();
        fs::write(dir.path().join("a/nested/deep.css"), "d{}").unwrap();
        dir
    }

    fn p(dir: &TempDir, rel: &str) -> String {
        format!("{}/{}", dir.path().display(), rel)
    }

    #[test]
    fn exclusion_removes_matching_file() {
        let dir = fixture();
        let out = expand_patterns(&[p(&dir, "a/*.css"), format!("!{}", p(&dir, "a/skip.css"))]).unwrap();
        assert_eq!(
            out,
            vec![PathBuf::from(p(&dir, "a/one.css")), PathBuf::from(p(&dir, "a/two.css"))]
        );
    }

    #[test]
    fn single_star_does_not_descend() {
        let dir = fixture();
        let out = expand_patterns(&[p(&dir, "a/*.css")]).unwrap();
        assert!(!out.iter().any(|f| f.ends_with("deep.css")));
    }

    #[test]
    fn double_star_descends() {
        let dir = fixture();
        let out = expand_patterns(&[p(&dir, "a/**/*.css")]).unwrap();
        assert!(out.contains(&PathBuf::from(p(&dir, "a/nested/deep.css"))));
    }

    #[test]
    fn unmatched_pattern_is_kept_literally() {
        let dir = fixture();
        let missing = p(&dir, "b/*.css");
        let out = expand_patterns(&[missing.clone(), p(&dir, "a/one.css")]).unwrap();
        assert_eq!(out, vec![PathBuf::from(missing), PathBuf::from(p(&dir, "a/one.css"))]);
    }

    #[test]
    fn order_follows_positive_patterns() {
        let dir = fixture();
        let out = expand_patterns(&[p(&dir, "a/two.css"), p(&dir, "a/o*.css")]).unwrap();
        assert_eq!(
            out,
            vec![PathBuf::from(p(&dir, "a/two.css")), PathBuf::from(p(&dir, "a/one.css"))]
        );
    }

    #[test]
    fn excluded_literal_is_dropped() {
        let dir = fixture();
        let skip = p(&dir, "a/skip.css");
        let out = expand_patterns(&[skip.clone(), format!("!{}", skip)]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn dotfiles_need_an_explicit_dot() {
        let dir = fixture();
        fs::write(dir.path().join("a/.hidden.css"), "h{}").unwrap();
        fs::create_dir_all(dir.path().join("a/.cache")).unwrap();
        fs::write(dir.path().join("a/.cache/c.css"), "c{}").unwrap();

        let out = expand_patterns(&[p(&dir, "a/**/*.css")]).unwrap();
        assert!(!out.iter().any(|f| f.ends_with(".hidden.css") || f.ends_with(".cache/c.css")));
        assert!(out.contains(&PathBuf::from(p(&dir, "a/one.css"))));

        let out = expand_patterns(&[p(&dir, "a/.*.css")]).unwrap();
        assert_eq!(out, vec![PathBuf::from(p(&dir, "a/.hidden.css"))]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("a/loop")).unwrap();
        let out = expand_patterns(&[p(&dir, "a/**/*.css")]).unwrap();
        assert_eq!(
            out,
            vec![
                PathBuf::from(p(&dir, "a/nested/deep.css")),
                PathBuf::from(p(&dir, "a/one.css")),
                PathBuf::from(p(&dir, "a/skip.css")),
                PathBuf::from(p(&dir, "a/two.css")),
            ]
        );
    }

    #[test]
    fn dot_segment_detection() {
        assert!(wants_dotfiles("a/.*.css", Path::new("a/")));
        assert!(wants_dotfiles("a/.cache/**/*.css", Path::new("a/")));
        assert!(!wants_dotfiles("./a/*.css", Path::new("./a/")));
        assert!(!wants_dotfiles("*.css", Path::new(".")));
        assert!(wants_dotfiles(".*.css", Path::new(".")));
    }

    #[test]
    fn glob_root_and_depth() {
        assert_eq!(glob_root("a/*.css"), PathBuf::from("a/"));
        assert_eq!(glob_root("*.css"), PathBuf::from("."));
        assert_eq!(glob_root("a/b/c*/x.css"), PathBuf::from("a/b/"));
        assert_eq!(walk_depth("a/*.css", Path::new("a/")), Some(1));
        assert_eq!(walk_depth("a/*/x.css", Path::new("a/")), Some(2));
        assert_eq!(walk_depth("a/**/x.css", Path::new("a/")), None);
    }
}
