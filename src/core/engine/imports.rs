//! Source loading for the built-in engine: reads inputs, inlines `@import`
//! statements according to the inline rules and rebases relative `url()`s.
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::params::Configuration;
use crate::io::remote;

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*['"]?(?P<url>[^'")\s]+)['"]?\s*\)|['"](?P<str>[^'"]+)['"])(?P<media>[^;]*);"#)
        .expect("static pattern")
});
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?P<q>['"]?)(?P<url>[^'")\s]+)['"]?\s*\)"#).expect("static pattern")
});

/// A loaded top-level input.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub raw: String,
    pub expanded: String,
}

pub struct Loader<'a> {
    config: &'a Configuration,
    cwd: &'a Path,
    stack: Vec<PathBuf>,
    pub original_size: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub inlined: Vec<String>,
}

impl<'a> Loader<'a> {
    pub fn new(config: &'a Configuration, cwd: &'a Path) -> Self {
        Self {
            config,
            cwd,
            stack: Vec::new(),
            original_size: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            inlined: Vec::new(),
        }
    }

    pub fn load_file(&mut self, path: &Path) -> Option<Loaded> {
        let absolute = normalize(&self.cwd.join(path));
        let raw = match fs::read_to_string(&absolute) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Cannot read {:?}: {}", absolute, e);
                self.errors
                    .push(format!("Ignoring \"{}\" as resource is missing.", path.display()));
                return None;
            }
        };
        self.original_size += raw.len();
        let base = absolute.parent().map(Path::to_path_buf).unwrap_or_else(|| self.cwd.to_path_buf());
        self.stack.push(absolute);
        let expanded = self.expand(&raw, &base);
        self.stack.clear();
        Some(Loaded { raw, expanded })
    }

    pub fn load_text(&mut self, raw: &str) -> Loaded {
        self.original_size += raw.len();
        let base = self.cwd.to_path_buf();
        let expanded = self.expand(raw, &base);
        Loaded {
            raw: raw.to_string(),
            expanded,
        }
    }

    fn expand(&mut self, text: &str, base: &Path) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let imports: Vec<(usize, usize, String, String)> = IMPORT
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let location = caps.name("url").or_else(|| caps.name("str"))?.as_str().to_string();
                let media = caps.name("media").map(|m| m.as_str().trim().to_string()).unwrap_or_default();
                Some((whole.start(), whole.end(), location, media))
            })
            .collect();

        for (start, end, location, media) in imports {
            out.push_str(&self.rebase(&text[last..start], base));
            match self.inline_import(&location, &media, base) {
                Some(body) => out.push_str(&body),
                None => out.push_str(&self.rebase(&text[start..end], base)),
            }
            last = end;
        }
        out.push_str(&self.rebase(&text[last..], base));
        out
    }

    /// Replacement text for one `@import`, or `None` to keep the statement.
    fn inline_import(&mut self, location: &str, media: &str, base: &Path) -> Option<String> {
        let body = if remote::is_remote(location) {
            let host = remote::host_of(location);
            if !self.config.allows_remote_inline(host) {
                self.warnings.push(format!(
                    "Skipping remote @import of \"{}\" as resource is not allowed.",
                    location
                ));
                return None;
            }
            match remote::fetch_text(location, self.config.inline_timeout_ms) {
                Ok(text) => {
                    self.original_size += text.len();
                    self.inlined.push(location.to_string());
                    text
                }
                Err(e) => {
                    self.errors
                        .push(format!("Broken @import declaration of \"{}\" - {}", location, e));
                    return Some(String::new());
                }
            }
        } else {
            if !self.config.allows_local_inline() {
                return None;
            }
            let path = normalize(&base.join(location));
            if self.stack.contains(&path) {
                self.warnings
                    .push(format!("Ignoring circular @import of \"{}\".", location));
                return Some(String::new());
            }
            let Ok(text) = fs::read_to_string(&path) else {
                self.errors.push(format!(
                    "Ignoring local @import of \"{}\" as resource is missing.",
                    location
                ));
                return Some(String::new());
            };
            self.original_size += text.len();
            self.inlined.push(path.display().to_string());

            let child_base = path.parent().map(Path::to_path_buf).unwrap_or_else(|| base.to_path_buf());
            self.stack.push(path);
            let body = self.expand(&text, &child_base);
            self.stack.pop();
            body
        };

        if media.is_empty() {
            Some(body)
        } else {
            Some(format!("@media {}{{{}}}", media, body))
        }
    }

    fn rebase(&self, text: &str, from: &Path) -> String {
        let (true, Some(to)) = (self.config.rebase, self.config.rebase_to.as_deref()) else {
            return text.to_string();
        };
        URL.replace_all(text, |caps: &regex::Captures| {
            let quote = &caps["q"];
            let url = &caps["url"];
            if !is_relative_url(url) {
                return caps[0].to_string();
            }
            let target = normalize(&from.join(url));
            format!("url({}{}{})", quote, relative_path(&normalize(to), &target), quote)
        })
        .into_owned()
    }
}

fn is_relative_url(url: &str) -> bool {
    !(url.starts_with('/')
        || url.starts_with('#')
        || url.starts_with("data:")
        || url.contains("://"))
}

/// Lexically resolve `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path of `target` relative to directory `from`, using `/` separators.
pub fn relative_path(from: &Path, target: &Path) -> String {
    let from: Vec<Component> = from.components().collect();
    let target: Vec<Component> = target.components().collect();
    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat_n("..".to_string(), from.len() - common));
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}
