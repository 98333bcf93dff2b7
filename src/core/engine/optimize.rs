//! Text-level optimizations applied by the built-in engine.
//!
//! Level 1 strips comments and redundant whitespace, level 2 additionally
//! drops rules with empty bodies. Quoted strings are always copied verbatim.
use std::collections::HashMap;

use regex::Regex;

use crate::types::{LevelValue, OptimizationLevels};

/// Fine-grained `name:value;name:value` options of one level.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LevelOptions {
    values: HashMap<String, String>,
}

impl LevelOptions {
    pub fn parse(value: Option<&LevelValue>) -> Self {
        let mut values = HashMap::new();
        if let Some(raw) = value.and_then(LevelValue::options) {
            for pair in raw.split(';') {
                let Some((name, val)) = pair.split_once(':') else {
                    continue;
                };
                values.insert(name.trim().to_string(), val.trim().to_string());
            }
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .or_else(|| self.values.get("all"))
            .map(String::as_str)
    }

    /// Switch-style option; `off`, `false` and `0` disable it.
    pub fn enabled(&self, name: &str) -> bool {
        !matches!(self.get(name), Some("off" | "false" | "0"))
    }
}

pub fn optimize(css: &str, levels: &OptimizationLevels) -> String {
    match levels.effective() {
        0 => css.to_string(),
        1 => level_one(css, &LevelOptions::parse(levels.level1.as_ref())),
        _ => {
            let one = LevelOptions::parse(levels.level1.as_ref());
            let two = LevelOptions::parse(levels.level2.as_ref());
            let out = level_one(css, &one);
            if two.enabled("removeEmpty") {
                remove_empty_rules(&out)
            } else {
                out
            }
        }
    }
}

fn level_one(css: &str, options: &LevelOptions) -> String {
    if !options.enabled("removeWhitespace") && !options.enabled("specialComments") {
        return css.to_string();
    }
    let keep_special = options.enabled("specialComments");
    let chars: Vec<char> = css.chars().collect();
    let mut out = String::with_capacity(css.len());
    let mut pending_space = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                flush_space(&mut out, &mut pending_space);
                let end = string_end(&chars, i);
                out.extend(&chars[i..end]);
                i = end;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let end = comment_end(&chars, i);
                if keep_special && chars.get(i + 2) == Some(&'!') {
                    flush_space(&mut out, &mut pending_space);
                    out.extend(&chars[i..end]);
                }
                i = end;
            }
            c if c.is_whitespace() => {
                pending_space = !out.is_empty();
                i += 1;
            }
            '{' | '}' | ';' | ',' | '>' => {
                pending_space = false;
                trim_trailing_space(&mut out);
                if c == '}' && out.ends_with(';') {
                    out.pop();
                }
                if c == ';' && out.ends_with(';') {
                    i += 1;
                    continue;
                }
                out.push(c);
                i += 1;
                skip_whitespace(&chars, &mut i);
            }
            ':' if inside_block(&out) => {
                pending_space = false;
                trim_trailing_space(&mut out);
                out.push(c);
                i += 1;
                skip_whitespace(&chars, &mut i);
            }
            _ => {
                flush_space(&mut out, &mut pending_space);
                out.push(c);
                i += 1;
            }
        }
    }
    out.trim().to_string()
}

fn flush_space(out: &mut String, pending: &mut bool) {
    if *pending {
        out.push(' ');
        *pending = false;
    }
}

fn trim_trailing_space(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

fn skip_whitespace(chars: &[char], i: &mut usize) {
    while *i < chars.len() && chars[*i].is_whitespace() {
        *i += 1;
    }
}

/// Whether the cursor sits inside a declaration block (not a selector).
fn inside_block(out: &str) -> bool {
    let open = out.rfind('{');
    let close = out.rfind('}');
    match (open, close) {
        (Some(o), Some(c)) => o > c,
        (Some(_), None) => true,
        _ => false,
    }
}

fn string_end(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn comment_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

fn remove_empty_rules(css: &str) -> String {
    let Ok(empty) = Regex::new(r"[^{};]+\{\}") else {
        return css.to_string();
    };
    let mut current = css.to_string();
    loop {
        let next = empty.replace_all(&current, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Apply a `--format` style to already-minified text.
pub fn format(css: &str, style: Option<&str>) -> String {
    match style {
        Some("keep-breaks") => css.replace('}', "}\n").trim_end().to_string(),
        Some("beautify") => beautify(css),
        _ => css.to_string(),
    }
}

fn beautify(css: &str) -> String {
    let mut out = String::with_capacity(css.len() * 2);
    let mut depth = 0usize;
    let indent = |out: &mut String, depth: usize| out.push_str(&"  ".repeat(depth));
    let chars: Vec<char> = css.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                let end = string_end(&chars, i);
                out.extend(&chars[i..end]);
                i = end;
                continue;
            }
            '{' => {
                out.push_str(" {\n");
                depth += 1;
                indent(&mut out, depth);
            }
            ';' => {
                out.push_str(";\n");
                indent(&mut out, depth);
            }
            '}' => {
                trim_trailing_space(&mut out);
                if !out.ends_with('\n') {
                    out.push_str(";\n");
                }
                depth = depth.saturating_sub(1);
                indent(&mut out, depth);
                out.push_str("}\n");
                indent(&mut out, depth);
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out.trim_end().to_string()
}
