//! Minimal v3 source maps: one mapping per input chunk, pointing at the start
//! of that chunk's original text.
use serde::{Deserialize, Serialize};

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

/// A contiguous piece of generated output that came from one source.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub source: String,
    pub content: Option<String>,
    /// Byte offset of the chunk in the generated text
    pub offset: usize,
}

pub fn build(generated: &str, file: Option<String>, chunks: &[Chunk], inline_sources: bool) -> SourceMap {
    let mut mappings = String::new();
    let mut line = 0usize;
    let mut prev_col = 0i64;
    let mut prev_source = 0i64;

    for (index, chunk) in chunks.iter().enumerate() {
        let (gen_line, gen_col) = position(generated, chunk.offset);
        while line < gen_line {
            mappings.push(';');
            line += 1;
            prev_col = 0;
        }
        if !mappings.is_empty() && !mappings.ends_with(';') {
            mappings.push(',');
        }
        encode_vlq(gen_col as i64 - prev_col, &mut mappings);
        encode_vlq(index as i64 - prev_source, &mut mappings);
        // every chunk starts at line 0, column 0 of its source
        encode_vlq(0, &mut mappings);
        encode_vlq(0, &mut mappings);
        prev_col = gen_col as i64;
        prev_source = index as i64;
    }

    let sources_content = inline_sources.then(|| chunks.iter().map(|c| c.content.clone()).collect());

    SourceMap {
        version: 3,
        file,
        sources: chunks.iter().map(|c| c.source.clone()).collect(),
        sources_content,
        names: Vec::new(),
        mappings,
    }
}

/// Zero-based line and column (in chars) of a byte offset.
fn position(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, before[line_start..].chars().count())
}

fn encode_vlq(value: i64, out: &mut String) {
    let mut vlq: u64 = if value < 0 {
        (((-value) << 1) | 1) as u64
    } else {
        (value << 1) as u64
    };
    loop {
        let mut digit = (vlq & 0b1_1111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b10_0000;
        }
        out.push(BASE64[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}
