//! CC-CEDICT 行格式解析。
//!
//! 语法（一行一个词条，见 <https://cc-cedict.org/wiki/format:syntax>）：
//!
//! ```text
//! 繁体 简体 [pin1 yin1] /释义1/释义2/.../
//! ```
//!
//! 约定：
//! - 空行与 `#` 开头的注释行跳过，不解析也不报错
//! - 其余行必须完整匹配语法，否则带行号报错，整个构建中止

use std::sync::LazyLock;

use regex::Regex;

use crate::entry::Entry;
use crate::errors::{DictError, Result};

static LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+) (\S+) \[(.+)\] /(.+)/$").unwrap());

/// 该行是否应跳过（空行或注释行）。
pub(crate) fn can_ignore(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// 解析单行；`number` 从 1 计，只用于报错。
///
/// 调用方保证该行不满足 [`can_ignore`]。
pub(crate) fn parse_line(line: &str, number: usize) -> Result<Entry> {
    let caps = LINE.captures(line).ok_or_else(|| DictError::Parse {
        line: number,
        text: line.to_owned(),
    })?;
    Ok(Entry {
        traditional: caps[1].to_owned(),
        simplified: caps[2].to_owned(),
        pinyin: caps[3].to_owned(),
        definitions: caps[4].split('/').map(str::to_owned).collect(),
    })
}

/// 把行序列惰性地解析成词条序列。
///
/// 逐行产生 `Result<Entry>`；遇到第一个坏行即产生错误，调用方据此中止。
/// 词典文件可能很大，所以这里保持迭代器形态，不一次性收集。
pub fn parse<I, S>(lines: I) -> impl Iterator<Item = Result<Entry>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().enumerate().filter_map(|(idx, line)| {
        let line = line.as_ref();
        if can_ignore(line) {
            None
        } else {
            Some(parse_line(line, idx + 1))
        }
    })
}
