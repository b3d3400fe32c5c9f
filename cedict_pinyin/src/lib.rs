//! `cedict_pinyin`：数字声调拼音 -> 调号拼音。
//!
//! 约定：
//! - 输入形如 `"ni3 hao3"`，声调 1-5 写在音节末尾（5 是轻声，只去数字不标调）
//! - `v` 与 `u:` 是 ü 的代用写法，转换时归一（保留大小写）
//! - 不符合音节语法的文本原样保留；变换无状态、保序

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// 音节语法：1-3 个元音（含 ü 的代用写法），可选 n/g/r 结尾，末尾声调数字。
static SYLLABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((?:[aeiouüv]|[uU]:){1,3})(n?g?r?)([12345])").unwrap());

/// 声调 1-4 的调号形式，大小写各一张表。
const TONE_MARKS: &[(char, [char; 4])] = &[
    ('a', ['ā', 'á', 'ǎ', 'à']),
    ('e', ['ē', 'é', 'ě', 'è']),
    ('i', ['ī', 'í', 'ǐ', 'ì']),
    ('o', ['ō', 'ó', 'ǒ', 'ò']),
    ('u', ['ū', 'ú', 'ǔ', 'ù']),
    ('ü', ['ǖ', 'ǘ', 'ǚ', 'ǜ']),
    ('A', ['Ā', 'Á', 'Ǎ', 'À']),
    ('E', ['Ē', 'É', 'Ě', 'È']),
    ('I', ['Ī', 'Í', 'Ǐ', 'Ì']),
    ('O', ['Ō', 'Ó', 'Ǒ', 'Ò']),
    ('U', ['Ū', 'Ú', 'Ǔ', 'Ù']),
    ('Ü', ['Ǖ', 'Ǘ', 'Ǚ', 'Ǜ']),
];

fn tone_mark(vowel: char, tone: u32) -> Option<char> {
    TONE_MARKS
        .iter()
        .find(|&&(plain, _)| plain == vowel)
        .map(|&(_, marks)| marks[tone as usize - 1])
}

/// ü 的代用写法归一，大小写各自保留。
fn normalize_umlaut(cluster: &str) -> String {
    cluster
        .replace("u:", "ü")
        .replace("U:", "Ü")
        .replace('v', "ü")
        .replace('V', "Ü")
}

/// 把数字声调替换成调号，例如 `de2` -> `dé`。
///
/// 调号落点：元音簇只有一个字符就标它；首字符是 a/e/o（含大写）也标
/// 首字符——这三个元音优先于后随的 i/u/o；其余情况标第二个字符。
pub fn number_to_mark(input: &str) -> String {
    SYLLABLE
        .replace_all(input, |caps: &Captures| {
            let vowels = normalize_umlaut(&caps[1]);
            let suffix = caps[2].to_owned();
            // 语法上只会是 1-5；万一解析不出来按轻声处理
            let tone = caps[3].parse::<u32>().ok();
            let Some(tone @ 1..=4) = tone else {
                return format!("{vowels}{suffix}");
            };
            let chars: Vec<char> = vowels.chars().collect();
            let vowel = if chars.len() == 1 || "aeoAEO".contains(chars[0]) {
                chars[0]
            } else {
                chars[1]
            };
            match tone_mark(vowel, tone) {
                Some(marked) => {
                    let cluster = vowels.replacen(vowel, &marked.to_string(), 1);
                    format!("{cluster}{suffix}")
                }
                None => format!("{vowels}{suffix}"),
            }
        })
        .into_owned()
}
