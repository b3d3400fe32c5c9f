//! 词条与切分结果的数据类型（被 parser / index 共用）。

/// CC-CEDICT 的一个词条（源文件里一行一个义项）。
///
/// 约定：
/// - `simplified` / `traditional` 是同一个词的两种写法，字数一般一一对应；
///   不一致时只告警，词条仍照常收录
/// - `pinyin` 保存数字声调形式（例如 `"ni3 hao3"`），展示时再转调号
/// - 同一写法允许多个词条（多义/多音），按文件顺序保留，不去重
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub simplified: String,
    pub traditional: String,
    pub pinyin: String,
    pub definitions: Vec<String>,
}

/// 切分结果的一段：命中的词条序列，或未收录的原文连续段。
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    /// 命中：该写法对应的全部词条（非空，按词典顺序）
    Matched(Vec<&'a Entry>),
    /// 未收录：原样保留的连续字符段（相邻的未收录字符合并成一段）
    Literal(String),
}
