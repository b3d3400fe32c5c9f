//! 双键索引 + 前缀树，以及贪心最长匹配切分。
//!
//! 约定：
//! - 词条本体集中存放在一个 arena 里，两张键表只存下标
//! - 前缀树同样用 arena 存节点（根是 `nodes[0]`），边表里允许两个不同的字
//!   指向同一个子节点：简繁在同一位置不同字时加别名边，任一写法都能走到词尾
//! - 构建完成后索引只读，可被多个调用方并发只读查询

use std::collections::BTreeMap;
use std::io::BufRead;

use crate::entry::{Entry, Segment};
use crate::errors::Result;
use crate::parser;

type EntryId = usize;
type NodeId = usize;

#[derive(Debug, Default)]
struct Node {
    /// 到此为止恰好是某个词条的完整写法
    word: bool,
    children: BTreeMap<char, NodeId>,
}

/// 词典索引：按简体/繁体两种写法检索，另带一棵切分用的前缀树。
///
/// 同一写法的多个词条按收录顺序保留；后收录的追加在后面，不覆盖。
#[derive(Debug)]
pub struct Index {
    entries: Vec<Entry>,
    by_simplified: BTreeMap<String, Vec<EntryId>>,
    by_traditional: BTreeMap<String, Vec<EntryId>>,
    nodes: Vec<Node>,
    /// 建索引时观察到的逐字繁→简对照，供解析简繁混写时兜底
    char_map: BTreeMap<char, char>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_simplified: BTreeMap::new(),
            by_traditional: BTreeMap::new(),
            nodes: vec![Node::default()],
            char_map: BTreeMap::new(),
        }
    }
}

impl Index {
    /// 把已解析好的词条序列折叠成索引。
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut index = Self::default();
        for entry in entries {
            index.push(entry);
        }
        index
    }

    /// 从行式读取器解析并构建索引；遇到坏行立即失败，不产生半截索引。
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut index = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if parser::can_ignore(line) {
                continue;
            }
            index.push(parser::parse_line(line, idx + 1)?);
        }
        Ok(index)
    }

    /// 从内存中的整段词典文本构建索引（测试与小词典用）。
    pub fn from_dict_str(s: &str) -> Result<Self> {
        let mut index = Self::default();
        for entry in parser::parse(s.lines()) {
            index.push(entry?);
        }
        Ok(index)
    }

    /// 收录的词条总数。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按简体写法精确检索（收录顺序）。
    pub fn lookup_simplified(&self, key: &str) -> Vec<&Entry> {
        self.ids_to_entries(self.by_simplified.get(key))
    }

    /// 按繁体写法精确检索（收录顺序）。
    pub fn lookup_traditional(&self, key: &str) -> Vec<&Entry> {
        self.ids_to_entries(self.by_traditional.get(key))
    }

    fn ids_to_entries(&self, ids: Option<&Vec<EntryId>>) -> Vec<&Entry> {
        ids.map(|ids| ids.iter().map(|&id| &self.entries[id]).collect())
            .unwrap_or_default()
    }

    fn push(&mut self, entry: Entry) {
        let s_chars: Vec<char> = entry.simplified.chars().collect();
        let t_chars: Vec<char> = entry.traditional.chars().collect();
        let aligned = s_chars.len() == t_chars.len();
        if !aligned {
            tracing::warn!(
                simplified = %entry.simplified,
                traditional = %entry.traditional,
                "简繁写法字数不一致，前缀树只按简体收录"
            );
        }

        let id: EntryId = self.entries.len();
        self.by_simplified
            .entry(entry.simplified.clone())
            .or_default()
            .push(id);
        self.by_traditional
            .entry(entry.traditional.clone())
            .or_default()
            .push(id);

        // 逐字走前缀树；新建节点时顺带挂繁体别名边，让两种写法共享路径。
        let mut cur: NodeId = 0;
        for (i, &sc) in s_chars.iter().enumerate() {
            let next = match self.nodes[cur].children.get(&sc) {
                Some(&n) => n,
                None => {
                    let n = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[cur].children.insert(sc, n);
                    if aligned && t_chars[i] != sc {
                        self.nodes[cur].children.insert(t_chars[i], n);
                    }
                    n
                }
            };
            if aligned && t_chars[i] != sc {
                self.char_map.insert(t_chars[i], sc);
            }
            cur = next;
        }
        if !s_chars.is_empty() {
            self.nodes[cur].word = true;
        }
        self.entries.push(entry);
    }

    /// 贪心最长匹配：把任意一段文字切成「词条段」与「未收录段」的序列。
    ///
    /// - 每个匹配都是从其起点出发、前缀树里存在的最长写法
    /// - 一次尝试落空时只把起点那个字记为未收录，从下一个字重新尝试
    /// - 相邻的未收录字符合并成一段输出
    /// - 空查询返回空序列；匹配永不失败
    pub fn match_term(&self, term: &str) -> Vec<Segment<'_>> {
        let chars: Vec<char> = term.chars().collect();
        let mut out: Vec<Segment> = Vec::new();
        let mut pending = String::new();

        let mut start = 0;
        while start < chars.len() {
            // 一次尝试：从 start 沿前缀树走到断边或文末，记录途中最长的完整词。
            let mut best: Option<usize> = None;
            let mut node: NodeId = 0;
            for (i, &c) in chars.iter().enumerate().skip(start) {
                match self.nodes[node].children.get(&c) {
                    Some(&next) => {
                        node = next;
                        if self.nodes[node].word {
                            best = Some(i);
                        }
                    }
                    None => break,
                }
            }
            match best {
                Some(end) => {
                    let word: String = chars[start..=end].iter().collect();
                    let entries = self.resolve(&word);
                    if entries.is_empty() {
                        // 词尾可达但哪张表都没有这个写法：当作未收录
                        pending.push_str(&word);
                    } else {
                        if !pending.is_empty() {
                            out.push(Segment::Literal(std::mem::take(&mut pending)));
                        }
                        out.push(Segment::Matched(entries));
                    }
                    start = end + 1;
                }
                None => {
                    pending.push(chars[start]);
                    start += 1;
                }
            }
        }
        if !pending.is_empty() {
            out.push(Segment::Literal(pending));
        }
        out
    }

    /// 把匹配到的写法解析成词条序列。
    ///
    /// 先查简体表再查繁体表；都落空说明是沿别名边走出来的简繁混写
    /// （例如「麵条」既不是纯简体键也不是纯繁体键），这时逐字转成简体
    /// 再查一次简体表。混写场景下简体表的覆盖面更好，比如「面」的
    /// 词条能同时服务「麵」（面条）与「面」（面子）两种来源。
    fn resolve(&self, word: &str) -> Vec<&Entry> {
        let ids = self
            .by_simplified
            .get(word)
            .or_else(|| self.by_traditional.get(word));
        if ids.is_some() {
            return self.ids_to_entries(ids);
        }
        let converted: String = word
            .chars()
            .map(|c| self.char_map.get(&c).copied().unwrap_or(c))
            .collect();
        self.ids_to_entries(self.by_simplified.get(&converted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DictError;

    fn defs(segment: &Segment) -> Vec<String> {
        match segment {
            Segment::Matched(entries) => entries
                .iter()
                .flat_map(|e| e.definitions.iter().cloned())
                .collect(),
            Segment::Literal(text) => panic!("expected match, got literal {text:?}"),
        }
    }

    #[test]
    fn comment_only_input_builds_empty_index() {
        let index = Index::from_dict_str("# just a comment\n\n\n").unwrap();
        assert!(index.is_empty());
        assert!(index.lookup_simplified("好").is_empty());
        assert!(index.lookup_traditional("好").is_empty());
    }

    #[test]
    fn bad_line_aborts_the_whole_build() {
        match Index::from_dict_str("你好 你好 [ni3 hao3] /hello/\nrandom") {
            Err(DictError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn homographs_keep_insertion_order() {
        let index = Index::from_dict_str(
            "森 森 [Sen1] /Mori (Japanese surname)/\n森 森 [sen1] /forest/",
        )
        .unwrap();
        let entries = index.lookup_simplified("森");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pinyin, "Sen1");
        assert_eq!(entries[1].pinyin, "sen1");
    }

    #[test]
    fn entry_is_reachable_through_both_scripts() {
        let index = Index::from_dict_str("麵條 面条 [mian4 tiao2] /noodles/").unwrap();
        let by_s = index.lookup_simplified("面条");
        let by_t = index.lookup_traditional("麵條");
        assert_eq!(by_s.len(), 1);
        assert_eq!(by_s, by_t);
    }

    #[test]
    fn matches_whole_query_that_is_one_headword() {
        let index = Index::from_dict_str("你好 你好 [ni3 hao3] /hello/").unwrap();
        let segments = index.match_term("你好");
        assert_eq!(segments.len(), 1);
        assert_eq!(defs(&segments[0]), vec!["hello".to_owned()]);
    }

    #[test]
    fn coalesces_unknown_run_between_matches() {
        let index = Index::from_dict_str(
            "你好 你好 [ni3 hao3] /hello/\n中國 中国 [Zhong1 guo2] /China/",
        )
        .unwrap();
        let segments = index.match_term("你好嗎中国");
        assert_eq!(segments.len(), 3);
        assert_eq!(defs(&segments[0]), vec!["hello".to_owned()]);
        assert_eq!(segments[1], Segment::Literal("嗎".to_owned()));
        assert_eq!(defs(&segments[2]), vec!["China".to_owned()]);
    }

    #[test]
    fn prefers_the_longest_headword_at_a_position() {
        let index = Index::from_dict_str(
            "中 中 [zhong1] /middle/\n中國 中国 [Zhong1 guo2] /China/",
        )
        .unwrap();
        let segments = index.match_term("中国");
        assert_eq!(segments.len(), 1);
        assert_eq!(defs(&segments[0]), vec!["China".to_owned()]);
    }

    #[test]
    fn falls_back_to_shorter_word_recorded_during_the_attempt() {
        let index = Index::from_dict_str(
            "中 中 [zhong1] /middle/\n中國 中国 [Zhong1 guo2] /China/",
        )
        .unwrap();
        let segments = index.match_term("中人");
        assert_eq!(segments.len(), 2);
        assert_eq!(defs(&segments[0]), vec!["middle".to_owned()]);
        assert_eq!(segments[1], Segment::Literal("人".to_owned()));
    }

    #[test]
    fn retries_from_the_next_character_after_a_failed_attempt() {
        // 「面包」是「面包车」的前缀，本身不成词：这次尝试落空后
        // 起点逐字推进，后面的「超人」仍要能匹配上。
        let index = Index::from_dict_str(
            "麵包車 面包车 [mian4 bao1 che1] /bread van/\n超人 超人 [chao1 ren2] /superman/",
        )
        .unwrap();
        let segments = index.match_term("面包超人");
        assert_eq!(
            segments,
            vec![
                Segment::Literal("面包".to_owned()),
                Segment::Matched(index.lookup_simplified("超人")),
            ]
        );
    }

    #[test]
    fn entirely_unknown_input_is_one_literal_run() {
        let index = Index::from_dict_str("你好 你好 [ni3 hao3] /hello/").unwrap();
        assert_eq!(
            index.match_term("abc"),
            vec![Segment::Literal("abc".to_owned())]
        );
    }

    #[test]
    fn empty_query_yields_no_segments() {
        let index = Index::from_dict_str("你好 你好 [ni3 hao3] /hello/").unwrap();
        assert!(index.match_term("").is_empty());
    }

    #[test]
    fn single_unknown_character_is_one_literal() {
        let index = Index::from_dict_str("你好 你好 [ni3 hao3] /hello/").unwrap();
        assert_eq!(
            index.match_term("嗎"),
            vec![Segment::Literal("嗎".to_owned())]
        );
    }

    #[test]
    fn mixed_script_spelling_resolves_through_char_conversion() {
        // 「麵条」沿别名边能走到词尾，但既不是简体键也不是繁体键；
        // 逐字转简体后应命中「面条」。
        let index = Index::from_dict_str("麵條 面条 [mian4 tiao2] /noodles/").unwrap();
        let segments = index.match_term("麵条");
        assert_eq!(segments.len(), 1);
        assert_eq!(defs(&segments[0]), vec!["noodles".to_owned()]);
    }

    #[test]
    fn traditional_spelling_matches_through_alias_edges() {
        let index = Index::from_dict_str("麵條 面条 [mian4 tiao2] /noodles/").unwrap();
        let segments = index.match_term("麵條");
        assert_eq!(segments.len(), 1);
        assert_eq!(defs(&segments[0]), vec!["noodles".to_owned()]);
    }

    #[test]
    fn length_mismatched_entry_is_still_indexed() {
        // 繁体侧三个字、简体侧两个字：只告警，词条照常收录，
        // 前缀树按简体字符可用，不挂别名边。
        let index = Index::from_dict_str("硏究所 研所 [yan2 suo3] /institute/").unwrap();
        assert_eq!(index.lookup_simplified("研所").len(), 1);
        assert_eq!(index.lookup_traditional("硏究所").len(), 1);
        let segments = index.match_term("研所");
        assert_eq!(defs(&segments[0]), vec!["institute".to_owned()]);
        // 繁体写法不进前缀树
        assert_eq!(
            index.match_term("硏究所"),
            vec![Segment::Literal("硏究所".to_owned())]
        );
    }

    #[test]
    fn build_from_entries_matches_from_str() {
        let entry = Entry {
            simplified: "好".to_owned(),
            traditional: "好".to_owned(),
            pinyin: "hao3".to_owned(),
            definitions: vec!["good".to_owned()],
        };
        let index = Index::build([entry.clone()]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup_simplified("好"), vec![&entry]);
    }
}
