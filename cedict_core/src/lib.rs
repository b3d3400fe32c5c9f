//! `cedict_core`：CC-CEDICT 词典的纯逻辑层，不做任何 I/O。
//!
//! 设计目标：
//! - **核心可复用**：CLI/服务端复用同一套解析、索引与切分逻辑
//! - **分层清晰**：parser（行 -> 词条） -> index（双键表 + 前缀树） ->
//!   match（贪心最长匹配切分）
//! - **构建后只读**：索引一旦建好不再修改，可安全共享给并发只读查询；
//!   刷新词典的唯一方式是重新构建
pub mod entry;
pub mod errors;
pub mod index;
pub mod parser;

pub use entry::{Entry, Segment};
pub use errors::{DictError, Result};
pub use index::Index;
