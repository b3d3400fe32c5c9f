//! 错误类型定义。

/// cedict 专用 Result 别名，默认错误类型为 [`DictError`]。
pub type Result<T, E = DictError> = std::result::Result<T, E>;

/// 构建词典索引时可能出现的错误。
///
/// 解析错误是致命的：词典数据坏了应该由调用方修复或重新下载，
/// 不产生半截索引。
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    /// 行内容不符合 CC-CEDICT 语法（也不是可跳过的空行/注释行）。
    #[error("第 {line} 行无法解析：{text}")]
    Parse { line: usize, text: String },

    /// 底层读取错误。
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
