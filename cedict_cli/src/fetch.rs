//! 词典获取与本地缓存（整个程序里唯一做网络/文件 I/O 的地方）。
//!
//! 约定：
//! - 从 mdbg.net 下载 gzip 压缩的 CC-CEDICT 导出文件
//! - 解压后缓存到 `<用户缓存目录>/cedict/`，之后的查询直接读缓存
//! - 下载先写同目录临时文件再原子替换，不留半截缓存

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use flate2::read::GzDecoder;

/// 缓存文件名（与 mdbg 导出文件同名）。
pub const DICT_FILE: &str = "cedict_1_0_ts_utf-8_mdbg.txt";

const DICT_URL: &str =
    "https://www.mdbg.net/chinese/export/cedict/cedict_1_0_ts_utf-8_mdbg.txt.gz";

/// 获取词典时可能出现的错误。
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// 网络请求失败。
    #[error("网络请求失败")]
    Request(#[from] reqwest::Error),

    /// 服务端返回了非成功状态。
    #[error("HTTP 状态异常：{0}")]
    HttpStatus(reqwest::StatusCode),

    /// 读写缓存失败。
    #[error(transparent)]
    Io(#[from] io::Error),

    /// 临时文件落盘失败。
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),

    /// 当前平台取不到用户缓存目录。
    #[error("找不到用户缓存目录")]
    NoCacheDir,

    /// 本地还没有词典缓存。
    #[error("本地没有词典缓存，请先运行 `cedict get`")]
    NotFetched,
}

fn cache_dir() -> Result<PathBuf, FetchError> {
    let dir = dirs::cache_dir().ok_or(FetchError::NoCacheDir)?.join("cedict");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 词典在本地缓存中的路径（目录不存在时创建）。
pub fn local_path() -> Result<PathBuf, FetchError> {
    Ok(cache_dir()?.join(DICT_FILE))
}

/// 下载并解压词典到本地缓存，返回缓存文件路径。
pub fn download() -> Result<PathBuf, FetchError> {
    let dir = cache_dir()?;
    let path = dir.join(DICT_FILE);

    tracing::info!(url = DICT_URL, "开始下载词典");
    let response = reqwest::blocking::get(DICT_URL)?;
    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status()));
    }

    let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
    let mut decoder = GzDecoder::new(response);
    io::copy(&mut decoder, &mut temp)?;
    temp.persist(&path)?;

    tracing::info!(path = %path.display(), "词典已缓存");
    Ok(path)
}

/// 打开本地缓存的词典；没有缓存时提示先 `get`。
pub fn open() -> Result<File, FetchError> {
    let path = local_path()?;
    match File::open(&path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FetchError::NotFetched),
        Err(e) => Err(e.into()),
    }
}
