//! cedict 命令行：维护本地词典缓存，把查询串切成词条并格式化输出。

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use cedict_core::{Index, Segment};
use cedict_pinyin::number_to_mark;

mod fetch;

#[derive(Parser, Debug)]
#[clap(name = "cedict", about = "CC-CEDICT 词典查询")]
struct Args {
    /// 使用指定的词典文件，而不是本地缓存
    #[clap(long)]
    dict: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 下载（或刷新）本地词典缓存
    Get,
    /// 把每个参数按词典切分并输出词条
    Lookup {
        /// 待查询的词或整段文字
        #[clap(required = true)]
        terms: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    match args.command {
        Command::Get => {
            let path = fetch::download()?;
            eprintln!("词典已缓存到 {}", path.display());
            Ok(())
        }
        Command::Lookup { terms } => {
            let index = load_index(args.dict.as_deref())?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for term in &terms {
                print_segments(&mut out, &index, term)?;
            }
            Ok(())
        }
    }
}

fn load_index(dict: Option<&Path>) -> anyhow::Result<Index> {
    let index = match dict {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("无法打开词典 {}", path.display()))?;
            Index::from_reader(BufReader::new(file))?
        }
        None => Index::from_reader(BufReader::new(fetch::open()?))?,
    };
    Ok(index)
}

/// 命中的词条一行一个：`简体 (调号拼音) 释义 / 释义`；未收录段原样输出。
fn print_segments(out: &mut impl Write, index: &Index, term: &str) -> io::Result<()> {
    for segment in index.match_term(term) {
        match segment {
            Segment::Matched(entries) => {
                for e in entries {
                    writeln!(
                        out,
                        "{} ({}) {}",
                        e.simplified,
                        number_to_mark(&e.pinyin),
                        e.definitions.join(" / ")
                    )?;
                }
            }
            Segment::Literal(text) => writeln!(out, "{text}")?,
        }
    }
    Ok(())
}
