//! Interactive level-ancestor queries over a rooted tree.
//!
//! Line one of stdin is a whitespace-separated parent array (`-1` marks
//! the root). Every following line carrying exactly two integers `v d`
//! answers with the ancestor of `v` at depth `d`, or `-1`. The first
//! line that is not two integers ends the session.

use std::io;
use std::io::BufRead;
use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use level_ancestor::{
    AncestorTable, JumpLadder, JumpPointers, LadderDecomposition, LevelAncestor, MacroMicro,
    NO_PARENT,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "level-ancestor", about = "Answer level ancestor queries from stdin")]
struct Cli {
    /// Structure answering the queries.
    #[arg(long, value_enum, default_value = "optimal")]
    algorithm: Algorithm,

    /// Report build statistics on stderr.
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    Table,
    Jump,
    Ladder,
    JumpLadder,
    Optimal,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt().with_writer(io::stderr).init();
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let first = lines
        .next()
        .context("missing parent array on the first line")?
        .context("failed to read the parent array")?;
    let parents = parse_parents(&first)?;

    match cli.algorithm {
        Algorithm::Table => run::<AncestorTable>(&parents, lines),
        Algorithm::Jump => run::<JumpPointers>(&parents, lines),
        Algorithm::Ladder => run::<LadderDecomposition>(&parents, lines),
        Algorithm::JumpLadder => run::<JumpLadder>(&parents, lines),
        Algorithm::Optimal => run::<MacroMicro>(&parents, lines),
    }
}

fn parse_parents(line: &str) -> Result<Vec<usize>> {
    line.split_whitespace()
        .map(|token| {
            let raw: i64 = token
                .parse()
                .with_context(|| format!("invalid parent id {token:?}"))?;
            Ok(if raw < 0 { NO_PARENT } else { raw as usize })
        })
        .collect()
}

fn run<L: LevelAncestor>(
    parents: &[usize],
    lines: impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    let started = Instant::now();
    let la = L::from_parents(parents).context("failed to build the level ancestor structure")?;
    info!(
        nodes = la.tree().len(),
        build = L::BUILD_COMPLEXITY.label(),
        query = L::QUERY_COMPLEXITY.label(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "structure ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        let line = line.context("failed to read a query line")?;
        let mut tokens = line.split_whitespace();
        let (Some(a), Some(b), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            break;
        };
        let (Ok(v), Ok(d)) = (a.parse::<i64>(), b.parse::<i64>()) else {
            break;
        };
        let answer = if v < 0 || d < 0 {
            None
        } else {
            la.query(v as usize, d as usize)
        };
        writeln!(out, "{}", answer.map_or(-1, |u| u as i64))?;
    }

    Ok(())
}
