use std::collections::BTreeMap;
use std::io::BufRead;

use log::debug;
use uci::{Decoder, EngineOutput, Info, Score};

use crate::lines::EngineLines;
use crate::EngineError;

/// One ranked principal variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvLine {
    pub rank: u32,
    pub depth: Option<u32>,
    pub score: Option<Score>,
    pub moves: Vec<String>,
}

/// Outcome of a finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// `None` when the side to move has no legal move.
    pub best_move: Option<String>,
    pub ponder: Option<String>,
    /// Ranked lines, best first.
    pub lines: Vec<PvLine>,
}

/// Latest line per rank. A newer `info` for a rank replaces the stored one.
#[derive(Debug)]
pub struct PvTable {
    lines: BTreeMap<u32, PvLine>,
    max_rank: u32,
}

impl PvTable {
    pub fn new(max_rank: usize) -> Self {
        Self {
            lines: BTreeMap::new(),
            max_rank: u32::try_from(max_rank).unwrap_or(u32::MAX),
        }
    }

    /// Stores the line carried by `info`. Returns false if it was ignored
    /// (no `pv` marker, or a rank outside the requested range).
    pub fn record(&mut self, info: Info) -> bool {
        let rank = info.rank();
        if rank == 0 || rank > self.max_rank {
            return false;
        }

        let Some(moves) = info.pv else {
            return false;
        };

        self.lines.insert(
            rank,
            PvLine {
                rank,
                depth: info.depth,
                score: info.score,
                moves,
            },
        );
        true
    }

    /// Lines ordered by rank ascending.
    pub fn into_lines(self) -> Vec<PvLine> {
        self.lines.into_values().collect()
    }
}

/// Feeds engine output through a [`Decoder`] into a [`PvTable`] until `bestmove`.
pub struct AnalysisCollector {
    decoder: Decoder,
    table: PvTable,
}

impl AnalysisCollector {
    pub fn new(lines: usize, max_pv_moves: usize) -> Self {
        Self {
            decoder: Decoder::with_pv_limit(max_pv_moves),
            table: PvTable::new(lines),
        }
    }

    /// Consumes one output line. Returns the finished evaluation once `bestmove` is seen.
    pub fn feed(&mut self, line: &str) -> Option<Evaluation> {
        match self.decoder.decode(line) {
            EngineOutput::Info(info) => {
                self.table.record(info);
                None
            }
            EngineOutput::BestMove { best_move, ponder } => {
                let table = std::mem::replace(&mut self.table, PvTable::new(0));
                Some(Evaluation {
                    best_move,
                    ponder,
                    lines: table.into_lines(),
                })
            }
            other => {
                debug!("Ignoring engine output: {:?}", other);
                None
            }
        }
    }
}

/// Reads a complete analysis from an engine transcript.
///
/// Fails with [`EngineError::Protocol`] if the stream ends before `bestmove`.
pub fn read_analysis<R: BufRead>(
    reader: R,
    lines: usize,
    max_pv_moves: usize,
) -> Result<Evaluation, EngineError> {
    let mut collector = AnalysisCollector::new(lines, max_pv_moves);

    for line in EngineLines::new(reader) {
        if let Some(evaluation) = collector.feed(&line?) {
            return Ok(evaluation);
        }
    }

    Err(EngineError::Protocol(
        "output closed before bestmove".to_string(),
    ))
}
