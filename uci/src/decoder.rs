use std::str::{FromStr, SplitWhitespace};

use log::trace;

use super::commands::{EngineOutput, Info, Score};

/// Decodes lines written by an engine.
pub struct Decoder {
    max_pv_moves: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            max_pv_moves: usize::MAX,
        }
    }

    /// Caps the number of moves kept from a `pv` field. Moves past the cap are dropped.
    pub fn with_pv_limit(max_pv_moves: usize) -> Self {
        Self { max_pv_moves }
    }

    pub fn decode(&self, line: &str) -> EngineOutput {
        let line = line.trim();

        match line {
            "uciok" => EngineOutput::UciOk,
            "readyok" => EngineOutput::ReadyOk,

            _ if starts_with_word(line, "info") => match self.decode_info(line) {
                Some(info) => EngineOutput::Info(info),
                None => EngineOutput::Unknown(line.to_string()),
            },
            _ if starts_with_word(line, "bestmove") => decode_bestmove(line),
            _ if starts_with_word(line, "option") => EngineOutput::Option(line.to_string()),
            _ if line.starts_with("id name ") => EngineOutput::IdName(line[8..].to_string()),
            _ if line.starts_with("id author ") => EngineOutput::IdAuthor(line[10..].to_string()),

            _ => EngineOutput::Unknown(line.to_string()),
        }
    }

    /// Returns `None` when the `multipv` rank is unreadable, since the line
    /// cannot be attributed to a rank.
    fn decode_info(&self, line: &str) -> Option<Info> {
        let mut info = Info::default();
        let mut tokens = line.split_whitespace();
        tokens.next(); // "info"

        while let Some(token) = tokens.next() {
            match token {
                "depth" => info.depth = next_numeric(&mut tokens),
                "seldepth" => info.sel_depth = next_numeric(&mut tokens),
                "multipv" => {
                    let Some(rank) = next_numeric(&mut tokens) else {
                        trace!("Dropping info with unreadable multipv: {}", line);
                        return None;
                    };
                    info.multipv = Some(rank);
                }
                "nodes" => info.nodes = next_numeric(&mut tokens),
                "nps" => info.nodes_per_second = next_numeric(&mut tokens),
                "time" => info.time = next_numeric(&mut tokens),
                "score" => info.score = decode_score(&mut tokens),

                // Both run to the end of the line.
                "pv" => {
                    info.pv = Some(
                        tokens
                            .by_ref()
                            .take(self.max_pv_moves)
                            .map(str::to_string)
                            .collect(),
                    );
                    break;
                }
                "string" => {
                    info.string = Some(tokens.collect::<Vec<_>>().join(" "));
                    break;
                }

                _ => {}
            }
        }

        Some(info)
    }
}

fn decode_bestmove(line: &str) -> EngineOutput {
    let mut tokens = line.split_whitespace().skip(1);

    let best_move = tokens.next().filter(|mv| is_move(mv)).map(str::to_string);
    let ponder = match tokens.next() {
        Some("ponder") => tokens.next().filter(|mv| is_move(mv)).map(str::to_string),
        _ => None,
    };

    EngineOutput::BestMove { best_move, ponder }
}

fn decode_score(tokens: &mut SplitWhitespace) -> Option<Score> {
    let kind = tokens.next()?;
    let value: i32 = next_numeric(tokens)?;

    match kind {
        "cp" => Some(Score::Centipawns(value)),
        "mate" => Some(Score::Mate(value)),
        _ => {
            trace!("Unknown score kind: {}", kind);
            None
        }
    }
}

fn is_move(token: &str) -> bool {
    token != "(none)" && token != crate::NULL_MOVE
}

fn starts_with_word(line: &str, word: &str) -> bool {
    line.split_whitespace().next() == Some(word)
}

fn next_numeric<T: FromStr>(tokens: &mut SplitWhitespace) -> Option<T> {
    tokens.next().and_then(|value| value.parse().ok())
}
