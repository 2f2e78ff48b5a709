use engine::Evaluation;
use pool::PoolError;
use uci::{Encoder, EngineOutput, Info};

/// Renders one position's outcome: the FEN, one `info` line per ranked
/// line, then `bestmove`, or a single `error` line.
pub fn format_result(fen: &str, result: &Result<Evaluation, PoolError>) -> String {
    let mut out = format!("position fen {}", fen.trim());

    match result {
        Ok(evaluation) => {
            let encoder = Encoder {};

            for line in &evaluation.lines {
                let info = Info {
                    depth: line.depth,
                    multipv: Some(line.rank),
                    score: line.score,
                    pv: Some(line.moves.clone()),
                    ..Default::default()
                };
                out.push('\n');
                out.push_str(&encoder.encode_output(&EngineOutput::Info(info)));
            }

            out.push('\n');
            out.push_str(&encoder.encode_output(&EngineOutput::BestMove {
                best_move: evaluation.best_move.clone(),
                ponder: evaluation.ponder.clone(),
            }));
        }
        Err(e) => {
            out.push_str(&format!("\nerror {}", e));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{PvLine, Score};

    #[test]
    fn test_format_evaluation() {
        let evaluation = Evaluation {
            best_move: Some("d2d4".to_string()),
            ponder: Some("d7d5".to_string()),
            lines: vec![
                PvLine {
                    rank: 1,
                    depth: Some(20),
                    score: Some(Score::Centipawns(50)),
                    moves: vec!["d2d4".to_string(), "d7d5".to_string()],
                },
                PvLine {
                    rank: 2,
                    depth: Some(20),
                    score: Some(Score::Centipawns(35)),
                    moves: vec!["e2e4".to_string(), "e7e5".to_string()],
                },
            ],
        };

        assert_eq!(
            format_result("startpos-fen ", &Ok(evaluation)),
            "position fen startpos-fen\n\
             info depth 20 multipv 1 score cp 50 pv d2d4 d7d5\n\
             info depth 20 multipv 2 score cp 35 pv e2e4 e7e5\n\
             bestmove d2d4 ponder d7d5"
        );
    }

    #[test]
    fn test_format_error() {
        assert_eq!(
            format_result("some-fen", &Err(PoolError::QueueFull)),
            "position fen some-fen\nerror queue full, try again later"
        );
    }
}
