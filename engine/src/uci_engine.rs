use std::io::ErrorKind;
use std::time::Instant;

use log::debug;
use uci::{GoParams, UciCommand};

use crate::analysis::{AnalysisCollector, Evaluation};
use crate::process::{EngineLine, EngineProcess};
use crate::{Analyzer, EngineConfig, EngineError};

/// Evaluates positions by starting a fresh engine process for each one.
#[derive(Debug, Clone)]
pub struct UciEngine {
    config: EngineConfig,
}

impl UciEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    fn handshake(&self) -> Vec<UciCommand> {
        let option = |name: &str, value: String| UciCommand::SetOption {
            name: name.to_string(),
            value,
        };

        vec![
            UciCommand::Uci,
            option("Threads", self.config.threads.to_string()),
            option("Hash", self.config.hash_mb.to_string()),
            option("MultiPV", self.config.lines.to_string()),
            option("Ponder", "false".to_string()),
            UciCommand::IsReady,
        ]
    }

    fn search(&self, fen: &str) -> Vec<UciCommand> {
        vec![
            UciCommand::Position {
                fen: fen.to_string(),
            },
            UciCommand::Go(GoParams {
                move_time: Some(self.config.movetime_ms),
            }),
        ]
    }
}

impl Analyzer for UciEngine {
    fn analyze(&self, fen: &str) -> Result<Evaluation, EngineError> {
        let fen = fen.trim();
        // A line break would let the position smuggle in extra commands.
        if fen.is_empty() || fen.contains(['\r', '\n']) {
            return Err(EngineError::InvalidPosition);
        }

        let mut process = EngineProcess::spawn(&self.config)?;
        let sent = process
            .send_all(&self.handshake())
            .and_then(|()| process.send_all(&self.search(fen)));

        // An engine that stopped reading may still have written its answer.
        let input_closed = match sent {
            Ok(()) => false,
            Err(e) if is_closed_pipe(&e) => {
                debug!("Engine {} closed its input early", process.id());
                true
            }
            Err(e) => return Err(e),
        };

        let started = Instant::now();
        let mut collector = AnalysisCollector::new(self.config.lines, self.config.max_pv_moves);
        let mut deadline = started + self.config.movetime() + self.config.response_grace;
        // There is no one to send `stop` to once the input is closed.
        let mut stop_sent = input_closed;

        loop {
            match process.next_line(deadline) {
                EngineLine::Line(line) => {
                    if let Some(evaluation) = collector.feed(&line) {
                        debug!(
                            "Evaluated {} in {:?}: {:?}",
                            fen,
                            started.elapsed(),
                            evaluation.best_move
                        );
                        return Ok(evaluation);
                    }
                }
                EngineLine::Closed => {
                    return Err(EngineError::Protocol(
                        "engine exited before bestmove".to_string(),
                    ));
                }
                EngineLine::TimedOut if !stop_sent => {
                    debug!("Engine {} overran its movetime, sending stop", process.id());
                    match process.send(&UciCommand::Stop) {
                        Ok(()) => {}
                        Err(e) if is_closed_pipe(&e) => {}
                        Err(e) => return Err(e),
                    }
                    stop_sent = true;
                    deadline = Instant::now() + self.config.response_grace;
                }
                EngineLine::TimedOut => {
                    return Err(EngineError::Unresponsive(started.elapsed()));
                }
            }
        }
    }
}

fn is_closed_pipe(error: &EngineError) -> bool {
    matches!(error, EngineError::Io(e) if e.kind() == ErrorKind::BrokenPipe)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use uci::Score;

    const MULTIPV_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "id name Stub"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*)
      echo "info depth 10 multipv 2 score cp 35 pv e2e4 e7e5"
      echo "info depth 10 multipv 1 score cp 50 pv d2d4 d7d5"
      echo "bestmove d2d4 ponder d7d5"
      ;;
  esac
done
"#;

    fn shell(script: &str) -> EngineConfig {
        EngineConfig {
            path: PathBuf::from("sh"),
            args: vec!["-c".to_string(), script.to_string()],
            movetime_ms: 50,
            response_grace: Duration::from_millis(500),
            ..Default::default()
        }
    }

    #[test]
    fn test_multipv_analysis() {
        let engine = UciEngine::new(shell(MULTIPV_ENGINE));
        let evaluation = engine
            .analyze("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();

        assert_eq!(evaluation.best_move.as_deref(), Some("d2d4"));
        assert_eq!(evaluation.ponder.as_deref(), Some("d7d5"));
        assert_eq!(evaluation.lines.len(), 2);
        assert_eq!(evaluation.lines[0].rank, 1);
        assert_eq!(evaluation.lines[0].score, Some(Score::Centipawns(50)));
        assert_eq!(evaluation.lines[0].moves, vec!["d2d4", "d7d5"]);
        assert_eq!(evaluation.lines[1].rank, 2);
        assert_eq!(evaluation.lines[1].score, Some(Score::Centipawns(35)));
        assert_eq!(evaluation.lines[1].moves, vec!["e2e4", "e7e5"]);
    }

    #[test]
    fn test_position_is_forwarded() {
        let script = r#"
while read -r line; do
  case "$line" in
    "position fen "*) fen="${line#position fen }" ;;
    go*) echo "info depth 1 score cp 0 pv $fen"; echo "bestmove a1a1" ;;
  esac
done
"#;
        let engine = UciEngine::new(shell(script));
        let evaluation = engine.analyze("  8/8/8/8/8/8/8/K6k w - - 0 1\n").unwrap();
        assert_eq!(
            evaluation.lines[0].moves.join(" "),
            "8/8/8/8/8/8/8/K6k w - - 0 1"
        );
    }

    #[test]
    fn test_output_closed_without_bestmove() {
        let pid_file =
            std::env::temp_dir().join(format!("evalpool-closed-{}.pid", std::process::id()));

        // Records its pid, closes stdout, then keeps running until killed.
        let engine = UciEngine::new(shell(&format!(
            "echo $$ > '{}'; echo 'info depth 1 score cp 5 pv e2e4'; exec >&-; exec sleep 30",
            pid_file.display()
        )));

        let start = Instant::now();
        let result = engine.analyze("8/8/8/8/8/8/8/K6k w - - 0 1");
        assert!(matches!(result, Err(EngineError::Protocol(_))));
        assert!(start.elapsed() < Duration::from_secs(10));

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        std::fs::remove_file(&pid_file).unwrap();

        // The engine was reaped, so signalling it fails.
        let status = std::process::Command::new("kill")
            .args(["-0", pid.trim()])
            .stderr(std::process::Stdio::null())
            .status()
            .unwrap();
        assert!(!status.success());
    }

    #[test]
    fn test_engine_exiting_immediately() {
        let engine = UciEngine::new(shell("exit 0"));

        // Whether the first write or the first read notices the exit is a race.
        for _ in 0..20 {
            let result = engine.analyze("8/8/8/8/8/8/8/K6k w - - 0 1");
            assert!(
                matches!(result, Err(EngineError::Protocol(_))),
                "unexpected outcome {:?}",
                result
            );
        }
    }

    #[test]
    fn test_answer_after_closing_input() {
        // Stops reading before the handshake but still answers.
        let engine = UciEngine::new(shell(
            "exec <&-; sleep 0.2; echo 'info depth 3 score cp 9 pv b1c3'; echo 'bestmove b1c3'",
        ));
        let evaluation = engine.analyze("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        assert_eq!(evaluation.best_move.as_deref(), Some("b1c3"));
    }

    #[test]
    fn test_line_break_in_position() {
        let script = r#"
while read -r line; do
  case "$line" in
    go*) echo "bestmove a1a1" ;;
  esac
done
"#;
        let engine = UciEngine::new(shell(script));
        for fen in [
            "8/8/8/8/8/8/8/K6k w - - 0 1\ngo depth 99",
            "8/8/8/8/8/8/8/K6k w - - 0 1\rstop",
        ] {
            assert!(matches!(
                engine.analyze(fen),
                Err(EngineError::InvalidPosition)
            ));
        }
    }

    #[test]
    fn test_stop_after_movetime() {
        let script = r#"
while read -r line; do
  case "$line" in
    stop) echo "info depth 7 score cp 12 pv g1f3"; echo "bestmove g1f3" ;;
  esac
done
"#;
        let engine = UciEngine::new(shell(script));
        let evaluation = engine.analyze("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        assert_eq!(evaluation.best_move.as_deref(), Some("g1f3"));
    }

    #[test]
    fn test_unresponsive_engine() {
        let mut config = shell("exec sleep 30");
        config.response_grace = Duration::from_millis(100);
        let engine = UciEngine::new(config);

        let start = Instant::now();
        let result = engine.analyze("8/8/8/8/8/8/8/K6k w - - 0 1");
        assert!(matches!(result, Err(EngineError::Unresponsive(_))));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_spawn_error() {
        let engine = UciEngine::new(EngineConfig {
            path: PathBuf::from("/nonexistent/stockfish"),
            ..Default::default()
        });
        assert!(matches!(
            engine.analyze("8/8/8/8/8/8/8/K6k w - - 0 1"),
            Err(EngineError::Spawn { .. })
        ));
    }

    #[test]
    fn test_empty_position() {
        let engine = UciEngine::new(EngineConfig::default());
        assert!(matches!(
            engine.analyze("   "),
            Err(EngineError::InvalidPosition)
        ));
    }
}
