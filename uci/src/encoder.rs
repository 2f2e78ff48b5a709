use super::commands::{EngineOutput, GoParams, Info, Score, UciCommand};

pub struct Encoder {}

impl Encoder {
    pub fn encode(&self, command: &UciCommand) -> String {
        match command {
            UciCommand::Uci => "uci".to_string(),
            UciCommand::IsReady => "isready".to_string(),

            UciCommand::SetOption { name, value } => {
                format!("setoption name {} value {}", name, value)
            }
            UciCommand::Position { fen } => format!("position fen {}", fen),
            UciCommand::Go(params) => encode_go(params),

            UciCommand::Stop => "stop".to_string(),
        }
    }

    /// Renders engine output back into its wire form. Used when relaying
    /// analysis to a host that speaks UCI-style text.
    pub fn encode_output(&self, output: &EngineOutput) -> String {
        match output {
            EngineOutput::IdName(name) => format!("id name {}", name),
            EngineOutput::IdAuthor(author) => format!("id author {}", author),

            EngineOutput::UciOk => "uciok".to_string(),
            EngineOutput::ReadyOk => "readyok".to_string(),

            EngineOutput::Option(line) => line.clone(),
            EngineOutput::Info(info) => encode_info(info),
            EngineOutput::BestMove { best_move, ponder } => {
                let best_move = best_move.as_deref().unwrap_or(crate::NULL_MOVE);
                match ponder {
                    Some(ponder) => format!("bestmove {} ponder {}", best_move, ponder),
                    None => format!("bestmove {}", best_move),
                }
            }
            EngineOutput::Unknown(line) => line.clone(),
        }
    }
}

fn encode_go(params: &GoParams) -> String {
    match params.move_time {
        Some(move_time) => format!("go movetime {}", move_time),
        None => "go".to_string(),
    }
}

fn encode_info(info: &Info) -> String {
    let mut out = String::from("info");

    if let Some(depth) = info.depth {
        out.push_str(&format!(" depth {}", depth));
    }
    if let Some(sel_depth) = info.sel_depth {
        out.push_str(&format!(" seldepth {}", sel_depth));
    }
    if let Some(multipv) = info.multipv {
        out.push_str(&format!(" multipv {}", multipv));
    }
    match info.score {
        Some(Score::Centipawns(cp)) => out.push_str(&format!(" score cp {}", cp)),
        Some(Score::Mate(moves)) => out.push_str(&format!(" score mate {}", moves)),
        None => {}
    }
    if let Some(nodes) = info.nodes {
        out.push_str(&format!(" nodes {}", nodes));
    }
    if let Some(nps) = info.nodes_per_second {
        out.push_str(&format!(" nps {}", nps));
    }
    if let Some(time) = info.time {
        out.push_str(&format!(" time {}", time));
    }
    if let Some(pv) = &info.pv {
        out.push_str(" pv");
        for mv in pv {
            out.push(' ');
            out.push_str(mv);
        }
    }
    if let Some(string) = &info.string {
        out.push_str(&format!(" string {}", string));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_commands() {
        let encoder = Encoder {};
        assert_eq!(encoder.encode(&UciCommand::Uci), "uci");
        assert_eq!(encoder.encode(&UciCommand::IsReady), "isready");
        assert_eq!(
            encoder.encode(&UciCommand::SetOption {
                name: "MultiPV".to_string(),
                value: "3".to_string(),
            }),
            "setoption name MultiPV value 3"
        );
    }

    #[test]
    fn test_position_and_go() {
        let encoder = Encoder {};
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(
            encoder.encode(&UciCommand::Position {
                fen: fen.to_string()
            }),
            format!("position fen {}", fen)
        );
        assert_eq!(
            encoder.encode(&UciCommand::Go(GoParams {
                move_time: Some(500)
            })),
            "go movetime 500"
        );
        assert_eq!(encoder.encode(&UciCommand::Go(GoParams::default())), "go");
        assert_eq!(encoder.encode(&UciCommand::Stop), "stop");
    }

    #[test]
    fn test_info_output() {
        let info = Info {
            depth: Some(18),
            multipv: Some(2),
            score: Some(Score::Mate(-3)),
            pv: Some(vec!["e2e4".to_string(), "e7e5".to_string()]),
            ..Default::default()
        };
        assert_eq!(
            Encoder {}.encode_output(&EngineOutput::Info(info)),
            "info depth 18 multipv 2 score mate -3 pv e2e4 e7e5"
        );
    }

    #[test]
    fn test_bestmove_output() {
        let encoder = Encoder {};
        assert_eq!(
            encoder.encode_output(&EngineOutput::BestMove {
                best_move: Some("d2d4".to_string()),
                ponder: Some("d7d5".to_string()),
            }),
            "bestmove d2d4 ponder d7d5"
        );
        assert_eq!(
            encoder.encode_output(&EngineOutput::BestMove {
                best_move: None,
                ponder: None,
            }),
            "bestmove 0000"
        );
    }
}
