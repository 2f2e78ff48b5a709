/// Commands sent to an engine over its stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    SetOption { name: String, value: String },
    Position { fen: String },
    Go(GoParams),
    Stop,
}

/// Lines read back from an engine's stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    IdName(String),
    IdAuthor(String),
    UciOk,
    ReadyOk,
    Option(String),
    Info(Info),
    BestMove {
        /// `None` when the engine has no legal move (`bestmove (none)` or `bestmove 0000`).
        best_move: Option<String>,
        ponder: Option<String>,
    },
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    pub depth: Option<u32>,
    pub sel_depth: Option<u32>,
    /// Rank of this line when the engine runs with MultiPV > 1.
    pub multipv: Option<u32>,
    pub score: Option<Score>,
    pub nodes: Option<u64>,
    pub nodes_per_second: Option<u64>,
    pub time: Option<u64>,
    /// `Some` whenever the line carried a `pv` marker, even with no moves after it.
    pub pv: Option<Vec<String>>,
    pub string: Option<String>,
}

impl Info {
    /// Rank of the line, defaulting to 1 as engines omit `multipv` in single-line mode.
    pub fn rank(&self) -> u32 {
        self.multipv.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    Mate(i32), // Positive for mate-in-n, negative for mated-in-n
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    // Search exactly movetime milliseconds.
    pub move_time: Option<u64>,
}
