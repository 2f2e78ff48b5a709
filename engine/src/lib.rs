//! Engine adapter: drives one external UCI engine process per analysis.

mod config;
mod error;
mod lines;
mod process;
mod uci_engine;

pub mod analysis;

pub use analysis::{read_analysis, Evaluation, PvLine, PvTable};
pub use config::EngineConfig;
pub use error::EngineError;
pub use process::{EngineLine, EngineProcess};
pub use uci::Score;
pub use uci_engine::UciEngine;

/// Something that can evaluate a position.
///
/// Implementations are shared by every pool worker and must be callable
/// concurrently.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, fen: &str) -> Result<Evaluation, EngineError>;
}
