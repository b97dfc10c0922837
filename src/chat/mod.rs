//! Multi-mode chat: modes, per-mode histories and the turn orchestrator.

pub mod engine;
pub mod mode;
pub mod session;
pub mod turn;

pub use engine::{ChatEngine, TurnOutcome};
pub use mode::ChatMode;
pub use session::SessionState;
pub use turn::{ChatTurn, Role};
