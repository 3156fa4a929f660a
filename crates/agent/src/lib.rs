//! The foldcraft conversation engine.
//!
//! Two layers: [`decoder`] folds one turn's stream of incremental events
//! into a finished assistant message, and [`session`] runs the tool-calling
//! loop over an append-only transcript until the model stops asking for
//! actions. Neither layer touches the network or the filesystem; the
//! transport and the tools are injected.

pub mod decoder;
pub mod session;

pub use decoder::{DecodedTurn, NullObserver, TurnObserver, decode_turn};
pub use session::{ChatSession, TurnOutcome, is_exit_phrase};
