//! Most-pressure search over a valve network: parse a network of valves and
//! tunnels, fold out the zero-flow valves ([`compact`]), then run a memoized
//! search ([`Searcher`]) for the best opening schedule within a minute
//! budget, solo or with a crew sharing the opened-valve set.

mod compact;
mod error;
mod graph;
mod search;

pub use compact::compact;
pub use error::{InvalidBudget, MalformedNetwork};
pub use graph::{Tunnel, ValveId, Volcano};
pub use search::Searcher;
