use thiserror::Error;

/// A valve network that can't be compacted or searched. Fatal to the call;
/// there's no sensible default to fall back to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedNetwork {
    #[error("unexpected line format: {0}")]
    BadLine(String),
    #[error("start valve {0} is not in the network")]
    MissingStart(String),
    #[error("tunnel from {from} leads to unknown valve {to}")]
    DanglingTunnel { from: String, to: String },
    #[error("tunnel from {from} to {to} costs no time")]
    ZeroCostTunnel { from: String, to: String },
    #[error("no working valve is reachable from {0}")]
    NoReachableValves(String),
    #[error("{0} valves won't fit in the opened-set mask (limit 64)")]
    TooManyValves(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidBudget {
    #[error("crew must have at least one member")]
    EmptyCrew,
}
