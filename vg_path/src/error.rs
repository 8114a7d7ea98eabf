use thiserror::Error;

/// The core's sum type of failure modes (§7). The core never panics on
/// caller-reachable invalid input; edit mutators log a `log::warn!`
/// at the failure site and still return `Err` so the caller decides
/// whether a no-op is the right recovery. A separate, non-`Err`
/// warning (not a failure) is emitted when an append edit lands on an
/// already-closed subpath — the edit proceeds regardless, matching
/// the original's "editing closed trajectory" behavior.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("allocation failed")]
    OutOfMemory,
    #[error("triangulation failed after monotone and ear-clip fallbacks")]
    TriangulationFailed,
    #[error("index {index} out of range (len = {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("operation requires a prior knot on an empty subpath")]
    EmptyPath,
    #[error("subpath/point counts do not match ({a} vs {b})")]
    CountMismatch { a: usize, b: usize },
    #[error("bad argument: {0}")]
    BadArgument(&'static str),
    #[error("rasterizer target too small ({width}x{height})")]
    RasterizerTooSmall { width: u32, height: u32 },
}
