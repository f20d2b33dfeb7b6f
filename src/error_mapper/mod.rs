//! Source mapped stack traces for failures that escape a tick.
//!
//! Stack traces from the bundle point at `main:<line>:<column>`, which is no
//! use to anyone. [`wrap`] catches failures at the top of the loop and logs
//! them with every bundle frame mapped back through the bundle's source map.

pub mod escape;
pub mod host;
pub mod source_map;
pub mod trace;
pub mod wrap;

pub use escape::escape;
pub use host::{ScreepsHost, load_source_map, report_panic, with_trace_mapper};
pub use source_map::{OriginalPosition, PositionLookup, SourceMapError};
pub use trace::{Failure, TraceMapper};
pub use wrap::{report, wrap, Thrown, TraceHost};
