//! Locating tables inside a grid: seed search, boundary refinement and the header/data
//! split.

pub mod header;
pub mod histogram;
pub mod refine;
pub mod region;

pub use header::{data_score, detect_header_depth};
pub use histogram::{Bar, maximal_rectangles};
pub use refine::refine_region;
pub use region::{Candidate, detect_region};
