pub mod aggregate;
pub mod diversity;
pub mod error;
pub mod individual;
pub mod mapper;
pub mod matrix;
pub mod render;
pub mod stats;

pub use aggregate::{Distribution, SegmentDistribution};
pub use error::AnalysisError;
pub use individual::IndividualComparison;
pub use matrix::{KsMatrix, KsMatrixOptions, KsOutput, LabelledValue, MatrixOutput, SegmentMatrix};
pub use stats::{KsComparison, KsResult};
