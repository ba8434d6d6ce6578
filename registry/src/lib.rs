pub mod archive;
pub mod error;
pub mod field;
pub mod member;
pub mod population;
pub mod tsv;

pub use error::RegistryError;
pub use field::SegmentField;
pub use member::Member;
pub use population::{FieldClassifier, LabelClassifier, PopulationRegistry};
