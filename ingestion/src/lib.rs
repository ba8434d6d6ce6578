pub mod error;
pub mod tab_reader;

pub use error::ParseError;
pub use tab_reader::{
    edge_records, named_records, read_column, vertex_records, EdgeRecords, NamedRecords,
    TabReader, VertexRecords,
};
