//! Lazy readers for tab-separated record files.
//!
//! Every reader yields one `Result` per non-empty line and never trims
//! fields. Line numbers in errors are 1-based.

use crate::error::ParseError;
use interseg_core::{Edge, EdgeRecord, Identifier, Record, VertexRecord};
use std::io::{BufRead, Lines};
use tracing::debug;

/// Turns the fields of one line into a typed row.
pub trait RowParser {
    type Row;

    fn parse_row(&self, line: usize, fields: &[&str]) -> Result<Self::Row, ParseError>;
}

pub struct TabReader<R, P> {
    lines: Lines<R>,
    line_no: usize,
    parser: P,
}

impl<R: BufRead, P: RowParser> TabReader<R, P> {
    pub fn new(reader: R, parser: P) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            parser,
        }
    }
}

impl<R: BufRead, P: RowParser> Iterator for TabReader<R, P> {
    type Item = Result<P::Row, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                None => {
                    debug!("reached end of input after {} lines", self.line_no);
                    return None;
                }
                Some(Err(e)) => return Some(Err(ParseError::Io(e))),
            };
            self.line_no += 1;
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            return Some(self.parser.parse_row(self.line_no, &fields));
        }
    }
}

/// `<member id>\t<value>[\t<value>...]`
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberRows;

/// `<name>\t<value>[\t<value>...]`
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedRows;

/// `<vertex1>\t<vertex2>\t<weight>`
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeRows;

/// A single column, returned raw.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRows(pub usize);

impl RowParser for MemberRows {
    type Row = VertexRecord;

    fn parse_row(&self, line: usize, fields: &[&str]) -> Result<VertexRecord, ParseError> {
        let (raw_id, raw_values) = split_key(line, fields)?;
        let id = raw_id
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidIdentifier {
                line,
                raw: raw_id.to_string(),
            })?;
        Ok(Record::new(Identifier::Member(id), parse_values(line, raw_values, 2)?))
    }
}

impl RowParser for NamedRows {
    type Row = VertexRecord;

    fn parse_row(&self, line: usize, fields: &[&str]) -> Result<VertexRecord, ParseError> {
        let (name, raw_values) = split_key(line, fields)?;
        Ok(Record::new(
            Identifier::Name(name.to_string()),
            parse_values(line, raw_values, 2)?,
        ))
    }
}

impl RowParser for EdgeRows {
    type Row = EdgeRecord;

    fn parse_row(&self, line: usize, fields: &[&str]) -> Result<EdgeRecord, ParseError> {
        let [source, target, raw_weight] = fields else {
            return Err(ParseError::FieldCount {
                line,
                expected: "3",
                found: fields.len(),
            });
        };
        let weight = parse_value(line, 3, raw_weight)?;
        Ok(Edge::new(
            Identifier::Name(source.to_string()),
            Identifier::Name(target.to_string()),
            weight,
        ))
    }
}

impl RowParser for ColumnRows {
    type Row = String;

    fn parse_row(&self, line: usize, fields: &[&str]) -> Result<String, ParseError> {
        fields
            .get(self.0)
            .map(|field| field.to_string())
            .ok_or(ParseError::MissingColumn {
                line,
                column: self.0 + 1,
            })
    }
}

fn split_key<'a>(
    line: usize,
    fields: &'a [&'a str],
) -> Result<(&'a str, &'a [&'a str]), ParseError> {
    match fields {
        [key, values @ ..] if !values.is_empty() => Ok((*key, values)),
        _ => Err(ParseError::FieldCount {
            line,
            expected: "at least 2",
            found: fields.len(),
        }),
    }
}

fn parse_values(line: usize, raw: &[&str], first_column: usize) -> Result<Vec<f64>, ParseError> {
    raw.iter()
        .enumerate()
        .map(|(offset, value)| parse_value(line, first_column + offset, value))
        .collect()
}

fn parse_value(line: usize, column: usize, raw: &str) -> Result<f64, ParseError> {
    raw.parse::<f64>().map_err(|_| ParseError::InvalidValue {
        line,
        column,
        raw: raw.to_string(),
    })
}

pub type VertexRecords<R> = TabReader<R, MemberRows>;
pub type NamedRecords<R> = TabReader<R, NamedRows>;
pub type EdgeRecords<R> = TabReader<R, EdgeRows>;

/// Vertex records keyed by integer member id.
pub fn vertex_records<R: BufRead>(reader: R) -> VertexRecords<R> {
    TabReader::new(reader, MemberRows)
}

/// Vertex records keyed by an opaque name.
pub fn named_records<R: BufRead>(reader: R) -> NamedRecords<R> {
    TabReader::new(reader, NamedRows)
}

pub fn edge_records<R: BufRead>(reader: R) -> EdgeRecords<R> {
    TabReader::new(reader, EdgeRows)
}

/// Yields column `index` (0-based) of every line.
pub fn read_column<R: BufRead>(reader: R, index: usize) -> TabReader<R, ColumnRows> {
    TabReader::new(reader, ColumnRows(index))
}
