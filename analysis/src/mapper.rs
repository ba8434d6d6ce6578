//! Replaces entity identifiers with segment labels.

use interseg_core::{
    Classifier, Edge, EdgeRecord, LookupError, Record, SegmentedEdge, SegmentedRecord,
    VertexRecord,
};

/// Lazily classifies the key of every record.
///
/// One output per input, in input order. A classifier failure is yielded in
/// place of the record; collecting into `Result<Vec<_>, _>` stops at it.
pub fn map_to_segments<'a, I, C>(
    records: I,
    classifier: &'a C,
) -> impl Iterator<Item = Result<SegmentedRecord, LookupError>> + 'a
where
    I: IntoIterator<Item = VertexRecord>,
    I::IntoIter: 'a,
    C: Classifier + ?Sized,
{
    records.into_iter().map(move |record| {
        let segment = classifier.classify(&record.key)?;
        Ok(Record::new(segment, record.values))
    })
}

/// Lazily classifies records coming from a fallible source such as a parser.
///
/// Source errors pass through unchanged; nothing past the current row is read.
pub fn try_map_to_segments<'a, I, C, E>(
    records: I,
    classifier: &'a C,
) -> impl Iterator<Item = Result<SegmentedRecord, E>> + 'a
where
    I: IntoIterator<Item = Result<VertexRecord, E>>,
    I::IntoIter: 'a,
    C: Classifier + ?Sized,
    E: From<LookupError>,
{
    records.into_iter().map(move |row| {
        let record = row?;
        let segment = classifier.classify(&record.key)?;
        Ok(Record::new(segment, record.values))
    })
}

/// Lazily classifies both endpoints of every edge.
pub fn map_edges_to_segments<'a, I, C>(
    edges: I,
    classifier: &'a C,
) -> impl Iterator<Item = Result<SegmentedEdge, LookupError>> + 'a
where
    I: IntoIterator<Item = EdgeRecord>,
    I::IntoIter: 'a,
    C: Classifier + ?Sized,
{
    edges.into_iter().map(move |edge| {
        let source = classifier.classify(&edge.source)?;
        let target = classifier.classify(&edge.target)?;
        Ok(Edge::new(source, target, edge.weight))
    })
}

/// Classifies every record and materializes the result for multi-pass use.
pub fn segment_records<'a, I, C>(
    records: I,
    classifier: &'a C,
) -> Result<Vec<SegmentedRecord>, LookupError>
where
    I: IntoIterator<Item = VertexRecord>,
    I::IntoIter: 'a,
    C: Classifier + ?Sized,
{
    map_to_segments(records, classifier).collect()
}

pub fn segment_edges<'a, I, C>(
    edges: I,
    classifier: &'a C,
) -> Result<Vec<SegmentedEdge>, LookupError>
where
    I: IntoIterator<Item = EdgeRecord>,
    I::IntoIter: 'a,
    C: Classifier + ?Sized,
{
    map_edges_to_segments(edges, classifier).collect()
}
