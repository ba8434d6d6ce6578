use crate::error::RegistryError;
use crate::field::SegmentField;
use crate::member::Member;
use interseg_core::{Classifier, Identifier, LookupError, SegmentLabel};
use std::collections::{BTreeMap, BTreeSet};

/// All members of the population, kept sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationRegistry {
    members: Vec<Member>,
}

impl PopulationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members(members: impl IntoIterator<Item = Member>) -> Result<Self, RegistryError> {
        let mut members: Vec<Member> = members.into_iter().collect();
        members.sort_by_key(|member| member.id);
        if let Some(pair) = members.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(RegistryError::DuplicateMember(pair[0].id));
        }
        Ok(Self { members })
    }

    pub fn insert(&mut self, member: Member) -> Result<(), RegistryError> {
        match self.members.binary_search_by_key(&member.id, |m| m.id) {
            Ok(_) => Err(RegistryError::DuplicateMember(member.id)),
            Err(pos) => {
                self.members.insert(pos, member);
                Ok(())
            }
        }
    }

    pub fn find(&self, id: u64) -> Result<&Member, LookupError> {
        self.members
            .binary_search_by_key(&id, |m| m.id)
            .map(|pos| &self.members[pos])
            .map_err(|_| LookupError::UnknownMember(id))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of members in each segment of `field`.
    pub fn segment_counts(&self, field: SegmentField) -> BTreeMap<SegmentLabel, u64> {
        let mut counts = BTreeMap::new();
        for member in &self.members {
            *counts.entry(field.segment(member)).or_insert(0) += 1;
        }
        counts
    }

    /// Like [`segment_counts`](Self::segment_counts) but resolves the field by name.
    pub fn population_counts(&self, field: &str) -> Result<BTreeMap<SegmentLabel, u64>, LookupError> {
        Ok(self.segment_counts(field.parse()?))
    }

    pub fn classifier(&self, field: SegmentField) -> FieldClassifier<'_> {
        FieldClassifier {
            registry: self,
            field,
        }
    }
}

/// Classifies member ids by one field of the registry.
#[derive(Debug, Clone, Copy)]
pub struct FieldClassifier<'a> {
    registry: &'a PopulationRegistry,
    field: SegmentField,
}

impl FieldClassifier<'_> {
    pub fn field(&self) -> SegmentField {
        self.field
    }
}

impl Classifier for FieldClassifier<'_> {
    fn classify(&self, id: &Identifier) -> Result<SegmentLabel, LookupError> {
        match id {
            Identifier::Member(member_id) => {
                let member = self.registry.find(*member_id)?;
                Ok(self.field.segment(member))
            }
            Identifier::Name(name) => Err(LookupError::UnsupportedIdentifier {
                field: self.field.name().to_string(),
                id: name.clone(),
            }),
        }
    }
}

/// Treats vertex names as segment labels, as in a network already reduced
/// to segments.
#[derive(Debug, Clone, Default)]
pub struct LabelClassifier {
    known: Option<BTreeSet<SegmentLabel>>,
}

impl LabelClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any label outside `labels`.
    pub fn with_known_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SegmentLabel>,
    {
        Self {
            known: Some(labels.into_iter().map(Into::into).collect()),
        }
    }
}

impl Classifier for LabelClassifier {
    fn classify(&self, id: &Identifier) -> Result<SegmentLabel, LookupError> {
        let label = id.to_string();
        match &self.known {
            Some(known) if !known.contains(&label) => Err(LookupError::UnknownSegment(label)),
            _ => Ok(label),
        }
    }
}
