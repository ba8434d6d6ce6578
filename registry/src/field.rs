use crate::member::Member;
use interseg_core::{LookupError, SegmentLabel};
use std::fmt;
use std::str::FromStr;

pub const ALL_SEGMENT: &str = "all";

/// Attribute of a member that partitions the population into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentField {
    All,
    Gender,
    Ethnicity,
    Major1,
    School,
    Transfer,
    FirstYear,
}

impl SegmentField {
    pub const VARIANTS: [SegmentField; 7] = [
        SegmentField::All,
        SegmentField::Gender,
        SegmentField::Ethnicity,
        SegmentField::Major1,
        SegmentField::School,
        SegmentField::Transfer,
        SegmentField::FirstYear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SegmentField::All => "all",
            SegmentField::Gender => "gender",
            SegmentField::Ethnicity => "ethnicity",
            SegmentField::Major1 => "major1",
            SegmentField::School => "school",
            SegmentField::Transfer => "transfer",
            SegmentField::FirstYear => "first_year",
        }
    }

    pub fn segment(self, member: &Member) -> SegmentLabel {
        match self {
            SegmentField::All => ALL_SEGMENT.to_string(),
            SegmentField::Gender => member.gender.clone(),
            SegmentField::Ethnicity => member.ethnicity.clone(),
            SegmentField::Major1 => member.major1.clone(),
            SegmentField::School => member.school.clone(),
            SegmentField::Transfer => {
                if member.transfer {
                    "Transfer".to_string()
                } else {
                    "Non-transfer".to_string()
                }
            }
            SegmentField::FirstYear => (member.first_term / 100).to_string(),
        }
    }
}

impl fmt::Display for SegmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SegmentField {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SegmentField::VARIANTS
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| LookupError::UnknownField(s.to_string()))
    }
}
