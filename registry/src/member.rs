use rkyv::{Archive, Deserialize, Serialize};

/// One person in the population registry.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
#[archive(check_bytes)]
pub struct Member {
    pub id: u64,
    pub gender: String,
    pub ethnicity: String,
    pub major1: String,
    pub school: String,
    pub transfer: bool,
    /// Term code such as `201409`; the first four digits are the year.
    pub first_term: u32,
}

impl Member {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            gender: String::new(),
            ethnicity: String::new(),
            major1: String::new(),
            school: String::new(),
            transfer: false,
            first_term: 0,
        }
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    pub fn with_ethnicity(mut self, ethnicity: impl Into<String>) -> Self {
        self.ethnicity = ethnicity.into();
        self
    }

    pub fn with_major1(mut self, major1: impl Into<String>) -> Self {
        self.major1 = major1.into();
        self
    }

    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = school.into();
        self
    }

    pub fn with_transfer(mut self, transfer: bool) -> Self {
        self.transfer = transfer;
        self
    }

    pub fn with_first_term(mut self, first_term: u32) -> Self {
        self.first_term = first_term;
        self
    }
}
