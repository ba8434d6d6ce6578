use crate::error::RegistryError;
use crate::member::Member;
use crate::population::PopulationRegistry;
use interseg_core::LookupError;
use std::io::BufRead;
use tracing::info;

const COLUMNS: [&str; 7] = [
    "id",
    "gender",
    "ethnicity",
    "major1",
    "school",
    "transfer",
    "first_term",
];

struct ColumnIndex {
    positions: [usize; 7],
}

impl ColumnIndex {
    fn from_headings(line: &str) -> Result<Self, LookupError> {
        let headings: Vec<String> = line.split('\t').map(|h| h.to_lowercase()).collect();
        let mut positions = [0usize; 7];
        for (slot, column) in COLUMNS.iter().enumerate() {
            positions[slot] = headings
                .iter()
                .position(|heading| heading == column)
                .ok_or_else(|| LookupError::MissingColumn(column.to_string()))?;
        }
        Ok(Self { positions })
    }

    fn field<'a>(&self, fields: &[&'a str], slot: usize, line: usize) -> Result<&'a str, RegistryError> {
        fields
            .get(self.positions[slot])
            .copied()
            .ok_or_else(|| RegistryError::InvalidRow {
                line,
                message: format!("missing {} column", COLUMNS[slot]),
            })
    }
}

impl PopulationRegistry {
    /// Reads a tab-separated member table whose first line holds the headings.
    ///
    /// Headings match case-insensitively and may appear in any order; extra
    /// columns are ignored.
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self, RegistryError> {
        let mut lines = reader.lines();
        let Some(headings) = lines.next().transpose()? else {
            return Ok(PopulationRegistry::new());
        };
        let columns = ColumnIndex::from_headings(&headings)?;

        let mut members = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            // headings are line 1
            let line_no = idx + 2;
            let fields: Vec<&str> = line.split('\t').collect();

            let raw_id = columns.field(&fields, 0, line_no)?;
            let id = raw_id.parse::<u64>().map_err(|_| RegistryError::InvalidRow {
                line: line_no,
                message: format!("invalid member id {:?}", raw_id),
            })?;
            let raw_transfer = columns.field(&fields, 5, line_no)?;
            let transfer = parse_flag(raw_transfer).ok_or_else(|| RegistryError::InvalidRow {
                line: line_no,
                message: format!("invalid transfer flag {:?}", raw_transfer),
            })?;
            let raw_term = columns.field(&fields, 6, line_no)?;
            let first_term = raw_term.parse::<u32>().map_err(|_| RegistryError::InvalidRow {
                line: line_no,
                message: format!("invalid first term {:?}", raw_term),
            })?;

            members.push(Member {
                id,
                gender: columns.field(&fields, 1, line_no)?.to_string(),
                ethnicity: columns.field(&fields, 2, line_no)?.to_string(),
                major1: columns.field(&fields, 3, line_no)?.to_string(),
                school: columns.field(&fields, 4, line_no)?.to_string(),
                transfer,
                first_term,
            });
        }

        let registry = PopulationRegistry::from_members(members)?;
        info!("read {} members from tsv", registry.len());
        Ok(registry)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "y" | "yes" => Some(true),
        "0" | "false" | "n" | "no" | "" => Some(false),
        _ => None,
    }
}
