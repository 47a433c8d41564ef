use crate::errors::{AppError, ResultExt};
use crate::models::Institution;
use regex::Regex;
use std::sync::OnceLock;

// ============ CSV Ingestion ============

/// Canonical attributes of an institution record. Published CSV revisions
/// disagree on header spelling (all-caps exports vs title-case exports), so
/// headers are normalized case-insensitively onto this set.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Name,
    Type,
    City,
    Province,
    Region,
    Website,
    Contact,
}

fn column_for_header(header: &str) -> Option<Column> {
    match header.trim().to_lowercase().as_str() {
        "institution name" | "name" => Some(Column::Name),
        "institution type" | "type" => Some(Column::Type),
        "municipality" | "city" => Some(Column::City),
        "province" => Some(Column::Province),
        "region" => Some(Column::Region),
        "website address" | "website" => Some(Column::Website),
        "telephone no" | "telephone" => Some(Column::Contact),
        _ => None,
    }
}

/// Parses CSV bytes into normalized institution records.
///
/// Rows without a name are skipped (the dataset carries section separators
/// and blank padding rows). When a sheet repeats a logical column under two
/// header spellings, the first non-empty cell wins. Unknown columns are
/// ignored.
pub fn parse_records(data: &[u8]) -> Result<Vec<Institution>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let columns: Vec<Option<Column>> = reader
        .headers()?
        .iter()
        .map(column_for_header)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;

        let mut name = None;
        let mut institution_type = None;
        let mut city = None;
        let mut province = None;
        let mut region = None;
        let mut website = None;
        let mut contact = None;

        for (idx, value) in row.iter().enumerate() {
            let Some(Some(column)) = columns.get(idx) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let slot = match column {
                Column::Name => &mut name,
                Column::Type => &mut institution_type,
                Column::City => &mut city,
                Column::Province => &mut province,
                Column::Region => &mut region,
                Column::Website => &mut website,
                Column::Contact => &mut contact,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }

        let Some(name) = name else {
            continue;
        };

        records.push(Institution {
            name,
            institution_type,
            city,
            province,
            region,
            website,
            contact,
        });
    }

    Ok(records)
}

// ============ Store ============

/// In-memory institution dataset, written exactly once at startup and read
/// by every request afterwards.
///
/// Records are published through a `OnceLock`, so readiness flips atomically:
/// concurrent readers either observe the complete dataset or "not ready",
/// never a partially filled sequence. No locking is needed after the flip.
#[derive(Default)]
pub struct InstitutionStore {
    records: OnceLock<Vec<Institution>>,
}

impl InstitutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the CSV at `path`, then publishes the records.
    ///
    /// A failure here leaves the store not-ready; the process keeps serving
    /// in a degraded state and dependent endpoints report 503.
    pub async fn load(&self, path: &str) -> Result<usize, AppError> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read institution CSV at {}", path))?;
        let records = parse_records(&data)?;
        self.publish(records)
    }

    /// Publishes the full record sequence and flips readiness. Single-shot:
    /// a second publish is a logic error and is rejected.
    pub fn publish(&self, records: Vec<Institution>) -> Result<usize, AppError> {
        let count = records.len();
        self.records
            .set(records)
            .map_err(|_| AppError::InternalError("Institution store already loaded".to_string()))?;
        Ok(count)
    }

    pub fn is_ready(&self) -> bool {
        self.records.get().is_some()
    }

    pub fn count(&self) -> usize {
        self.records.get().map_or(0, |r| r.len())
    }

    /// The published records, or `None` before ingestion completes.
    pub fn snapshot(&self) -> Option<&[Institution]> {
        self.records.get().map(|r| r.as_slice())
    }

    /// Case-insensitive substring filter on the name field only, used by the
    /// listing endpoint. A blank needle matches everything.
    pub fn filter_by_name(&self, needle: &str) -> Vec<&Institution> {
        let needle = needle.trim().to_lowercase();
        let Some(records) = self.snapshot() else {
            return Vec::new();
        };
        records
            .iter()
            .filter(|inst| inst.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Keyword search over the name, city, and region fields, used by the
    /// local fallback responder.
    ///
    /// Free text like "tell me about metro city" has to find the record with
    /// city "Metro City", so matching runs in both directions: a record
    /// scores when the query contains a whole field value, or when a query
    /// token of at least four characters appears inside a field. Matches are
    /// returned in store order.
    pub fn search(&self, query: &str) -> Vec<&Institution> {
        let Some(records) = self.snapshot() else {
            return Vec::new();
        };
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let token_re = Regex::new(r"[a-z0-9]{4,}").unwrap();
        let tokens: Vec<&str> = token_re.find_iter(&query).map(|m| m.as_str()).collect();

        records
            .iter()
            .filter(|inst| match_score(inst, &query, &tokens) > 0)
            .collect()
    }
}

/// Scores one record against a lowercased query and its extracted tokens.
/// Whole-field containment outweighs single token hits; zero means no match.
fn match_score(inst: &Institution, query: &str, tokens: &[&str]) -> u32 {
    let mut score = 0;
    let fields = [
        Some(inst.name.as_str()),
        inst.city.as_deref(),
        inst.region.as_deref(),
    ];
    for field in fields.into_iter().flatten() {
        let field = field.to_lowercase();
        // Length floor keeps two-letter region codes from matching noise.
        if field.len() >= 3 && query.contains(&field) {
            score += 2;
        }
        for token in tokens {
            if field.contains(token) {
                score += 1;
            }
        }
    }
    score
}
