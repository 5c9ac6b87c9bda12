use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Stable listing identifier, taken from the detail-page path segment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named columns of a property record, in persisted order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Url,
    Price,
    Location,
    Station,
    Area,
    FloorPlan,
    Balcony,
    BuiltDate,
    Company,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Id,
        Field::Name,
        Field::Url,
        Field::Price,
        Field::Location,
        Field::Station,
        Field::Area,
        Field::FloorPlan,
        Field::Balcony,
        Field::BuiltDate,
        Field::Company,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Url => "url",
            Field::Price => "price",
            Field::Location => "location",
            Field::Station => "station",
            Field::Area => "area",
            Field::FloorPlan => "floor_plan",
            Field::Balcony => "balcony",
            Field::BuiltDate => "built_date",
            Field::Company => "company",
        }
    }

    /// Column header matching `Field::ALL`
    pub fn header() -> Vec<String> {
        Self::ALL.iter().map(|f| f.as_str().to_string()).collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One listing observation from a search-results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: PropertyId,
    pub name: String,
    pub url: String,
    pub price: String,
    pub location: String,
    pub station: String,
    pub area: String,
    pub floor_plan: String,
    pub balcony: String,
    pub built_date: String,
    pub company: String,
}

impl PropertyRecord {
    /// Raw text of the given column
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => self.id.as_str(),
            Field::Name => &self.name,
            Field::Url => &self.url,
            Field::Price => &self.price,
            Field::Location => &self.location,
            Field::Station => &self.station,
            Field::Area => &self.area,
            Field::FloorPlan => &self.floor_plan,
            Field::Balcony => &self.balcony,
            Field::BuiltDate => &self.built_date,
            Field::Company => &self.company,
        }
    }
}

/// Ordered table of records captured at one point in time.
///
/// Duplicate ids are allowed. Id-level views collapse them, and lookups
/// resolve to the first occurrence in insertion order.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<PropertyRecord>,
    captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(records: Vec<PropertyRecord>) -> Self {
        Self::with_capture_time(records, Utc::now())
    }

    pub fn with_capture_time(records: Vec<PropertyRecord>, captured_at: DateTime<Utc>) -> Self {
        Self {
            records,
            captured_at,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn capture_time(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct ids, sorted
    pub fn ids(&self) -> BTreeSet<&PropertyId> {
        self.records.iter().map(|r| &r.id).collect()
    }

    /// First record for each id
    pub fn index(&self) -> HashMap<&PropertyId, &PropertyRecord> {
        let mut index = HashMap::with_capacity(self.records.len());
        for record in &self.records {
            index.entry(&record.id).or_insert(record);
        }
        index
    }
}
