//! Title page field extraction
//!
//! The M11 title page is the first table of the document's first section (the
//! root, before any heading). Each metadata field sits in a row whose first
//! cell holds the field label and whose second cell holds the value.
//!
//! Fields are independent: a label with no matching row yields the configured
//! not-found sentinel without affecting the other fields.

use crate::content::Table;
use crate::document::Document;
use crate::error::Result;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Known title page fields, in template order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TitlePageField {
    /// Full Title
    FullTitle,
    /// Trial Acronym
    TrialAcronym,
    /// Sponsor Protocol Identifier
    SponsorProtocolIdentifier,
    /// Original Protocol
    OriginalProtocol,
    /// Version Number
    VersionNumber,
    /// Version Date
    VersionDate,
    /// Amendment Identifier
    AmendmentIdentifier,
    /// Amendment Scope
    AmendmentScope,
    /// Compound Code(s)
    CompoundCodes,
    /// Compound Name(s)
    CompoundNames,
    /// Trial Phase
    TrialPhase,
    /// Short Title
    ShortTitle,
    /// Sponsor Name and Address
    SponsorNameAndAddress,
    /// Regulatory Agency Identifier Number(s)
    RegulatoryAgencyIdentifiers,
    /// Sponsor Approval Date
    SponsorApprovalDate,
}

impl TitlePageField {
    /// Every field, in template order
    pub const ALL: [Self; 15] = [
        Self::FullTitle,
        Self::TrialAcronym,
        Self::SponsorProtocolIdentifier,
        Self::OriginalProtocol,
        Self::VersionNumber,
        Self::VersionDate,
        Self::AmendmentIdentifier,
        Self::AmendmentScope,
        Self::CompoundCodes,
        Self::CompoundNames,
        Self::TrialPhase,
        Self::ShortTitle,
        Self::SponsorNameAndAddress,
        Self::RegulatoryAgencyIdentifiers,
        Self::SponsorApprovalDate,
    ];

    /// Row label as printed in the template
    #[must_use = "returns the field label"]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FullTitle => "Full Title",
            Self::TrialAcronym => "Trial Acronym",
            Self::SponsorProtocolIdentifier => "Sponsor Protocol Identifier",
            Self::OriginalProtocol => "Original Protocol",
            Self::VersionNumber => "Version Number",
            Self::VersionDate => "Version Date",
            Self::AmendmentIdentifier => "Amendment Identifier",
            Self::AmendmentScope => "Amendment Scope",
            Self::CompoundCodes => "Compound Code(s)",
            Self::CompoundNames => "Compound Name(s)",
            Self::TrialPhase => "Trial Phase",
            Self::ShortTitle => "Short Title",
            Self::SponsorNameAndAddress => "Sponsor Name and Address",
            Self::RegulatoryAgencyIdentifiers => "Regulatory Agency Identifier Number(s)",
            Self::SponsorApprovalDate => "Sponsor Approval Date",
        }
    }

    /// Machine key (`snake_case`)
    #[must_use = "returns the field key"]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::FullTitle => "full_title",
            Self::TrialAcronym => "trial_acronym",
            Self::SponsorProtocolIdentifier => "sponsor_protocol_identifier",
            Self::OriginalProtocol => "original_protocol",
            Self::VersionNumber => "version_number",
            Self::VersionDate => "version_date",
            Self::AmendmentIdentifier => "amendment_identifier",
            Self::AmendmentScope => "amendment_scope",
            Self::CompoundCodes => "compound_codes",
            Self::CompoundNames => "compound_names",
            Self::TrialPhase => "trial_phase",
            Self::ShortTitle => "short_title",
            Self::SponsorNameAndAddress => "sponsor_name_and_address",
            Self::RegulatoryAgencyIdentifiers => "regulatory_agency_identifiers",
            Self::SponsorApprovalDate => "sponsor_approval_date",
        }
    }
}

impl fmt::Display for TitlePageField {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TitlePageField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.key() == wanted || f.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown title page field: '{s}'"))
    }
}

/// Value of the first row whose first cell starts with `label` (case-insensitive)
#[must_use = "returns the matched value, if any"]
pub fn find_field(table: &Table, label: &str) -> Option<String> {
    let wanted = label.to_lowercase();
    table.rows.iter().find_map(|row| {
        let first = row.cells.first()?;
        let second = row.cells.get(1)?;
        first
            .text()
            .trim()
            .to_lowercase()
            .starts_with(&wanted)
            .then(|| second.text().trim().to_string())
    })
}

/// Reads fields from a document's title page table
#[derive(Debug, Clone, Copy)]
pub struct TitlePageExtractor<'a> {
    table: Option<&'a Table>,
    not_found: &'a str,
}

impl<'a> TitlePageExtractor<'a> {
    /// Locate the title page table: the first table in the first section
    #[must_use = "creates an extractor over the title page table"]
    pub fn new(document: &'a Document, not_found: &'a str) -> Self {
        let table = document.root().tables().next();
        if table.is_none() {
            log::debug!("No title page table found in first section");
        }
        Self { table, not_found }
    }

    /// Whether a title page table was found
    #[inline]
    #[must_use = "returns whether a title page table exists"]
    pub const fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Value for an arbitrary label, or the not-found sentinel
    #[must_use = "returns the field value or sentinel"]
    pub fn lookup(&self, label: &str) -> String {
        self.table
            .and_then(|t| find_field(t, label))
            .unwrap_or_else(|| self.not_found.to_string())
    }

    /// Extract every known field
    #[must_use = "returns the extracted title page"]
    pub fn extract(&self) -> TitlePage {
        let mut values = BTreeMap::new();
        for field in TitlePageField::ALL {
            let value = self.table.and_then(|t| find_field(t, field.label()));
            if value.is_none() {
                log::debug!("Title page field '{field}' not found");
            }
            values.insert(field, value);
        }
        TitlePage {
            values,
            not_found: self.not_found.to_string(),
        }
    }
}

/// Extracted title page values keyed by field
///
/// Serializes as a map of field key to value, with the sentinel for fields
/// that were not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitlePage {
    values: BTreeMap<TitlePageField, Option<String>>,
    not_found: String,
}

impl TitlePage {
    /// Value for `field`, or the not-found sentinel
    #[must_use = "returns the field value or sentinel"]
    pub fn get(&self, field: TitlePageField) -> &str {
        self.values
            .get(&field)
            .and_then(Option::as_deref)
            .unwrap_or(self.not_found.as_str())
    }

    /// Whether `field` was found in the table
    #[must_use = "returns whether the field was found"]
    pub fn is_found(&self, field: TitlePageField) -> bool {
        self.values.get(&field).is_some_and(Option::is_some)
    }

    /// Fields and values in template order
    pub fn iter(&self) -> impl Iterator<Item = (TitlePageField, &str)> {
        self.values
            .iter()
            .map(|(f, v)| (*f, v.as_deref().unwrap_or(self.not_found.as_str())))
    }

    /// Field key → value mapping
    #[must_use = "returns the field map"]
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        self.iter().map(|(f, v)| (f.key(), v.to_string())).collect()
    }

    /// Serialize to pretty JSON keyed by field key
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for TitlePage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
