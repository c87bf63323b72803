//! Column schemas for structured room data

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker written for fields the listing text does not mention
pub const NOT_AVAILABLE: &str = "N/A";

const STANDARD_COLUMNS: &[&str] = &[
    "hotel_name",
    "room_name",
    "room_type",
    "description",
    "size",
    "view",
    "bed_type",
];

const EXTENDED_COLUMNS: &[&str] = &[
    "hotel_name",
    "room_name",
    "room_type",
    "description",
    "amenities",
    "price",
    "size",
    "occupancy",
    "view",
    "bed_type",
];

/// Fixed column layout requested from the structurer
///
/// `Standard` is canonical. `Extended` adds amenities, price and occupancy and
/// is only used when selected explicitly in the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomSchema {
    #[default]
    Standard,
    Extended,
}

impl RoomSchema {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Standard => STANDARD_COLUMNS,
            Self::Extended => EXTENDED_COLUMNS,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Comma-separated header line, e.g. `hotel_name,room_name,...`
    pub fn header_line(&self) -> String {
        self.columns().join(",")
    }

    /// Instruction for the extract-vs-navigate decision
    pub fn classifier_instruction(&self) -> String {
        let fields = match self {
            Self::Standard => {
                "hotel name, room name, room type, description, size, view, bed type"
            }
            Self::Extended => {
                "hotel name, room name, room type, description, amenities, price, size, occupancy, view, bed type"
            }
        };

        format!(
            "You are a focused web scraping assistant. Your goal is to find hotel room names and details.\n\
             If you see room information on the current page, extract it. If not, suggest where to look next on the site.\n\
             Keep responses brief and direct. Make sure to extract ALL accommodation types (rooms, suites, apartments, etc.)\n\
             Return {}.",
            fields
        )
    }

    /// Instruction for turning listing text into CSV rows
    pub fn structurer_instruction(&self) -> String {
        format!(
            "You are a data structuring assistant. Convert the hotel room information into a CSV format with the following fields:\n\
             {}\n\n\
             If any field is not available, use '{}'. Keep the data clean and consistent.\n\
             Only respond with the CSV data, no additional text.",
            self.header_line(),
            NOT_AVAILABLE
        )
    }
}

impl fmt::Display for RoomSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Extended => f.write_str("extended"),
        }
    }
}
