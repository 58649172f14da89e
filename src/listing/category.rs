/// Listing categories and their field tables
///
/// Each category is described by an ordered table of fields. The order is
/// the column order of the exported tables; derived rules may only refer to
/// fields that appear earlier in the same table.
use std::fmt;
use std::str::FromStr;

/// Column names shared by all categories
pub mod fields {
    pub const TITLE: &str = "title";
    pub const BRAND: &str = "brand";
    pub const YEAR: &str = "year";
    pub const PRICE: &str = "price";
    pub const DISTANCE: &str = "distance";
    pub const TRANSMISSION: &str = "transmission";
    pub const FUEL_TYPE: &str = "fuel_type";
    pub const ADDRESS: &str = "address";
    pub const OWNER: &str = "owner";
}

use fields::*;

/// Structural element of a listing card that a field reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The card's main heading
    Heading,
    /// The advertised price
    Price,
    /// The seller byline
    Byline,
}

/// How the value of one field is obtained from a listing card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Trimmed text of the marker element
    Text(Marker),
    /// Trimmed text of the link inside the marker element, or of the element itself
    LinkedText(Marker),
    /// First whitespace-delimited token of an earlier field
    FirstToken(&'static str),
    /// First 19xx/20xx token of an earlier field
    Year(&'static str),
    /// Text of the n-th attribute element of the card
    Attribute(usize),
    /// Town and province joined by a single space
    Address,
}

/// One entry of a category field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
}

const fn spec(name: &'static str, rule: FieldRule) -> FieldSpec {
    FieldSpec { name, rule }
}

const VEHICLE_FIELDS: &[FieldSpec] = &[
    spec(TITLE, FieldRule::LinkedText(Marker::Heading)),
    spec(BRAND, FieldRule::FirstToken(TITLE)),
    spec(YEAR, FieldRule::Year(TITLE)),
    spec(PRICE, FieldRule::Text(Marker::Price)),
    spec(DISTANCE, FieldRule::Attribute(0)),
    spec(TRANSMISSION, FieldRule::Attribute(1)),
    spec(FUEL_TYPE, FieldRule::Attribute(2)),
    spec(ADDRESS, FieldRule::Address),
];

const MOTORCYCLE_FIELDS: &[FieldSpec] = &[
    spec(TITLE, FieldRule::LinkedText(Marker::Heading)),
    spec(BRAND, FieldRule::FirstToken(TITLE)),
    spec(YEAR, FieldRule::Year(TITLE)),
    spec(PRICE, FieldRule::Text(Marker::Price)),
    spec(DISTANCE, FieldRule::Attribute(0)),
    spec(ADDRESS, FieldRule::Address),
];

// Rental cards have no separate title: the heading itself is the brand.
const RENTAL_FIELDS: &[FieldSpec] = &[
    spec(BRAND, FieldRule::LinkedText(Marker::Heading)),
    spec(YEAR, FieldRule::Year(BRAND)),
    spec(PRICE, FieldRule::Text(Marker::Price)),
    spec(ADDRESS, FieldRule::Address),
    spec(OWNER, FieldRule::LinkedText(Marker::Byline)),
];

/// Listing family scraped from its own index URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Vehicles for sale
    Vehicles,
    /// Motorcycles and scooters
    Motorcycles,
    /// Car rentals
    Rentals,
}

impl Category {
    /// Returns all categories in export order
    pub fn all() -> [Self; 3] {
        [Self::Vehicles, Self::Motorcycles, Self::Rentals]
    }

    /// Stable lowercase name, used for file names and the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Motorcycles => "motorcycles",
            Self::Rentals => "rentals",
        }
    }

    /// Parses a category from its lowercase name
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "vehicles" => Some(Self::Vehicles),
            "motorcycles" => Some(Self::Motorcycles),
            "rentals" => Some(Self::Rentals),
            _ => None,
        }
    }

    /// The ordered field table of this category
    pub fn field_specs(&self) -> &'static [FieldSpec] {
        match self {
            Self::Vehicles => VEHICLE_FIELDS,
            Self::Motorcycles => MOTORCYCLE_FIELDS,
            Self::Rentals => RENTAL_FIELDS,
        }
    }

    /// Field names in column order
    pub fn fields(&self) -> Vec<&'static str> {
        self.field_specs().iter().map(|spec| spec.name).collect()
    }

    /// Column index of a field, if the category has it
    pub fn position(&self, field: &str) -> Option<usize> {
        self.field_specs().iter().position(|spec| spec.name == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.position(field).is_some()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(&s.to_ascii_lowercase()).ok_or_else(|| {
            format!(
                "unknown category '{}' (expected vehicles, motorcycles or rentals)",
                s
            )
        })
    }
}
