//! Core data types for the travel planner.
//!
//! This module defines the static country reference entries and the per-country
//! travel record with its structured, free-form and reserved sections. The
//! serialized shape uses camelCase keys so that persisted blobs and exported
//! files share one format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque country identifier, e.g. `"FR"`.
pub type CountryCode = String;

/// A country that can be planned on the globe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    /// Unique country code
    pub code: CountryCode,
    /// Display name
    pub name: String,
    /// Latitude of the marker in degrees
    pub lat: f64,
    /// Longitude of the marker in degrees
    pub lng: f64,
    /// Whether at least one plan for this country was confirmed saved
    pub planned: bool,
}

impl Country {
    /// Creates an unplanned country entry.
    pub fn new(code: &str, name: &str, lat: f64, lng: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            lat,
            lng,
            planned: false,
        }
    }
}

/// Flight booking details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Flights {
    /// Departure airport
    pub departure: String,
    /// Arrival airport
    pub arrival: String,
    /// Airline name
    pub airline: String,
    /// Ticket price
    pub price: f64,
    /// Confirmation number
    pub booking_reference: String,
}

/// Lodging details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Accommodation {
    pub hotel_name: String,
    pub address: String,
    pub check_in: String,
    pub check_out: String,
    /// Price per night
    pub price: f64,
    pub booking_reference: String,
}

/// Rental car details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RentalCar {
    pub company: String,
    pub vehicle_type: String,
    /// Price per day
    pub price: f64,
}

/// Public transit details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicTransit {
    /// Transit passes in the order the user entered them
    pub passes: Vec<String>,
    pub notes: String,
}

/// Ground transport details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Transportation {
    pub rental_car: RentalCar,
    pub public_transit: PublicTransit,
}

/// The structured section of a travel record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StandardTravel {
    pub flights: Flights,
    pub accommodation: Accommodation,
    pub transportation: Transportation,
}

/// The free-form section of a travel record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomDetails {
    pub attractions: Vec<String>,
    pub restaurants: Vec<String>,
    pub activities: Vec<String>,
    pub notes: String,
    pub budget: f64,
    /// Open extension mapping for fields the form does not know about
    pub custom_fields: serde_json::Map<String, serde_json::Value>,
}

/// Reserved for automated suggestions; always empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AiGenerated {
    pub suggestions: Vec<String>,
    pub last_generated: String,
}

/// All trip-planning data associated with one country.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TravelRecord {
    pub country_code: CountryCode,
    pub country_name: String,
    /// Time of the last mutation
    pub last_updated: DateTime<Utc>,
    pub standard_travel: StandardTravel,
    pub custom_details: CustomDetails,
    pub ai_generated: AiGenerated,
}

impl TravelRecord {
    /// Creates a record with every field empty, stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `country_code` - Code of the country the record belongs to
    /// * `country_name` - Display name of that country
    pub fn empty(country_code: &str, country_name: &str) -> Self {
        Self {
            country_code: country_code.to_string(),
            country_name: country_name.to_string(),
            last_updated: Utc::now(),
            ..Default::default()
        }
    }

    /// Stamps the current time as the last update.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Returns true when `other` holds the same travel data, ignoring `last_updated`.
    pub fn same_content(&self, other: &TravelRecord) -> bool {
        self.country_code == other.country_code
            && self.country_name == other.country_name
            && self.standard_travel == other.standard_travel
            && self.custom_details == other.custom_details
            && self.ai_generated == other.ai_generated
    }
}
