use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("at least one adult (ADT) is required when traveling with children or infants")]
    AdultRequired,

    #[error("return_date is required for round_trip")]
    ReturnDateRequired,

    #[error("return_date must not be before departure_date")]
    ReturnBeforeDeparture,

    #[error("{field} must be a 3-letter IATA code, got {value:?}")]
    InvalidLocation { field: &'static str, value: String },

    #[error("{field} must be YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, got {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("passenger count for {0} must be at least 1")]
    InvalidPassengerCount(PassengerType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PassengerType {
    #[serde(rename = "ADT")]
    Adult,
    #[serde(rename = "CNN")]
    Child,
    #[serde(rename = "C06")]
    ChildAgeSix,
    #[serde(rename = "INF")]
    Infant,
}

impl PassengerType {
    pub fn code(&self) -> &'static str {
        match self {
            PassengerType::Adult => "ADT",
            PassengerType::Child => "CNN",
            PassengerType::ChildAgeSix => "C06",
            PassengerType::Infant => "INF",
        }
    }
}

impl std::fmt::Display for PassengerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PassengerCount {
    #[serde(rename = "type")]
    pub passenger_type: PassengerType,
    pub count: u32,
}

// Inbound search parameters as posted by the caller
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlightSearchRequest {
    pub trip_type: TripType,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(default)]
    pub passengers: Vec<PassengerCount>,
}

impl FlightSearchRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_location("origin", &self.origin)?;
        validate_location("destination", &self.destination)?;
        let departure = parse_date("departure_date", &self.departure_date)?;

        if self.trip_type == TripType::RoundTrip {
            let return_date = self
                .return_date
                .as_deref()
                .filter(|date| !date.is_empty())
                .ok_or(ValidationError::ReturnDateRequired)?;
            if parse_date("return_date", return_date)? < departure {
                return Err(ValidationError::ReturnBeforeDeparture);
            }
        }

        if let Some(p) = self.passengers.iter().find(|p| p.count == 0) {
            return Err(ValidationError::InvalidPassengerCount(p.passenger_type));
        }

        let has_adult = self
            .passengers
            .iter()
            .any(|p| p.passenger_type == PassengerType::Adult);
        if !has_adult && !self.passengers.is_empty() {
            return Err(ValidationError::AdultRequired);
        }

        Ok(())
    }
}

fn validate_location(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidLocation {
            field,
            value: value.to_string(),
        })
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .map(|date_time| date_time.date())
        .or_else(|_| NaiveDate::parse_from_str(value, DATE_FORMAT))
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        })
}
