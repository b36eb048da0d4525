// Bargain Finder Max search payload built from the caller's trip parameters.

use serde::Serialize;

use crate::search_request::{FlightSearchRequest, TripType};

pub const REQUEST_VERSION: &str = "5";
pub const DEFAULT_ITINERARY_REQUEST_TYPE: &str = "50ITINS";
const AIRPORT_LOCATION_TYPE: &str = "A";
const REQUESTOR_COMPANY_CODE: &str = "TN";
const BAGGAGE_REQUEST_TYPE: &str = "C";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierSearchRequest {
    #[serde(rename = "OTA_AirLowFareSearchRQ")]
    pub low_fare_search: AirLowFareSearchRq,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirLowFareSearchRq {
    pub version: String,
    #[serde(rename = "POS")]
    pub pos: Pos,
    pub origin_destination_information: Vec<OriginDestination>,
    pub travel_preferences: TravelPreferences,
    pub traveler_info_summary: TravelerInfoSummary,
    #[serde(rename = "TPA_Extensions")]
    pub tpa_extensions: TpaExtensions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pos {
    pub source: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Source {
    pub pseudo_city_code: String,
    #[serde(rename = "RequestorID")]
    pub requestor_id: RequestorId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestorId {
    #[serde(rename = "Type")]
    pub requestor_type: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub company_name: CompanyName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyName {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginDestination {
    pub departure_date_time: String,
    pub origin_location: RequestLocation,
    pub destination_location: RequestLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestLocation {
    pub location_code: String,
    pub location_type: String,
}

impl RequestLocation {
    fn airport(code: &str) -> Self {
        Self {
            location_code: code.to_string(),
            location_type: AIRPORT_LOCATION_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelPreferences {
    pub baggage: BaggagePreference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaggagePreference {
    pub carry_on_info: bool,
    pub description: bool,
    pub request_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelerInfoSummary {
    pub air_traveler_avail: Vec<AirTravelerAvail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirTravelerAvail {
    pub passenger_type_quantity: Vec<PassengerTypeQuantity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PassengerTypeQuantity {
    pub code: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TpaExtensions {
    pub intelli_sell_transaction: IntelliSellTransaction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntelliSellTransaction {
    pub request_type: RequestType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestType {
    pub name: String,
}

/// Composes the supplier payload. Expects a request that already passed validation.
pub fn compose(
    request: &FlightSearchRequest,
    pseudo_city_code: &str,
    itinerary_request_type: &str,
) -> SupplierSearchRequest {
    let mut origin_destination_information = vec![OriginDestination {
        departure_date_time: departure_date_time(&request.departure_date),
        origin_location: RequestLocation::airport(&request.origin),
        destination_location: RequestLocation::airport(&request.destination),
    }];

    if request.trip_type == TripType::RoundTrip {
        origin_destination_information.push(OriginDestination {
            departure_date_time: departure_date_time(
                request.return_date.as_deref().unwrap_or_default(),
            ),
            origin_location: RequestLocation::airport(&request.destination),
            destination_location: RequestLocation::airport(&request.origin),
        });
    }

    let passenger_type_quantity = request
        .passengers
        .iter()
        .map(|p| PassengerTypeQuantity {
            code: p.passenger_type.code().to_string(),
            quantity: p.count,
        })
        .collect();

    SupplierSearchRequest {
        low_fare_search: AirLowFareSearchRq {
            version: REQUEST_VERSION.to_string(),
            pos: Pos {
                source: vec![Source {
                    pseudo_city_code: pseudo_city_code.to_string(),
                    requestor_id: RequestorId {
                        requestor_type: "1".to_string(),
                        id: "1".to_string(),
                        company_name: CompanyName {
                            code: REQUESTOR_COMPANY_CODE.to_string(),
                        },
                    },
                }],
            },
            origin_destination_information,
            travel_preferences: TravelPreferences {
                baggage: BaggagePreference {
                    carry_on_info: true,
                    description: true,
                    request_type: BAGGAGE_REQUEST_TYPE.to_string(),
                },
            },
            traveler_info_summary: TravelerInfoSummary {
                air_traveler_avail: vec![AirTravelerAvail {
                    passenger_type_quantity,
                }],
            },
            tpa_extensions: TpaExtensions {
                intelli_sell_transaction: IntelliSellTransaction {
                    request_type: RequestType {
                        name: itinerary_request_type.to_string(),
                    },
                },
            },
        },
    }
}

// The supplier expects a full local date-time; bare dates start at midnight.
fn departure_date_time(date: &str) -> String {
    if date.contains('T') {
        date.to_string()
    } else {
        format!("{}T00:00:00", date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_request::{PassengerCount, PassengerType};

    fn request(trip_type: TripType) -> FlightSearchRequest {
        FlightSearchRequest {
            trip_type,
            origin: "ADD".to_string(),
            destination: "NBO".to_string(),
            departure_date: "2025-03-16".to_string(),
            return_date: Some("2025-03-20".to_string()),
            passengers: vec![
                PassengerCount {
                    passenger_type: PassengerType::Adult,
                    count: 2,
                },
                PassengerCount {
                    passenger_type: PassengerType::Child,
                    count: 1,
                },
            ],
        }
    }

    #[test]
    fn test_one_way_has_single_origin_destination() {
        let composed = compose(&request(TripType::OneWay), "A1B2", DEFAULT_ITINERARY_REQUEST_TYPE);
        let pairs = &composed.low_fare_search.origin_destination_information;

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].origin_location.location_code, "ADD");
        assert_eq!(pairs[0].destination_location.location_code, "NBO");
        assert_eq!(pairs[0].departure_date_time, "2025-03-16T00:00:00");
    }

    #[test]
    fn test_round_trip_adds_inverted_return() {
        let composed = compose(&request(TripType::RoundTrip), "A1B2", DEFAULT_ITINERARY_REQUEST_TYPE);
        let pairs = &composed.low_fare_search.origin_destination_information;

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].origin_location.location_code, "NBO");
        assert_eq!(pairs[1].destination_location.location_code, "ADD");
        assert!(pairs[1].departure_date_time.starts_with("2025-03-20"));
        assert_eq!(pairs[1].origin_location.location_type, "A");
    }

    #[test]
    fn test_passengers_are_mirrored() {
        let composed = compose(&request(TripType::OneWay), "A1B2", DEFAULT_ITINERARY_REQUEST_TYPE);
        let quantities =
            &composed.low_fare_search.traveler_info_summary.air_traveler_avail[0].passenger_type_quantity;

        assert_eq!(
            quantities,
            &vec![
                PassengerTypeQuantity {
                    code: "ADT".to_string(),
                    quantity: 2
                },
                PassengerTypeQuantity {
                    code: "CNN".to_string(),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let mut req = request(TripType::OneWay);
        req.departure_date = "2025-03-16T09:30:00".to_string();
        let composed = compose(&req, "A1B2", "100ITINS");
        let value = serde_json::to_value(&composed).unwrap();
        let rq = &value["OTA_AirLowFareSearchRQ"];

        assert_eq!(rq["Version"], "5");
        assert_eq!(rq["POS"]["Source"][0]["PseudoCityCode"], "A1B2");
        assert_eq!(rq["POS"]["Source"][0]["RequestorID"]["CompanyName"]["Code"], "TN");
        assert_eq!(
            rq["OriginDestinationInformation"][0]["DepartureDateTime"],
            "2025-03-16T09:30:00"
        );
        assert_eq!(rq["TravelPreferences"]["Baggage"]["RequestType"], "C");
        assert_eq!(
            rq["TPA_Extensions"]["IntelliSellTransaction"]["RequestType"]["Name"],
            "100ITINS"
        );
    }
}
