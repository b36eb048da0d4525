use serde::{Deserialize, Deserializer, Serialize};

// Data structures for the supplier's grouped itinerary response.
// Every table is keyed by small integer ids local to one response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupplierResponse {
    pub grouped_itinerary_response: GroupedItineraryResponse,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupedItineraryResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub messages: Vec<SupplierMessage>,
    pub statistics: Statistics,
    #[serde(deserialize_with = "null_as_default")]
    pub schedule_descs: Vec<ScheduleDesc>,
    #[serde(deserialize_with = "null_as_default")]
    pub baggage_allowance_descs: Vec<BaggageAllowanceDesc>,
    #[serde(deserialize_with = "null_as_default")]
    pub baggage_charge_descs: Vec<BaggageChargeDesc>,
    #[serde(deserialize_with = "null_as_default")]
    pub fare_component_descs: Vec<FareComponentDesc>,
    #[serde(deserialize_with = "null_as_default")]
    pub leg_descs: Vec<LegDesc>,
    #[serde(deserialize_with = "null_as_default")]
    pub itinerary_groups: Vec<ItineraryGroup>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupplierMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub message_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

impl SupplierMessage {
    pub fn is_error(&self) -> bool {
        self.severity == "Error"
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub itinerary_count: u32,
}

/// A `{"ref": n}` pointer into one of the description tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reference {
    #[serde(rename = "ref")]
    pub id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleDesc {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    pub stop_count: u32,
    #[serde(rename = "eTicketable")]
    pub e_ticketable: bool,
    pub total_miles_flown: u32,
    pub elapsed_time: u32,
    pub departure: ScheduleEndpoint,
    pub arrival: ScheduleEndpoint,
    pub carrier: Carrier,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleEndpoint {
    #[serde(deserialize_with = "null_as_default")]
    pub airport: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_adjustment: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Carrier {
    #[serde(deserialize_with = "null_as_default")]
    pub marketing: String,
    pub marketing_flight_number: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub operating: String,
    pub operating_flight_number: u32,
    pub equipment: Equipment,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Equipment {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_for_first_leg: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_for_last_leg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaggageAllowanceDesc {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description2: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaggageChargeDesc {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equivalent_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equivalent_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_piece: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_piece: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description2: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FareComponentDesc {
    pub id: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub governing_carrier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare_basis_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub segments: Vec<FareComponentDescSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FareComponentDescSegment {
    pub segment: SurchargeSegment,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurchargeSegment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopover: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub surcharges: Vec<Surcharge>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Surcharge {
    pub amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub surcharge_type: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegDesc {
    pub id: u32,
    pub elapsed_time: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub schedules: Vec<Reference>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItineraryGroup {
    pub group_description: GroupDescription,
    #[serde(deserialize_with = "null_as_default")]
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupDescription {
    #[serde(deserialize_with = "null_as_default")]
    pub leg_descriptions: Vec<LegDescription>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegDescription {
    #[serde(deserialize_with = "null_as_default")]
    pub departure_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub departure_location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub arrival_location: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Itinerary {
    pub id: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub pricing_source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legs: Vec<Reference>,
    #[serde(deserialize_with = "null_as_default")]
    pub pricing_information: Vec<PricingInformation>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingInformation {
    #[serde(deserialize_with = "null_as_default")]
    pub pricing_subsource: String,
    pub fare: Fare,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fare {
    #[serde(deserialize_with = "null_as_default")]
    pub validating_carrier_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub governing_carriers: String,
    #[serde(rename = "eTicketable")]
    pub e_ticketable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub last_ticket_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_ticket_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub passenger_info_list: Vec<PassengerInfoEntry>,
    pub total_fare: TotalFare,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TotalFare {
    pub total_price: f64,
    pub total_tax_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    pub base_fare_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub base_fare_currency: String,
    pub equivalent_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub equivalent_currency: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PassengerInfoEntry {
    pub passenger_info: PassengerInfo,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PassengerInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub passenger_type: String,
    pub passenger_number: u32,
    pub non_refundable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub fare_components: Vec<PassengerFareComponent>,
    pub passenger_total_fare: PassengerTotalFare,
    #[serde(deserialize_with = "null_as_default")]
    pub baggage_information: Vec<BaggageInformation>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PassengerFareComponent {
    #[serde(rename = "ref")]
    pub id: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub begin_airport: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_airport: String,
    #[serde(deserialize_with = "null_as_default")]
    pub segments: Vec<FareSegmentEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FareSegmentEntry {
    pub segment: FareSegment,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FareSegment {
    #[serde(deserialize_with = "null_as_default")]
    pub booking_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cabin_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meal_code: String,
    pub seats_available: u32,
    pub availability_break: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PassengerTotalFare {
    pub total_fare: f64,
    pub total_tax_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    pub base_fare_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub base_fare_currency: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaggageInformation {
    #[serde(deserialize_with = "null_as_default")]
    pub provision_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub airline_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub segments: Vec<SegmentPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowance: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<Reference>,
}

impl BaggageInformation {
    /// Provision type `C` marks a paid entitlement; everything else is an allowance.
    pub fn is_charge(&self) -> bool {
        self.provision_type == "C"
    }
}

/// Zero-based position of a segment within the itinerary's flattened schedule sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SegmentPosition {
    pub id: usize,
}

// Explicit nulls read as the zero value, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_response() {
        let json = r#"{
            "groupedItineraryResponse": {
                "version": "6.1.0",
                "statistics": { "itineraryCount": 1 },
                "scheduleDescs": [
                    {
                        "id": 1,
                        "stopCount": 0,
                        "eTicketable": true,
                        "departure": { "airport": "ADD", "time": "08:30:00+03:00" },
                        "arrival": { "airport": "NBO", "time": "10:45:00+03:00" },
                        "carrier": { "marketing": "ET", "marketingFlightNumber": 308 }
                    }
                ],
                "baggageInformationUnused": true
            }
        }"#;

        let response: SupplierResponse = serde_json::from_str(json).unwrap();
        let grouped = response.grouped_itinerary_response;
        assert_eq!(grouped.statistics.itinerary_count, 1);
        assert_eq!(grouped.schedule_descs.len(), 1);

        let schedule = &grouped.schedule_descs[0];
        assert!(schedule.e_ticketable);
        assert_eq!(schedule.carrier.marketing_flight_number, 308);
        assert_eq!(schedule.departure.airport, "ADD");
        assert!(grouped.itinerary_groups.is_empty());
    }

    #[test]
    fn test_baggage_information_provision_type() {
        let json = r#"{
            "provisionType": "C",
            "airlineCode": "ET",
            "segments": [{ "id": 0 }, { "id": 1 }],
            "charge": { "ref": 3 }
        }"#;

        let bag: BaggageInformation = serde_json::from_str(json).unwrap();
        assert!(bag.is_charge());
        assert_eq!(bag.charge, Some(Reference { id: 3 }));
        assert!(bag.allowance.is_none());
        assert_eq!(bag.segments[1].id, 1);
    }

    #[test]
    fn test_explicit_nulls_read_as_defaults() {
        let json = r#"{
            "groupedItineraryResponse": {
                "messages": null,
                "statistics": { "itineraryCount": 1 },
                "scheduleDescs": [
                    {
                        "id": 1,
                        "frequency": null,
                        "stopCount": 0,
                        "departure": { "airport": "ADD", "city": null, "terminal": null },
                        "arrival": { "airport": "NBO", "country": null },
                        "carrier": { "marketing": "ET", "operating": null, "equipment": { "code": null } }
                    }
                ],
                "legDescs": [{ "id": 1, "schedules": null }]
            }
        }"#;

        let response: SupplierResponse = serde_json::from_str(json).unwrap();
        let grouped = response.grouped_itinerary_response;
        assert!(grouped.messages.is_empty());
        assert_eq!(grouped.statistics.itinerary_count, 1);

        let schedule = &grouped.schedule_descs[0];
        assert_eq!(schedule.departure.airport, "ADD");
        assert_eq!(schedule.departure.city, "");
        assert!(schedule.departure.terminal.is_none());
        assert_eq!(schedule.arrival.country, "");
        assert_eq!(schedule.carrier.operating, "");
        assert_eq!(schedule.carrier.equipment.code, "");
        assert!(grouped.leg_descs[0].schedules.is_empty());
    }
}
