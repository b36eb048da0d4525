use serde::Serialize;

use crate::resolver::{Flight, ItineraryResolver};
use crate::supplier::GroupedItineraryResponse;
use crate::tables::ReferenceTables;

// Outbound search result, cheapest offer first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSearchResponse {
    pub total_flights: usize,
    pub flights: Vec<Flight>,
}

pub struct ResponseAssembler;

impl ResponseAssembler {
    /// Builds the lookup tables, resolves every group and orders the result by price.
    pub fn assemble(response: &GroupedItineraryResponse) -> FlightSearchResponse {
        let tables = ReferenceTables::build(response);
        let resolver = ItineraryResolver::new(&tables);

        let flights = response
            .itinerary_groups
            .iter()
            .flat_map(|group| resolver.resolve_group(group))
            .collect();

        Self::from_flights(flights)
    }

    pub fn from_flights(mut flights: Vec<Flight>) -> FlightSearchResponse {
        sort_by_price(&mut flights);
        FlightSearchResponse {
            total_flights: flights.len(),
            flights,
        }
    }
}

/// Stable ascending sort on the offer total.
pub fn sort_by_price(flights: &mut [Flight]) {
    flights.sort_by(|a, b| a.total_price.cmp_amount(&b.total_price));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;
    use test_case::test_case;

    fn flight(itinerary_id: u32, amount: f64) -> Flight {
        Flight {
            itinerary_id,
            validating_carrier: "ET".to_string(),
            departure_date: "2025-03-16".to_string(),
            legs: vec![],
            total_price: Price::new(amount, "USD"),
        }
    }

    #[test_case(vec![100.0, 50.0, 75.0], vec![50.0, 75.0, 100.0]; "#1 unordered offers")]
    #[test_case(vec![10.0, 10.0, 5.0], vec![5.0, 10.0, 10.0]; "#2 equal prices")]
    #[test_case(vec![], vec![]; "#3 empty")]
    fn test_orders_by_price(input: Vec<f64>, expected: Vec<f64>) {
        let flights = input
            .iter()
            .enumerate()
            .map(|(i, amount)| flight(i as u32, *amount))
            .collect();

        let response = ResponseAssembler::from_flights(flights);
        let amounts: Vec<f64> = response.flights.iter().map(|f| f.total_price.amount).collect();
        assert_eq!(amounts, expected);
        assert_eq!(response.total_flights, expected.len());
    }

    #[test]
    fn test_equal_prices_keep_source_order() {
        let mut flights = vec![flight(1, 20.0), flight(2, 10.0), flight(3, 20.0)];
        sort_by_price(&mut flights);
        let ids: Vec<u32> = flights.iter().map(|f| f.itinerary_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_unparsable_amount_does_not_abort_ordering() {
        let mut flights = vec![flight(1, 30.0), flight(2, f64::NAN), flight(3, 5.0)];
        sort_by_price(&mut flights);
        let ids: Vec<u32> = flights.iter().map(|f| f.itinerary_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_assemble_empty_response() {
        let response = ResponseAssembler::assemble(&GroupedItineraryResponse::default());
        assert_eq!(response.total_flights, 0);
        assert!(response.flights.is_empty());
    }
}
