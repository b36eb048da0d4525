// Itinerary resolution: turns reference-keyed supplier offers into self-contained flights.
//
// Baggage entries carry no segment id, only positions. Position N is the Nth schedule
// reference met while walking the itinerary's legs in order, counted across legs.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::price::Price;
use crate::supplier::{
    BaggageAllowanceDesc, BaggageChargeDesc, FareComponentDesc, Itinerary, ItineraryGroup,
    LegDescription, PassengerFareComponent, PassengerInfoEntry, PricingInformation, ScheduleDesc,
};
use crate::tables::ReferenceTables;

/// One resolved itinerary-offer pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    pub itinerary_id: u32,
    pub validating_carrier: String,
    pub departure_date: String,
    pub legs: Vec<FlightLeg>,
    pub total_price: Price,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightLeg {
    pub departure_date: String,
    pub departure_location: String,
    pub arrival_location: String,
    pub flight_data: Vec<FlightDataScheduleDesc>,
}

/// A schedule plus one baggage slot per passenger of the offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightDataScheduleDesc {
    pub schedule: ScheduleDesc,
    pub baggage: Vec<PassengerBaggage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassengerBaggage {
    pub passenger_type: String,
    pub passenger_number: u32,
    pub non_refundable: bool,
    pub allowances: Vec<BaggageAllowanceDesc>,
    pub charges: Vec<BaggageChargeDesc>,
    pub fare_component: Option<MatchedFareComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedFareComponent {
    pub fare_component: FareComponentDesc,
    pub begin_airport: String,
    pub end_airport: String,
}

#[derive(Debug, Default)]
struct SegmentBaggage<'a> {
    allowances: Vec<&'a BaggageAllowanceDesc>,
    charges: Vec<&'a BaggageChargeDesc>,
}

// Keyed by (segment position, passenger index).
type BaggageBySegment<'a> = HashMap<(usize, usize), SegmentBaggage<'a>>;

/// A passenger's fare component reference whose description was found.
struct FareCandidate<'r, 'a> {
    reference: &'r PassengerFareComponent,
    desc: &'a FareComponentDesc,
}

impl FareCandidate<'_, '_> {
    fn spans(&self, begin: &str, end: &str) -> bool {
        self.reference.begin_airport == begin && self.reference.end_airport == end
    }

    fn to_match(&self) -> MatchedFareComponent {
        MatchedFareComponent {
            fare_component: self.desc.clone(),
            begin_airport: self.reference.begin_airport.clone(),
            end_airport: self.reference.end_airport.clone(),
        }
    }
}

pub struct ItineraryResolver<'t, 'a> {
    tables: &'t ReferenceTables<'a>,
}

impl<'t, 'a> ItineraryResolver<'t, 'a> {
    pub fn new(tables: &'t ReferenceTables<'a>) -> Self {
        Self { tables }
    }

    /// Resolves every offer of every itinerary in the group, in source order.
    pub fn resolve_group(&self, group: &ItineraryGroup) -> Vec<Flight> {
        let mut flights = Vec::new();
        for itinerary in &group.itineraries {
            for offer in &itinerary.pricing_information {
                if let Some(flight) = self.resolve_offer(group, itinerary, offer) {
                    flights.push(flight);
                }
            }
        }
        flights
    }

    /// Returns `None` when the offer has no passenger details or nothing in it resolves.
    pub fn resolve_offer(
        &self,
        group: &ItineraryGroup,
        itinerary: &Itinerary,
        offer: &PricingInformation,
    ) -> Option<Flight> {
        let passengers = &offer.fare.passenger_info_list;
        if passengers.is_empty() {
            debug!(itinerary_id = itinerary.id, "skipping offer without passenger fares");
            return None;
        }

        let baggage = self.baggage_by_segment(passengers);
        let fare_candidates = self.fare_candidates(passengers);

        let mut position = 0usize;
        let mut legs = Vec::with_capacity(itinerary.legs.len());

        for (leg_index, leg_ref) in itinerary.legs.iter().enumerate() {
            let leg_description = group.group_description.leg_descriptions.get(leg_index);

            let Some(schedule_ids) = self.tables.leg_schedules(leg_ref.id) else {
                debug!(
                    itinerary_id = itinerary.id,
                    leg_id = leg_ref.id,
                    "leg reference not found, skipping leg"
                );
                continue;
            };

            let mut flight_data = Vec::with_capacity(schedule_ids.len());
            for &schedule_id in schedule_ids {
                let segment = position;
                position += 1;

                let Some(schedule) = self.tables.schedule(schedule_id) else {
                    debug!(
                        itinerary_id = itinerary.id,
                        schedule_id, segment, "schedule reference not found, skipping schedule"
                    );
                    continue;
                };

                let slots = passengers
                    .iter()
                    .enumerate()
                    .map(|(passenger_index, entry)| {
                        let info = &entry.passenger_info;
                        let (allowances, charges): (Vec<_>, Vec<_>) = baggage
                            .get(&(segment, passenger_index))
                            .map(|bags| {
                                (
                                    bags.allowances.iter().map(|a| (*a).clone()).collect(),
                                    bags.charges.iter().map(|c| (*c).clone()).collect(),
                                )
                            })
                            .unwrap_or_default();

                        PassengerBaggage {
                            passenger_type: info.passenger_type.clone(),
                            passenger_number: info.passenger_number,
                            non_refundable: info.non_refundable,
                            allowances,
                            charges,
                            fare_component: select_fare_component(
                                &fare_candidates[passenger_index],
                                schedule,
                                leg_description,
                            ),
                        }
                    })
                    .collect();

                flight_data.push(FlightDataScheduleDesc {
                    schedule: schedule.clone(),
                    baggage: slots,
                });
            }

            if flight_data.is_empty() {
                continue;
            }

            let (departure_date, departure_location, arrival_location) = leg_description
                .map(|leg| {
                    (
                        leg.departure_date.clone(),
                        leg.departure_location.clone(),
                        leg.arrival_location.clone(),
                    )
                })
                .unwrap_or_default();

            legs.push(FlightLeg {
                departure_date,
                departure_location,
                arrival_location,
                flight_data,
            });
        }

        if legs.is_empty() {
            return None;
        }

        // The trip departs on the group's first leg even when that leg failed to resolve.
        let departure_date = group
            .group_description
            .leg_descriptions
            .first()
            .map(|leg| leg.departure_date.clone())
            .unwrap_or_default();

        Some(Flight {
            itinerary_id: itinerary.id,
            validating_carrier: offer.fare.validating_carrier_code.clone(),
            departure_date,
            total_price: Price::from(&offer.fare.total_fare),
            legs,
        })
    }

    fn baggage_by_segment(&self, passengers: &[PassengerInfoEntry]) -> BaggageBySegment<'a> {
        let mut baggage = BaggageBySegment::new();

        for (passenger_index, entry) in passengers.iter().enumerate() {
            for bag in &entry.passenger_info.baggage_information {
                if bag.is_charge() {
                    let Some(charge) = bag.charge.and_then(|r| self.tables.baggage_charge(r.id))
                    else {
                        debug!(reference = ?bag.charge, "baggage charge not found");
                        continue;
                    };
                    for segment in &bag.segments {
                        baggage
                            .entry((segment.id, passenger_index))
                            .or_default()
                            .charges
                            .push(charge);
                    }
                } else {
                    let Some(allowance) = bag
                        .allowance
                        .and_then(|r| self.tables.baggage_allowance(r.id))
                    else {
                        debug!(reference = ?bag.allowance, "baggage allowance not found");
                        continue;
                    };
                    for segment in &bag.segments {
                        baggage
                            .entry((segment.id, passenger_index))
                            .or_default()
                            .allowances
                            .push(allowance);
                    }
                }
            }
        }

        baggage
    }

    // One candidate list per passenger, in fare component order.
    fn fare_candidates<'r>(
        &self,
        passengers: &'r [PassengerInfoEntry],
    ) -> Vec<Vec<FareCandidate<'r, 'a>>> {
        passengers
            .iter()
            .map(|entry| {
                entry
                    .passenger_info
                    .fare_components
                    .iter()
                    .filter_map(|reference| match self.tables.fare_component(reference.id) {
                        Some(desc) => Some(FareCandidate { reference, desc }),
                        None => {
                            debug!(fare_component_id = reference.id, "fare component not found");
                            None
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

// Exact airport pair first; otherwise a multi-segment component covering the whole leg.
fn select_fare_component(
    candidates: &[FareCandidate<'_, '_>],
    schedule: &ScheduleDesc,
    leg: Option<&LegDescription>,
) -> Option<MatchedFareComponent> {
    candidates
        .iter()
        .find(|c| c.spans(&schedule.departure.airport, &schedule.arrival.airport))
        .or_else(|| {
            let leg = leg?;
            candidates.iter().find(|c| {
                c.spans(&leg.departure_location, &leg.arrival_location)
                    && c.reference.segments.len() > 1
            })
        })
        .map(FareCandidate::to_match)
}
