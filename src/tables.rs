use std::collections::HashMap;

use crate::supplier::{
    BaggageAllowanceDesc, BaggageChargeDesc, FareComponentDesc, GroupedItineraryResponse,
    ScheduleDesc,
};

/// Id lookups over one supplier response. Entries borrow from the response.
#[derive(Debug, Default)]
pub struct ReferenceTables<'a> {
    baggage_allowances: HashMap<u32, &'a BaggageAllowanceDesc>,
    baggage_charges: HashMap<u32, &'a BaggageChargeDesc>,
    fare_components: HashMap<u32, &'a FareComponentDesc>,
    schedules: HashMap<u32, &'a ScheduleDesc>,
    legs: HashMap<u32, Vec<u32>>,
}

impl<'a> ReferenceTables<'a> {
    // Duplicate ids keep the last entry seen.
    pub fn build(response: &'a GroupedItineraryResponse) -> Self {
        let baggage_allowances = response
            .baggage_allowance_descs
            .iter()
            .map(|allowance| (allowance.id, allowance))
            .collect();

        let baggage_charges = response
            .baggage_charge_descs
            .iter()
            .map(|charge| (charge.id, charge))
            .collect();

        let fare_components = response
            .fare_component_descs
            .iter()
            .map(|fare| (fare.id, fare))
            .collect();

        let schedules = response
            .schedule_descs
            .iter()
            .map(|schedule| (schedule.id, schedule))
            .collect();

        let legs = response
            .leg_descs
            .iter()
            .map(|leg| (leg.id, leg.schedules.iter().map(|s| s.id).collect::<Vec<_>>()))
            .collect();

        Self {
            baggage_allowances,
            baggage_charges,
            fare_components,
            schedules,
            legs,
        }
    }

    pub fn baggage_allowance(&self, id: u32) -> Option<&'a BaggageAllowanceDesc> {
        self.baggage_allowances.get(&id).copied()
    }

    pub fn baggage_charge(&self, id: u32) -> Option<&'a BaggageChargeDesc> {
        self.baggage_charges.get(&id).copied()
    }

    pub fn fare_component(&self, id: u32) -> Option<&'a FareComponentDesc> {
        self.fare_components.get(&id).copied()
    }

    pub fn schedule(&self, id: u32) -> Option<&'a ScheduleDesc> {
        self.schedules.get(&id).copied()
    }

    /// Ordered schedule ids of a leg.
    pub fn leg_schedules(&self, id: u32) -> Option<&[u32]> {
        self.legs.get(&id).map(Vec::as_slice)
    }
}
