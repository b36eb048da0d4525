// Supplier response processing: status check, then table building, resolution and ordering.
use thiserror::Error;
use tracing::{debug, warn};

use crate::assembler::{FlightSearchResponse, ResponseAssembler};
use crate::supplier::{GroupedItineraryResponse, SupplierResponse};

const NO_JOURNEY_TEXT: &str = "No complete journey can be built in IF2/ADVJR1.";
const PROCESSING_ERROR_TEXT: &str = "Error during Processing";
const NO_SCHEDULES_TYPE: &str = "SCHEDULES";
const NO_SCHEDULES_TEXT: &str = "NO FLIGHT SCHEDULES FOR QUALIFIERS USED";

// Error types for supplier response processing
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("{0}")]
    NoFlightsFound(String),

    #[error("{message}")]
    SupplierError { code: String, message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub struct FlightSearchProcessor {}

impl Default for FlightSearchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightSearchProcessor {
    pub fn new() -> Self {
        Self {}
    }

    /// Parses a raw supplier body and turns it into priced flights.
    pub fn process(&self, json: &str) -> Result<FlightSearchResponse, ProcessingError> {
        let response: SupplierResponse = serde_json::from_str(json)
            .map_err(|e| ProcessingError::JsonParseError(e.to_string()))?;

        self.process_response(&response)
    }

    pub fn process_response(
        &self,
        response: &SupplierResponse,
    ) -> Result<FlightSearchResponse, ProcessingError> {
        let grouped = &response.grouped_itinerary_response;
        check_supplier_status(grouped)?;

        let result = self.resolve(grouped);
        debug!(
            itineraries = grouped.statistics.itinerary_count,
            flights = result.total_flights,
            "resolved supplier response"
        );
        Ok(result)
    }

    /// Pure resolution, no status check.
    pub fn resolve(&self, response: &GroupedItineraryResponse) -> FlightSearchResponse {
        ResponseAssembler::assemble(response)
    }

    // Helper method to load the sample supplier response
    pub fn load_sample_response(&self) -> Result<String, ProcessingError> {
        Ok(std::fs::read_to_string(SAMPLE_RESPONSE_PATH)?)
    }
}

/// Maps supplier diagnostics to request-level failures.
pub fn check_supplier_status(response: &GroupedItineraryResponse) -> Result<(), ProcessingError> {
    if let Some(message) = response.messages.iter().find(|m| m.is_error()) {
        warn!(code = %message.code, text = %message.text, "supplier reported an error");
        return Err(match message.text.as_str() {
            NO_JOURNEY_TEXT => ProcessingError::NoFlightsFound(
                "no flights available for the specified route and dates".to_string(),
            ),
            PROCESSING_ERROR_TEXT => ProcessingError::SupplierError {
                code: message.code.clone(),
                message: "an error occurred while searching for flights; please try again later"
                    .to_string(),
            },
            text => ProcessingError::SupplierError {
                code: message.code.clone(),
                message: format!("supplier processing error: {} ({})", text, message.code),
            },
        });
    }

    if response.statistics.itinerary_count == 0 {
        let no_schedules = response
            .messages
            .iter()
            .any(|m| m.message_type == NO_SCHEDULES_TYPE && m.text == NO_SCHEDULES_TEXT);

        let message = if no_schedules {
            "no flights found matching your search criteria (e.g., dates, route, or preferences)"
        } else {
            "no flights available for your search; try adjusting your dates or preferences"
        };
        return Err(ProcessingError::NoFlightsFound(message.to_string()));
    }

    Ok(())
}

// Sample supplier response stored in the samples directory
pub const SAMPLE_RESPONSE_PATH: &str = "samples/supplier_response.json";
