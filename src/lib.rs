// Flight search service backed by the Sabre Bargain Finder Max API

pub mod assembler;
pub mod client;
pub mod price;
pub mod processor;
pub mod resolver;
pub mod search_request;
pub mod server;
pub mod settings;
pub mod supplier;
pub mod supplier_request;
pub mod tables;

// Re-export key types for convenience
pub use assembler::{FlightSearchResponse, ResponseAssembler};
pub use client::{ApiError, ClientConfig, ClientError, FlightSearchService, SabreClient};
pub use price::Price;
pub use processor::{FlightSearchProcessor, ProcessingError};
pub use resolver::{
    Flight, FlightDataScheduleDesc, FlightLeg, ItineraryResolver, MatchedFareComponent,
    PassengerBaggage,
};
pub use search_request::{FlightSearchRequest, PassengerCount, PassengerType, TripType, ValidationError};
pub use server::{app, AppError, AppState};
pub use settings::{Settings, SettingsError};
pub use supplier::{GroupedItineraryResponse, SupplierResponse};
pub use tables::ReferenceTables;
