pub mod client;
mod enrich;
pub mod error;
mod search;
pub mod types;

pub use client::{PlacesClient, PlacesOptions};
pub use error::PlacesError;
pub use types::{DetailsResponse, OpeningHours, PlaceDetails, RawPlace, TextSearchResponse};
