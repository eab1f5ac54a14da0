// Adapters layer: concrete implementations for external systems (sources, storage).

pub mod listing;
pub mod places_api;
pub mod storage;

pub use listing::{FieldSelector, ListingAdapter, ListingProfile};
pub use places_api::PlacesApiAdapter;
pub use storage::LocalStorage;
