//! REST client for the clinic backend.
//!
//! [`ApiClient`] speaks HTTP; each entity module implements [`Resource`]
//! for its collection and adds any routes beyond plain CRUD. Views talk to
//! [`CachedClient`], which layers the query cache on top.

mod auth;
mod cached;
mod client;
mod codes;
mod envelope;
mod error;
mod owners;
mod pets;
mod resource;
mod vaccine_records;
mod vaccine_stocks;
mod vaccines;
mod veterinarians;

pub use cached::CachedClient;
pub use client::ApiClient;
pub use codes::Codes;
pub use error::ApiError;
pub use owners::Owners;
pub use pets::Pets;
pub use resource::{Creatable, Resource};
pub use vaccine_records::VaccineRecords;
pub use vaccine_stocks::VaccineStocks;
pub use vaccines::Vaccines;
pub use veterinarians::Veterinarians;
