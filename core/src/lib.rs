//! Blocking client and functional-test toolkit for the PetFriends API.
//!
//! # Overview
//! `PetFriendsClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). `PetFriends`
//! pairs it with a `Transport` and exposes one call per API operation, each
//! returning an `ApiResponse` carrying the status code and either the typed
//! body or the raw text.
//!
//! # Design
//! - Clients are stateless: configuration only, safe to share across a run.
//! - Status codes are never turned into errors. Negative tests assert on
//!   4xx/5xx responses, so those must reach the caller intact.
//! - Inputs are forwarded unvalidated; rejecting them is the service's job.
//! - `scenario` holds the precondition helpers used by `tests/`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod pet_friends;
pub mod response;
pub mod scenario;
pub mod transport;
pub mod types;

pub use client::PetFriendsClient;
pub use config::Settings;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pet_friends::PetFriends;
pub use response::{ApiResponse, Body};
pub use transport::{Transport, UreqTransport};
pub use types::{AuthKey, Credentials, Pet, PetFields, PetList, PhotoFile, FILTER_ALL, FILTER_MY_PETS};
