//! Wire types and client surface for the result-storage upload API.
//!
//! The result store models one build/test run as an [`types::Invocation`]
//! with nested configurations, targets, configured targets, and actions.
//! Clients never mutate resources in place; they append
//! [`types::UploadRequest`] envelopes through the batch upload API and close
//! the invocation with a finalize marker.
//!
//! The message schema here is hand-maintained with `prost` derives rather
//! than generated from `.proto` sources, so building the crate does not
//! require a `protoc` binary. Service method paths live next to the client
//! in [`client`].

pub mod client;
pub mod types;

pub use client::{GrpcResultStoreClient, ResultStoreClient};
