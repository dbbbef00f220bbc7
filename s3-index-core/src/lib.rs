#![doc = "s3-index-core: core logic library for s3-index."]

//! This crate contains the data model, tree materialization, deterministic
//! index rendering, and publish orchestration for s3-index. The object-store
//! collaborator is a trait ([`contract::ObjectStoreClient`]); the real AWS
//! client lives in the CLI crate.
//!
//! # Usage
//! Add this as a dependency for everything that builds or renders folder
//! trees, or that needs the store contract and its mocks.

pub mod assets;
pub mod config;
pub mod contract;
pub mod model;
pub mod publish;
pub mod render;
pub mod tree;
