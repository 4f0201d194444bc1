//! MindFlow core library: mind-map data model, state store, and projections.
//!
//! The main entry point is [`store::MindMapStore`], which owns the node/edge
//! graph and persists it through a [`store::StateStorage`] backend. What gets
//! drawn is derived on demand by [`visibility`] and annotated by [`render`].

pub mod config;
pub mod error;
pub mod render;
pub mod store;
pub mod templates;
pub mod transfer;
pub mod types;
pub mod validate;
pub mod visibility;
