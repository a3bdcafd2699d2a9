#![forbid(unsafe_code)]

//! Pathway graph model (headless).
//!
//! This crate holds the data every rendering stage shares: the graph payload ([`GraphData`],
//! [`Node`], [`Edge`]), its normalization/validation rules, the rendering constants
//! ([`Config`]) and a few geometry aliases.

pub mod config;
pub mod error;
pub mod geom;
pub mod model;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{
    Edge, EntitySubtype, GraphData, MarkerStyle, Node, NodeShape, NodeType, Orientation,
    Position, RenderingConfig, SizeConfig,
};
