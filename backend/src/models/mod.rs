//! Database models for the AgroData platform

mod client;
mod harvest;
mod invoice;
mod plot;
mod processing;
mod producer;
mod sale;
mod stock;

pub use client::*;
pub use harvest::*;
pub use invoice::*;
pub use plot::*;
pub use processing::*;
pub use producer::*;
pub use sale::*;
pub use stock::*;
