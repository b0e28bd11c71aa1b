//! HTTP handlers for the AgroData platform

mod client;
mod harvest;
mod health;
mod invoice;
mod plot;
mod processing;
mod producer;
mod reporting;
mod sale;
mod stock;

pub use client::*;
pub use harvest::*;
pub use health::*;
pub use invoice::*;
pub use plot::*;
pub use processing::*;
pub use producer::*;
pub use reporting::*;
pub use sale::*;
pub use stock::*;
