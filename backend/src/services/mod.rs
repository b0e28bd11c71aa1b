//! Business logic services for the AgroData platform

pub mod client;
pub mod harvest;
pub mod invoice;
pub mod plot;
pub mod processing;
pub mod producer;
pub mod reporting;
pub mod sale;
pub mod stock;

pub use client::ClientService;
pub use harvest::HarvestService;
pub use invoice::InvoiceService;
pub use plot::PlotService;
pub use processing::ProcessingService;
pub use producer::ProducerService;
pub use reporting::ReportingService;
pub use sale::SaleService;
pub use stock::StockService;
