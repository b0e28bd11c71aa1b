//! Route definitions for the AgroData platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Producer management
        .nest("/producers", producer_routes())
        // Plot management
        .nest("/plots", plot_routes())
        // Harvest management
        .nest("/harvests", harvest_routes())
        // Processing lot management
        .nest("/processing-lots", processing_routes())
        // Stock and movement ledger
        .nest("/stocks", stock_routes())
        // Client management
        .nest("/clients", client_routes())
        // Sale reconciliation
        .nest("/sales", sale_routes())
        // Invoices
        .nest("/invoices", invoice_routes())
        // Dashboard reporting and exports
        .nest("/reports", reporting_routes())
}

/// Producer management routes
fn producer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_producers).post(handlers::create_producer),
        )
        .route(
            "/:producer_id",
            get(handlers::get_producer)
                .put(handlers::update_producer)
                .delete(handlers::delete_producer),
        )
}

/// Plot management routes
fn plot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plots).post(handlers::create_plot))
        .route(
            "/:plot_id",
            get(handlers::get_plot)
                .put(handlers::update_plot)
                .delete(handlers::delete_plot),
        )
}

/// Harvest management routes
fn harvest_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_harvests).post(handlers::create_harvest),
        )
        .route(
            "/:harvest_id",
            get(handlers::get_harvest)
                .put(handlers::update_harvest)
                .delete(handlers::delete_harvest),
        )
}

/// Processing lot management routes
fn processing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_processing_lots).post(handlers::create_processing_lot),
        )
        .route(
            "/:lot_id",
            get(handlers::get_processing_lot)
                .put(handlers::update_processing_lot)
                .delete(handlers::delete_processing_lot),
        )
}

/// Stock ledger routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stocks).post(handlers::create_stock))
        .route(
            "/:stock_id",
            get(handlers::get_stock)
                .put(handlers::update_stock)
                .delete(handlers::delete_stock),
        )
        .route("/:stock_id/adjust", post(handlers::adjust_stock))
        .route("/:stock_id/movements", get(handlers::get_stock_movements))
}

/// Client management routes
fn client_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/:client_id",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
}

/// Sale reconciliation routes
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route(
            "/:sale_id",
            get(handlers::get_sale)
                .put(handlers::update_sale)
                .delete(handlers::delete_sale),
        )
        .route("/:sale_id/invoice", post(handlers::issue_invoice))
}

/// Invoice routes
fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoices))
        .route(
            "/:invoice_id",
            get(handlers::get_invoice)
                .put(handlers::update_invoice)
                .delete(handlers::delete_invoice),
        )
}

/// Dashboard reporting routes
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/top-products", get(handlers::get_top_products))
        .route("/stock-by-product", get(handlers::get_stock_by_product))
        .route("/lots-by-stage", get(handlers::get_lots_by_stage))
        .route("/harvests-by-fruit", get(handlers::get_harvests_by_fruit))
        .route("/monthly-sales", get(handlers::get_monthly_sales))
        .route("/top-clients", get(handlers::get_top_clients))
        .route("/exports/sales", get(handlers::export_sales))
        .route("/exports/movements", get(handlers::export_movements))
}
