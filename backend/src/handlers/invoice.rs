//! HTTP handlers for invoice endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Invoice;
use crate::services::invoice::{InvoiceService, IssueInvoiceInput, UpdateInvoiceInput};
use crate::AppState;

/// List invoices
pub async fn list_invoices(State(state): State<AppState>) -> AppResult<Json<Vec<Invoice>>> {
    let service = InvoiceService::new(state.db);
    let invoices = service.list_invoices().await?;
    Ok(Json(invoices))
}

/// Get an invoice
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<Invoice>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.get_invoice(invoice_id).await?;
    Ok(Json(invoice))
}

/// Issue (create or refresh) the invoice for a sale
pub async fn issue_invoice(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<IssueInvoiceInput>,
) -> AppResult<Json<Invoice>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.issue(sale_id, input).await?;
    Ok(Json(invoice))
}

/// Update an invoice
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(input): Json<UpdateInvoiceInput>,
) -> AppResult<Json<Invoice>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.update_invoice(invoice_id, input).await?;
    Ok(Json(invoice))
}

/// Delete an invoice
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = InvoiceService::new(state.db);
    service.delete_invoice(invoice_id).await?;
    Ok(Json(()))
}
