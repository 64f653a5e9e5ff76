//! Handlers for the `/customers` resource.

use std::collections::HashSet;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use scylla_core::error::CoreError;
use scylla_core::import::{import_bytes, ImportSummary};
use scylla_core::pagination::PageMeta;
use scylla_core::types::DbId;
use scylla_db::models::customer::{CreateCustomer, Customer, CustomerFilter};
use scylla_db::query::OrderBy;
use scylla_db::repositories::customer_repo::SORTABLE_COLUMNS;
use scylla_db::repositories::CustomerRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{
    export_date, non_blank, read_upload, sheet_export, DeleteBatchRequest, DeletedResponse,
    ExportParams,
};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, PagedResponse, SheetAttachment};
use crate::state::AppState;

/// Columns of an exported customer sheet.
const EXPORT_HEADER: &[&str] = &["ID", "Username", "Email", "Phone", "Address", "CreatedAt"];

/// Request body for creating or replacing a customer.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CustomerRequest {
    #[validate(custom(function = "non_blank"))]
    pub username: String,
    #[validate(email(message = "email is not a valid email"))]
    pub email: String,
    #[validate(custom(function = "non_blank"))]
    pub phone: String,
    #[validate(custom(function = "non_blank"))]
    pub address: String,
}

impl CustomerRequest {
    fn into_dto(self) -> CreateCustomer {
        CreateCustomer {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }
}

/// Request body for `POST /customers/batch`.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerBatchRequest {
    #[validate(length(min = 1, message = "customers must not be empty"), nested)]
    pub customers: Vec<CustomerRequest>,
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CustomerRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Customer>>)> {
    input.validate()?;
    let dto = input.into_dto();
    if CustomerRepo::email_taken(&state.pool, &dto.email, None).await? {
        return Err(AppError::field("email", "unique", "email has already been taken"));
    }

    let customer = CustomerRepo::create(&state.pool, &dto).await?;
    tracing::info!(customer_id = customer.id, "Customer created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// POST /api/v1/customers/batch
///
/// Inserts every customer or none. An email repeated within the batch or
/// already stored is a conflict.
pub async fn create_batch(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CustomerBatchRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Customer>>>)> {
    input.validate()?;
    let dtos: Vec<CreateCustomer> = input
        .customers
        .into_iter()
        .map(CustomerRequest::into_dto)
        .collect();

    let mut seen = HashSet::new();
    for (index, dto) in dtos.iter().enumerate() {
        if !seen.insert(dto.email.as_str()) {
            return Err(CoreError::Conflict(format!(
                "customers[{index}].email '{}' is repeated in the batch",
                dto.email
            ))
            .into());
        }
        if CustomerRepo::email_taken(&state.pool, &dto.email, None).await? {
            return Err(CoreError::Conflict(format!(
                "customers[{index}].email '{}' has already been taken",
                dto.email
            ))
            .into());
        }
    }

    let created = CustomerRepo::create_many(&state.pool, &dtos).await?;
    tracing::info!(count = created.len(), "Customers created in batch");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/customers
///
/// Substring `username`/`email` filters, inclusive dates, `sort`, and paging
/// via `page`/`limit`. `all=true` returns every match as a single page.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<CustomerFilter>,
) -> AppResult<Json<PagedResponse<Customer>>> {
    let order = OrderBy::parse(filter.sort.as_deref(), SORTABLE_COLUMNS)?;

    if filter.all {
        let data = CustomerRepo::list_all(&state.pool, &filter, &order).await?;
        let meta = PageMeta::single_page(data.len() as i64);
        return Ok(Json(PagedResponse { data, meta }));
    }

    let page = filter.page_request();
    let (data, total) = CustomerRepo::list_page(&state.pool, &filter, &order, page).await?;

    Ok(Json(PagedResponse {
        data,
        meta: PageMeta::new(page, total),
    }))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Customer>>> {
    let customer = CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Customer", id))?;

    Ok(Json(DataResponse { data: customer }))
}

/// PATCH /api/v1/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CustomerRequest>,
) -> AppResult<Json<DataResponse<Customer>>> {
    input.validate()?;
    let dto = input.into_dto();
    if CustomerRepo::email_taken(&state.pool, &dto.email, Some(id)).await? {
        return Err(AppError::field("email", "unique", "email has already been taken"));
    }

    let customer = CustomerRepo::update(&state.pool, id, &dto)
        .await?
        .ok_or_else(|| CoreError::not_found("Customer", id))?;
    tracing::info!(customer_id = customer.id, "Customer updated");

    Ok(Json(DataResponse { data: customer }))
}

/// DELETE /api/v1/customers/batch
pub async fn delete_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<DeleteBatchRequest>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    input.validate()?;

    let deleted = CustomerRepo::delete_many(&state.pool, &input.id).await?;
    if deleted == 0 {
        return Err(CoreError::NotFound {
            entity: "Customers",
            key: format!("with ids {:?}", input.id),
        }
        .into());
    }
    tracing::info!(by = auth.user_id, deleted, "Customers deleted");

    Ok(Json(DataResponse {
        data: DeletedResponse { deleted },
    }))
}

/// GET /api/v1/customers/export
///
/// Same filters as [`list`]; paging is ignored.
pub async fn export(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<CustomerFilter>,
    Query(params): Query<ExportParams>,
) -> AppResult<SheetAttachment> {
    let order = OrderBy::parse(filter.sort.as_deref(), SORTABLE_COLUMNS)?;
    let customers = CustomerRepo::list_all(&state.pool, &filter, &order).await?;

    let rows = customers
        .into_iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.username,
                c.email,
                c.phone,
                c.address,
                export_date(&c.created_at),
            ]
        })
        .collect();
    sheet_export("customers", params.format, EXPORT_HEADER, rows)
}

/// POST /api/v1/customers/import
///
/// Multipart upload with a `file` part: `username, email, phone, address`
/// per row after a header row.
pub async fn import(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ImportSummary>>)> {
    let bytes = read_upload(multipart).await?;
    tracing::info!(by = auth.user_id, size = bytes.len(), "Customer import uploaded");

    let summary = import_bytes(
        state.customer_sheet.clone(),
        state.import_store.clone(),
        &bytes,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}
