use actix_web::{HttpResponse, web};

use crate::middleware::auth::AuthenticatedUser;
use crate::quote::model::QuoteRequest;
use crate::quote::service::QuoteService;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;
use crate::utils::response;

pub async fn create_quote(
    quote_service: web::Data<QuoteService>,
    caller: AuthenticatedUser,
    body: web::Json<QuoteRequest>,
) -> Result<HttpResponse, CustomError> {
    let quote = quote_service.add_quote(&caller, body.into_inner()).await?;
    Ok(response::created("Quote created successfully", quote))
}

pub async fn get_all_quotes(
    quote_service: web::Data<QuoteService>,
) -> Result<HttpResponse, CustomError> {
    let quotes = quote_service.list_quotes().await?;
    Ok(response::ok("Quotes fetched successfully", quotes))
}

pub async fn get_quote(
    quote_service: web::Data<QuoteService>,
    quote_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let quote_id = parse_object_id(&quote_id, "quote")?;
    let quote = quote_service.get_quote(&quote_id).await?;
    Ok(response::ok("Quote fetched successfully", quote))
}

pub async fn update_quote(
    quote_service: web::Data<QuoteService>,
    caller: AuthenticatedUser,
    quote_id: web::Path<String>,
    body: web::Json<QuoteRequest>,
) -> Result<HttpResponse, CustomError> {
    let quote_id = parse_object_id(&quote_id, "quote")?;
    let quote = quote_service
        .update_quote(&caller, &quote_id, body.into_inner())
        .await?;
    Ok(response::ok("Quote updated successfully", quote))
}

pub async fn delete_quote(
    quote_service: web::Data<QuoteService>,
    caller: AuthenticatedUser,
    quote_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let quote_id = parse_object_id(&quote_id, "quote")?;
    quote_service.delete_quote(&caller, &quote_id).await?;
    Ok(response::ok_message("Quote deleted successfully"))
}
