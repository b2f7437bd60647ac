//! JSON HTTP API over the storefront.
//!
//! "Now" is read once per request here and handed down, so everything below
//! the handlers stays clock-free.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::Validate;

use crate::catalog::{ProductFilter, ProductQuery, QuoteLine, Storefront};
use crate::domain::aggregates::{CartError, CartItem, CartTotals, Product, ProductId, Shopper};
use crate::offers::SelectionSeed;
use crate::StorefrontError;

pub const SERVICE_NAME: &str = "pharmacy-storefront";

#[derive(Clone, Debug)]
pub struct AppState { pub storefront: Storefront }

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(e: StorefrontError) -> ApiError {
    let status = match &e {
        StorefrontError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        StorefrontError::Cart(CartError::LoginRequired) => StatusCode::UNAUTHORIZED,
        StorefrontError::Cart(CartError::PrescriptionRequiresLogin(_)) => StatusCode::FORBIDDEN,
        StorefrontError::Cart(CartError::CheckoutUnavailable) => StatusCode::NOT_IMPLEMENTED,
        StorefrontError::Cart(_) | StorefrontError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StorefrontError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    // Store details are logged where the load failed, not echoed to shoppers.
    let message = match &e {
        StorefrontError::Storage(_) => "catalog unavailable".to_string(),
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message })))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": SERVICE_NAME})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/offers", get(list_offers))
        .route("/api/v1/categories", get(list_categories))
        .route("/api/v1/cart/quote", post(quote_cart))
        .route("/api/v1/checkout", post(checkout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse { pub data: Vec<Product>, pub total: usize, pub offer_seed: i64 }

impl CatalogResponse {
    fn new(data: Vec<Product>, seed: SelectionSeed) -> Self { Self { total: data.len(), data, offer_seed: seed.value() } }
}

async fn list_products(State(s): State<AppState>, Query(q): Query<ProductQuery>) -> ApiResult<CatalogResponse> {
    let now = Utc::now();
    let products = s.storefront.search(&ProductFilter::from(&q), now).await.map_err(api_error)?;
    Ok(Json(CatalogResponse::new(products, SelectionSeed::from_date(now))))
}

async fn get_product(State(s): State<AppState>, Path(id): Path<ProductId>) -> ApiResult<Product> {
    s.storefront.product(id, Utc::now()).await.map(Json).map_err(api_error)
}

async fn list_offers(State(s): State<AppState>) -> ApiResult<CatalogResponse> {
    let now = Utc::now();
    let offers = s.storefront.offers(now).await.map_err(api_error)?;
    Ok(Json(CatalogResponse::new(offers, SelectionSeed::from_date(now))))
}

async fn list_categories(State(s): State<AppState>) -> ApiResult<Vec<String>> {
    s.storefront.categories(Utc::now()).await.map(Json).map_err(api_error)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CartRequest {
    #[serde(default)]
    pub shopper: Shopper,
    #[validate]
    pub items: Vec<QuoteLine>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse { pub items: Vec<CartItem>, pub totals: CartTotals }

async fn quote_cart(State(s): State<AppState>, Json(r): Json<CartRequest>) -> ApiResult<QuoteResponse> {
    r.validate().map_err(|e| api_error(e.into()))?;
    let (cart, totals) = s.storefront.quote(&r.items, &r.shopper, Utc::now()).await.map_err(api_error)?;
    Ok(Json(QuoteResponse { items: cart.items().to_vec(), totals }))
}

async fn checkout(State(s): State<AppState>, Json(r): Json<CartRequest>) -> ApiResult<CartTotals> {
    r.validate().map_err(|e| api_error(e.into()))?;
    let (cart, _) = s.storefront.quote(&r.items, &r.shopper, Utc::now()).await.map_err(api_error)?;
    let totals = cart.checkout(&r.shopper).map_err(|e| api_error(e.into()))?;
    Ok(Json(totals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSource;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn app() -> Router { router(AppState { storefront: Storefront::new(CatalogSource::Fallback) }) }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json parse"))
    }

    fn get_req(uri: &str) -> Request<Body> { Request::builder().uri(uri).body(Body::empty()).expect("request") }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_service() {
        let (status, json) = send(app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn products_flag_exactly_five_offers() {
        let before = SelectionSeed::from_date(Utc::now()).value();
        let (status, json) = send(app(), get_req("/api/v1/products")).await;
        let after = SelectionSeed::from_date(Utc::now()).value();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 15);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.iter().filter(|p| p["onSale"] == true).count(), 5);
        let seed = json["offer_seed"].as_i64().expect("seed");
        assert!(seed == before || seed == after);
    }

    #[tokio::test]
    async fn offers_endpoint_agrees_with_listing() {
        let (_, all) = send(app(), get_req("/api/v1/products?category=ofertas")).await;
        let (_, offers) = send(app(), get_req("/api/v1/offers")).await;
        assert_eq!(all["data"], offers["data"]);
        assert!(offers["data"].as_array().unwrap().iter().all(|p| p["onSale"] == true));
    }

    #[tokio::test]
    async fn products_filter_by_category_and_search() {
        let (_, json) = send(app(), get_req("/api/v1/products?category=Vitaminas&search=omega")).await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["data"][0]["id"], 13);
    }

    #[tokio::test]
    async fn product_lookup_and_missing() {
        let (status, json) = send(app(), get_req("/api/v1/products/4")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Vitamina C 1000mg");
        let (status, _) = send(app(), get_req("/api/v1/products/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn categories_start_with_all() {
        let (_, json) = send(app(), get_req("/api/v1/categories")).await;
        assert_eq!(json[0], "all");
        assert_eq!(json.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn quote_applies_membership_and_shipping() {
        let body = json!({
            "shopper": {"signed_in": true, "membership": "gold"},
            "items": [{"product_id": 4, "quantity": 2}, {"product_id": 4, "quantity": 1}]
        });
        let (status, json) = send(app(), post_json("/api/v1/cart/quote", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
        assert_eq!(json["totals"]["item_count"], 3);
        // 90 * 0.85
        assert_eq!(json["totals"]["subtotal"]["amount"], 76.5);
        assert_eq!(json["totals"]["shipping"]["amount"], 0.0);

        let guest = json!({"items": [{"product_id": 11, "quantity": 1}]});
        let (_, json) = send(app(), post_json("/api/v1/cart/quote", guest)).await;
        assert_eq!(json["totals"]["total"]["amount"], 22.5);
    }

    #[tokio::test]
    async fn quote_rejects_bad_lines() {
        let zero = json!({"items": [{"product_id": 4, "quantity": 0}]});
        let (status, _) = send(app(), post_json("/api/v1/cart/quote", zero)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let unknown = json!({"items": [{"product_id": 77, "quantity": 1}]});
        let (status, _) = send(app(), post_json("/api/v1/cart/quote", unknown)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn prescription_items_need_sign_in() {
        let rx = Product::new(50, "Amoxicilina 500mg", Decimal::new(1500, 2)).requiring_prescription();
        let app = router(AppState { storefront: Storefront::new(CatalogSource::in_memory(vec![rx])) });
        let body = json!({"items": [{"product_id": 50, "quantity": 1}]});
        let (status, json) = send(app, post_json("/api/v1/cart/quote", body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(json["error"].as_str().unwrap().contains("prescription"));
    }

    #[tokio::test]
    async fn checkout_is_not_implemented() {
        let items = json!([{"product_id": 1, "quantity": 1}]);
        let (status, _) = send(app(), post_json("/api/v1/checkout", json!({"items": items}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let body = json!({"shopper": {"signed_in": true}, "items": items});
        let (status, json) = send(app(), post_json("/api/v1/checkout", body)).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(json["error"], "Checkout is not implemented");
    }
}
