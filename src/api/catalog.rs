//! Catalog endpoints: categories, subcategories, products, attributes.
//!
//! Pass-through calls with the backend's `<resource>/<action>` paths.
//! Reads are anonymous, writes require the bearer token — the flags here
//! mirror the backend's authorization rules, the dispatcher enforces
//! nothing beyond token presence.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{ApiClient, ApiError, DataResponse};

// ── Payload types ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub sort: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    pub sort: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    #[serde(rename = "subcategoryId")]
    pub subcategory_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub id: i64,
    #[serde(rename = "attributeId")]
    pub attribute_id: i64,
    #[serde(rename = "productId")]
    pub product_id: i64,
    pub value: String,
    pub sort: i64,
}

// ── Categories ───────────────────────────────────────────────────

pub async fn get_categories(client: &ApiClient) -> Result<DataResponse, ApiError> {
    client.get("category/get_all", false).await
}

pub async fn add_category(
    client: &ApiClient,
    category: &Category,
) -> Result<DataResponse, ApiError> {
    client.post("category/add", category, true).await
}

pub async fn update_category(
    client: &ApiClient,
    category: &Category,
) -> Result<DataResponse, ApiError> {
    client.post("category/update", category, true).await
}

pub async fn delete_category(client: &ApiClient, id: i64) -> Result<DataResponse, ApiError> {
    client.post("category/delete", &json!({ "id": id }), true).await
}

// ── Subcategories ────────────────────────────────────────────────

pub async fn get_subcategories(client: &ApiClient) -> Result<DataResponse, ApiError> {
    client.get("subcategory/get_all", false).await
}

pub async fn add_subcategory(
    client: &ApiClient,
    subcategory: &SubCategory,
) -> Result<DataResponse, ApiError> {
    client.post("subcategory/add", subcategory, true).await
}

pub async fn update_subcategory(
    client: &ApiClient,
    subcategory: &SubCategory,
) -> Result<DataResponse, ApiError> {
    client.post("subcategory/update", subcategory, true).await
}

pub async fn delete_subcategory(client: &ApiClient, id: i64) -> Result<DataResponse, ApiError> {
    client
        .post("subcategory/delete", &json!({ "id": id }), true)
        .await
}

// ── Products ─────────────────────────────────────────────────────

pub async fn get_products(client: &ApiClient) -> Result<DataResponse, ApiError> {
    client.get("product/get_all", false).await
}

/// Filtered product listing for the search bar.
pub async fn get_products_by_category(
    client: &ApiClient,
    selected_cat: &str,
    selected_sub_cat: &str,
    search_text: &str,
) -> Result<DataResponse, ApiError> {
    client
        .post(
            "product/get_by_cat",
            &json!({
                "selectedCat": selected_cat,
                "selectedSubCat": selected_sub_cat,
                "searchText": search_text,
            }),
            false,
        )
        .await
}

pub async fn get_product_by_id(client: &ApiClient, id: &str) -> Result<DataResponse, ApiError> {
    client.post("product/get_byId", &json!({ "id": id }), false).await
}

pub async fn add_product(client: &ApiClient, product: &Product) -> Result<DataResponse, ApiError> {
    client.post("product/add", product, true).await
}

pub async fn update_product(
    client: &ApiClient,
    product: &Product,
) -> Result<DataResponse, ApiError> {
    client.post("product/update", product, true).await
}

pub async fn delete_product(client: &ApiClient, id: i64) -> Result<DataResponse, ApiError> {
    client.post("product/delete", &json!({ "id": id }), true).await
}

/// Upload a product image as an opaque payload (multipart body built by
/// the caller; the dispatcher leaves the content type alone). The backend
/// never pinned the raw variant to one route, so the caller supplies it.
pub async fn upload_product_image(
    client: &ApiClient,
    path: &str,
    payload: Vec<u8>,
) -> Result<DataResponse, ApiError> {
    client.post_raw(path, payload, true).await
}

// ── Attributes ───────────────────────────────────────────────────

pub async fn get_attributes(client: &ApiClient) -> Result<DataResponse, ApiError> {
    client.get("attribute/get_all", false).await
}

pub async fn add_attribute(
    client: &ApiClient,
    attribute: &Attribute,
) -> Result<DataResponse, ApiError> {
    client.post("attribute/add", attribute, true).await
}

pub async fn update_attribute(
    client: &ApiClient,
    attribute: &Attribute,
) -> Result<DataResponse, ApiError> {
    client.post("attribute/update", attribute, true).await
}

pub async fn delete_attribute(client: &ApiClient, id: i64) -> Result<DataResponse, ApiError> {
    client.post("attribute/delete", &json!({ "id": id }), true).await
}

// ── Product attributes ───────────────────────────────────────────

pub async fn get_product_attributes(client: &ApiClient) -> Result<DataResponse, ApiError> {
    client.get("productAttribute/get_all", false).await
}

pub async fn get_product_attributes_by_product(
    client: &ApiClient,
    product_id: i64,
) -> Result<DataResponse, ApiError> {
    client
        .post("productAttribute/get_byId", &json!({ "productId": product_id }), true)
        .await
}

pub async fn add_product_attribute(
    client: &ApiClient,
    product_id: i64,
    attribute_id: i64,
    value: &str,
) -> Result<DataResponse, ApiError> {
    client
        .post(
            "productAttribute/add",
            &json!({
                "productId": product_id,
                "attributeId": attribute_id,
                "value": value,
            }),
            true,
        )
        .await
}

pub async fn update_product_attribute(
    client: &ApiClient,
    product_attribute: &ProductAttribute,
) -> Result<DataResponse, ApiError> {
    client
        .post("productAttribute/update", product_attribute, true)
        .await
}

pub async fn delete_product_attribute(
    client: &ApiClient,
    id: i64,
) -> Result<DataResponse, ApiError> {
    client
        .post("productAttribute/delete", &json!({ "id": id }), true)
        .await
}
