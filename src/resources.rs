//! Per-resource shortcuts over the generic verb methods.
//!
//! Each method only fixes the endpoint; requests go through
//! [`Api::do_request`](crate::rest::Api::do_request) like any other call.

use reqwest::blocking::Response;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::rest::Api;

impl Api {
    /// List products
    pub fn products(&self, query: Option<&Map<String, Value>>) -> Result<Response> {
        self.get("products", query)
    }

    /// Fetch one product
    pub fn product(&self, id: u64) -> Result<Response> {
        self.get(&format!("products/{}", id), None)
    }

    /// Create a product
    pub fn create_product(&self, product: &Value) -> Result<Response> {
        self.post("products", product, None)
    }

    /// Update a product
    pub fn update_product(&self, id: u64, changes: &Value) -> Result<Response> {
        self.put(&format!("products/{}", id), changes, None)
    }

    /// Delete a product; without `force` the store moves it to the trash
    pub fn delete_product(&self, id: u64, force: bool) -> Result<Response> {
        let query = force.then(|| json!({"force": true}));
        self.delete(
            &format!("products/{}", id),
            query.as_ref().and_then(Value::as_object),
        )
    }

    /// Create, update and delete products in one call
    pub fn batch_products(&self, batch: &Value) -> Result<Response> {
        self.post("products/batch", batch, None)
    }

    /// List the variations of a variable product
    pub fn variations(
        &self,
        product_id: u64,
        query: Option<&Map<String, Value>>,
    ) -> Result<Response> {
        self.get(&format!("products/{}/variations", product_id), query)
    }

    /// Create a variation of a variable product
    pub fn create_variation(&self, product_id: u64, variation: &Value) -> Result<Response> {
        self.post(&format!("products/{}/variations", product_id), variation, None)
    }

    /// List orders
    pub fn orders(&self, query: Option<&Map<String, Value>>) -> Result<Response> {
        self.get("orders", query)
    }

    /// Fetch one order
    pub fn order(&self, id: u64) -> Result<Response> {
        self.get(&format!("orders/{}", id), None)
    }

    /// Create an order
    pub fn create_order(&self, order: &Value) -> Result<Response> {
        self.post("orders", order, None)
    }

    /// Update an order
    pub fn update_order(&self, id: u64, changes: &Value) -> Result<Response> {
        self.put(&format!("orders/{}", id), changes, None)
    }
}
