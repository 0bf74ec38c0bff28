//! Order operations.

use std::sync::Arc;

use bazaar_core::{Order, OrderId, OrderStatus, StatusUpdate};
use reqwest::Method;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::client::segment;
use super::{ApiClient, ApiError};

impl ApiClient {
    /// All orders, in the order the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Arc<Vec<Order>>, ApiError> {
        if let Some(CacheValue::Orders(orders)) = self.cached(&CacheKey::Orders).await {
            debug!("Cache hit for orders");
            return Ok(orders);
        }

        let orders: Arc<Vec<Order>> = Arc::new(self.get_json("/orders").await?);
        self.store(CacheKey::Orders, CacheValue::Orders(Arc::clone(&orders)))
            .await;
        Ok(orders)
    }

    /// One order, looked up within the (cached) order list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no order has `id`.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.list_orders()
            .await?
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("order {id}")))
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change or the request fails.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let path = format!("/orders/{}", segment(id.as_str()));
        self.send_unit(Method::PATCH, &path, &StatusUpdate { status })
            .await?;
        self.invalidate(CacheTag::Orders);
        Ok(())
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError> {
        self.delete(&format!("/orders/{}", segment(id.as_str())))
            .await?;
        self.invalidate(CacheTag::Orders);
        Ok(())
    }
}
