//! Order Mutation Gateway
//!
//! Applies a partial update and hands back the post-mutation row. It never
//! calls the orchestrator; callers compose the two.

use std::sync::Arc;

use shared::models::{Order, OrderUpdate};

use super::error::MutationError;
use super::traits::OrderStore;

#[derive(Clone)]
pub struct OrderGateway {
    orders: Arc<dyn OrderStore>,
}

impl OrderGateway {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    /// Apply-and-return, last writer wins.
    ///
    /// Any status value is accepted; transition legality is the caller's
    /// concern.
    pub async fn apply_transition(
        &self,
        order_id: &str,
        update: &OrderUpdate,
    ) -> Result<Order, MutationError> {
        match self.orders.update_order(order_id, update).await {
            Ok(Some(order)) => {
                tracing::info!(order_id = %order.id, status = %order.status, "Order updated");
                Ok(order)
            }
            Ok(None) => {
                tracing::error!(order_id = %order_id, "Order update rejected: not found");
                Err(MutationError::OrderNotFound(order_id.to_string()))
            }
            Err(e) => {
                tracing::error!(order_id = %order_id, error = %e, "Order update rejected");
                Err(MutationError::from_store(order_id, e))
            }
        }
    }
}
