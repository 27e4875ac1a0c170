//! Transition Orchestrator
//!
//! Mutation first, then the notification branches in a fixed order
//! (customer, then drivers). Only a mutation failure reaches the caller; every
//! branch failure, panics included, is logged and folded into the report.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use rust_decimal::{Decimal, RoundingStrategy};

use courier_channel::{ChannelResult, MessageChannel};
use shared::models::{
    Customer, CustomerDetail, CustomerReport, DriverReport, NotificationsReport, Order,
    OrderStatus, OrderUpdate, TransitionResponse,
};

use crate::config::PipelineConfig;

use super::dispatcher::{MessageBody, MessageDispatcher};
use super::error::{LookupError, MutationError};
use super::fanout::DriverFanout;
use super::gateway::OrderGateway;
use super::memory::MemoryStore;
use super::template::{TemplateRenderer, TemplateVars};
use super::traits::{
    CustomerDirectory, DriverBroadcaster, DriverDirectory, DriverNotificationStore,
    NotificationStore, OrderStore, TemplateStore,
};

/// External systems the pipeline talks to
#[derive(Clone)]
pub struct Collaborators {
    pub orders: Arc<dyn OrderStore>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub drivers: Arc<dyn DriverDirectory>,
    pub templates: Arc<dyn TemplateStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub driver_notifications: Arc<dyn DriverNotificationStore>,
    pub broadcaster: Arc<dyn DriverBroadcaster>,
    pub channel: Arc<dyn MessageChannel>,
}

impl Collaborators {
    /// Every store backed by one [`MemoryStore`]
    pub fn in_memory(
        store: Arc<MemoryStore>,
        channel: Arc<dyn MessageChannel>,
        broadcaster: Arc<dyn DriverBroadcaster>,
    ) -> Self {
        Self {
            orders: store.clone(),
            customers: store.clone(),
            drivers: store.clone(),
            templates: store.clone(),
            notifications: store.clone(),
            driver_notifications: store,
            broadcaster,
            channel,
        }
    }
}

/// Human label for known statuses, raw value otherwise
fn status_label(status_key: &str) -> String {
    OrderStatus::parse(status_key).map_or_else(|| status_key.to_string(), |s| s.label().to_string())
}

/// Two decimals, half away from zero
pub fn format_amount(amount: f64) -> String {
    match amount.to_string().parse::<Decimal>() {
        Ok(value) => {
            let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.2}")
        }
        Err(_) => format!("{amount:.2}"),
    }
}

/// Variables offered to customer templates
pub fn template_vars(order: &Order, customer: &Customer, status_key: &str) -> TemplateVars {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    TemplateVars::from([
        ("customerName".to_string(), customer.name.clone()),
        ("orderNumber".to_string(), order.order_number.clone()),
        ("status".to_string(), status_label(status_key)),
        ("totalAmount".to_string(), format_amount(order.total_amount)),
        ("deliveryDate".to_string(), opt(&order.delivery_date)),
        ("deliveryTime".to_string(), opt(&order.delivery_time)),
        ("deliveryAddress".to_string(), opt(&order.delivery_address)),
    ])
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct TransitionOrchestrator {
    gateway: OrderGateway,
    orders: Arc<dyn OrderStore>,
    customers: Arc<dyn CustomerDirectory>,
    dispatcher: MessageDispatcher,
    fanout: DriverFanout,
    work_available_status: OrderStatus,
    lookup_timeout: Duration,
}

impl TransitionOrchestrator {
    pub fn new(c: Collaborators, config: &PipelineConfig) -> ChannelResult<Self> {
        let renderer = TemplateRenderer::new(c.templates);
        let dispatcher = MessageDispatcher::new(
            c.channel,
            c.notifications,
            renderer,
            config.phone.normalizer()?,
            config.channel_timeout,
        );
        let fanout = DriverFanout::new(
            c.drivers,
            c.driver_notifications,
            c.broadcaster,
            config.directory_timeout,
            config.webhook_timeout,
        );

        Ok(Self {
            gateway: OrderGateway::new(c.orders.clone()),
            orders: c.orders,
            customers: c.customers,
            dispatcher,
            fanout,
            work_available_status: config.work_available_status,
            lookup_timeout: config.directory_timeout,
        })
    }

    /// Apply the update, then notify.
    ///
    /// Returns `Err` only when the mutation itself fails; in that case no
    /// notification is attempted.
    pub async fn perform_transition(
        &self,
        order_id: &str,
        update: OrderUpdate,
    ) -> Result<TransitionResponse, MutationError> {
        let order = self.gateway.apply_transition(order_id, &update).await?;

        let customer = self.customer_branch(&order).await;
        let drivers = self.driver_branch(&order).await;

        Ok(TransitionResponse {
            order,
            notifications: NotificationsReport { customer, drivers },
        })
    }

    /// Manual re-send of the customer message.
    ///
    /// Uses the order's current status unless `status` is given; a custom
    /// `message` bypasses templating.
    pub async fn resend_notification(
        &self,
        order_id: &str,
        status: Option<String>,
        message: Option<String>,
    ) -> Result<CustomerReport, LookupError> {
        let order = match tokio::time::timeout(self.lookup_timeout, self.orders.get_order(order_id))
            .await
        {
            Ok(Ok(Some(order))) => order,
            Ok(Ok(None)) => return Err(LookupError::OrderNotFound(order_id.to_string())),
            Ok(Err(source)) => {
                return Err(LookupError::Store {
                    what: "Order",
                    source,
                });
            }
            Err(_) => {
                return Err(LookupError::Timeout {
                    what: "Order",
                    after: self.lookup_timeout,
                });
            }
        };

        let status_key = status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| order.status.clone());
        let custom = message.filter(|m| !m.trim().is_empty());

        tracing::info!(order_id = %order.id, status = %status_key, custom = custom.is_some(), "Resending customer notification");
        Ok(self
            .contained("customer", &order, self.notify_customer(&order, &status_key, custom))
            .await
            .unwrap_or_else(CustomerReport::failed))
    }

    async fn customer_branch(&self, order: &Order) -> CustomerReport {
        self.contained("customer", order, self.notify_customer(order, &order.status, None))
            .await
            .unwrap_or_else(CustomerReport::failed)
    }

    async fn driver_branch(&self, order: &Order) -> DriverReport {
        match order.known_status() {
            Some(status) if status == self.work_available_status => {
                let run = async {
                    match self.fanout.notify_available_work(order).await {
                        Ok(outcome) => DriverReport::from(outcome),
                        Err(e) => {
                            tracing::error!(
                                order_id = %order.id,
                                status = %order.status,
                                branch = "drivers",
                                error = %e,
                                "Driver fan-out could not run"
                            );
                            DriverReport::failed(e.to_string())
                        }
                    }
                };
                self.contained("drivers", order, run)
                    .await
                    .unwrap_or_else(DriverReport::failed)
            }
            Some(_) | None => DriverReport::not_applicable(order.status.clone()),
        }
    }

    /// Run one branch, turning a panic into an error string
    async fn contained<T>(
        &self,
        branch: &'static str,
        order: &Order,
        fut: impl Future<Output = T>,
    ) -> Result<T, String> {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(value) => Ok(value),
            Err(panic) => {
                let message = format!("{branch} branch panicked: {}", panic_message(&*panic));
                tracing::error!(
                    order_id = %order.id,
                    status = %order.status,
                    branch,
                    error = %message,
                    "Notification branch panicked"
                );
                Err(message)
            }
        }
    }

    async fn lookup_customer(&self, order: &Order) -> Result<Customer, LookupError> {
        let customer_id = order
            .customer_id
            .as_deref()
            .ok_or_else(|| LookupError::NoCustomer(order.id.clone()))?;

        let customer = match tokio::time::timeout(
            self.lookup_timeout,
            self.customers.get_customer(customer_id),
        )
        .await
        {
            Ok(Ok(Some(customer))) => customer,
            Ok(Ok(None)) => return Err(LookupError::CustomerNotFound(customer_id.to_string())),
            Ok(Err(source)) => {
                return Err(LookupError::Store {
                    what: "Customer",
                    source,
                });
            }
            Err(_) => {
                return Err(LookupError::Timeout {
                    what: "Customer",
                    after: self.lookup_timeout,
                });
            }
        };

        if customer.reachable_phone().is_none() {
            return Err(LookupError::NoPhone(customer.id));
        }
        Ok(customer)
    }

    async fn notify_customer(
        &self,
        order: &Order,
        status_key: &str,
        custom: Option<String>,
    ) -> CustomerReport {
        let customer = match self.lookup_customer(order).await {
            Ok(customer) => customer,
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id,
                    status = %status_key,
                    branch = "customer",
                    error = %e,
                    "Customer notification skipped"
                );
                return CustomerReport::skipped(e.to_string());
            }
        };
        let phone = customer.reachable_phone().unwrap_or_default().to_string();

        let body = match custom {
            Some(text) => MessageBody::Custom(text),
            None => MessageBody::Template {
                status_key: status_key.to_string(),
                vars: template_vars(order, &customer, status_key),
            },
        };

        match self.dispatcher.dispatch(&phone, body, Some(&order.id)).await {
            Ok(sent) => CustomerReport::sent(sent.record_id, sent.message_id, sent.phone),
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id,
                    status = %status_key,
                    branch = "customer",
                    error = %e,
                    http_status = ?e.http_status(),
                    "Customer notification failed"
                );
                CustomerReport {
                    attempted: true,
                    success: false,
                    detail: CustomerDetail::Failed {
                        record_id: e.record_id(),
                        error: e.to_string(),
                        http_status: e.http_status(),
                        payload: e.payload(),
                        debug: e.debug().cloned(),
                    },
                }
            }
        }
    }
}
