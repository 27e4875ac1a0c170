mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::*;
use courier_channel::{FallbackChannel, MessageChannel};
use courier_cloud::pipeline::{
    Collaborators, CustomerDirectory, DriverDirectory, MemoryStore, MutationError, StoreError,
    StoreResult, TransitionOrchestrator,
};
use courier_cloud::webhook::NoopBroadcaster;
use shared::models::{
    Customer, CustomerDetail, Driver, DriverDetail, KIND_NEW_DELIVERY, NotificationStatus, OrderStatus,
    OrderUpdate, WebhookStatus,
};

#[tokio::test]
async fn confirmed_order_sends_one_customer_message() {
    let store = seeded_store();
    let channel = ScriptedChannel::ok();
    let pipeline = pipeline(&store, channel.clone(), Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O1", OrderUpdate::status("Confirmed"))
        .await
        .unwrap();

    assert_eq!(resp.order.status, "Confirmed");
    let customer = &resp.notifications.customer;
    assert!(customer.attempted && customer.success);
    match &customer.detail {
        CustomerDetail::Sent {
            phone, message_id, ..
        } => {
            assert_eq!(phone, "24177123456");
            assert_eq!(message_id.as_deref(), Some("msg-1"));
        }
        other => panic!("unexpected {other:?}"),
    }

    let records = store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, NotificationStatus::Sent);
    assert_eq!(records[0].order_id.as_deref(), Some("O1"));
    assert!(records[0].message.contains("CMD-0001"));
    assert!(records[0].message.contains("24.50"));

    assert!(!resp.notifications.drivers.attempted);
    assert!(store.driver_notifications().is_empty());
}

#[tokio::test]
async fn preparing_order_notifies_every_available_driver() {
    let store = seeded_store();
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let pipeline = pipeline(&store, ScriptedChannel::ok(), broadcaster.clone());

    let resp = pipeline
        .perform_transition("O2", OrderUpdate::status("Preparing"))
        .await
        .unwrap();

    let drivers = &resp.notifications.drivers;
    assert!(drivers.attempted);
    assert_eq!(drivers.count, 3);
    assert_eq!(
        drivers.detail,
        DriverDetail::Notified {
            eligible: 3,
            failures: vec![],
            webhook: WebhookStatus::Delivered,
        }
    );

    let rows = store.driver_notifications();
    assert_eq!(rows.len(), 3);
    let mut ids: Vec<_> = rows.iter().map(|r| r.driver_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, ["D1", "D2", "D3"]);
    for row in &rows {
        assert_eq!(row.kind, KIND_NEW_DELIVERY);
        assert_eq!(row.order_id.as_deref(), Some("O2"));
        assert!(row.message.contains("CMD-0002"));
        assert!(!row.read);
    }

    // Customer is still told the order is being prepared
    assert!(resp.notifications.customer.success);
    assert_eq!(store.notifications().len(), 1);
    assert!(store.notifications()[0].message.contains("being prepared"));

    let events = broadcaster.events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].order_id, "O2");
    assert_eq!(events[0].driver_count, 3);
}

#[tokio::test]
async fn only_the_work_status_triggers_fanout() {
    for status in OrderStatus::ALL {
        let store = seeded_store();
        let pipeline = pipeline(&store, ScriptedChannel::ok(), Arc::new(NoopBroadcaster));

        let resp = pipeline
            .perform_transition("O1", OrderUpdate::status(status.as_str()))
            .await
            .unwrap();

        assert_eq!(store.notifications().len(), 1, "{status}");
        let expected = if status == OrderStatus::Preparing { 3 } else { 0 };
        assert_eq!(store.driver_notifications().len(), expected, "{status}");
        assert_eq!(resp.notifications.drivers.count, expected);
    }
}

#[tokio::test]
async fn channel_failure_keeps_the_mutation() {
    let store = seeded_store();
    let pipeline = pipeline(&store, ScriptedChannel::failing(503), Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O1", OrderUpdate::status("OutForDelivery"))
        .await
        .unwrap();

    assert_eq!(resp.order.status, "OutForDelivery");
    let customer = &resp.notifications.customer;
    assert!(customer.attempted);
    assert!(!customer.success);
    match &customer.detail {
        CustomerDetail::Failed {
            record_id,
            http_status,
            payload,
            debug,
            ..
        } => {
            assert!(record_id.is_some());
            assert_eq!(*http_status, Some(503));
            assert_eq!(payload.as_ref().unwrap()["status"], 503);
            let debug = debug.as_ref().unwrap();
            assert!(debug.credentials_configured);
            assert_eq!(debug.base_url, "https://gateway.test");
            assert_eq!(debug.phone, "24177123456");
        }
        other => panic!("unexpected {other:?}"),
    }

    let records = store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, NotificationStatus::Failed);
    assert!(records[0].error.is_some());
}

/// Directory that lists one driver whose id the store will refuse
struct DirectoryWithBadDriver;

#[async_trait]
impl DriverDirectory for DirectoryWithBadDriver {
    async fn list_available_drivers(&self) -> StoreResult<Vec<Driver>> {
        Ok(vec![driver("D1"), driver("D2"), driver("not-a-driver")])
    }
}

#[tokio::test]
async fn one_bad_driver_does_not_block_the_others() {
    let store = seeded_store();
    let mut collaborators = Collaborators::in_memory(
        store.clone(),
        ScriptedChannel::ok(),
        Arc::new(NoopBroadcaster),
    );
    collaborators.drivers = Arc::new(DirectoryWithBadDriver);
    let pipeline = TransitionOrchestrator::new(collaborators, &fast_config()).unwrap();

    let resp = pipeline
        .perform_transition("O2", OrderUpdate::status("Preparing"))
        .await
        .unwrap();

    assert_eq!(resp.notifications.drivers.count, 2);
    match &resp.notifications.drivers.detail {
        DriverDetail::Notified {
            eligible, failures, ..
        } => {
            assert_eq!(*eligible, 3);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].driver_id, "not-a-driver");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(store.driver_notifications().len(), 2);
}

#[tokio::test]
async fn customer_without_phone_gets_no_record() {
    let store = seeded_store();
    let channel = ScriptedChannel::ok();
    let pipeline = pipeline(&store, channel.clone(), Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O3", OrderUpdate::status("Confirmed"))
        .await
        .unwrap();

    let customer = &resp.notifications.customer;
    assert!(!customer.attempted);
    assert!(!customer.success);
    assert!(matches!(customer.detail, CustomerDetail::Skipped { .. }));
    assert!(store.notifications().is_empty());
    assert_eq!(channel.sent_count(), 0);
}

#[tokio::test]
async fn order_without_customer_is_skipped() {
    let store = seeded_store();
    store.put_order(order("O4", "CMD-0004", None));
    let pipeline = pipeline(&store, ScriptedChannel::ok(), Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O4", OrderUpdate::status("Ready"))
        .await
        .unwrap();

    assert!(!resp.notifications.customer.attempted);
    assert!(store.notifications().is_empty());
}

#[tokio::test]
async fn failed_mutation_attempts_nothing() {
    let store = seeded_store();
    let channel = ScriptedChannel::ok();
    let pipeline = pipeline(&store, channel.clone(), Arc::new(NoopBroadcaster));

    let err = pipeline
        .perform_transition("missing", OrderUpdate::status("Preparing"))
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::OrderNotFound(_)));
    assert_eq!(channel.sent_count(), 0);
    assert!(store.notifications().is_empty());
    assert!(store.driver_notifications().is_empty());
}

#[tokio::test]
async fn unknown_status_is_applied_and_announced_generically() {
    let store = seeded_store();
    let pipeline = pipeline(&store, ScriptedChannel::ok(), Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O1", OrderUpdate::status("Refunded"))
        .await
        .unwrap();

    assert_eq!(resp.order.status, "Refunded");
    assert!(resp.notifications.customer.success);
    assert!(store.notifications()[0].message.contains("is now: Refunded"));
    assert_eq!(
        resp.notifications.drivers.detail,
        DriverDetail::NotApplicable {
            status: "Refunded".into()
        }
    );
}

#[tokio::test]
async fn status_matching_is_case_sensitive() {
    let store = seeded_store();
    let pipeline = pipeline(&store, ScriptedChannel::ok(), Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O2", OrderUpdate::status("preparing"))
        .await
        .unwrap();

    assert_eq!(resp.notifications.drivers.count, 0);
    assert!(store.driver_notifications().is_empty());
}

#[tokio::test]
async fn missing_credential_reports_failure_without_record() {
    let store = seeded_store();
    let channel = ScriptedChannel::unconfigured();
    let pipeline = pipeline(&store, channel.clone(), Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O1", OrderUpdate::status("Confirmed"))
        .await
        .unwrap();

    let customer = &resp.notifications.customer;
    assert!(customer.attempted && !customer.success);
    match &customer.detail {
        CustomerDetail::Failed { debug, .. } => {
            assert!(!debug.as_ref().unwrap().credentials_configured);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(store.notifications().is_empty());
    assert_eq!(channel.sent_count(), 0);
}

#[tokio::test]
async fn fallback_strategy_delivers_when_primary_fails() {
    let store = seeded_store();
    let primary = ScriptedChannel::failing(502);
    let secondary = ScriptedChannel::ok();
    let strategies: Vec<Arc<dyn MessageChannel>> = vec![primary.clone(), secondary.clone()];
    let pipeline = pipeline(
        &store,
        Arc::new(FallbackChannel::new(strategies)),
        Arc::new(NoopBroadcaster),
    );

    let resp = pipeline
        .perform_transition("O1", OrderUpdate::status("Delivered"))
        .await
        .unwrap();

    assert!(resp.notifications.customer.success);
    assert_eq!(primary.sent_count(), 1);
    assert_eq!(secondary.sent_count(), 1);
    assert_eq!(store.notifications()[0].status, NotificationStatus::Sent);
}

struct PanickingDirectory;

#[async_trait]
impl DriverDirectory for PanickingDirectory {
    async fn list_available_drivers(&self) -> StoreResult<Vec<Driver>> {
        panic!("driver directory exploded");
    }
}

#[tokio::test]
async fn panicking_branch_is_contained() {
    let store = seeded_store();
    let mut collaborators = Collaborators::in_memory(
        store.clone(),
        ScriptedChannel::ok(),
        Arc::new(NoopBroadcaster),
    );
    collaborators.drivers = Arc::new(PanickingDirectory);
    let pipeline = TransitionOrchestrator::new(collaborators, &fast_config()).unwrap();

    let resp = pipeline
        .perform_transition("O2", OrderUpdate::status("Preparing"))
        .await
        .unwrap();

    assert!(resp.notifications.customer.success);
    let drivers = &resp.notifications.drivers;
    assert!(drivers.attempted);
    assert_eq!(drivers.count, 0);
    match &drivers.detail {
        DriverDetail::Failed { error } => assert!(error.contains("driver directory exploded")),
        other => panic!("unexpected {other:?}"),
    }
}

struct SlowDirectory;

#[async_trait]
impl DriverDirectory for SlowDirectory {
    async fn list_available_drivers(&self) -> StoreResult<Vec<Driver>> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(vec![])
    }
}

#[tokio::test]
async fn driver_directory_timeout_is_reported() {
    let store = seeded_store();
    let mut collaborators = Collaborators::in_memory(
        store.clone(),
        ScriptedChannel::ok(),
        Arc::new(NoopBroadcaster),
    );
    collaborators.drivers = Arc::new(SlowDirectory);
    let pipeline = TransitionOrchestrator::new(collaborators, &fast_config()).unwrap();

    let resp = pipeline
        .perform_transition("O2", OrderUpdate::status("Preparing"))
        .await
        .unwrap();

    match &resp.notifications.drivers.detail {
        DriverDetail::Failed { error } => assert!(error.contains("timed out")),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(resp.order.status, "Preparing");
}

#[tokio::test]
async fn resend_creates_a_new_record_each_time() {
    let store = seeded_store();
    let pipeline = pipeline(&store, ScriptedChannel::ok(), Arc::new(NoopBroadcaster));

    pipeline
        .perform_transition("O1", OrderUpdate::status("Ready"))
        .await
        .unwrap();
    let report = pipeline
        .resend_notification("O1", None, None)
        .await
        .unwrap();
    assert!(report.success);

    let custom = pipeline
        .resend_notification("O1", None, Some("Your driver is 5 minutes away".into()))
        .await
        .unwrap();
    assert!(custom.success);

    let records = store.notifications();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status == NotificationStatus::Sent));
    assert_eq!(records[2].message, "Your driver is 5 minutes away");
    // Resend never creates driver rows
    assert!(store.driver_notifications().is_empty());
}

#[tokio::test]
async fn resend_with_explicit_status_uses_its_template() {
    let store = seeded_store();
    store.put_template("Cancelled", "Sorry {customerName}, {orderNumber} was cancelled");
    let pipeline = pipeline(&store, ScriptedChannel::ok(), Arc::new(NoopBroadcaster));

    pipeline
        .resend_notification("O1", Some("Cancelled".into()), None)
        .await
        .unwrap();

    assert_eq!(
        store.notifications()[0].message,
        "Sorry Awa Ndong, CMD-0001 was cancelled"
    );
}

#[tokio::test]
async fn resend_for_unknown_order_fails() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = pipeline(&store, ScriptedChannel::ok(), Arc::new(NoopBroadcaster));

    assert!(pipeline.resend_notification("nope", None, None).await.is_err());
}

/// Customer directory whose backend is down
struct UnavailableCustomers;

#[async_trait]
impl CustomerDirectory for UnavailableCustomers {
    async fn get_customer(&self, _customer_id: &str) -> StoreResult<Option<Customer>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Customer directory slower than the lookup timeout
struct SlowCustomers;

#[async_trait]
impl CustomerDirectory for SlowCustomers {
    async fn get_customer(&self, customer_id: &str) -> StoreResult<Option<Customer>> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(Some(customer(customer_id, Some("077123456"))))
    }
}

async fn transition_with_customers(
    customers: Arc<dyn CustomerDirectory>,
) -> (Arc<MemoryStore>, Arc<ScriptedChannel>, shared::models::TransitionResponse) {
    let store = seeded_store();
    let channel = ScriptedChannel::ok();
    let mut collaborators =
        Collaborators::in_memory(store.clone(), channel.clone(), Arc::new(NoopBroadcaster));
    collaborators.customers = customers;
    let pipeline = TransitionOrchestrator::new(collaborators, &fast_config()).unwrap();

    let resp = pipeline
        .perform_transition("O2", OrderUpdate::status("Preparing"))
        .await
        .unwrap();
    (store, channel, resp)
}

#[tokio::test]
async fn customer_lookup_failure_skips_message_but_not_drivers() {
    let (store, channel, resp) = transition_with_customers(Arc::new(UnavailableCustomers)).await;

    let customer = &resp.notifications.customer;
    assert!(!customer.attempted && !customer.success);
    match &customer.detail {
        CustomerDetail::Skipped { reason } => assert!(reason.contains("connection refused")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(store.notifications().is_empty());
    assert_eq!(channel.sent_count(), 0);

    assert!(resp.notifications.drivers.attempted);
    assert_eq!(resp.notifications.drivers.count, 3);
    assert_eq!(store.driver_notifications().len(), 3);
}

#[tokio::test]
async fn customer_lookup_timeout_skips_message_but_not_drivers() {
    let (store, channel, resp) = transition_with_customers(Arc::new(SlowCustomers)).await;

    let customer = &resp.notifications.customer;
    assert!(!customer.attempted);
    match &customer.detail {
        CustomerDetail::Skipped { reason } => assert!(reason.contains("timed out")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(store.notifications().is_empty());
    assert_eq!(channel.sent_count(), 0);

    assert_eq!(resp.notifications.drivers.count, 3);
    assert_eq!(resp.order.status, "Preparing");
}
