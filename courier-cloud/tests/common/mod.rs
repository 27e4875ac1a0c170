#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use courier_channel::{ChannelError, ChannelInfo, ChannelResult, MessageChannel, SentMessage};
use parking_lot::Mutex;

use courier_cloud::config::PipelineConfig;
use courier_cloud::pipeline::{
    BroadcastError, Collaborators, DriverBroadcaster, MemoryStore, TransitionOrchestrator,
    WorkAvailable,
};
use shared::models::{Customer, Driver, Order};

/// Channel double answering from a fixed script
pub struct ScriptedChannel {
    pub configured: bool,
    pub fail_status: Option<u16>,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedChannel {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            fail_status: None,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            fail_status: Some(status),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            configured: false,
            fail_status: None,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl MessageChannel for ScriptedChannel {
    async fn send_text(&self, to: &str, body: &str) -> ChannelResult<SentMessage> {
        if !self.configured {
            return Err(ChannelError::MissingCredential);
        }
        let n = {
            let mut sent = self.sent.lock();
            sent.push((to.to_string(), body.to_string()));
            sent.len()
        };
        match self.fail_status {
            Some(status) => Err(ChannelError::Http {
                status,
                payload: serde_json::json!({"error": "gateway unavailable"}),
            }),
            None => Ok(SentMessage {
                id: Some(format!("msg-{n}")),
                raw: serde_json::json!({"id": format!("msg-{n}")}),
            }),
        }
    }

    fn info(&self) -> ChannelInfo {
        ChannelInfo {
            name: "scripted".into(),
            base_url: "https://gateway.test".into(),
            credentials_configured: self.configured,
        }
    }
}

/// Broadcaster double recording every event
#[derive(Default)]
pub struct RecordingBroadcaster {
    pub events: Mutex<Vec<WorkAvailable>>,
}

#[async_trait]
impl DriverBroadcaster for RecordingBroadcaster {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn broadcast(&self, event: &WorkAvailable) -> Result<(), BroadcastError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

pub fn order(id: &str, number: &str, customer_id: Option<&str>) -> Order {
    Order {
        id: id.into(),
        order_number: number.into(),
        status: "Pending".into(),
        customer_id: customer_id.map(str::to_string),
        total_amount: 24.5,
        delivery_address: Some("Quartier Louis, Libreville".into()),
        delivery_date: Some("2025-03-01".into()),
        delivery_time: Some("12:30".into()),
        notes: None,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
    }
}

pub fn customer(id: &str, phone: Option<&str>) -> Customer {
    Customer {
        id: id.into(),
        name: "Awa Ndong".into(),
        phone: phone.map(str::to_string),
    }
}

pub fn driver(id: &str) -> Driver {
    Driver {
        id: id.into(),
        name: format!("Driver {id}"),
        phone: None,
        is_available: true,
    }
}

pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        channel_timeout: Duration::from_millis(200),
        directory_timeout: Duration::from_millis(200),
        webhook_timeout: Duration::from_millis(200),
        ..PipelineConfig::default()
    }
}

/// Orchestrator over one MemoryStore
pub fn pipeline(
    store: &Arc<MemoryStore>,
    channel: Arc<dyn MessageChannel>,
    broadcaster: Arc<dyn DriverBroadcaster>,
) -> TransitionOrchestrator {
    TransitionOrchestrator::new(
        Collaborators::in_memory(store.clone(), channel, broadcaster),
        &fast_config(),
    )
    .expect("pipeline config")
}

/// O1 with a reachable customer, O2 with the same customer, three drivers
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.put_customer(customer("C1", Some("077123456")));
    store.put_customer(customer("C2", None));
    store.put_order(order("O1", "CMD-0001", Some("C1")));
    store.put_order(order("O2", "CMD-0002", Some("C1")));
    store.put_order(order("O3", "CMD-0003", Some("C2")));
    for id in ["D1", "D2", "D3"] {
        store.put_driver(driver(id));
    }
    store
}
