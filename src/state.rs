use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::engine::market::{Marketplace, TickReport};
use crate::engine::projection::MapSnapshot;
use crate::models::cart::Cart;
use crate::models::user::UserProfile;
use crate::observability::metrics::Metrics;

/// Process-wide state. The marketplace sits behind one lock so a reader sees
/// either the state before a tick or after it, never in between.
pub struct AppState {
    pub market: RwLock<Marketplace>,
    pub carts: DashMap<Uuid, Cart>,
    pub users: DashMap<Uuid, UserProfile>,
    pub snapshot_tx: broadcast::Sender<MapSnapshot>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(market: Marketplace, event_buffer_size: usize) -> Self {
        let (snapshot_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            market: RwLock::new(market),
            carts: DashMap::new(),
            users: DashMap::new(),
            snapshot_tx,
            metrics: Metrics::new(),
        }
    }

    /// Applies one simulation step and publishes the resulting snapshot.
    pub async fn tick(&self) -> TickReport {
        let start = Instant::now();

        let (report, snapshot) = {
            let mut market = self.market.write().await;
            let report = market.tick();
            (report, market.snapshot())
        };

        self.metrics.ticks_total.inc();
        self.metrics
            .orders_delivered_total
            .inc_by(report.delivered.len() as u64);
        self.metrics
            .pickups_completed_total
            .inc_by(report.completed_pickups.len() as u64);
        self.metrics
            .active_deliveries
            .set(report.active_deliveries as i64);
        self.metrics.active_pickups.set(report.active_pickups as i64);
        self.metrics
            .tick_duration_seconds
            .observe(start.elapsed().as_secs_f64());

        // No subscribers is not an error.
        let _ = self.snapshot_tx.send(snapshot);

        report
    }

    pub async fn snapshot(&self) -> MapSnapshot {
        self.market.read().await.snapshot()
    }
}
