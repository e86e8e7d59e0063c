use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub ticks_total: IntCounter,
    pub orders_placed_total: IntCounter,
    pub orders_delivered_total: IntCounter,
    pub pickups_requested_total: IntCounter,
    pub pickups_completed_total: IntCounter,
    pub active_deliveries: IntGauge,
    pub active_pickups: IntGauge,
    pub tick_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let ticks_total = IntCounter::new("simulation_ticks_total", "Simulation ticks processed")
            .expect("valid simulation_ticks_total metric");

        let orders_placed_total = IntCounter::new("orders_placed_total", "Orders placed at checkout")
            .expect("valid orders_placed_total metric");

        let orders_delivered_total =
            IntCounter::new("orders_delivered_total", "Orders that reached their drop-off")
                .expect("valid orders_delivered_total metric");

        let pickups_requested_total =
            IntCounter::new("pickups_requested_total", "Farm pickups requested")
                .expect("valid pickups_requested_total metric");

        let pickups_completed_total = IntCounter::new(
            "pickups_completed_total",
            "Farm pickups returned to the warehouse",
        )
        .expect("valid pickups_completed_total metric");

        let active_deliveries = IntGauge::new("active_deliveries", "Orders not yet delivered")
            .expect("valid active_deliveries metric");

        let active_pickups = IntGauge::new("active_pickups", "Pickups currently on the road")
            .expect("valid active_pickups metric");

        let tick_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "tick_duration_seconds",
            "Time spent applying one simulation tick",
        ))
        .expect("valid tick_duration_seconds metric");

        registry
            .register(Box::new(ticks_total.clone()))
            .expect("register simulation_ticks_total");
        registry
            .register(Box::new(orders_placed_total.clone()))
            .expect("register orders_placed_total");
        registry
            .register(Box::new(orders_delivered_total.clone()))
            .expect("register orders_delivered_total");
        registry
            .register(Box::new(pickups_requested_total.clone()))
            .expect("register pickups_requested_total");
        registry
            .register(Box::new(pickups_completed_total.clone()))
            .expect("register pickups_completed_total");
        registry
            .register(Box::new(active_deliveries.clone()))
            .expect("register active_deliveries");
        registry
            .register(Box::new(active_pickups.clone()))
            .expect("register active_pickups");
        registry
            .register(Box::new(tick_duration_seconds.clone()))
            .expect("register tick_duration_seconds");

        Self {
            registry,
            ticks_total,
            orders_placed_total,
            orders_delivered_total,
            pickups_requested_total,
            pickups_completed_total,
            active_deliveries,
            active_pickups,
            tick_duration_seconds,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
