use super::FloorPlan;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Ticks the timer of every occupied table once per period
///
/// One tick adds one minute; the period is one minute in production and
/// shorter in tests and demos.
#[derive(Clone)]
pub struct TableTimerTicker {
    floor_plan: Arc<RwLock<FloorPlan>>,
    period: Duration,
}

impl TableTimerTicker {
    pub fn new(floor_plan: Arc<RwLock<FloorPlan>>, period: Duration) -> Self {
        Self { floor_plan, period }
    }

    /// Run until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        tracing::info!(period_secs = self.period.as_secs(), "Table timer started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Table timer stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let ticked = self.floor_plan.write().tick();
                    if ticked > 0 {
                        tracing::debug!(tables = ticked, "Occupied table timers advanced");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Position, TableCreate, TableShape, TableStatus};

    #[tokio::test(start_paused = true)]
    async fn test_ticks_occupied_tables_until_cancelled() {
        let mut plan = FloorPlan::new();
        let floor = plan.add_floor("Main").unwrap();
        let table = plan
            .add_table(TableCreate {
                number: 1,
                capacity: 2,
                shape: TableShape::Round,
                position: Position::default(),
                floor_id: floor,
            })
            .unwrap();
        plan.set_status(table, TableStatus::Occupied).unwrap();
        let shared = Arc::new(RwLock::new(plan));

        let shutdown = CancellationToken::new();
        let ticker = TableTimerTicker::new(shared.clone(), Duration::from_secs(60));
        let handle = tokio::spawn(ticker.run(shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(60 * 3 + 1)).await;
        assert_eq!(shared.read().table(table).unwrap().timer, Some(3));

        shutdown.cancel();
        handle.await.unwrap();

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(shared.read().table(table).unwrap().timer, Some(3));
    }
}
