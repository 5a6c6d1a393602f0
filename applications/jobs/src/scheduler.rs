/// Periodic derivation over a fixed set of users
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tunes_core::{SmartPlaylistStore, UserId};
use tunes_smart_playlists::SmartPlaylistDeriver;

/// Totals for one pass over every configured user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub users: usize,
    pub jobs_completed: usize,
    pub jobs_failed: usize,
}

pub struct Scheduler<S> {
    deriver: Arc<SmartPlaylistDeriver<S>>,
    users: Vec<UserId>,
    interval: Duration,
}

impl<S: SmartPlaylistStore> Scheduler<S> {
    pub fn new(deriver: Arc<SmartPlaylistDeriver<S>>, users: Vec<UserId>, interval: Duration) -> Self {
        Self {
            deriver,
            users,
            interval,
        }
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Run every job for every user once
    ///
    /// Users are processed one after another; a failing job never stops
    /// the remaining jobs or users.
    pub async fn run_cycle(&self) -> CycleSummary {
        let mut summary = CycleSummary::default();

        for user_id in &self.users {
            let report = self.deriver.run_all(user_id).await;
            summary.users += 1;
            summary.jobs_completed += report.completed.len();
            summary.jobs_failed += report.failures.len();
        }

        tracing::info!(
            "Derivation cycle finished: {} users, {} jobs completed, {} failed",
            summary.users,
            summary.jobs_completed,
            summary.jobs_failed
        );
        summary
    }

    /// Run a cycle immediately and then once per interval until `shutdown` resolves
    ///
    /// Returns the number of cycles run.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> usize {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut cycles = 0;
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Scheduler stopping after {} cycles", cycles);
                    return cycles;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                    cycles += 1;
                }
            }
        }
    }
}
