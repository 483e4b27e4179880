use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Runs periodic jobs on the tokio runtime.
///
/// Jobs fire immediately when scheduled and then keep firing `period` after
/// the previous invocation *finished*, so a slow poll cycle never overlaps
/// the next one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler;

impl Scheduler {
    pub fn new() -> Self {
        Self
    }

    pub fn run_every<F, Fut>(&self, name: &'static str, period: Duration, mut f: F) -> JobHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        debug!("Scheduled job {} every {:?}", name, period);

        let task = tokio::spawn(async move {
            loop {
                f().await;
                tokio::time::sleep(period).await;
            }
        });

        JobHandle { name, period, task }
    }
}

/// Handle to a scheduled job.
///
/// Dropping the handle stops the job; an in-flight invocation is aborted
/// with it.
#[derive(Debug)]
pub struct JobHandle {
    name: &'static str,
    period: Duration,
    task: JoinHandle<()>,
}

impl JobHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stop the job.
    pub fn cancel(self) {
        debug!("Cancelled job {}", self.name);
    }
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counting_job(count: &Arc<AtomicUsize>) -> impl FnMut() -> std::future::Ready<()> {
        let count = count.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_fires_immediately() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));

        let _job = scheduler.run_every("test", Duration::from_secs(60), counting_job(&count));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_fires_periodically() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));

        let _job = scheduler.run_every("test", Duration::from_secs(60), counting_job(&count));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_job_stops_firing() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));

        let job = scheduler.run_every("test", Duration::from_secs(60), counting_job(&count));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        job.cancel();
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_period_counts_from_completion() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        // Each invocation takes 30s, so with a 60s period the job runs at
        // t=0, t=90, t=180, not at t=0, t=60, t=120.
        let _job = scheduler.run_every("slow", Duration::from_secs(60), move || {
            let c = c.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_reports_name_and_period() {
        let scheduler = Scheduler::new();
        let job = scheduler.run_every("named", Duration::from_secs(5), || std::future::ready(()));

        assert_eq!(job.name(), "named");
        assert_eq!(job.period(), Duration::from_secs(5));
    }
}
