//! Chat synchronization client
//!
//! While a chat view is open the synchronizer polls the group on a fixed
//! interval and publishes a new snapshot whenever the message history changed.
//! Fetch failures are logged and the next tick tries again.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use crate::config::SyncConfig;
use crate::models::group::{Group, GroupId};
use crate::utils::errors::Result;

/// Where the synchronizer reads groups from
#[async_trait]
pub trait GroupSource: Send + Sync {
    async fn fetch_group(&self, id: GroupId) -> Result<Group>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Polling(GroupId),
}

struct PollTask {
    group_id: GroupId,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Keeps one group's chat ledger fresh while it is on screen
pub struct ChatSynchronizer {
    source: Arc<dyn GroupSource>,
    interval: Duration,
    snapshot: Arc<watch::Sender<Option<Group>>>,
    task: Option<PollTask>,
}

impl ChatSynchronizer {
    pub fn new(source: Arc<dyn GroupSource>, interval: Duration) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            source,
            interval,
            snapshot: Arc::new(snapshot),
            task: None,
        }
    }

    pub fn from_config(source: Arc<dyn GroupSource>, config: &SyncConfig) -> Self {
        Self::new(source, config.poll_interval())
    }

    pub fn state(&self) -> SyncState {
        match &self.task {
            Some(task) => SyncState::Polling(task.group_id),
            None => SyncState::Idle,
        }
    }

    /// Receiver notified whenever the displayed group changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Group>> {
        self.snapshot.subscribe()
    }

    /// The group as last displayed
    pub fn current(&self) -> Option<Group> {
        self.snapshot.borrow().clone()
    }

    /// Start polling `group_id`, replacing any poll already running.
    ///
    /// The first fetch is issued immediately.
    pub async fn open(&mut self, group_id: GroupId) {
        self.close().await;
        self.snapshot.send_replace(None);

        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(poll_group(
            self.source.clone(),
            group_id,
            self.interval,
            self.snapshot.clone(),
            shutdown_rx,
        ));

        info!(group_id = %group_id, interval_ms = self.interval.as_millis() as u64, "Started chat polling");
        self.task = Some(PollTask {
            group_id,
            shutdown,
            handle,
        });
    }

    /// Stop polling. Once this returns no further fetch result is applied.
    pub async fn close(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.shutdown.send(true);
            if let Err(e) = task.handle.await {
                if !e.is_cancelled() {
                    warn!(group_id = %task.group_id, error = %e, "Chat polling task failed");
                }
            }
            info!(group_id = %task.group_id, "Stopped chat polling");
        }
    }
}

impl Drop for ChatSynchronizer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.abort();
        }
    }
}

async fn poll_group(
    source: Arc<dyn GroupSource>,
    group_id: GroupId,
    interval: Duration,
    snapshot: Arc<watch::Sender<Option<Group>>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            result = source.fetch_group(group_id) => result,
        };

        if *shutdown.borrow() {
            break;
        }

        match fetched {
            Ok(group) => {
                let changed = snapshot.send_if_modified(|shown| match shown {
                    Some(current) if current.id == group.id && current.messages == group.messages => false,
                    _ => {
                        *shown = Some(group);
                        true
                    }
                });
                if changed {
                    debug!(group_id = %group_id, "Chat snapshot updated");
                }
            }
            Err(e) => {
                warn!(group_id = %group_id, error = %e, "Chat refresh failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use chrono::Utc;
    use crate::models::group::{GroupStatus, Message};
    use crate::utils::errors::CampusError;

    struct FakeSource {
        group: Mutex<Group>,
        calls: AtomicUsize,
        fail_next: AtomicUsize,
    }

    impl FakeSource {
        fn new(group: Group) -> Arc<Self> {
            Arc::new(Self {
                group: Mutex::new(group),
                calls: AtomicUsize::new(0),
                fail_next: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn push_message(&self, content: &str) {
            let mut group = self.group.lock().unwrap();
            group.messages.push(Message {
                sender: "b@x.com".into(),
                content: Some(content.into()),
                image_url: None,
                file_url: None,
                file_name: None,
                file_type: None,
                created_at: Utc::now(),
            });
        }
    }

    #[async_trait]
    impl GroupSource for FakeSource {
        async fn fetch_group(&self, id: GroupId) -> Result<Group> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_next.load(Ordering::SeqCst) > 0 {
                self.fail_next.fetch_sub(1, Ordering::SeqCst);
                return Err(CampusError::Remote { status: 503, message: "down".into() });
            }
            let group = self.group.lock().unwrap().clone();
            if group.id == id {
                Ok(group)
            } else {
                Err(CampusError::group_not_found(id))
            }
        }
    }

    fn group() -> Group {
        Group {
            id: uuid::Uuid::new_v4(),
            name: "DSA Study".into(),
            subject: "DSA".into(),
            created_by_email: "a@x.com".into(),
            created_by_designation: "Student".into(),
            school: "SOET".into(),
            status: GroupStatus::Approved,
            members: vec!["a@x.com".into()],
            messages: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const INTERVAL: Duration = Duration::from_secs(3);

    #[tokio::test(start_paused = true)]
    async fn test_open_fetches_immediately_then_on_interval() {
        let group = group();
        let source = FakeSource::new(group.clone());
        let mut sync = ChatSynchronizer::new(source.clone(), INTERVAL);

        sync.open(group.id).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(sync.current().map(|g| g.id), Some(group.id));
        assert_eq!(sync.state(), SyncState::Polling(group.id));

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(source.calls(), 2);

        sync.close().await;
        assert_eq!(sync.state(), SyncState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_only_changes_with_messages() {
        let group = group();
        let source = FakeSource::new(group.clone());
        let mut sync = ChatSynchronizer::new(source.clone(), INTERVAL);
        let mut rx = sync.subscribe();

        sync.open(group.id).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_some());

        tokio::time::sleep(INTERVAL).await;
        assert!(source.calls() >= 2);
        assert!(!rx.has_changed().unwrap());

        source.push_message("hi");
        tokio::time::sleep(INTERVAL).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().messages.len(), 1);

        sync.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_errors_keep_polling() {
        let group = group();
        let source = FakeSource::new(group.clone());
        source.fail_next.store(1, Ordering::SeqCst);
        let mut sync = ChatSynchronizer::new(source.clone(), INTERVAL);

        sync.open(group.id).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1);
        assert!(sync.current().is_none());

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(source.calls(), 2);
        assert!(sync.current().is_some());

        sync.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_stops_fetching() {
        let group = group();
        let source = FakeSource::new(group.clone());
        let mut sync = ChatSynchronizer::new(source.clone(), INTERVAL);

        sync.open(group.id).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        sync.close().await;
        let calls = source.calls();

        source.push_message("after close");
        tokio::time::sleep(INTERVAL * 5).await;
        assert_eq!(source.calls(), calls);
        assert!(sync.current().unwrap().messages.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_opening_another_group_replaces_the_poll() {
        let first = group();
        let source = FakeSource::new(first.clone());
        let mut sync = ChatSynchronizer::new(source.clone(), INTERVAL);

        sync.open(first.id).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let other = uuid::Uuid::new_v4();
        sync.open(other).await;
        assert_eq!(sync.state(), SyncState::Polling(other));
        assert!(sync.current().is_none());

        // the fake only knows `first`, so every fetch for `other` fails
        tokio::time::sleep(INTERVAL * 2).await;
        assert!(sync.current().is_none());

        sync.close().await;
    }
}
