//! In-memory fakes for the ports, shared by unit tests.

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::{watch, Notify};

use crate::{
    config::{AdminConfig, Config},
    domain::{ChatId, Partition, UserId},
    errors::Error,
    messaging::{
        port::{MessagingPort, UpdateSource},
        types::{ChatAdmin, ChatEvent},
    },
    ports::Ledger,
    resources::StaticTexts,
    router::AppState,
    Result,
};

#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<HashMap<Partition, Vec<(UserId, String)>>>,
    lookups: AtomicUsize,
    fail: AtomicBool,
    fail_retracts: AtomicBool,
}

impl MemoryLedger {
    pub fn records(&self, partition: Partition) -> Vec<(UserId, String)> {
        self.rows
            .lock()
            .unwrap()
            .get(&partition)
            .cloned()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> (Vec<(UserId, String)>, Vec<(UserId, String)>) {
        (
            self.records(Partition::Members),
            self.records(Partition::Banned),
        )
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Fail only `retract`, leaving inserts and lookups working.
    pub fn fail_retracts(&self) {
        self.fail_retracts.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Storage("ledger unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn insert(&self, partition: Partition, user_id: UserId, username: &str) -> Result<()> {
        self.check()?;
        self.rows
            .lock()
            .unwrap()
            .entry(partition)
            .or_default()
            .push((user_id, username.to_string()));
        Ok(())
    }

    async fn lookup(&self, partition: Partition, username: &str) -> Result<Option<UserId>> {
        self.check()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records(partition)
            .into_iter()
            .find(|(_, name)| name == username)
            .map(|(id, _)| id))
    }

    async fn retract(
        &self,
        partition: Partition,
        user_id: UserId,
        username: &str,
    ) -> Result<bool> {
        self.check()?;
        if self.fail_retracts.load(Ordering::SeqCst) {
            return Err(Error::Storage("retract failed".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let Some(list) = rows.get_mut(&partition) else {
            return Ok(false);
        };
        match list
            .iter()
            .rposition(|(id, name)| *id == user_id && name == username)
        {
            Some(idx) => {
                list.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    sends: Mutex<Vec<(ChatId, String)>>,
    removals: Mutex<Vec<(ChatId, UserId)>>,
    admins: Mutex<Vec<ChatAdmin>>,
    fail_sends: AtomicBool,
    fail_removals: AtomicBool,
    removal_gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl FakeMessenger {
    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sends.lock().unwrap().clone()
    }

    pub fn sent_html(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, html)| html).collect()
    }

    pub fn removed(&self) -> Vec<(ChatId, UserId)> {
        self.removals.lock().unwrap().clone()
    }

    pub fn set_admins(&self, admins: Vec<ChatAdmin>) {
        *self.admins.lock().unwrap() = admins;
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn fail_removals(&self) {
        self.fail_removals.store(true, Ordering::SeqCst);
    }

    /// Park every removal until released. Returns `(started, release)`:
    /// `started` is notified when a removal begins, `release` lets it finish.
    pub fn hold_removals(&self) -> (Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.removal_gate.lock().unwrap() = Some((started.clone(), release.clone()));
        (started, release)
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Error::External("send failed".to_string()));
        }
        self.sends.lock().unwrap().push((chat_id, html.to_string()));
        Ok(())
    }

    async fn remove_member(&self, chat_id: ChatId, user_id: UserId) -> Result<()> {
        let gate = self.removal_gate.lock().unwrap().clone();
        if let Some((started, release)) = gate {
            started.notify_one();
            release.notified().await;
        }
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(Error::External("not enough rights".to_string()));
        }
        self.removals.lock().unwrap().push((chat_id, user_id));
        Ok(())
    }

    async fn list_administrators(&self, _chat_id: ChatId) -> Result<Vec<ChatAdmin>> {
        Ok(self.admins.lock().unwrap().clone())
    }
}

enum WhenDrained {
    Closed,
    Stop(watch::Sender<bool>),
    Pending,
}

/// Replays pre-recorded batches. Once drained it reports a closed stream,
/// or signals shutdown, or waits forever.
pub struct ScriptedSource {
    batches: Vec<Result<Vec<ChatEvent>>>,
    drained: WhenDrained,
}

impl ScriptedSource {
    pub fn new(mut batches: Vec<Result<Vec<ChatEvent>>>) -> Self {
        batches.reverse();
        Self {
            batches,
            drained: WhenDrained::Closed,
        }
    }

    pub fn stop_when_drained(mut self, stop: watch::Sender<bool>) -> Self {
        self.drained = WhenDrained::Stop(stop);
        self
    }

    pub fn pending_when_drained(mut self) -> Self {
        self.drained = WhenDrained::Pending;
        self
    }
}

#[async_trait]
impl UpdateSource for ScriptedSource {
    async fn next_batch(&mut self) -> Result<Vec<ChatEvent>> {
        if let Some(batch) = self.batches.pop() {
            return batch;
        }
        match &self.drained {
            WhenDrained::Closed => Err(Error::External("closed".to_string())),
            WhenDrained::Stop(stop) => {
                let _ = stop.send(true);
                std::future::pending().await
            }
            WhenDrained::Pending => std::future::pending().await,
        }
    }
}

pub fn test_config(admins: &[i64]) -> Config {
    Config {
        admin: AdminConfig {
            bot_token: "test-token".to_string(),
            admin_ids: admins.iter().copied().collect::<HashSet<_>>(),
        },
        config_path: PathBuf::from("config/config.json"),
        db_path: PathBuf::from(":memory:"),
        rules_path: PathBuf::from("rules.txt"),
        help_path: PathBuf::from("help.txt"),
        poll_timeout: Duration::from_secs(1),
    }
}

pub fn test_state(admins: &[i64]) -> (AppState, Arc<MemoryLedger>, Arc<FakeMessenger>) {
    let ledger = Arc::new(MemoryLedger::default());
    let messenger = Arc::new(FakeMessenger::default());
    let state = AppState {
        cfg: Arc::new(test_config(admins)),
        texts: Arc::new(StaticTexts {
            rules: "RULES".to_string(),
            help: "HELP".to_string(),
        }),
        ledger: ledger.clone(),
        messenger: messenger.clone(),
    };
    (state, ledger, messenger)
}
