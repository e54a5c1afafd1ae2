//! The dashboard orchestrator.
//!
//! Owns the section store, issues one concurrent read per section on
//! activation, and runs the two user actions: the guarded LINE push and the
//! blockchain create-then-refresh workflow.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::join_all;
use tokio::sync::{broadcast, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::notify::{
    Notice, NotificationGuard, CHAIN_TXN_CREATED, CHAIN_TXN_FAILED, NOTIFICATION_FAILED,
    NOTIFICATION_SENT,
};
use super::section::{Section, SectionPayload, SectionState};
use super::store::{CycleTicket, SectionStore};
use super::views::{DashboardSnapshot, SectionView};
use crate::config::SectionQueries;
use crate::error::{DashboardError, GatewayError};
use crate::gateway::ResourceGateway;
use crate::models::{ChainTxn, ChainTxnDraft, NotificationAck};
use crate::session::SessionProvider;

const NOTICE_CAPACITY: usize = 32;

pub struct Dashboard {
    gateway: Arc<dyn ResourceGateway>,
    session: Arc<dyn SessionProvider>,
    queries: SectionQueries,
    guard: NotificationGuard,
    store: Arc<SectionStore>,
    tasks: Mutex<HashMap<Section, JoinHandle<()>>>,
    notices: broadcast::Sender<Notice>,
}

impl Dashboard {
    pub fn new(
        gateway: Arc<dyn ResourceGateway>,
        session: Arc<dyn SessionProvider>,
        queries: SectionQueries,
        guard: NotificationGuard,
    ) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            gateway,
            session,
            queries,
            guard,
            store: Arc::new(SectionStore::new()),
            tasks: Mutex::new(HashMap::new()),
            notices,
        }
    }

    pub fn queries(&self) -> &SectionQueries {
        &self.queries
    }

    pub fn is_active(&self) -> bool {
        self.store.is_live()
    }

    /// Put every section into `Loading` and fire all six reads.
    ///
    /// Must be called from within a tokio runtime. Activating an already
    /// active dashboard starts a fresh cycle for every section.
    pub fn activate(&self) -> Result<(), DashboardError> {
        if !self.session.is_authenticated() {
            warn!("refusing to activate dashboard without an authenticated session");
            return Err(DashboardError::Unauthenticated);
        }

        let mut tasks = self.lock_tasks();
        self.store.open();

        // All slots enter Loading before any read is issued.
        let tickets: Vec<CycleTicket> = Section::ALL
            .into_iter()
            .filter_map(|section| self.store.begin(section))
            .collect();

        info!(sections = tickets.len(), "dashboard activated");
        for ticket in tickets {
            self.launch(&mut tasks, ticket, None);
        }

        Ok(())
    }

    /// Start a new fetch cycle for one section, superseding any outstanding one.
    pub fn refresh_section(&self, section: Section) -> Result<(), DashboardError> {
        let mut tasks = self.lock_tasks();
        let ticket = self.store.begin(section).ok_or(DashboardError::Inactive)?;
        debug!(section = %section, "refreshing section");
        self.launch(&mut tasks, ticket, None);
        Ok(())
    }

    /// Abort outstanding reads and return every section to `Idle`.
    pub fn deactivate(&self) {
        let mut tasks = self.lock_tasks();
        self.store.teardown();
        for (_, task) in tasks.drain() {
            task.abort();
        }
        info!("dashboard deactivated");
    }

    pub fn state(&self, section: Section) -> SectionState {
        self.store.current(section)
    }

    pub fn subscribe(&self, section: Section) -> watch::Receiver<SectionState> {
        self.store.subscribe(section)
    }

    pub fn view(&self, section: Section) -> SectionView {
        SectionView::build(section, &self.store.current(section))
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            active: self.store.is_live(),
            sections: Section::ALL
                .into_iter()
                .map(|section| self.view(section))
                .collect(),
        }
    }

    /// Resolves once no section is `Loading`.
    pub async fn settled(&self) {
        let waits = Section::ALL.map(|section| {
            let mut rx = self.store.subscribe(section);
            async move {
                let _ = rx.wait_for(|state| !state.is_loading()).await;
            }
        });
        join_all(waits).await;
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Guarded LINE push. Invalid recipients never reach the gateway.
    pub async fn submit_notification(
        &self,
        recipient: &str,
    ) -> Result<NotificationAck, DashboardError> {
        let request = match self.guard.prepare(recipient) {
            Ok(request) => request,
            Err(err) => {
                self.emit(Notice::error(err.to_string()));
                return Err(err);
            }
        };

        match self
            .gateway
            .send_notification(&request.user_id, &request.message)
            .await
        {
            Ok(ack) => {
                info!(user_id = %request.user_id, "LINE notification dispatched");
                self.emit(Notice::success(NOTIFICATION_SENT));
                Ok(ack)
            }
            Err(err) => {
                warn!(user_id = %request.user_id, error = %err, "LINE notification failed");
                self.emit(Notice::error(format!("{}: {}", NOTIFICATION_FAILED, err)));
                Err(err.into())
            }
        }
    }

    /// Create a mock chain transaction, then re-read the blockchain list once.
    ///
    /// The created record is returned as an acknowledgement only; the section
    /// payload always comes from the follow-up read.
    pub async fn create_blockchain_transaction(
        &self,
        draft: ChainTxnDraft,
    ) -> Result<ChainTxn, DashboardError> {
        if let Err(reason) = draft.check() {
            let err = DashboardError::InvalidDraft(reason);
            self.emit(Notice::error(err.to_string()));
            return Err(err);
        }

        let record = match self.gateway.create_blockchain_transaction(&draft).await {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "blockchain transaction create failed");
                self.emit(Notice::error(format!("{}: {}", CHAIN_TXN_FAILED, err)));
                return Err(err.into());
            }
        };

        info!(hash = %record.hash, block_id = record.block_id, "blockchain transaction created");
        self.emit(Notice::success(CHAIN_TXN_CREATED));

        let refreshed = {
            let mut tasks = self.lock_tasks();
            self.store.begin(Section::Blockchain).map(|ticket| {
                let (done_tx, done_rx) = oneshot::channel();
                self.launch(&mut tasks, ticket, Some(done_tx));
                done_rx
            })
        };

        match refreshed {
            // Err only if the refresh was aborted by a newer cycle or teardown.
            Some(done_rx) => {
                let _ = done_rx.await;
            }
            None => debug!("dashboard inactive; skipping blockchain refresh"),
        }

        Ok(record)
    }

    fn emit(&self, notice: Notice) {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
    }

    fn lock_tasks(&self) -> MutexGuard<'_, HashMap<Section, JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Spawn the read for an opened cycle and register it as the section's
    /// only outstanding task. Callers hold the task lock from `begin` through
    /// here, so registration order always matches cycle order.
    fn launch(
        &self,
        tasks: &mut HashMap<Section, JoinHandle<()>>,
        ticket: CycleTicket,
        done: Option<oneshot::Sender<()>>,
    ) {
        let section = ticket.section();
        let gateway = Arc::clone(&self.gateway);
        let store = Arc::clone(&self.store);
        let queries = self.queries.clone();

        let task = tokio::spawn(async move {
            let outcome = fetch_section(gateway.as_ref(), &queries, section).await;
            apply(&store, ticket, outcome);
            if let Some(done) = done {
                let _ = done.send(());
            }
        });

        if let Some(previous) = tasks.insert(section, task) {
            previous.abort();
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        for (_, task) in self.lock_tasks().drain() {
            task.abort();
        }
    }
}

async fn fetch_section(
    gateway: &dyn ResourceGateway,
    queries: &SectionQueries,
    section: Section,
) -> Result<SectionPayload, GatewayError> {
    let payload = match section {
        Section::FarmerReport => {
            SectionPayload::FarmerReport(gateway.fetch_farmer_report(queries.farmer_id).await?)
        }
        Section::Products => SectionPayload::Products(
            gateway
                .fetch_products(queries.page_limit, queries.page_offset)
                .await?,
        ),
        Section::Orders => SectionPayload::Orders(
            gateway
                .fetch_orders(queries.page_limit, queries.page_offset)
                .await?,
        ),
        Section::Ledger => SectionPayload::Ledger(
            gateway
                .fetch_ledger_transactions(queries.page_limit, queries.page_offset)
                .await?,
        ),
        Section::IoT => SectionPayload::IoT(
            gateway
                .fetch_iot_data(&queries.iot_device_id, queries.iot_limit)
                .await?,
        ),
        Section::Blockchain => SectionPayload::Blockchain(
            gateway
                .fetch_blockchain_transactions(queries.blockchain_limit)
                .await?,
        ),
    };

    Ok(payload)
}

fn apply(
    store: &SectionStore,
    ticket: CycleTicket,
    outcome: Result<SectionPayload, GatewayError>,
) {
    let section = ticket.section();

    let applied = match outcome {
        Ok(payload) => {
            let records = payload.len();
            let applied = store.resolve(ticket, Ok(payload));
            if applied {
                info!(section = %section, records = ?records, "section ready");
            }
            applied
        }
        Err(err) => {
            let applied = store.resolve(ticket, Err(err.to_string()));
            if applied {
                warn!(section = %section, error = %err, "section fetch failed");
            }
            applied
        }
    };

    if !applied {
        debug!(section = %section, "discarding stale section result");
    }
}
