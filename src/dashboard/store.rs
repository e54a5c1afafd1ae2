//! Section state store: one watch slot per section plus the cycle
//! bookkeeping that decides whether a resolution still applies.

use std::sync::Mutex;

use tokio::sync::watch;

use super::section::{Section, SectionPayload, SectionState};

/// Proof that a fetch cycle was opened for a section. Consumed by
/// [`SectionStore::resolve`], so a cycle resolves at most once.
#[derive(Debug)]
pub(crate) struct CycleTicket {
    section: Section,
    epoch: u64,
    cycle: u64,
}

impl CycleTicket {
    pub(crate) fn section(&self) -> Section {
        self.section
    }
}

#[derive(Debug, Default)]
struct CycleBook {
    live: bool,
    epoch: u64,
    cycles: [u64; 6],
}

pub(crate) struct SectionStore {
    slots: [watch::Sender<SectionState>; 6],
    book: Mutex<CycleBook>,
}

impl SectionStore {
    pub(crate) fn new() -> Self {
        Self {
            slots: Section::ALL.map(|_| watch::channel(SectionState::Idle).0),
            book: Mutex::new(CycleBook::default()),
        }
    }

    fn lock_book(&self) -> std::sync::MutexGuard<'_, CycleBook> {
        self.book.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Mark the store live so fetch cycles can be opened.
    pub(crate) fn open(&self) {
        self.lock_book().live = true;
    }

    pub(crate) fn is_live(&self) -> bool {
        self.lock_book().live
    }

    /// Tear down: every slot back to `Idle`, every outstanding ticket stale.
    pub(crate) fn teardown(&self) {
        let mut book = self.lock_book();
        book.live = false;
        book.epoch += 1;
        for slot in &self.slots {
            slot.send_replace(SectionState::Idle);
        }
    }

    /// Open a new fetch cycle for `section` and move its slot to `Loading`.
    /// Returns `None` when the store is torn down.
    pub(crate) fn begin(&self, section: Section) -> Option<CycleTicket> {
        let mut book = self.lock_book();
        if !book.live {
            return None;
        }

        book.cycles[section.index()] += 1;
        let ticket = CycleTicket {
            section,
            epoch: book.epoch,
            cycle: book.cycles[section.index()],
        };
        self.slots[section.index()].send_replace(SectionState::Loading);
        Some(ticket)
    }

    /// Apply the outcome of a fetch cycle. Stale tickets (superseded cycle
    /// or torn-down store) are dropped and `false` is returned.
    pub(crate) fn resolve(
        &self,
        ticket: CycleTicket,
        outcome: Result<SectionPayload, String>,
    ) -> bool {
        let book = self.lock_book();
        let current = book.live
            && book.epoch == ticket.epoch
            && book.cycles[ticket.section.index()] == ticket.cycle;
        if !current {
            return false;
        }

        let state = match outcome {
            Ok(payload) => SectionState::Ready(payload),
            Err(message) => SectionState::Failed(message),
        };
        self.slots[ticket.section.index()].send_replace(state);
        true
    }

    pub(crate) fn current(&self, section: Section) -> SectionState {
        self.slots[section.index()].borrow().clone()
    }

    pub(crate) fn subscribe(&self, section: Section) -> watch::Receiver<SectionState> {
        self.slots[section.index()].subscribe()
    }
}
