//! The second-dose waiting list.
//!
//! Slot `[0]` holds the people due for their second dose next week, `[1]`
//! the week after, and so on; every slot is a per-vaccine ledger. Shortage
//! handling is deferral: doses that cannot be given are pushed back onto
//! the front slot, never dropped.

use std::collections::VecDeque;

use crate::models::VaccineLedger;

/// Number of slots kept ready. Long enough for any realistic dosing
/// interval; the list still grows on demand beyond it.
const WAITING_WEEKS: usize = 100;

#[derive(Debug, Clone)]
pub struct SecondDoseWaitingList {
    slots: VecDeque<VaccineLedger>,
}

impl Default for SecondDoseWaitingList {
    fn default() -> Self {
        Self::new()
    }
}

impl SecondDoseWaitingList {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: VecDeque::from(vec![VaccineLedger::new(); WAITING_WEEKS]),
        }
    }

    /// Remove and return the ledger of people due this week.
    ///
    /// The list keeps its length; a fresh empty slot is appended at the
    /// far end and the former slot `[1]` becomes the new front.
    pub fn pop_due(&mut self) -> VaccineLedger {
        self.slots.push_back(VaccineLedger::new());
        self.slots.pop_front().unwrap_or_default()
    }

    /// Defer people back onto the front slot (due again next week).
    pub fn defer(&mut self, shortfall: &VaccineLedger) {
        if let Some(front) = self.slots.front_mut() {
            *front = front.add(shortfall);
        }
    }

    /// Schedule people for a second dose `offset` weeks from now.
    pub fn schedule(&mut self, offset: usize, name: &str, amount: f64) {
        if offset >= self.slots.len() {
            self.slots.resize(offset + 1, VaccineLedger::new());
        }
        self.slots[offset].add_to(name, amount);
    }

    /// Push every pending second dose `weeks` further into the future.
    pub fn delay_all(&mut self, weeks: u32) {
        for _ in 0..weeks {
            self.slots.push_front(VaccineLedger::new());
        }
    }

    /// All pending second doses, summed per vaccine.
    #[must_use]
    pub fn pending(&self) -> VaccineLedger {
        self.slots
            .iter()
            .fold(VaccineLedger::new(), |acc, slot| acc.add(slot))
    }

    /// Total people waiting across all slots.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.slots.iter().map(VaccineLedger::total).sum()
    }

    /// The ledger `offset` weeks from now; empty if out of range.
    #[must_use]
    pub fn slot(&self, offset: usize) -> VaccineLedger {
        self.slots.get(offset).cloned().unwrap_or_default()
    }
}
