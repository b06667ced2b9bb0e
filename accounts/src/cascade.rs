//! Moving value between the tray's buckets.
//!
//! Receiving splits an amount greedily into whole bills, largest first.
//! Sending assembles an amount in the outgoing account, breaking larger bills
//! when the buckets cannot cover it directly. Redistribution keeps every
//! bucket stocked with up to nine bills so the next payment of any size can be
//! assembled with few exchanges.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::denomination::{split_bills, split_largest, FIT};
use crate::errors::TrayError;
use crate::role::Role;
use crate::tray::Tray;

/// One movement of funds between two accounts of a tray.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalExchange {
    /// Source account.
    pub from: Role,
    /// Destination account.
    pub to: Role,
    /// Amount moved.
    pub amount: u64,
}

impl InternalExchange {
    /// Whether both sides are buckets, i.e. the movement only changes bill sizes.
    pub fn is_bucket_exchange(&self) -> bool {
        matches!((&self.from, &self.to), (Role::Bucket(_), Role::Bucket(_)))
    }
}

impl Tray {
    fn move_funds(
        &mut self,
        from: &Role,
        to: &Role,
        amount: u64,
        log: &mut Vec<InternalExchange>,
    ) -> Result<(), TrayError> {
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        trace!(%from, %to, amount, "internal exchange");
        log.push(InternalExchange {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    /// Deposits `amount` from `from` into the buckets, largest bills first,
    /// at most nine bills per movement.
    pub fn receive(&mut self, from: &Role, amount: u64) -> Result<Vec<InternalExchange>, TrayError> {
        if amount == 0 {
            return Err(TrayError::InvalidAmount);
        }
        if self.balance(from)? < amount {
            return Err(TrayError::InsufficientBalance(from.clone()));
        }

        let mut log = Vec::new();
        let mut remaining = amount;
        for i in (0..self.slots.len()).rev() {
            let bill = self.slots[i].bill();
            let to = self.slots[i].role();
            let deposit = (remaining / bill) * bill;
            for chunk in split_bills(deposit, bill) {
                self.move_funds(from, &to, chunk, &mut log)?;
            }
            remaining -= deposit;
        }
        debug!(%from, amount, movements = log.len(), "received into buckets");
        Ok(log)
    }

    /// Assembles `amount` in the outgoing account.
    ///
    /// A largest-first pass is tried first; if whole bills cannot cover the
    /// amount the tray is restored and bills are broken down instead.
    pub fn transfer(&mut self, amount: u64) -> Result<Vec<InternalExchange>, TrayError> {
        if amount == 0 {
            return Err(TrayError::InvalidAmount);
        }
        let available = self.slots_balance();
        if available < amount {
            return Err(TrayError::InsufficientTrayBalance {
                available,
                requested: amount,
            });
        }

        let snapshot = self.clone();
        if let Ok(log) = self.withdraw_naively(amount) {
            return Ok(log);
        }
        debug!(amount, "whole bills do not cover the amount, breaking larger bills");
        *self = snapshot.clone();
        self.withdraw_dynamically(amount).map_err(|e| {
            *self = snapshot;
            e
        })
    }

    fn send_bills(
        &mut self,
        index: usize,
        bills: u64,
        log: &mut Vec<InternalExchange>,
    ) -> Result<u64, TrayError> {
        let bill = self.slots[index].bill();
        let from = self.slots[index].role();
        for chunk in split_bills(bills * bill, bill) {
            self.move_funds(&from, &Role::Outgoing, chunk, log)?;
        }
        Ok(bills * bill)
    }

    fn withdraw_naively(&mut self, amount: u64) -> Result<Vec<InternalExchange>, TrayError> {
        let mut log = Vec::new();
        let mut remaining = amount;
        for i in (0..self.slots.len()).rev() {
            let slot = &self.slots[i];
            let bills = slot.bill_count().min(remaining / slot.bill());
            remaining -= self.send_bills(i, bills, &mut log)?;
        }
        if remaining > 0 {
            return Err(TrayError::NaiveWithdrawFailed);
        }
        Ok(log)
    }

    fn withdraw_dynamically(&mut self, amount: u64) -> Result<Vec<InternalExchange>, TrayError> {
        let mut log = Vec::new();
        let mut remaining = amount;

        // Step 1: drain small buckets while their bills still fit.
        for i in 0..self.slots.len() {
            let slot = &self.slots[i];
            if slot.bill_count() == 0 {
                continue;
            }
            if remaining < slot.bill() {
                break;
            }
            let bills = slot.bill_count().min(remaining / slot.bill());
            remaining -= self.send_bills(i, bills, &mut log)?;
        }
        if remaining == 0 {
            return Ok(log);
        }

        // Step 2: break one bill of the first larger bucket and walk it down.
        let index = self
            .slots
            .iter()
            .position(|s| s.bill() > remaining && s.bill_count() > 0)
            .ok_or(TrayError::InvalidStepIndex)?;
        if index == 0 {
            return Err(TrayError::InvalidStepIndex);
        }
        self.break_bill(index, &mut log)?;

        for i in (0..index).rev() {
            if i > 0 {
                self.break_bill(i, &mut log)?;
            }
            let slot = &self.slots[i];
            let bills = remaining / slot.bill();
            if bills == 0 {
                continue;
            }
            if slot.bill_count() < bills {
                return Err(TrayError::InvalidSlotBalance(slot.role()));
            }
            remaining -= self.send_bills(i, bills, &mut log)?;
        }
        Ok(log)
    }

    /// Exchanges one bill of bucket `index` into the next smaller bucket.
    fn break_bill(&mut self, index: usize, log: &mut Vec<InternalExchange>) -> Result<(), TrayError> {
        let slot = &self.slots[index];
        if slot.bill_count() < 1 {
            return Err(TrayError::SlotAtIndexEmpty(slot.role()));
        }
        let (from, to, bill) = (slot.role(), self.slots[index - 1].role(), slot.bill());
        self.move_funds(&from, &to, bill, log)
    }

    /// Restocks the buckets: breaks a bill of a larger bucket wherever the
    /// next smaller one holds fewer than nine bills, then consolidates buckets
    /// holding nineteen or more bills upward, leaving nine.
    pub fn redistribute(&mut self) -> Result<Vec<InternalExchange>, TrayError> {
        let mut log = Vec::new();
        self.exchange_large_to_small(&mut log)?;
        self.exchange_small_to_large(&mut log)?;
        if !log.is_empty() {
            debug!(exchanges = log.len(), "redistributed buckets");
        }
        Ok(log)
    }

    fn exchange_large_to_small(&mut self, log: &mut Vec<InternalExchange>) -> Result<(), TrayError> {
        for i in (1..self.slots.len()).rev() {
            if self.slots[i].bill_count() == 0 {
                continue;
            }
            if self.slots[i - 1].bill_count() >= FIT - 1 {
                continue;
            }
            self.break_bill(i, log)?;
            self.exchange_large_to_small(log)?;
        }
        Ok(())
    }

    fn exchange_small_to_large(&mut self, log: &mut Vec<InternalExchange>) -> Result<(), TrayError> {
        for i in 0..self.slots.len() - 1 {
            let have = self.slots[i].bill_count();
            if have < 2 * FIT - 1 {
                continue;
            }
            let leave = (FIT - 1).min(have);
            let bills = (have - leave) / FIT * FIT;
            let (from, to) = (self.slots[i].role(), self.slots[i + 1].role());
            for chunk in split_largest(bills * self.slots[i].bill()) {
                self.move_funds(&from, &to, chunk, log)?;
            }
            self.exchange_small_to_large(log)?;
        }
        Ok(())
    }
}
