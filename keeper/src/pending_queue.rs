//! Priority queue of pending withdrawals (min-heap by maturity time)

use crate::scanner::PendingRequest;
use priority_queue::PriorityQueue;
use solana_sdk::pubkey::Pubkey;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Maturity-ordered queue: the request that can finalize soonest comes
/// out first
pub struct PendingQueue {
    /// Priority queue (using Reverse for min-heap)
    queue: PriorityQueue<Pubkey, Reverse<u32>>,
    /// Map for O(1) lookups, keyed by the user ledger account
    map: HashMap<Pubkey, PendingRequest>,
}

impl PendingQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
            map: HashMap::new(),
        }
    }

    /// Push or refresh a pending request
    pub fn push(&mut self, request: PendingRequest) {
        let account = request.account;
        let end_time = request.end_time;
        self.map.insert(account, request);
        self.queue.push(account, Reverse(end_time));
    }

    /// Peek at the soonest-maturing request without removing it
    pub fn peek(&self) -> Option<&PendingRequest> {
        let (account, _priority) = self.queue.peek()?;
        self.map.get(account)
    }

    /// Pop the soonest-maturing request if it has matured by `now`
    pub fn pop_mature(&mut self, now: u32) -> Option<PendingRequest> {
        let (_, Reverse(end_time)) = self.queue.peek()?;
        if *end_time > now {
            return None;
        }
        let (account, _) = self.queue.pop()?;
        self.map.remove(&account)
    }

    /// Remove a request (e.g. after it finalized or was replaced)
    pub fn remove(&mut self, account: &Pubkey) -> Option<PendingRequest> {
        self.queue.remove(account);
        self.map.remove(account)
    }

    /// Number of queued requests
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop everything (before a full rescan)
    pub fn clear(&mut self) {
        self.queue.clear();
        self.map.clear();
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}
