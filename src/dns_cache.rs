// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Process-lifetime cache of raw DNS responses, shared by every scan worker.
///
/// Keyed by (nameserver, domain, record type) so queries against different
/// servers or for different types occupy independent slots. Entries are never
/// evicted; re-queries for a key would return identical upstream data anyway.
/// Reads are concurrent, writes take the lock exclusively.
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: RwLock<HashMap<(SocketAddr, String, RecordType), Message>>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, nameserver: SocketAddr, domain: &str, rtype: RecordType) -> Option<Message> {
        self.entries
            .read()
            .get(&(nameserver, domain.to_string(), rtype))
            .cloned()
    }

    pub fn put(&self, nameserver: SocketAddr, domain: &str, rtype: RecordType, message: Message) {
        self.entries
            .write()
            .insert((nameserver, domain.to_string(), rtype), message);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
