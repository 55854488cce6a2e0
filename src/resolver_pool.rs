// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;

/// Resolvers compiled into the binary, one per line, `#` starts a comment
static EMBEDDED_RESOLVERS: &str = include_str!("../data/resolvers.txt");

/// Requests served by one resolver before rotating to the next
const MAX_REQUESTS_PER_RESOLVER: usize = 5;

/// Ordered list of upstream resolvers, rotated to spread query load.
///
/// Rotation hands out the current resolver for a fixed quota of requests,
/// then moves on, wrapping around at the end of the list.
#[derive(Debug)]
pub struct ResolverPool {
    resolvers: Vec<SocketAddr>,
    current: usize,
    requests: usize,
}

impl ResolverPool {
    pub fn from_embedded() -> Result<Self> {
        let mut resolvers = Vec::new();
        for line in EMBEDDED_RESOLVERS.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let addr = format!("{line}:53")
                .parse::<SocketAddr>()
                .with_context(|| format!("bad resolver entry: {line}"))?;
            resolvers.push(addr);
        }
        Self::from_list(resolvers)
    }

    pub fn from_list(resolvers: Vec<SocketAddr>) -> Result<Self> {
        if resolvers.is_empty() {
            bail!("resolver list is empty");
        }
        Ok(Self {
            resolvers,
            current: 0,
            requests: 0,
        })
    }

    /// Resolver to use for the next request
    pub fn next(&mut self) -> SocketAddr {
        if self.requests >= MAX_REQUESTS_PER_RESOLVER {
            self.current += 1;
            self.requests = 0;
        }
        if self.current >= self.resolvers.len() {
            self.current = 0;
        }
        self.requests += 1;
        self.resolvers[self.current]
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
