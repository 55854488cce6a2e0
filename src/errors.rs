// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Error Types
 * Transport, protocol and domain-name failures are all non-fatal to a scan
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use hickory_proto::op::ResponseCode;
use std::net::SocketAddr;
use thiserror::Error;

/// Failures that can interrupt a single check step.
///
/// None of these abort a scan: callers log them at warning level and move
/// on to the next fingerprint, check or domain (only a broken fingerprint
/// catalog is fatal, and that is reported through `anyhow` at startup).
#[derive(Error, Debug)]
pub enum ScanError {
    /// Wire-level DNS failure (socket error, timeout, truncated exchange)
    #[error("DNS exchange with {nameserver} for {domain} failed: {reason}")]
    DnsExchange {
        domain: String,
        nameserver: SocketAddr,
        reason: String,
    },

    /// The server answered, but with a response code the operation cannot use
    #[error("DNS lookup for {domain} returned {code}")]
    DnsRcode { domain: String, code: ResponseCode },

    /// Name that cannot be encoded into a DNS question
    #[error("invalid domain name {domain}: {reason}")]
    DomainName { domain: String, reason: String },

    /// No registrable root (eTLD+1) could be derived from the name
    #[error("unable to determine registrable domain for {domain}")]
    RegistrableRoot { domain: String },

    /// Both HTTPS and HTTP probes failed to produce a response
    #[error("HTTP probe for {domain} failed: {reason}")]
    HttpProbe { domain: String, reason: String },

    /// Unusable nameserver address in the configuration
    #[error("invalid nameserver address {addr}: {reason}")]
    NameserverAddr { addr: String, reason: String },
}

impl ScanError {
    pub fn dns_exchange(
        domain: &str,
        nameserver: SocketAddr,
        reason: impl std::fmt::Display,
    ) -> Self {
        ScanError::DnsExchange {
            domain: domain.to_string(),
            nameserver,
            reason: reason.to_string(),
        }
    }

    pub fn domain_name(domain: &str, reason: impl std::fmt::Display) -> Self {
        ScanError::DomainName {
            domain: domain.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn http_probe(domain: &str, reason: impl std::fmt::Display) -> Self {
        ScanError::HttpProbe {
            domain: domain.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
