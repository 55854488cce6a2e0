// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - DNS Resolution Client
 * Wire-level record lookups with a shared, never-evicting response cache
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use futures::future::BoxFuture;
use hickory_client::client::{Client, ClientHandle};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use hickory_proto::runtime::TokioRuntimeProvider;
use hickory_proto::udp::UdpClientStream;
use parking_lot::Mutex;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::dns_cache::RecordCache;
use crate::errors::{ScanError, ScanResult};
use crate::resolver_pool::ResolverPool;

/// Bound on CNAME chasing during transitive resolution; a chain longer than
/// this (or a loop in hostile zone data) is abandoned instead of recursed into.
const MAX_RESOLVE_DEPTH: u8 = 8;

/// A single question/answer exchange with one nameserver.
///
/// The production transport speaks UDP through hickory; tests substitute a
/// canned implementation to count exchanges and replay fixed responses.
pub trait DnsTransport: Send + Sync {
    fn exchange(
        &self,
        nameserver: SocketAddr,
        name: Name,
        rtype: RecordType,
    ) -> BoxFuture<'static, ScanResult<Message>>;
}

/// UDP transport backed by hickory-client
pub struct UdpTransport {
    timeout: Duration,
}

impl UdpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl DnsTransport for UdpTransport {
    fn exchange(
        &self,
        nameserver: SocketAddr,
        name: Name,
        rtype: RecordType,
    ) -> BoxFuture<'static, ScanResult<Message>> {
        let timeout = self.timeout;
        Box::pin(async move {
            let domain = name.to_utf8();
            let conn = UdpClientStream::builder(nameserver, TokioRuntimeProvider::new())
                .with_timeout(Some(timeout))
                .build();
            let (mut client, background) = Client::connect(conn)
                .await
                .map_err(|e| ScanError::dns_exchange(&domain, nameserver, e))?;
            tokio::spawn(background);

            let response = client
                .query(name, DNSClass::IN, rtype)
                .await
                .map_err(|e| ScanError::dns_exchange(&domain, nameserver, e))?;
            Ok(response.into_message())
        })
    }
}

/// Where queries are sent: one fixed server, or a rotating public pool
enum Upstream {
    Fixed(SocketAddr),
    Rotating(Mutex<ResolverPool>),
}

/// Record lookups for the detection engine.
///
/// Every read goes through the shared [`RecordCache`]: a hit answers from the
/// cached message, a miss performs the wire exchange and stores the result.
pub struct DnsClient {
    upstream: Upstream,
    transport: Arc<dyn DnsTransport>,
    cache: RecordCache,
}

impl DnsClient {
    pub fn new(cfg: &ScanConfig) -> ScanResult<Self> {
        let transport = Arc::new(UdpTransport::new(Duration::from_secs(cfg.dns_timeout)));
        if cfg.rotate_resolvers {
            let pool = ResolverPool::from_embedded().map_err(|e| ScanError::NameserverAddr {
                addr: "embedded resolver list".to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Self {
                upstream: Upstream::Rotating(Mutex::new(pool)),
                transport,
                cache: RecordCache::new(),
            });
        }

        let addr = cfg
            .nameserver
            .to_socket_addrs()
            .map_err(|e| ScanError::NameserverAddr {
                addr: cfg.nameserver.clone(),
                reason: e.to_string(),
            })?
            .next()
            .ok_or_else(|| ScanError::NameserverAddr {
                addr: cfg.nameserver.clone(),
                reason: "no usable address".to_string(),
            })?;
        Ok(Self {
            upstream: Upstream::Fixed(addr),
            transport,
            cache: RecordCache::new(),
        })
    }

    /// Client with a custom transport, used by tests to stub the wire
    pub fn with_transport(nameserver: SocketAddr, transport: Arc<dyn DnsTransport>) -> Self {
        Self {
            upstream: Upstream::Fixed(nameserver),
            transport,
            cache: RecordCache::new(),
        }
    }

    fn nameserver(&self) -> SocketAddr {
        match &self.upstream {
            Upstream::Fixed(addr) => *addr,
            Upstream::Rotating(pool) => pool.lock().next(),
        }
    }

    async fn query(&self, domain: &str, rtype: RecordType) -> ScanResult<Message> {
        let nameserver = self.nameserver();
        self.query_at(nameserver, domain, rtype).await
    }

    /// Cached exchange against an explicit server; used directly when walking
    /// a delegation chain through authoritative servers.
    async fn query_at(
        &self,
        nameserver: SocketAddr,
        domain: &str,
        rtype: RecordType,
    ) -> ScanResult<Message> {
        if let Some(cached) = self.cache.get(nameserver, domain, rtype) {
            debug!("{domain}: cache hit for {rtype} @ {nameserver}");
            return Ok(cached);
        }

        let mut name =
            Name::from_utf8(domain).map_err(|e| ScanError::domain_name(domain, e))?;
        name.set_fqdn(true);

        let message = self.transport.exchange(nameserver, name, rtype).await?;
        self.cache.put(nameserver, domain, rtype, message.clone());
        Ok(message)
    }

    /// CNAME targets of `domain`, trailing dot stripped
    pub async fn get_cname(&self, domain: &str) -> ScanResult<Vec<String>> {
        let message = self.query(domain, RecordType::CNAME).await?;
        Ok(message
            .answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::CNAME(cname) => Some(trim_fqdn(&cname.0)),
                _ => None,
            })
            .collect())
    }

    /// Responsible nameserver (SOA mname) of any SOA records found
    pub async fn get_soa(&self, domain: &str) -> ScanResult<Vec<String>> {
        let message = self.query(domain, RecordType::SOA).await?;
        Ok(message
            .answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::SOA(soa) => Some(trim_fqdn(soa.mname())),
                _ => None,
            })
            .collect())
    }

    pub async fn get_a(&self, domain: &str) -> ScanResult<Vec<String>> {
        let message = self.query(domain, RecordType::A).await?;
        Ok(message
            .answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::A(a) => Some(a.0.to_string()),
                _ => None,
            })
            .collect())
    }

    pub async fn get_aaaa(&self, domain: &str) -> ScanResult<Vec<String>> {
        let message = self.query(domain, RecordType::AAAA).await?;
        Ok(message
            .answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::AAAA(aaaa) => Some(aaaa.0.to_string()),
                _ => None,
            })
            .collect())
    }

    /// Nameservers of `domain` via the configured upstream
    pub async fn get_ns(&self, domain: &str) -> ScanResult<Vec<String>> {
        let nameserver = self.nameserver();
        self.get_ns_at(nameserver, domain).await
    }

    /// Nameservers of `domain` as seen by a specific server. Referral
    /// responses keep delegation data in the authority section, so that
    /// section is parsed when the answer section is empty.
    pub async fn get_ns_at(&self, nameserver: SocketAddr, domain: &str) -> ScanResult<Vec<String>> {
        let message = self.query_at(nameserver, domain, RecordType::NS).await?;
        if message.response_code() != ResponseCode::NoError {
            return Err(ScanError::DnsRcode {
                domain: domain.to_string(),
                code: message.response_code(),
            });
        }

        let records = if message.answers().is_empty() {
            message.name_servers()
        } else {
            message.answers()
        };
        Ok(parse_ns_records(records))
    }

    /// Addresses `domain` resolves to: direct A/AAAA records plus recursive
    /// resolution through each CNAME target, bounded by [`MAX_RESOLVE_DEPTH`].
    pub async fn resolve(&self, domain: &str) -> Vec<String> {
        self.resolve_bounded(domain, MAX_RESOLVE_DEPTH).await
    }

    fn resolve_bounded<'a>(&'a self, domain: &'a str, depth: u8) -> BoxFuture<'a, Vec<String>> {
        Box::pin(async move {
            let mut addresses: Vec<String> = Vec::new();
            if depth == 0 {
                warn!("{domain}: CNAME chain exceeds resolution depth, giving up");
                return addresses;
            }

            for lookup in [self.get_a(domain).await, self.get_aaaa(domain).await] {
                match lookup {
                    Ok(addrs) => {
                        for addr in addrs {
                            if !addresses.contains(&addr) {
                                addresses.push(addr);
                            }
                        }
                    }
                    Err(e) => debug!("{domain}: address lookup failed: {e}"),
                }
            }

            let cnames = match self.get_cname(domain).await {
                Ok(cnames) => cnames,
                Err(e) => {
                    debug!("{domain}: CNAME lookup failed: {e}");
                    Vec::new()
                }
            };
            for cname in &cnames {
                for addr in self.resolve_bounded(cname, depth - 1).await {
                    if !addresses.contains(&addr) {
                        addresses.push(addr);
                    }
                }
            }

            addresses
        })
    }

    /// True iff an A query for `domain` comes back with NXDOMAIN
    pub async fn is_nxdomain(&self, domain: &str) -> bool {
        match self.query(domain, RecordType::A).await {
            Ok(message) => message.response_code() == ResponseCode::NXDomain,
            Err(e) => {
                warn!("{domain}: type A request to check NXDOMAIN failed: {e}");
                false
            }
        }
    }

    /// Walks the delegation chain of `domain` and asks its own authoritative
    /// servers directly: a SERVFAIL or REFUSED from any of them signals a
    /// broken (possibly claimable) delegation. Any failure along the walk
    /// counts as "not detected" - a lame delegation must never kill the scan.
    pub async fn is_servfail(&self, domain: &str) -> bool {
        let root = match registrable_root(domain) {
            Ok(root) => root,
            Err(e) => {
                warn!("{domain}: unable to determine root domain: {e}");
                return false;
            }
        };

        let root_nameservers = match self.get_ns(&root).await {
            Ok(nameservers) => nameservers,
            Err(e) => {
                warn!("{domain}: unable to get nameserver: {e}");
                return false;
            }
        };
        let Some(first) = root_nameservers.first() else {
            return false;
        };
        let Some(root_ns_addr) = self.host_to_addr(first).await else {
            warn!("{domain}: root nameserver {first} does not resolve");
            return false;
        };

        let authorities = match self.get_ns_at(root_ns_addr, domain).await {
            Ok(authorities) => authorities,
            Err(e) => {
                warn!("{domain}: unable to get authority for {domain}: {e}");
                return false;
            }
        };

        for authority in &authorities {
            let Some(authority_addr) = self.host_to_addr(authority).await else {
                continue;
            };
            let message = match self.query_at(authority_addr, domain, RecordType::A).await {
                Ok(message) => message,
                Err(_) => continue,
            };
            if matches!(
                message.response_code(),
                ResponseCode::ServFail | ResponseCode::Refused
            ) {
                debug!("{domain}: authority {authority} answered {}", message.response_code());
                return true;
            }
        }
        false
    }

    /// True when the registrable root of `domain` neither resolves nor has an
    /// SOA record: nobody is administering it, so it may be open to
    /// registration. Root derivation and SOA failures propagate so the caller
    /// can skip the one affected target.
    pub async fn is_available(&self, domain: &str) -> ScanResult<bool> {
        let root = registrable_root(domain)?;
        if !self.resolve(&root).await.is_empty() {
            return Ok(false);
        }
        let soa_records = self.get_soa(&root).await?;
        Ok(soa_records.is_empty())
    }

    async fn host_to_addr(&self, host: &str) -> Option<SocketAddr> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Some(SocketAddr::new(ip, 53));
        }
        self.resolve(host)
            .await
            .iter()
            .find_map(|addr| addr.parse::<IpAddr>().ok())
            .map(|ip| SocketAddr::new(ip, 53))
    }
}

/// Shortest registrable domain (eTLD+1) for a name
pub fn registrable_root(domain: &str) -> ScanResult<String> {
    psl::domain_str(domain)
        .map(str::to_string)
        .ok_or_else(|| ScanError::RegistrableRoot {
            domain: domain.to_string(),
        })
}

fn parse_ns_records(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| match record.data() {
            RData::NS(ns) => Some(trim_fqdn(&ns.0)),
            RData::SOA(soa) => Some(trim_fqdn(soa.mname())),
            _ => None,
        })
        .collect()
}

fn trim_fqdn(name: &Name) -> String {
    name.to_utf8().trim_end_matches('.').to_string()
}
