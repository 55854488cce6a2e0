// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Takeover Detection Engine
 * Layered CNAME/A fingerprint matching and NS delegation checks
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::dns_client::{registrable_root, DnsClient};
use crate::errors::ScanResult;
use crate::fingerprints::{Fingerprint, Registry};
use crate::http_probe::HttpProber;
use crate::types::{DetectionMethod, IssueType, Match};

/// The checks the engine knows how to run, in scan order.
///
/// This is a closed set, not a plugin surface: the scheduler iterates the
/// configured order and dispatches statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainCheck {
    Cname,
    Ns,
}

impl DomainCheck {
    pub const DEFAULT_ORDER: [DomainCheck; 2] = [DomainCheck::Cname, DomainCheck::Ns];

    pub fn name(&self) -> &'static str {
        match self {
            DomainCheck::Cname => "cname",
            DomainCheck::Ns => "ns",
        }
    }
}

/// What kind of record led the engine to a fingerprint; selects the
/// reported detection method.
#[derive(Debug, Clone, Copy)]
enum RecordContext {
    Cname,
    Address,
    Headless,
}

impl RecordContext {
    fn nxdomain_method(self) -> DetectionMethod {
        match self {
            RecordContext::Cname => DetectionMethod::CnameNxdomain,
            RecordContext::Address => DetectionMethod::ANxdomain,
            RecordContext::Headless => DetectionMethod::Nxdomain,
        }
    }

    fn http_status_method(self) -> DetectionMethod {
        match self {
            RecordContext::Cname => DetectionMethod::CnameHttpStatus,
            RecordContext::Address => DetectionMethod::AHttpStatus,
            RecordContext::Headless => DetectionMethod::HttpStatus,
        }
    }

    fn body_pattern_method(self) -> DetectionMethod {
        match self {
            RecordContext::Cname => DetectionMethod::CnameBodyPattern,
            RecordContext::Address => DetectionMethod::ABodyPattern,
            RecordContext::Headless => DetectionMethod::BodyPattern,
        }
    }
}

/// Runs the takeover checks for one domain at a time
pub struct Engine {
    fingerprints: Registry,
    dns: DnsClient,
    prober: HttpProber,
}

impl Engine {
    pub fn new(cfg: &ScanConfig) -> anyhow::Result<Self> {
        let fingerprints =
            Registry::load(cfg.fingerprints_file.as_deref(), cfg.include_edge_cases)?;
        let dns = DnsClient::new(cfg)?;
        let prober = HttpProber::new(cfg.http_timeout)?;
        Ok(Self::with_parts(fingerprints, dns, prober))
    }

    pub fn with_parts(fingerprints: Registry, dns: DnsClient, prober: HttpProber) -> Self {
        Self {
            fingerprints,
            dns,
            prober,
        }
    }

    pub async fn run_check(&self, check: DomainCheck, domain: &str) -> ScanResult<Vec<Match>> {
        match check {
            DomainCheck::Cname => self.check_cname(domain).await,
            DomainCheck::Ns => self.check_ns(domain).await,
        }
    }

    /// CNAME/A takeover detection.
    ///
    /// Layered: A-record fingerprints first, then CNAME suffix fingerprints,
    /// then - only if nothing matched - the registration-availability
    /// fallback for the first CNAME target, and finally headless fingerprints
    /// for domains that resolve without any CNAME. A single HTTP body fetch
    /// is shared by every fingerprint evaluated for this domain.
    pub async fn check_cname(&self, domain: &str) -> ScanResult<Vec<Match>> {
        let mut matches: Vec<Match> = Vec::new();
        let mut body: Option<String> = None;

        // some providers park customers on fixed addresses instead of CNAMEs
        let a_records = self.dns.get_a(domain).await?;
        for address in &a_records {
            for fp in self.fingerprints.iter() {
                if !fp.cnames.iter().any(|c| c == address) {
                    continue;
                }
                debug!("{domain}: A record {address} matches known service: {}", fp.name);
                match self.evaluate(domain, fp, RecordContext::Address, &mut body).await {
                    Ok(Some(method)) => matches.push(Match {
                        target: address.clone(),
                        issue: IssueType::DanglingCnameRecord,
                        method,
                        fingerprint: Some(fp.clone()),
                    }),
                    Ok(None) => {}
                    Err(e) => warn!("{e}"),
                }
            }
        }

        let cnames = self.dns.get_cname(domain).await?;
        for cname in &cnames {
            debug!("{domain}: found CNAME record: {cname}");
            for fp in self.fingerprints.iter() {
                if !cname_matches(fp, cname) {
                    continue;
                }
                debug!("{domain}: CNAME {cname} matches known service: {}", fp.name);
                match self.evaluate(domain, fp, RecordContext::Cname, &mut body).await {
                    Ok(Some(method)) => matches.push(Match {
                        target: cname.clone(),
                        issue: IssueType::DanglingCnameRecord,
                        method,
                        fingerprint: Some(fp.clone()),
                    }),
                    Ok(None) => {}
                    Err(e) => warn!("{e}"),
                }
            }
        }

        // a fingerprint match anywhere on this domain suppresses the
        // availability fallback entirely, and only the first CNAME target
        // is ever availability-tested
        if matches.is_empty() {
            if let Some(first_cname) = cnames.first() {
                debug!("{domain}: checking CNAME target availability: {first_cname}");
                match self.dns.is_available(first_cname).await {
                    Ok(true) => {
                        if let Ok(root) = registrable_root(first_cname) {
                            matches.push(Match {
                                target: root,
                                issue: IssueType::UnregisteredDomain,
                                method: DetectionMethod::SoaCheck,
                                fingerprint: None,
                            });
                        }
                    }
                    Ok(false) => {}
                    Err(e) => debug!("{domain}: availability check skipped: {e}"),
                }
            }
        }

        // no CNAME at all: services detectable purely by HTTP signature
        if cnames.is_empty() && matches.is_empty() {
            let resolved = self.dns.resolve(domain).await;
            if !resolved.is_empty() {
                debug!("{domain}: no CNAMEs but domain resolves, checking relevant fingerprints");
                for fp in self.fingerprints.iter().filter(|fp| !fp.has_cnames()) {
                    match self.evaluate(domain, fp, RecordContext::Headless, &mut body).await {
                        Ok(Some(method)) => matches.push(Match {
                            target: resolved.join(","),
                            issue: IssueType::DanglingCnameRecord,
                            method,
                            fingerprint: Some(fp.clone()),
                        }),
                        Ok(None) => {}
                        Err(e) => warn!("{e}"),
                    }
                }
            }
        }

        if matches.is_empty() {
            debug!("{domain}: no possible takeover found");
        }
        Ok(matches)
    }

    /// Dangling NS delegation check: binary, no fingerprint involved
    pub async fn check_ns(&self, domain: &str) -> ScanResult<Vec<Match>> {
        let mut matches = Vec::new();
        if self.dns.is_servfail(domain).await {
            matches.push(Match {
                target: "n/a".to_string(),
                issue: IssueType::DanglingNsRecord,
                method: DetectionMethod::Servfail,
                fingerprint: None,
            });
        } else {
            debug!("{domain}: no dangling NS record found");
        }
        Ok(matches)
    }

    /// Decide whether a candidate fingerprint fires for `domain`, trying its
    /// criteria in fixed priority order and stopping at the first applicable
    /// one. A fingerprint that only declares a CNAME hint never fires: the
    /// suffix match alone is not evidence of a takeover. HTTP failures
    /// propagate so the caller can skip just this fingerprint.
    async fn evaluate(
        &self,
        domain: &str,
        fp: &Fingerprint,
        context: RecordContext,
        body: &mut Option<String>,
    ) -> ScanResult<Option<DetectionMethod>> {
        if fp.nxdomain {
            if self.dns.is_nxdomain(domain).await {
                return Ok(Some(context.nxdomain_method()));
            }
            return Ok(None);
        }

        if let Some(expected) = fp.expected_status() {
            let status = self.prober.get_status(domain).await?;
            if status == expected {
                return Ok(Some(context.http_status_method()));
            }
            return Ok(None);
        }

        if let Some(pattern) = fp.pattern_str() {
            if body.is_none() {
                debug!("{domain}: performing HTTP request to '{domain}'");
                *body = Some(self.prober.get_body(domain).await?);
            }
            let found = body.as_deref().map(|b| b.contains(pattern)).unwrap_or(false);
            if found {
                return Ok(Some(context.body_pattern_method()));
            }
            return Ok(None);
        }

        Ok(None)
    }
}

/// Suffix match of a CNAME target against a fingerprint's service names
fn cname_matches(fp: &Fingerprint, cname: &str) -> bool {
    fp.cnames.iter().any(|service| cname.ends_with(service.as_str()))
}
