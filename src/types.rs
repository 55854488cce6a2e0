// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};

use crate::fingerprints::{ConfidenceLevel, Fingerprint};

/// Kind of weakness a match describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    DanglingCnameRecord,
    DanglingNsRecord,
    UnregisteredDomain,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::DanglingCnameRecord => "dangling_cname_record",
            IssueType::DanglingNsRecord => "dangling_ns_record",
            IssueType::UnregisteredDomain => "unregistered_domain",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Technique that produced a match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    CnameNxdomain,
    ANxdomain,
    Nxdomain,
    CnameHttpStatus,
    AHttpStatus,
    HttpStatus,
    CnameBodyPattern,
    ABodyPattern,
    BodyPattern,
    SoaCheck,
    Servfail,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::CnameNxdomain => "cname_nxdomain",
            DetectionMethod::ANxdomain => "a_nxdomain",
            DetectionMethod::Nxdomain => "nxdomain",
            DetectionMethod::CnameHttpStatus => "cname_http_status",
            DetectionMethod::AHttpStatus => "a_http_status",
            DetectionMethod::HttpStatus => "http_status",
            DetectionMethod::CnameBodyPattern => "cname_body_pattern",
            DetectionMethod::ABodyPattern => "a_body_pattern",
            DetectionMethod::BodyPattern => "body_pattern",
            DetectionMethod::SoaCheck => "soa_check",
            DetectionMethod::Servfail => "servfail",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of evidence collected for a domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub target: String,
    #[serde(rename = "type")]
    pub issue: IssueType,
    pub method: DetectionMethod,
    pub fingerprint: Option<Fingerprint>,
}

impl Match {
    /// Confidence of the matched fingerprint; pure availability and
    /// delegation findings carry no fingerprint and report `unknown`.
    pub fn confidence(&self) -> ConfidenceLevel {
        self.fingerprint
            .as_ref()
            .map(Fingerprint::confidence)
            .unwrap_or(ConfidenceLevel::Unknown)
    }

    pub fn service(&self) -> &str {
        self.fingerprint.as_ref().map(|fp| fp.name.as_str()).unwrap_or("n/a")
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[service: {}] [confidence: {}] {} ({}): {}",
            self.service(),
            self.confidence(),
            self.issue,
            self.method,
            self.target
        )
    }
}

/// All matches collected for one scanned domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainFinding {
    pub domain: String,
    pub matches: Vec<Match>,
}

impl DomainFinding {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            matches: Vec::new(),
        }
    }
}

/// Result-file shape: `{"findings": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Findings {
    pub findings: Vec<DomainFinding>,
}
