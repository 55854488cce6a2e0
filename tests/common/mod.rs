// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

#![allow(dead_code)]

use futures::future::BoxFuture;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::rdata::{A, CNAME, NS, SOA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use kaappari::dns_client::DnsTransport;
use kaappari::errors::ScanResult;
use kaappari::fingerprints::Fingerprint;

/// Canned DNS transport: replays fixed responses keyed by (domain, record
/// type) and counts every exchange. Unknown questions get an empty NOERROR
/// response, like a zone with no records of that type.
pub struct StubTransport {
    responses: HashMap<(String, RecordType), Message>,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn insert(&mut self, domain: &str, rtype: RecordType, message: Message) {
        self.responses.insert((domain.to_string(), rtype), message);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DnsTransport for StubTransport {
    fn exchange(
        &self,
        _nameserver: SocketAddr,
        name: Name,
        rtype: RecordType,
    ) -> BoxFuture<'static, ScanResult<Message>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (name.to_utf8().trim_end_matches('.').to_string(), rtype);
        let message = self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(Message::new);
        Box::pin(async move { Ok(message) })
    }
}

pub fn nameserver() -> SocketAddr {
    "127.0.0.53:53".parse().unwrap()
}

pub fn name(domain: &str) -> Name {
    let mut name = Name::from_utf8(domain).unwrap();
    name.set_fqdn(true);
    name
}

pub fn cname_msg(domain: &str, targets: &[&str]) -> Message {
    let mut message = Message::new();
    for target in targets {
        message.add_answer(Record::from_rdata(
            name(domain),
            300,
            RData::CNAME(CNAME(name(target))),
        ));
    }
    message
}

pub fn a_msg(domain: &str, addresses: &[&str]) -> Message {
    let mut message = Message::new();
    for address in addresses {
        message.add_answer(Record::from_rdata(
            name(domain),
            300,
            RData::A(A(address.parse().unwrap())),
        ));
    }
    message
}

pub fn ns_msg(domain: &str, hosts: &[&str]) -> Message {
    let mut message = Message::new();
    for host in hosts {
        message.add_answer(Record::from_rdata(
            name(domain),
            300,
            RData::NS(NS(name(host))),
        ));
    }
    message
}

/// Referral-style response: delegation data in the authority section only
pub fn ns_referral_msg(domain: &str, hosts: &[&str]) -> Message {
    let mut message = Message::new();
    for host in hosts {
        message.add_name_server(Record::from_rdata(
            name(domain),
            300,
            RData::NS(NS(name(host))),
        ));
    }
    message
}

pub fn soa_msg(domain: &str, mname: &str) -> Message {
    let mut message = Message::new();
    message.add_answer(Record::from_rdata(
        name(domain),
        300,
        RData::SOA(SOA::new(
            name(mname),
            name(&format!("hostmaster.{domain}")),
            2024010101,
            7200,
            3600,
            1209600,
            3600,
        )),
    ));
    message
}

pub fn rcode_msg(code: ResponseCode) -> Message {
    let mut message = Message::new();
    message.set_response_code(code);
    message
}

pub fn fingerprint(service: &str) -> Fingerprint {
    Fingerprint {
        cnames: Vec::new(),
        pattern: None,
        http_status: None,
        nxdomain: false,
        name: service.to_string(),
        vulnerable: true,
        status: "Vulnerable".to_string(),
    }
}
