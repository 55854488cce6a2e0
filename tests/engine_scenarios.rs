// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Detection Engine Scenario Tests
 * End-to-end takeover detection against canned DNS and a mock HTTP endpoint
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

mod common;

use common::*;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::RecordType;
use kaappari::dns_client::DnsClient;
use kaappari::engine::Engine;
use kaappari::fingerprints::Registry;
use kaappari::http_probe::HttpProber;
use kaappari::types::{DetectionMethod, IssueType};
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_with(stub: StubTransport, fingerprints: Vec<kaappari::fingerprints::Fingerprint>) -> Engine {
    Engine::with_parts(
        Registry::from_fingerprints(fingerprints),
        DnsClient::with_transport(nameserver(), Arc::new(stub)),
        HttpProber::new(2).unwrap(),
    )
}

#[tokio::test]
async fn cname_to_decommissioned_service_with_nxdomain() {
    let mut stub = StubTransport::new();
    stub.insert(
        "foo.example.com",
        RecordType::CNAME,
        cname_msg("foo.example.com", &["bar.herokudns.com"]),
    );
    stub.insert(
        "foo.example.com",
        RecordType::A,
        rcode_msg(ResponseCode::NXDomain),
    );

    let mut heroku = fingerprint("Heroku");
    heroku.cnames = vec!["herokudns.com".to_string()];
    heroku.nxdomain = true;

    let engine = engine_with(stub, vec![heroku]);
    let matches = engine.check_cname("foo.example.com").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].target, "bar.herokudns.com");
    assert_eq!(matches[0].issue, IssueType::DanglingCnameRecord);
    assert_eq!(matches[0].method, DetectionMethod::CnameNxdomain);
    assert_eq!(matches[0].fingerprint.as_ref().unwrap().name, "Heroku");
}

#[tokio::test]
async fn headless_fingerprint_fires_on_body_pattern() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            "<Error><Code>NoSuchBucket</Code><Message>The specified bucket does not exist</Message></Error>",
        ))
        .mount(&server)
        .await;

    let mut stub = StubTransport::new();
    stub.insert("localhost", RecordType::A, a_msg("localhost", &["127.0.0.1"]));

    let mut headless = fingerprint("AWS/S3");
    headless.pattern = Some("NoSuchBucket".to_string());

    let engine = Engine::with_parts(
        Registry::from_fingerprints(vec![headless]),
        DnsClient::with_transport(nameserver(), Arc::new(stub)),
        HttpProber::new(2)
            .unwrap()
            .with_probe_port(server.address().port()),
    );

    let matches = engine.check_cname("localhost").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].method, DetectionMethod::BodyPattern);
    assert_eq!(matches[0].issue, IssueType::DanglingCnameRecord);
    assert_eq!(matches[0].target, "127.0.0.1");
}

#[tokio::test]
async fn unmatched_cname_with_unclaimed_root_reports_availability() {
    let mut stub = StubTransport::new();
    stub.insert(
        "app.customer.com",
        RecordType::CNAME,
        cname_msg("app.customer.com", &["files.gone-service.com"]),
    );
    // gone-service.com neither resolves nor has an SOA record

    let mut heroku = fingerprint("Heroku");
    heroku.cnames = vec!["herokudns.com".to_string()];
    heroku.nxdomain = true;

    let engine = engine_with(stub, vec![heroku]);
    let matches = engine.check_cname("app.customer.com").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].issue, IssueType::UnregisteredDomain);
    assert_eq!(matches[0].method, DetectionMethod::SoaCheck);
    assert_eq!(matches[0].target, "gone-service.com");
    assert!(matches[0].fingerprint.is_none());
}

#[tokio::test]
async fn broken_delegation_yields_one_ns_match() {
    let mut stub = StubTransport::new();
    stub.insert(
        "lost-zone.com",
        RecordType::NS,
        ns_msg("lost-zone.com", &["ns1.lost-zone.com"]),
    );
    stub.insert(
        "ns1.lost-zone.com",
        RecordType::A,
        a_msg("ns1.lost-zone.com", &["192.0.2.53"]),
    );
    stub.insert(
        "sub.lost-zone.com",
        RecordType::NS,
        ns_referral_msg("sub.lost-zone.com", &["ns.dead-provider.net"]),
    );
    stub.insert(
        "ns.dead-provider.net",
        RecordType::A,
        a_msg("ns.dead-provider.net", &["192.0.2.66"]),
    );
    stub.insert(
        "sub.lost-zone.com",
        RecordType::A,
        rcode_msg(ResponseCode::Refused),
    );

    let engine = engine_with(stub, Vec::new());
    let matches = engine.check_ns("sub.lost-zone.com").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].target, "n/a");
    assert_eq!(matches[0].issue, IssueType::DanglingNsRecord);
    assert_eq!(matches[0].method, DetectionMethod::Servfail);
    assert!(matches[0].fingerprint.is_none());
}

#[tokio::test]
async fn fingerprint_match_suppresses_availability_for_all_cnames() {
    // two CNAMEs: the first matches a fingerprint, the second points at an
    // unclaimed root. The fingerprint match must suppress the availability
    // check for the whole domain, not just for its own CNAME.
    let mut stub = StubTransport::new();
    stub.insert(
        "multi.example.com",
        RecordType::CNAME,
        cname_msg(
            "multi.example.com",
            &["old.herokudns.com", "files.gone-service.com"],
        ),
    );
    stub.insert(
        "multi.example.com",
        RecordType::A,
        rcode_msg(ResponseCode::NXDomain),
    );

    let mut heroku = fingerprint("Heroku");
    heroku.cnames = vec!["herokudns.com".to_string()];
    heroku.nxdomain = true;

    let engine = engine_with(stub, vec![heroku]);
    let matches = engine.check_cname("multi.example.com").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].issue, IssueType::DanglingCnameRecord);
    assert_eq!(matches[0].target, "old.herokudns.com");
}

#[tokio::test]
async fn availability_is_only_tested_for_the_first_cname() {
    // the first CNAME's root is claimed, the second's is not: with no
    // fingerprint match anywhere, only the first target gets the
    // availability test, so the domain comes back clean
    let mut stub = StubTransport::new();
    stub.insert(
        "two.example.com",
        RecordType::CNAME,
        cname_msg(
            "two.example.com",
            &["cdn.registered.com", "files.gone-service.com"],
        ),
    );
    stub.insert(
        "registered.com",
        RecordType::A,
        a_msg("registered.com", &["203.0.113.5"]),
    );

    let engine = engine_with(stub, Vec::new());
    let matches = engine.check_cname("two.example.com").await.unwrap();

    assert!(matches.is_empty());
}

#[tokio::test]
async fn static_ip_fingerprint_matches_a_records() {
    let mut stub = StubTransport::new();
    stub.insert(
        "pinned.example.com",
        RecordType::A,
        a_msg("pinned.example.com", &["192.0.2.21"]),
    );

    let mut parked = fingerprint("Parked Hosting");
    parked.cnames = vec!["192.0.2.21".to_string()];
    parked.nxdomain = true;

    let engine = engine_with(stub, vec![parked]);
    let matches = engine.check_cname("pinned.example.com").await.unwrap();

    // the A answer is NOERROR, so the NXDOMAIN criterion does not fire
    assert!(matches.is_empty());
}

#[tokio::test]
async fn static_ip_fingerprint_fires_with_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let mut stub = StubTransport::new();
    stub.insert("localhost", RecordType::A, a_msg("localhost", &["127.0.0.1"]));

    let mut worksites = fingerprint("Worksites");
    worksites.cnames = vec!["127.0.0.1".to_string()];
    worksites.http_status = Some(410);

    let engine = Engine::with_parts(
        Registry::from_fingerprints(vec![worksites]),
        DnsClient::with_transport(nameserver(), Arc::new(stub)),
        HttpProber::new(2)
            .unwrap()
            .with_probe_port(server.address().port()),
    );

    let matches = engine.check_cname("localhost").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].method, DetectionMethod::AHttpStatus);
    assert_eq!(matches[0].target, "127.0.0.1");
}

#[tokio::test]
async fn http_body_is_fetched_once_per_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("project not found"))
        .expect(1)
        .mount(&server)
        .await;

    let mut stub = StubTransport::new();
    stub.insert("localhost", RecordType::A, a_msg("localhost", &["127.0.0.1"]));

    // several headless pattern fingerprints share the one cached body;
    // wiremock's expect(1) fails the test on a second fetch
    let mut surge = fingerprint("Surge.sh");
    surge.pattern = Some("project not found".to_string());
    let mut github = fingerprint("Github");
    github.pattern = Some("There isn't a GitHub Pages site here.".to_string());
    let mut heroku = fingerprint("Heroku");
    heroku.pattern = Some("No such app".to_string());

    let engine = Engine::with_parts(
        Registry::from_fingerprints(vec![github, heroku, surge]),
        DnsClient::with_transport(nameserver(), Arc::new(stub)),
        HttpProber::new(2)
            .unwrap()
            .with_probe_port(server.address().port()),
    );

    let matches = engine.check_cname("localhost").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].fingerprint.as_ref().unwrap().name, "Surge.sh");
}
