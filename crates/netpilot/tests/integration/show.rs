//! Reading rules back from `tc qdisc show`.

use netpilot::qos::{CakeSettings, TbfSettings, UnknownSettings};
use netpilot::util::rate::mbit_to_bits;
use netpilot::{Algorithm, CommandOutput, Error, QdiscSettings, RuleRequest};

use crate::common::{FakeTc, manager};

#[test]
fn test_cake_round_trip() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    qos.apply_rule(&RuleRequest::new("eth0", "cake").bandwidth_mbit(500))
        .unwrap();
    let rule = qos.get_rule("eth0").unwrap().expect("eth0 exists");

    assert_eq!(rule.interface, "eth0");
    assert_eq!(rule.algorithm, Algorithm::Cake);
    // tc prints "500Mbit" for the "500mbit" it was given
    assert_eq!(rule.settings.bandwidth_bps().unwrap(), Some(mbit_to_bits(500)));

    let QdiscSettings::Cake(CakeSettings { rtt, diffserv, .. }) = &rule.settings else {
        panic!("expected cake settings, got {:?}", rule.settings);
    };
    assert_eq!(rtt.as_deref(), Some("100ms"));
    assert_eq!(diffserv.as_deref(), Some("diffserv3"));
}

#[test]
fn test_tbf_round_trip() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    qos.apply_rule(&RuleRequest::new("wan0", "tbf").bandwidth_mbit(20))
        .unwrap();
    let rule = qos.get_rule("wan0").unwrap().unwrap();

    assert_eq!(
        rule.settings,
        QdiscSettings::Tbf(TbfSettings {
            rate: Some("20Mbit".into()),
            burst: Some("1600b".into()),
            latency: Some("3.2ms".into()),
            limit: None,
        })
    );
    assert_eq!(rule.settings.bandwidth_bps().unwrap(), Some(mbit_to_bits(20)));
}

#[test]
fn test_each_algorithm_reads_back() {
    let cases = [
        (RuleRequest::new("eth0", "cake").bandwidth_mbit(100), Algorithm::Cake),
        (RuleRequest::new("eth0", "tbf").bandwidth_mbit(100), Algorithm::Tbf),
        (RuleRequest::new("eth0", "fq_codel"), Algorithm::FqCodel),
        (RuleRequest::new("eth0", "sfq"), Algorithm::Sfq),
        (RuleRequest::new("eth0", "default"), Algorithm::PfifoFast),
    ];

    for (req, expected) in cases {
        let fake = FakeTc::new();
        let qos = manager(&fake);
        qos.apply_rule(&req).unwrap();

        let rule = qos.get_rule("eth0").unwrap().unwrap();
        assert_eq!(rule.algorithm, expected, "{}", req.algorithm);
    }
}

#[test]
fn test_missing_interface_is_absent() {
    let fake = FakeTc::new().missing("eth9");
    let qos = manager(&fake);

    assert_eq!(qos.get_rule("eth9").unwrap(), None);
    assert_eq!(fake.call_count(), 1);
}

#[test]
fn test_cannot_find_device_is_absent() {
    let fake = FakeTc::new().show_reply(
        "eth9",
        CommandOutput::new(1, "Cannot find device \"eth9\"\n"),
    );
    assert_eq!(manager(&fake).get_rule("eth9").unwrap(), None);
}

#[test]
fn test_show_failure_is_error() {
    let fake = FakeTc::new().show_reply(
        "eth0",
        CommandOutput::new(2, "RTNETLINK answers: Operation not permitted\n"),
    );
    let err = manager(&fake).get_rule("eth0").unwrap_err();

    assert!(err.is_command_failure());
    assert_eq!(
        err.output(),
        Some("RTNETLINK answers: Operation not permitted\n")
    );
    assert!(matches!(err, Error::CommandFailed { ref operation, .. } if operation.contains("eth0")));
}

#[test]
fn test_show_unavailable_is_error() {
    let fake = FakeTc::new().unavailable();
    let err = manager(&fake).get_rule("eth0").unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }));
}

#[test]
fn test_empty_show_is_default() {
    let fake = FakeTc::new().show_reply("eth0", CommandOutput::ok(""));
    let rule = manager(&fake).get_rule("eth0").unwrap().unwrap();

    assert_eq!(rule.algorithm, Algorithm::PfifoFast);
    assert_eq!(rule.settings, QdiscSettings::default_qdisc());
}

#[test]
fn test_unrecognised_qdisc() {
    let raw = "qdisc noqueue 0: root refcnt 2 \n";
    let fake = FakeTc::new().show_reply("lo", CommandOutput::ok(raw));
    let rule = manager(&fake).get_rule("lo").unwrap().unwrap();

    assert_eq!(rule.algorithm, Algorithm::Unknown);
    assert_eq!(
        rule.settings,
        QdiscSettings::Unknown(UnknownSettings {
            kind: Some("noqueue".into()),
            raw_output: raw.into(),
        })
    );

    let json = serde_json::to_value(&rule).unwrap();
    assert_eq!(json["algorithm"], "unknown");
    assert_eq!(json["settings"]["raw_output"], raw);
}

#[test]
fn test_reads_are_live() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    qos.apply_rule(&RuleRequest::new("eth0", "sfq")).unwrap();
    assert_eq!(qos.get_rule("eth0").unwrap().unwrap().algorithm, Algorithm::Sfq);

    qos.apply_rule(&RuleRequest::new("eth0", "fq_codel")).unwrap();
    assert_eq!(
        qos.get_rule("eth0").unwrap().unwrap().algorithm,
        Algorithm::FqCodel
    );

    let shows = fake.calls().iter().filter(|c| c.verb() == "show").count();
    assert_eq!(shows, 2);
}
