//! Applying and deleting rules.

use netpilot::{CommandOutput, Error, QosManager, RuleRequest, TcConfig};

use crate::common::{FakeTc, manager};

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_missing_bandwidth_runs_nothing() {
    for algorithm in ["cake", "tbf"] {
        let fake = FakeTc::new();
        let qos = manager(&fake);

        let err = qos
            .apply_rule(&RuleRequest::new("eth0", algorithm))
            .unwrap_err();

        assert!(matches!(err, Error::MissingSetting { .. }), "{algorithm}: {err}");
        assert!(err.is_validation());
        assert_eq!(fake.call_count(), 0, "{algorithm} ran tc");
    }
}

#[test]
fn test_invalid_bandwidth_runs_nothing() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    for bad in [
        serde_json::json!(12.5),
        serde_json::json!(-100),
        serde_json::json!("500"),
    ] {
        let req = RuleRequest::new("eth0", "cake").setting("bandwidth_mbit", bad);
        let err = qos.apply_rule(&req).unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { .. }));
    }
    assert_eq!(fake.call_count(), 0);
}

#[test]
fn test_unsupported_algorithms() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    for tag in ["htb", "netem", "unknown", "Cake", ""] {
        let err = qos
            .apply_rule(&RuleRequest::new("eth0", tag).bandwidth_mbit(100))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(ref t) if t == tag));
        assert!(err.to_string().contains("unsupported QoS algorithm"));
    }
    assert_eq!(fake.call_count(), 0);
}

// ============================================================================
// Install
// ============================================================================

#[test]
fn test_cake_bandwidth_argument() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    qos.apply_rule(&RuleRequest::new("eth0", "cake").bandwidth_mbit(500))
        .unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].args, ["qdisc", "del", "dev", "eth0", "root"]);
    assert_eq!(
        calls[1].args,
        ["qdisc", "add", "dev", "eth0", "root", "cake", "bandwidth", "500mbit"]
    );
}

#[test]
fn test_float_encoded_bandwidth() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    let req = RuleRequest::from_json(
        r#"{"interface": "eth0", "algorithm": "tbf", "settings": {"bandwidth_mbit": 500.0}}"#,
    )
    .unwrap();
    qos.apply_rule(&req).unwrap();

    assert_eq!(
        fake.last_add().unwrap(),
        ["tbf", "rate", "500mbit", "buffer", "1600", "limit", "3000"]
    );
}

#[test]
fn test_flow_fairness_algorithms_take_no_settings() {
    for (algorithm, kind) in [("fq_codel", "fq_codel"), ("sfq", "sfq")] {
        let fake = FakeTc::new();
        let qos = manager(&fake);

        qos.apply_rule(&RuleRequest::new("eth0", algorithm).setting("ignored", true))
            .unwrap();
        assert_eq!(fake.last_add().unwrap(), [kind]);
    }
}

#[test]
fn test_default_only_clears() {
    for tag in ["default", "pfifo_fast"] {
        let fake = FakeTc::new();
        let qos = manager(&fake);

        qos.apply_rule(&RuleRequest::new("eth0", "sfq")).unwrap();
        qos.apply_rule(&RuleRequest::new("eth0", tag)).unwrap();

        let calls = fake.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].verb(), "del");
    }
}

#[test]
fn test_replaces_existing_rule() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    qos.apply_rule(&RuleRequest::new("eth0", "sfq")).unwrap();
    qos.apply_rule(&RuleRequest::new("eth0", "cake").bandwidth_mbit(50))
        .unwrap();

    let verbs: Vec<_> = fake.calls().iter().map(|c| c.verb().to_string()).collect();
    assert_eq!(verbs, ["del", "add", "del", "add"]);
    assert_eq!(fake.last_add().unwrap(), ["cake", "bandwidth", "50mbit"]);
}

#[test]
fn test_install_failure_leaves_default() {
    let fake = FakeTc::new();
    let qos = manager(&fake);
    qos.apply_rule(&RuleRequest::new("eth0", "sfq")).unwrap();

    fake.set_add_failure(CommandOutput::new(
        2,
        "Error: Specified qdisc kind is unknown.\n",
    ));
    let err = qos
        .apply_rule(&RuleRequest::new("eth0", "cake").bandwidth_mbit(500))
        .unwrap_err();

    assert!(err.is_command_failure());
    assert!(!err.is_validation());
    let msg = err.to_string();
    assert!(msg.contains("apply cake qdisc"));
    assert!(msg.contains("exit status: 2"));
    assert!(msg.contains("Specified qdisc kind is unknown"));

    // The old sfq was cleared before the add failed.
    let rule = qos.get_rule("eth0").unwrap().unwrap();
    assert_eq!(rule.algorithm, netpilot::Algorithm::PfifoFast);
}

#[test]
fn test_tc_unavailable() {
    let fake = FakeTc::new().unavailable();
    let qos = manager(&fake);

    let err = qos.apply_rule(&RuleRequest::new("eth0", "sfq")).unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }));
    assert!(err.is_command_failure());
}

#[test]
fn test_sudo_prefix() {
    let fake = FakeTc::new();
    let config = TcConfig::new().program("/usr/sbin/tc").sudo(true);
    let qos = QosManager::with_runner(config, fake.clone());

    qos.apply_rule(&RuleRequest::new("eth0", "fq_codel")).unwrap();

    for call in fake.calls() {
        assert_eq!(call.program, "sudo");
        assert_eq!(call.args[0], "/usr/sbin/tc");
    }
    assert_eq!(fake.last_add().unwrap(), ["fq_codel"]);
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_is_idempotent() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    qos.delete_rule("eth0").unwrap();
    qos.delete_rule("eth0").unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.verb() == "del"));
}

#[test]
fn test_delete_removes_rule() {
    let fake = FakeTc::new();
    let qos = manager(&fake);

    qos.apply_rule(&RuleRequest::new("eth0", "cake").bandwidth_mbit(500))
        .unwrap();
    qos.delete_rule("eth0").unwrap();

    let rule = qos.get_rule("eth0").unwrap().unwrap();
    assert_eq!(rule.algorithm, netpilot::Algorithm::PfifoFast);
}

#[test]
fn test_delete_never_fails() {
    let fake = FakeTc::new().missing("eth9");
    manager(&fake).delete_rule("eth9").unwrap();

    let fake = FakeTc::new().unavailable();
    manager(&fake).delete_rule("eth0").unwrap();
}
