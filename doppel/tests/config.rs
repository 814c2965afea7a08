use std::time::Duration;

use doppel::config::{ConfigError, SchedulerConfig, StopPolicy, DEFAULT_THREAD_NAME};

#[test]
fn with_period_uses_defaults() {
    let config = SchedulerConfig::with_period(Duration::from_secs(10));

    assert_eq!(Duration::from_secs(10), config.period);
    assert_eq!(DEFAULT_THREAD_NAME, config.thread_name);
    assert!(config.run_immediately);
    assert_eq!(StopPolicy::DiscardOnStop, config.stop_policy);
    assert_eq!(Ok(()), config.validate());
}

#[test]
fn deserialize_minimal() {
    let config: SchedulerConfig = serde_json::from_str(r#"{ "period_ms": 250 }"#).unwrap();

    assert_eq!(
        SchedulerConfig::with_period(Duration::from_millis(250)),
        config
    );
}

#[test]
fn deserialize_full() {
    let config: SchedulerConfig = serde_json::from_str(
        r#"{
            "period_ms": 10000,
            "thread_name": "sensor-scan",
            "run_immediately": false,
            "stop_policy": "publish_if_ready"
        }"#,
    )
    .unwrap();

    assert_eq!(Duration::from_secs(10), config.period);
    assert_eq!("sensor-scan", config.thread_name);
    assert!(!config.run_immediately);
    assert_eq!(StopPolicy::PublishIfReady, config.stop_policy);
}

#[test]
fn deserialize_rejects_unknown_fields() {
    let result = serde_json::from_str::<SchedulerConfig>(r#"{ "period_ms": 5, "jitter_ms": 1 }"#);

    assert!(result.is_err());
}

#[test]
fn deserialize_requires_period() {
    let result = serde_json::from_str::<SchedulerConfig>(r#"{ "thread_name": "scan" }"#);

    assert!(result.is_err());
}

#[test]
fn serialize_round_trips_period_as_millis() {
    let config = SchedulerConfig::with_period(Duration::from_millis(1500));

    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(1500, json["period_ms"]);
    assert_eq!("discard_on_stop", json["stop_policy"]);
}

#[test]
fn validate_rejects_zero_period() {
    let config = SchedulerConfig::with_period(Duration::ZERO);

    assert_eq!(Err(ConfigError::ZeroPeriod), config.validate());
}

#[test]
fn validate_rejects_period_past_instant_range() {
    let period = Duration::from_secs(u64::MAX);
    let config = SchedulerConfig::with_period(period);

    assert_eq!(Err(ConfigError::PeriodTooLong(period)), config.validate());
}

#[test]
fn validate_accepts_long_representable_period() {
    let config = SchedulerConfig::with_period(Duration::from_secs(100 * 365 * 24 * 3600));

    assert_eq!(Ok(()), config.validate());
}

#[test]
fn validate_rejects_bad_thread_names() {
    for name in ["", "scan\0er"] {
        let config = SchedulerConfig {
            thread_name: name.to_string(),
            ..SchedulerConfig::with_period(Duration::from_secs(1))
        };

        assert_eq!(
            Err(ConfigError::InvalidThreadName(name.to_string())),
            config.validate()
        );
    }
}
