// Copyright (c) 2023 Mike Tsao. All rights reserved.

use eagan_sync::prelude::*;
use std::time::Duration;

fn bus(n: usize) -> ModulationBus {
    let addressing = vec![PortConfig::default(); n];
    ModulationBus::configure_with_rng(
        ModulationLayout::default(),
        &addressing,
        ClientTag(0),
        Rng::new_with_seed(5),
    )
}

#[test]
fn amounts_survive_a_trip_through_a_patch_file() {
    let mut b = bus(3);
    for (i, amount) in [25.0, -50.0, 100.0].into_iter().enumerate() {
        b.port_mut(i).unwrap().set_amount(Percentage::new(amount));
    }
    let text = serde_json::to_string(&b.mod_to_json().unwrap()).unwrap();
    assert_eq!(text, r#"{"mod-amount":[25.0,-50.0,100.0]}"#);

    let mut restored = bus(3);
    restored
        .mod_from_json(&serde_json::from_str(&text).unwrap())
        .unwrap();
    for i in 0..3 {
        assert_eq!(
            restored.port(i).unwrap().amount(),
            b.port(i).unwrap().amount()
        );
    }
}

#[test]
fn older_patches_with_fewer_ports_still_load() {
    let mut b = bus(4);
    b.mod_from_json(&serde_json::json!({"mod-amount": [10, 20]}))
        .unwrap();
    let amounts: Vec<f64> = b.ports().iter().map(|p| p.amount().value()).collect();
    assert_eq!(amounts, vec![10.0, 20.0, 0.0, 0.0]);
}

#[test]
fn malformed_state_is_an_error() {
    let mut b = bus(2);
    for bad in [
        serde_json::json!({"mod-amount": [1.0, "two"]}),
        serde_json::json!({"mod-amount": 3}),
        serde_json::json!([1.0, 2.0]),
    ] {
        assert!(
            matches!(b.mod_from_json(&bad), Err(StateError::Json(_))),
            "{bad} should be rejected"
        );
    }
    assert!(
        b.ports().iter().all(|p| p.amount() == Percentage::zero()),
        "a rejected restore shouldn't touch anything"
    );
}

#[test]
fn settings_drive_the_bus_and_the_scanner() {
    let settings: SyncSettings = serde_json::from_str(
        r#"{"sync-interval-ms": 20, "start-timeout-ms": 500}"#,
    )
    .unwrap();

    let mut b = bus(1);
    b.set_sync_interval(settings.sync_interval());
    assert_eq!(b.sync_interval(), Duration::from_millis(20));

    let e = PresetEnumerator::default().with_timeouts(settings.scan_timeouts());
    assert_eq!(e.timeouts().start, Duration::from_millis(500));
    assert_eq!(e.timeouts().response, Duration::from_millis(2500));
    assert_eq!(e.timeouts().settle, Duration::from_millis(2000));
}
