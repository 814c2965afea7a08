use std::{
    io,
    time::{Duration, Instant},
};

use doppel_core::{
    acquire::{acquirer_from_fn, Acquirer, AcquisitionError},
    snapshot::Snapshot,
};

#[derive(Debug, PartialEq)]
struct Scan {
    nodes: Vec<&'static str>,
}

#[test]
fn snapshot_derefs_to_payload() {
    let snapshot = Snapshot::new(3, Scan {
        nodes: vec!["a", "b"],
    });

    assert_eq!(3, snapshot.version());
    assert_eq!(2, snapshot.nodes.len());
    assert_eq!(&snapshot.nodes, &snapshot.payload().nodes);
}

#[test]
fn snapshot_age_is_measured_from_acquisition() {
    let acquired_at = Instant::now();
    let snapshot = Snapshot::with_timestamp(1, acquired_at, ());
    std::thread::sleep(Duration::from_millis(5));

    assert_eq!(acquired_at, snapshot.acquired_at());
    assert!(snapshot.age() >= Duration::from_millis(5));
}

#[test]
fn unpublished_snapshot_gives_back_payload() {
    let snapshot = Snapshot::new(1, Scan { nodes: vec!["a"] });

    assert_eq!(Scan { nodes: vec!["a"] }, snapshot.into_payload());
}

#[test]
fn fn_acquirer_propagates_errors() {
    let mut attempts = 0;
    let mut acquirer = acquirer_from_fn(move || {
        attempts += 1;
        if attempts == 1 {
            Err(AcquisitionError::new(io::Error::new(
                io::ErrorKind::TimedOut,
                "bus timeout",
            )))
        } else {
            Ok(attempts)
        }
    });

    let error = acquirer.acquire().unwrap_err();
    assert_eq!("acquisition failed: bus timeout", error.to_string());
    assert_eq!(2, acquirer.acquire().unwrap());
}

#[test]
fn boxed_acquirer_is_an_acquirer() {
    let mut acquirer: Box<dyn Acquirer<Output = u8>> = Box::new(acquirer_from_fn(|| {
        Err::<u8, _>(AcquisitionError::msg("no sensors attached"))
    }));

    assert!(std::matches!(
        acquirer.acquire(),
        Err(AcquisitionError::Message(message)) if message == "no sensors attached"
    ));
}
