// End-to-end tests for computing, validating, applying and packaging runs.

use rundelta::error::DiffError;
use rundelta::package::Package;
use rundelta::run::{self, Run, RunSequence, Violation};
use rundelta::tuning::{self, DiffOptions};

const A: [u8; 5] = [10, 20, 30, 40, 50];

#[test]
fn threshold_boundary_scenario() {
    let b = [10, 99, 98, 40, 51];
    let runs = run::compute(&A, &b, 0).unwrap();
    assert_eq!(runs.runs(), &[Run::new(1, 2), Run::new(4, 1)]);
    assert_eq!(runs.run_count(), 2);
    assert_eq!(runs.touched_byte_count(), 3);
    assert!(run::validate(&A, &b, runs.runs()));
}

#[test]
fn gap_coalescing_scenario() {
    let b2 = [10, 99, 30, 40, 51];
    let runs = run::compute(&A, &b2, 2).unwrap();
    assert_eq!(runs.runs(), &[Run::new(1, 4)]);
    // Touched bytes include the two absorbed equal bytes.
    assert_eq!(runs.touched_byte_count(), 4);
    assert!(run::validate(&A, &b2, runs.runs()));

    let mut dest = A;
    run::apply(&b2, &mut dest, &runs).unwrap();
    assert_eq!(dest, b2);
}

#[test]
fn overlapping_runs_over_equal_data_fail_validation() {
    let runs = vec![Run::new(1, 3), Run::new(2, 2)];
    assert!(!run::validate(&A, &A, &runs));

    let report = run::validate_report(&A, &A, &runs);
    assert_eq!(
        report.violations(),
        &[
            Violation::OverlappingRuns { run: 1, byte: 2 },
            Violation::OverlappingRuns { run: 1, byte: 3 },
        ]
    );
}

#[test]
fn zero_sized_runs_fail_validation() {
    let b = [10, 99, 30, 40, 50];
    let runs = vec![Run::new(1, 1), Run::new(3, 0)];
    let report = run::validate_report(&A, &b, &runs);
    assert_eq!(report.violations(), &[Violation::ZeroSizedRun { run: 1 }]);
}

#[test]
fn checked_sequences_reject_what_validation_reports() {
    let err = RunSequence::from_runs(vec![Run::new(1, 3), Run::new(2, 2)]).unwrap_err();
    assert_eq!(err, DiffError::OverlappingRuns { index: 1 });
}

#[test]
fn validation_catches_runs_computed_for_other_buffers() {
    let b = [10, 99, 30, 40, 50];
    let c = [10, 20, 30, 40, 77];
    let runs = run::compute(&A, &b, 0).unwrap();
    let report = run::validate_report(&A, &c, runs.runs());
    assert!(!report.is_valid());
    assert_eq!(
        report.violations(),
        &[Violation::UncoveredDiffByte { byte: 4 }]
    );
}

#[test]
fn package_is_usable_without_the_new_buffer() {
    let old: Vec<u8> = (0..1024u32).map(|i| (i % 251) as u8).collect();
    let mut new = old.clone();
    for i in [3usize, 4, 5, 100, 101, 700, 1023] {
        new[i] ^= 0xFF;
    }

    let runs = run::compute(&old, &new, 4).unwrap();
    let bytes = Package::pack(&new, runs).unwrap().to_bytes().unwrap();

    let package = Package::from_bytes(&bytes).unwrap();
    let mut state = old.clone();
    package.unpack(&mut state).unwrap();
    assert_eq!(state, new);
}

#[test]
fn same_package_applies_to_several_replicas() {
    let old = vec![0u8; 64];
    let mut new = old.clone();
    new[10..20].fill(7);
    new[63] = 1;
    let package = Package::pack(&new, run::compute(&old, &new, 4).unwrap()).unwrap();

    let mut server = old.clone();
    let mut client = old.clone();
    package.unpack(&mut server).unwrap();
    package.unpack(&mut client).unwrap();
    assert_eq!(server, new);
    assert_eq!(client, new);
}

#[test]
fn edge_case_matrix() {
    let cases: Vec<(&[u8], &[u8])> = vec![
        (b"", b""),
        (b"x", b"x"),
        (b"x", b"y"),
        (b"\0\0\0\0\0", b"\0\0\0\0\0"),
        (b"\0\0\0\0\0", b"\0\0\0\0\x01"),
        (b"\x01\0\0\0\0", b"\0\0\0\0\0"),
        (b"abcdef", b"ABCDEF"),
    ];

    for (a, b) in cases {
        for threshold in [0, 1, 4, 100] {
            let runs = run::compute(a, b, threshold).unwrap();
            assert!(run::validate(a, b, runs.runs()));
            if a == b {
                assert!(runs.is_empty());
            }
            let mut dest = a.to_vec();
            Package::pack(b, runs).unwrap().unpack(&mut dest).unwrap();
            assert_eq!(dest, b);
        }
    }
}

#[test]
fn diff_with_options_validates() {
    let b = [10, 99, 30, 40, 51];
    let opts = DiffOptions {
        skip_threshold: 2,
        validate: true,
    };
    let runs = tuning::diff_with_options(&A, &b, &opts).unwrap();
    assert_eq!(runs.run_count(), 1);
}
