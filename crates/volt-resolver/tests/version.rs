use std::str::FromStr;

use volt_resolver::version::Version;

const REFERENCE: [&str; 8] = [
    "1.0.0-alpha",
    "1.0.0-alpha.1",
    "1.0.0-alpha.beta",
    "1.0.0-beta",
    "1.0.0-beta.2",
    "1.0.0-beta.11",
    "1.0.0-rc.1",
    "1.0.0",
];

/// Every ordering of `items`, generated with Heap's algorithm.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut current = items.to_vec();
    let mut counters = vec![0; current.len()];
    let mut out = vec![current.clone()];
    let mut i = 0;
    while i < current.len() {
        if counters[i] < i {
            if i % 2 == 0 {
                current.swap(0, i);
            } else {
                current.swap(counters[i], i);
            }
            out.push(current.clone());
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    out
}

#[test]
fn reference_ordering_survives_any_shuffle() {
    let versions: Vec<Version> = REFERENCE.iter().map(|s| Version::parse(s).unwrap()).collect();
    let orders = permutations(&versions);
    assert_eq!(orders.len(), 40_320);

    for mut order in orders {
        order.sort();
        let sorted: Vec<String> = order.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, REFERENCE);
    }
}

#[test]
fn reference_ordering_is_strict() {
    for pair in REFERENCE.windows(2) {
        let lower = Version::parse(pair[0]).unwrap();
        let higher = Version::parse(pair[1]).unwrap();
        assert!(lower < higher, "{lower} should sort before {higher}");
    }
}

#[test]
fn formatting_round_trips() {
    for text in [
        "0.0.0",
        "1.2.3",
        "10.20.30",
        "1.0.0-0.3.7",
        "1.0.0-x.7.z.92",
        "1.0.0-x-y-z.--",
        "1.0.0+20130313144700",
        "1.0.0-beta+exp.sha.5114f85",
        "1.0.0+21AF26D3----117B344092BD",
    ] {
        assert_eq!(Version::parse(text).unwrap().to_string(), text);
    }
}

#[test]
fn build_metadata_ignored_for_equality() {
    let a = Version::from_str("1.0.0+a").unwrap();
    let b = Version::from_str("1.0.0+b").unwrap();
    assert_eq!(a, b);
    assert_ne!(a.to_string(), b.to_string());
}

#[test]
fn rejects_non_strict_input() {
    for text in ["", "1", "1.2", "01.2.3", "1.2.3-01", "1.2.3-", "1.2.3+", "v1.2.3", "1.2.3.4"] {
        assert!(Version::parse(text).is_err(), "{text:?} should be rejected");
    }
}

#[test]
fn backward_compatibility() {
    let required = Version::parse("1.2.0").unwrap();
    assert!(Version::parse("1.3.0").unwrap().is_backward_compatible(&required));
    assert!(!Version::parse("1.2.0").unwrap().is_backward_compatible(&required));
    assert!(!Version::parse("1.1.0").unwrap().is_backward_compatible(&required));
    assert!(!Version::parse("2.0.0").unwrap().is_backward_compatible(&required));
}
