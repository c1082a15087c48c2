use super::*;

fn is_permutation(v: &[usize]) -> bool {
    let mut seen = vec![false; v.len()];
    for &x in v {
        if x >= v.len() || seen[x] {
            return false;
        }
        seen[x] = true;
    }
    true
}

#[test]
fn forward_and_reverse() {
    let fwd = compute_order(4, StaggerStrategy::Forward, None);
    assert_eq!(fwd.positions(), &[0, 1, 2, 3]);
    let rev = compute_order(4, StaggerStrategy::Reverse, None);
    assert_eq!(rev.positions(), &[3, 2, 1, 0]);
    assert_eq!(rev.sequence(), vec![3, 2, 1, 0]);
}

#[test]
fn center_out_odd_and_even() {
    let five = compute_order(5, StaggerStrategy::CenterOut, None);
    assert_eq!(five.sequence(), vec![2, 1, 3, 0, 4]);
    assert_eq!(five.positions(), &[3, 1, 0, 2, 4]);

    let six = compute_order(6, StaggerStrategy::CenterOut, None);
    assert_eq!(six.sequence(), vec![2, 3, 1, 4, 0, 5]);
    assert_eq!(six.positions(), &[4, 2, 0, 1, 3, 5]);

    let seven = compute_order(7, StaggerStrategy::CenterOut, None);
    assert_eq!(seven.sequence(), vec![3, 2, 4, 1, 5, 0, 6]);
}

#[test]
fn edges_in_alternates_ends() {
    let five = compute_order(5, StaggerStrategy::EdgesIn, None);
    assert_eq!(five.sequence(), vec![0, 4, 1, 3, 2]);
    assert_eq!(five.positions(), &[0, 2, 4, 3, 1]);

    let six = compute_order(6, StaggerStrategy::EdgesIn, None);
    assert_eq!(six.sequence(), vec![0, 5, 1, 4, 2, 3]);
    assert_eq!(six.positions(), &[0, 2, 4, 5, 3, 1]);
}

#[test]
fn tiny_groups() {
    for strategy in [
        StaggerStrategy::Forward,
        StaggerStrategy::Reverse,
        StaggerStrategy::CenterOut,
        StaggerStrategy::EdgesIn,
        StaggerStrategy::Random,
    ] {
        let empty = compute_order(0, strategy, Some(1));
        assert!(empty.is_empty());
        assert_eq!(compute_order(1, strategy, Some(1)).positions(), &[0]);
    }
    assert_eq!(
        compute_order(2, StaggerStrategy::CenterOut, None).sequence(),
        vec![0, 1]
    );
    assert_eq!(
        compute_order(2, StaggerStrategy::EdgesIn, None).sequence(),
        vec![0, 1]
    );
}

#[test]
fn random_is_seeded_and_stable() {
    let a = compute_order(8, StaggerStrategy::Random, Some(42));
    let b = compute_order(8, StaggerStrategy::Random, Some(42));
    assert_eq!(a, b);
    assert_eq!(a.sequence(), vec![3, 2, 4, 7, 0, 5, 1, 6]);
    assert_eq!(a.positions(), &[4, 6, 1, 0, 2, 5, 7, 3]);

    assert_eq!(
        compute_order(5, StaggerStrategy::Random, Some(7)).sequence(),
        vec![1, 0, 3, 4, 2]
    );
    // A missing seed behaves like seed 0.
    assert_eq!(
        compute_order(5, StaggerStrategy::Random, None),
        compute_order(5, StaggerStrategy::Random, Some(0))
    );
    assert_eq!(
        compute_order(5, StaggerStrategy::Random, None).sequence(),
        vec![1, 2, 4, 3, 0]
    );
}

#[test]
fn every_strategy_yields_a_permutation() {
    for n in 1..50 {
        for strategy in [
            StaggerStrategy::Forward,
            StaggerStrategy::Reverse,
            StaggerStrategy::CenterOut,
            StaggerStrategy::EdgesIn,
            StaggerStrategy::Random,
        ] {
            let order = compute_order(n, strategy, Some(n as u64 * 31));
            assert_eq!(order.len(), n);
            assert!(is_permutation(order.positions()), "{strategy:?} n={n}");
            assert!(is_permutation(&order.sequence()), "{strategy:?} n={n}");
            for (item, &pos) in order.positions().iter().enumerate() {
                assert_eq!(order.sequence()[pos], item);
            }
        }
    }
}

#[test]
fn delays_follow_positions() {
    assert_eq!(compute_delay(10.0, 0, 5.0), 10.0);
    assert_eq!(compute_delay(10.0, 3, 5.0), 25.0);

    let spec = StaggerSpec {
        strategy: StaggerStrategy::CenterOut,
        base_delay: 2.0,
        amount: 4.0,
        seed: None,
    };
    assert_eq!(spec.delays(5), vec![14.0, 6.0, 2.0, 10.0, 18.0]);
    assert!(spec.validate().is_ok());

    let bad = StaggerSpec {
        amount: -1.0,
        ..spec
    };
    assert!(bad.validate().is_err());
}

#[test]
fn strategy_names_parse_and_serialize() {
    assert_eq!(
        "center-out".parse::<StaggerStrategy>().unwrap(),
        StaggerStrategy::CenterOut
    );
    assert_eq!(
        "EDGES_IN".parse::<StaggerStrategy>().unwrap(),
        StaggerStrategy::EdgesIn
    );
    assert!("sideways".parse::<StaggerStrategy>().is_err());

    let json = serde_json::to_string(&StaggerStrategy::EdgesIn).unwrap();
    assert_eq!(json, "\"edges-in\"");
    let spec: StaggerSpec =
        serde_json::from_str(r#"{"strategy":"random","amount":3,"seed":9}"#).unwrap();
    assert_eq!(spec.strategy, StaggerStrategy::Random);
    assert_eq!(spec.base_delay, 0.0);
    assert_eq!(spec.seed, Some(9));
}
