//! Property tests over the decoding, genotype and operator invariants.

use proptest::prelude::*;
use u_evolve::decoding::{convert_bin_to_gray, convert_gray_to_bin, decode, decode_gray, DecodingKey};
use u_evolve::genotype::{FloatVector, IntegerVector};
use u_evolve::ops::float::{clamp, BlendCrossover, GaussianMutation, InitUniform, SbxCrossover};
use u_evolve::ops::permutation::{
    CycleCrossover, NonAbelianCrossover, NwoxCrossover, OrderCrossover, PmxCrossover,
    UpmxCrossover,
};
use u_evolve::ops::{Crossover, Initializer, Mutation, PerIndex};
use u_evolve::random::create_rng;

fn permutation_pair() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    (1usize..40).prop_flat_map(|n| {
        let identity: Vec<i64> = (0..n as i64).collect();
        (
            Just(identity.clone()).prop_shuffle(),
            Just(identity).prop_shuffle(),
        )
    })
}

fn keys_and_bits() -> impl Strategy<Value = (Vec<DecodingKey>, Vec<bool>)> {
    prop::collection::vec((-1e3f64..1e3, 1e-3f64..1e3, 1u32..24), 1..6).prop_flat_map(|specs| {
        let keys: Vec<DecodingKey> = specs
            .iter()
            .map(|&(lo, span, bits)| DecodingKey::new(lo, lo + span, bits))
            .collect();
        let total = keys.iter().map(|k| k.encoding_bits as usize).sum::<usize>();
        (Just(keys), prop::collection::vec(any::<bool>(), total))
    })
}

fn is_permutation(values: &[i64]) -> bool {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &v)| v == i as i64)
}

fn check_crossover<C: Crossover<IntegerVector>>(
    op: &C,
    p1: &[i64],
    p2: &[i64],
    seed: u64,
) -> Result<(), TestCaseError> {
    let mut rng = create_rng(seed);
    let mut a = IntegerVector::from(p1.to_vec());
    let mut b = IntegerVector::from(p2.to_vec());
    op.mate(&mut a, &mut b, &mut rng).unwrap();
    prop_assert_eq!(a.as_slice().len(), p1.len());
    prop_assert!(is_permutation(a.as_slice()), "{:?}", a);
    prop_assert!(is_permutation(b.as_slice()), "{:?}", b);
    Ok(())
}

proptest! {
    // ---- decoding ----

    #[test]
    fn decode_in_range_and_deterministic((keys, bits) in keys_and_bits()) {
        for values in [decode(&keys, &bits).unwrap(), decode_gray(&keys, &bits).unwrap()] {
            prop_assert_eq!(values.len(), keys.len());
            for (v, k) in values.iter().zip(&keys) {
                let slack = 1e-9 * (k.upper_bound - k.lower_bound).max(1.0);
                prop_assert!(
                    *v >= k.lower_bound - slack && *v <= k.upper_bound + slack,
                    "{} outside {:?}",
                    v,
                    k
                );
            }
        }
        prop_assert_eq!(decode(&keys, &bits).unwrap(), decode(&keys, &bits).unwrap());
    }

    #[test]
    fn decode_rejects_wrong_length((keys, mut bits) in keys_and_bits(), extra in any::<bool>()) {
        bits.push(extra);
        prop_assert!(decode(&keys, &bits).is_err());
        bits.truncate(bits.len() - 2);
        prop_assert!(decode_gray(&keys, &bits).is_err());
    }

    #[test]
    fn gray_round_trip(gray in prop::collection::vec(any::<bool>(), 1..63)) {
        let keys = [DecodingKey::new(0.0, 1.0, gray.len() as u32)];
        let bin = convert_gray_to_bin(&keys, &gray).unwrap();
        prop_assert_eq!(convert_bin_to_gray(&keys, &bin).unwrap(), gray);
    }

    // ---- permutation preservation ----

    #[test]
    fn permutation_crossovers_preserve_validity((p1, p2) in permutation_pair(), seed in any::<u64>()) {
        check_crossover(&CycleCrossover, &p1, &p2, seed)?;
        check_crossover(&PmxCrossover, &p1, &p2, seed)?;
        check_crossover(&OrderCrossover, &p1, &p2, seed)?;
        check_crossover(&NwoxCrossover, &p1, &p2, seed)?;
        check_crossover(&UpmxCrossover::default(), &p1, &p2, seed)?;
        check_crossover(&UpmxCrossover::new(1.0), &p1, &p2, seed)?;
        check_crossover(&NonAbelianCrossover, &p1, &p2, seed)?;
    }

    // ---- clamping ----

    #[test]
    fn float_operators_output_fixed_points_of_clamp(
        values in prop::collection::vec(-100.0f64..100.0, 1..20),
        lo in -10.0f64..0.0,
        width in 0.0f64..10.0,
        inc in prop_oneof![Just(0.0), -20.0f64..20.0],
        seed in any::<u64>(),
    ) {
        let hi = lo + width;
        let (min, max) = (PerIndex::splat(lo), PerIndex::splat(hi));
        let mut rng = create_rng(seed);

        let mut g = FloatVector::from(values.clone());
        GaussianMutation::new(1.0, PerIndex::splat(5.0))
            .with_bounds(min.clone(), max.clone())
            .with_inc(PerIndex::splat(inc))
            .mutate(&mut g, &mut rng)
            .unwrap();
        let init = InitUniform::new(values.len(), min.clone(), max.clone())
            .with_inc(PerIndex::splat(inc))
            .initialize(&mut rng)
            .unwrap();
        let mut a = FloatVector::from(values.clone());
        let mut b = FloatVector::from(values.iter().rev().copied().collect::<Vec<_>>());
        BlendCrossover::new(0.5)
            .with_bounds(min.clone(), max.clone())
            .with_inc(PerIndex::splat(inc))
            .mate(&mut a, &mut b, &mut rng)
            .unwrap();
        let mut c = FloatVector::from(values.clone());
        let mut d = FloatVector::from(values);
        SbxCrossover::new(2.0)
            .with_bounds(min, max)
            .mate(&mut c, &mut d, &mut rng)
            .unwrap();

        for out in [&g, &init, &a, &b, &c, &d] {
            for &v in out.as_slice() {
                prop_assert_eq!(clamp(v, lo, hi), v);
            }
        }
    }

    // ---- broadcast rule ----

    #[test]
    fn broadcast_matches_full_vector(
        values in prop::collection::vec(-10.0f64..10.0, 1..20),
        sigma in 0.0f64..3.0,
        seed in any::<u64>(),
    ) {
        let n = values.len();
        let short = GaussianMutation::new(0.7, PerIndex::splat(sigma))
            .with_bounds(PerIndex::splat(-5.0), PerIndex::splat(5.0));
        let full = GaussianMutation::new(0.7, PerIndex::new(vec![sigma; n]).unwrap())
            .with_bounds(
                PerIndex::new(vec![-5.0; n]).unwrap(),
                PerIndex::new(vec![5.0; n]).unwrap(),
            );

        let mut g1 = FloatVector::from(values.clone());
        let mut g2 = FloatVector::from(values);
        short.mutate(&mut g1, &mut create_rng(seed)).unwrap();
        full.mutate(&mut g2, &mut create_rng(seed)).unwrap();
        prop_assert_eq!(g1, g2);
    }
}
