// Tests for the seeded PRNG and its sampling methods.

use feedforward::SimpleRng;

#[test]
fn test_determinism() {
    let mut a = SimpleRng::new(987_654_321);
    let mut b = SimpleRng::new(987_654_321);

    for _ in 0..1000 {
        assert_eq!(a.next_u32(), b.next_u32());
    }
}

#[test]
fn test_zero_seed_uses_fixed_fallback() {
    let mut a = SimpleRng::new(0);
    let mut b = SimpleRng::new(0);
    assert_eq!(a.next_u64(), b.next_u64());
}

#[test]
fn test_independent_instances_do_not_interfere() {
    let mut a = SimpleRng::new(5);
    let mut lone = SimpleRng::new(5);

    // Interleave draws from an unrelated generator.
    let mut noise = SimpleRng::new(77);
    let mut values = Vec::new();
    for _ in 0..100 {
        noise.next_u32();
        values.push(a.next_u32());
    }

    for v in values {
        assert_eq!(v, lone.next_u32());
    }
}

#[test]
fn test_uniform_bounds() {
    let mut rng = SimpleRng::new(13);
    for _ in 0..10_000 {
        let v = rng.uniform(-2.5, 1.5);
        assert!((-2.5..=1.5).contains(&v));
    }
}

#[test]
fn test_normal_statistics() {
    let mut rng = SimpleRng::new(97);
    let n = 50_000;
    let samples: Vec<f64> = (0..n).map(|_| rng.normal(-1.0, 2.0)).collect();

    let mean = samples.iter().sum::<f64>() / n as f64;
    let std = (samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64).sqrt();

    assert!((mean + 1.0).abs() < 0.05, "mean was {mean}");
    assert!((std - 2.0).abs() < 0.05, "std was {std}");
}

#[test]
fn test_he_statistics() {
    let mut rng = SimpleRng::new(19);
    let n = 50_000;
    let fan_in = 8;
    let samples: Vec<f64> = (0..n).map(|_| rng.he(fan_in)).collect();

    let mean = samples.iter().sum::<f64>() / n as f64;
    let std = (samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64).sqrt();
    let expected = (2.0 / fan_in as f64).sqrt();

    assert!(mean.abs() < 0.02);
    assert!((std - expected).abs() < 0.02);
}

#[test]
fn test_xavier_bounds() {
    let mut rng = SimpleRng::new(23);
    let bound = 1.0 / (25f64).sqrt();
    for _ in 0..10_000 {
        let v = rng.xavier(25);
        assert!(v.abs() <= bound);
    }
}

#[test]
fn test_shuffle_is_a_permutation() {
    let mut rng = SimpleRng::new(31);
    let mut rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
    let original = rows.clone();

    rng.shuffle(&mut rows);

    let mut sorted = rows.clone();
    sorted.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
    assert_eq!(sorted, original);
    assert_ne!(rows, original);
}

#[test]
fn test_seed_from_time_nonzero() {
    assert!(SimpleRng::seed_from_time() != 0);
}
