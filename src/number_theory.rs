//! Integer helpers shared by the fraction, HCF and LCM families.

/// Greatest common divisor (iterative Euclid).
///
/// Signs are ignored, `gcd(a, 0) == |a|`, and `a < b` needs no special casing:
/// the first iteration swaps the operands.
pub fn gcd(a: i64, b: i64) -> i64 {
  let (mut a, mut b) = (a.abs(), b.abs());
  while b != 0 {
    let r = a % b;
    a = b;
    b = r;
  }
  a
}

/// Lowest common multiple. `lcm(0, x) == 0`.
pub fn lcm(a: i64, b: i64) -> i64 {
  let g = gcd(a, b);
  if g == 0 { return 0; }
  (a / g * b).abs()
}

/// Reduce `n/d` to lowest terms with a positive denominator.
///
/// The caller guarantees `d != 0`.
pub fn reduce_fraction(n: i64, d: i64) -> (i64, i64) {
  debug_assert!(d != 0, "reduce_fraction called with a zero denominator");
  let g = gcd(n, d).max(1);
  let (n, d) = (n / g, d / g);
  if d < 0 { (-n, -d) } else { (n, d) }
}
