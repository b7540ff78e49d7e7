//! Procedural question generation.
//!
//! One pure function per family; [`generate`] dispatches on the closed
//! [`Family`] enum. Every family draws candidates and re-draws while a
//! disallowed condition holds. Each loop documents why its acceptance
//! probability is bounded away from zero, so no loop carries a retry cap.
//!
//! Generators take the RNG by reference: the server passes `thread_rng()`,
//! tests pass a seeded `StdRng`.

use rand::Rng;
use tracing::{debug, instrument};

use crate::domain::{Family, GenParams, Question};
use crate::error::GenerateError;

mod arithmetic;
mod bonds;
mod factors;
mod fdp;
mod fractions;
mod percentages;
mod tables;
mod units;

/// Tables used by the negative-numbers family when the level names none.
static DEFAULT_NEGATIVE_TABLES: [i64; 11] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
const DEFAULT_DOUBLING_MAX: i64 = 100;

/// Generate one question for `family`.
///
/// Fails only when `params` leave the family without a sample space
/// (missing bond total, empty table list, ...).
#[instrument(level = "debug", skip(params, rng), fields(%family))]
pub fn generate<R: Rng + ?Sized>(
  family: Family,
  params: &GenParams,
  rng: &mut R,
) -> Result<Question, GenerateError> {
  let q = match family {
    Family::Bonds => {
      let total = bond_total(params, rng)?;
      bonds::bonds(total, rng)
    }
    Family::SingleTable => {
      let table = params
        .table
        .ok_or(GenerateError::MissingParameter { family, param: "table" })?;
      tables::single_table(nonzero_table(family, table)?, rng)
    }
    Family::GroupTable => {
      let list = table_list(family, params.tables.as_deref())?;
      tables::group_table(list, rng)
    }
    Family::NegativeTable => {
      let list = match params.tables.as_deref() {
        Some(list) => table_list(family, Some(list))?,
        None => &DEFAULT_NEGATIVE_TABLES[..],
      };
      tables::negative_table(list, rng)
    }
    Family::Doubling => {
      let max = params.max.unwrap_or(DEFAULT_DOUBLING_MAX);
      if max < 1 {
        return Err(GenerateError::InvalidParameter { family, reason: format!("max must be >= 1, got {max}") });
      }
      arithmetic::doubling(max, rng)
    }
    Family::PerfectSquares => arithmetic::perfect_squares(rng),
    Family::PowersOf10 => arithmetic::powers_of_10(rng),
    Family::UnitConversions => units::unit_conversions(rng),
    Family::Hcf => factors::hcf(rng),
    Family::Lcm => factors::lcm(rng),
    Family::EquivalentFractions => fractions::equivalent_fractions(rng),
    Family::SimplifyFractions => fractions::simplify_fractions(rng),
    Family::FractionOfQuantity => fractions::fraction_of_quantity(rng),
    Family::PercentageOfQuantity => percentages::percentage_of_quantity(rng),
    Family::FdpConversions => fdp::fdp_conversions(rng),
    Family::FdpConversionsMultiples => fdp::fdp_conversions_multiples(rng),
  };
  debug!(target: "drill", %family, id = %q.id, format = %q.layout.as_format(), "Generated question");
  Ok(q)
}

/// Check that `params` are usable for `family` without drawing anything.
pub fn validate_params(family: Family, params: &GenParams) -> Result<(), GenerateError> {
  match family {
    Family::Bonds => match (params.total, params.range) {
      (_, Some((min, max))) if min > max => Err(GenerateError::InvalidParameter {
        family,
        reason: format!("range [{min}, {max}] is empty"),
      }),
      (None, None) => Err(GenerateError::MissingParameter { family, param: "total" }),
      _ => Ok(()),
    },
    Family::SingleTable => match params.table {
      None => Err(GenerateError::MissingParameter { family, param: "table" }),
      Some(table) => nonzero_table(family, table).map(|_| ()),
    },
    Family::GroupTable => table_list(family, params.tables.as_deref()).map(|_| ()),
    Family::NegativeTable if params.tables.is_some() => {
      table_list(family, params.tables.as_deref()).map(|_| ())
    }
    Family::Doubling if params.max.is_some_and(|m| m < 1) => Err(GenerateError::InvalidParameter {
      family,
      reason: "max must be >= 1".into(),
    }),
    _ => Ok(()),
  }
}

/// A mixed range wins over a fixed total.
fn bond_total<R: Rng + ?Sized>(params: &GenParams, rng: &mut R) -> Result<i64, GenerateError> {
  let family = Family::Bonds;
  match (params.total, params.range) {
    (_, Some((min, max))) => {
      if min > max {
        return Err(GenerateError::InvalidParameter { family, reason: format!("range [{min}, {max}] is empty") });
      }
      Ok(rng.gen_range(min..=max))
    }
    (Some(total), None) => Ok(total),
    (None, None) => Err(GenerateError::MissingParameter { family, param: "total" }),
  }
}

fn table_list(family: Family, tables: Option<&[i64]>) -> Result<&[i64], GenerateError> {
  match tables {
    None => Err(GenerateError::MissingParameter { family, param: "tables" }),
    Some([]) => Err(GenerateError::InvalidParameter { family, reason: "tables list is empty".into() }),
    Some(list) => {
      for &table in list {
        nonzero_table(family, table)?;
      }
      Ok(list)
    }
  }
}

/// A zero table makes `0 × ? = 0` accept anything and `0 ÷ ? = n` unanswerable.
fn nonzero_table(family: Family, table: i64) -> Result<i64, GenerateError> {
  if table == 0 {
    return Err(GenerateError::InvalidParameter { family, reason: "table must be non-zero".into() });
  }
  Ok(table)
}

/// `true` with probability 1/2.
fn coin<R: Rng + ?Sized>(rng: &mut R) -> bool {
  rng.gen_bool(0.5)
}

/// Uniform pick from a non-empty constant slice.
fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> T {
  items[rng.gen_range(0..items.len())]
}


#[cfg(test)]
mod tests {
  use super::test_support::rng;
  use super::*;
  use crate::checker::{check_answer, UserAnswer};
  use crate::domain::Layout;

  fn params_for(family: Family) -> GenParams {
    match family {
      Family::Bonds => GenParams { total: Some(10), ..Default::default() },
      Family::SingleTable => GenParams { table: Some(7), ..Default::default() },
      Family::GroupTable => GenParams { tables: Some(vec![3, 6, 9]), ..Default::default() },
      _ => GenParams::default(),
    }
  }

  #[test]
  fn every_family_accepts_its_own_canonical_answer() {
    let mut r = rng(7);
    for family in Family::ALL {
      for _ in 0..300 {
        let q = generate(family, &params_for(family), &mut r).expect("generate");
        let user = UserAnswer::from(&q.answer);
        assert!(check_answer(&user, &q.answer, family), "{family}: {:?}", q.answer);
      }
    }
  }

  #[test]
  fn templated_families_contain_a_placeholder() {
    let mut r = rng(8);
    for family in Family::ALL {
      let q = generate(family, &params_for(family), &mut r).expect("generate");
      if let Layout::Template(t) = &q.layout {
        assert!(t.contains(crate::domain::INPUT_PLACEHOLDER), "{family}: {t}");
        assert!(q.parts.is_none());
      } else {
        assert!(q.parts.is_some(), "{family} structured layout without parts");
      }
    }
  }

  #[test]
  fn missing_parameters_are_reported() {
    let mut r = rng(9);
    let none = GenParams::default();
    assert_eq!(
      generate(Family::Bonds, &none, &mut r).unwrap_err(),
      GenerateError::MissingParameter { family: Family::Bonds, param: "total" }
    );
    assert_eq!(
      generate(Family::SingleTable, &none, &mut r).unwrap_err(),
      GenerateError::MissingParameter { family: Family::SingleTable, param: "table" }
    );
    let empty = GenParams { tables: Some(vec![]), ..Default::default() };
    assert!(matches!(
      generate(Family::GroupTable, &empty, &mut r),
      Err(GenerateError::InvalidParameter { .. })
    ));
    let inverted = GenParams { range: Some((20, 10)), ..Default::default() };
    assert!(validate_params(Family::Bonds, &inverted).is_err());
    assert!(validate_params(Family::Hcf, &none).is_ok());
  }

  #[test]
  fn zero_tables_are_rejected() {
    let mut r = rng(12);
    let single = GenParams { table: Some(0), ..Default::default() };
    assert!(matches!(validate_params(Family::SingleTable, &single), Err(GenerateError::InvalidParameter { .. })));
    assert!(matches!(generate(Family::SingleTable, &single, &mut r), Err(GenerateError::InvalidParameter { .. })));

    let list = GenParams { tables: Some(vec![2, 0, 5]), ..Default::default() };
    for family in [Family::GroupTable, Family::NegativeTable] {
      assert!(matches!(validate_params(family, &list), Err(GenerateError::InvalidParameter { .. })), "{family}");
      assert!(matches!(generate(family, &list, &mut r), Err(GenerateError::InvalidParameter { .. })), "{family}");
    }
    assert!(validate_params(Family::SingleTable, &GenParams { table: Some(7), ..Default::default() }).is_ok());
  }

  #[test]
  fn mixed_range_overrides_total() {
    let mut r = rng(10);
    let params = GenParams { total: Some(1000), range: Some((10, 20)), ..Default::default() };
    for _ in 0..200 {
      let q = generate(Family::Bonds, &params, &mut r).expect("generate");
      let v = q.scalar_answer().expect("scalar");
      assert!((0.0..=20.0).contains(&v), "answer {v} outside mixed range");
    }
  }
}
