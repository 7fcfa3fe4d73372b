use log::debug;
use polars::prelude::*;

use crate::error::DashboardError;
use crate::predicate::Predicate;

/// Rows of `reference` that satisfy every predicate, in their original order.
///
/// An empty predicate list returns the reference table itself (a cheap,
/// reference-counted clone).
pub fn apply(reference: &DataFrame, predicates: &[Predicate]) -> Result<DataFrame, DashboardError> {
    let Some(mask) = predicates
        .iter()
        .map(Predicate::to_expr)
        .reduce(|acc, next| acc.and(next))
    else {
        return Ok(reference.clone());
    };

    let view = reference.clone().lazy().filter(mask).collect()?;
    debug!(
        "event=filter module=engine predicates={} rows_in={} rows_out={}",
        predicates.len(),
        reference.height(),
        view.height()
    );
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::SliderRange;
    use crate::schema::Attribute;

    fn table() -> DataFrame {
        df!(
            "department" => ["Sales", "R&D", "Sales", "HR", "R&D"],
            "attrition" => ["yes", "no", "no", "yes", "no"],
            "monthly_salary" => [3000i64, 5200, 4100, 6100, 2500],
            "overtime" => [Some("yes"), Some("no"), None, Some("yes"), Some("no")],
        )
        .unwrap()
    }

    #[test]
    fn no_predicates_returns_everything() {
        let df = table();
        assert!(apply(&df, &[]).unwrap().equals_missing(&df));
    }

    #[test]
    fn conjunction_keeps_order() {
        let predicates = vec![
            Predicate::MemberOf {
                attribute: Attribute::Department,
                values: ["Sales", "R&D"].iter().map(|s| s.to_string()).collect(),
            },
            Predicate::Between {
                attribute: Attribute::MonthlySalary,
                range: SliderRange::new(2500, 5000),
            },
        ];
        let view = apply(&table(), &predicates).unwrap();
        let salaries: Vec<_> = view
            .column("monthly_salary")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(salaries, vec![3000, 4100, 2500]);
    }

    #[test]
    fn null_cells_fail_their_predicate() {
        let predicates = vec![Predicate::Equals {
            attribute: Attribute::Overtime,
            value: "no".into(),
        }];
        assert_eq!(apply(&table(), &predicates).unwrap().height(), 2);
    }

    #[test]
    fn inverted_range_admits_nothing() {
        let predicates = vec![Predicate::Between {
            attribute: Attribute::MonthlySalary,
            range: SliderRange::new(0, -1),
        }];
        assert_eq!(apply(&table(), &predicates).unwrap().height(), 0);
    }
}
