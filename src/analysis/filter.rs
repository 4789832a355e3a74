//! Row filtering and the option lists that drive the filter selectors.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Category, Dimension, FilterCriteria, Product, Region, Selector, Table};
use crate::error::PipelineError;

/// Keep the rows that satisfy `criteria`, in their original order.
///
/// An empty result is a normal value. A start date after the end date is
/// rejected up front rather than quietly yielding nothing.
pub fn filter(table: &Table, criteria: &FilterCriteria) -> Result<Table, PipelineError> {
    if criteria.start > criteria.end {
        return Err(PipelineError::InvalidFilterRange {
            start: criteria.start,
            end: criteria.end,
        });
    }

    let rows: Vec<_> = table.iter().filter(|r| criteria.matches(r)).cloned().collect();

    debug!(
        input = table.len(),
        kept = rows.len(),
        region = %criteria.region,
        category = %criteria.category,
        product = %criteria.product,
        "filtered table"
    );

    Ok(Table::new(rows))
}

/// Choices offered for each filter dimension.
///
/// Each list starts with the match-all entry, followed by the distinct values
/// present in the table sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    pub regions: Vec<Selector<Region>>,
    pub categories: Vec<Selector<Category>>,
    pub products: Vec<Selector<Product>>,
}

pub fn filter_options(table: &Table) -> FilterOptions {
    FilterOptions {
        date_bounds: table.date_bounds(),
        regions: options_for(table.iter().map(|r| r.region)),
        categories: options_for(table.iter().map(|r| r.category)),
        products: options_for(table.iter().map(|r| r.product)),
    }
}

fn options_for<T: Dimension>(values: impl Iterator<Item = T>) -> Vec<Selector<T>> {
    let mut distinct: Vec<T> = values.collect();
    distinct.sort_by_key(|v| v.display_name());
    distinct.dedup();

    std::iter::once(Selector::All)
        .chain(distinct.into_iter().map(Selector::Only))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Transaction;
    use rust_decimal::Decimal;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn table() -> Table {
        Table::new(vec![
            Transaction::new(d(1, 5), Product::Laptop, Region::Europe, 1, Decimal::from(1100)),
            Transaction::new(d(1, 20), Product::Mouse, Region::Asia, 4, Decimal::from(55)),
            Transaction::new(d(2, 1), Product::Camera, Region::Europe, 2, Decimal::from(950)),
            Transaction::new(d(3, 15), Product::Laptop, Region::Africa, 3, Decimal::from(1250)),
        ])
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let t = table();
        let out = filter(&t, &FilterCriteria::new(d(1, 20), d(2, 1))).unwrap();
        let dates: Vec<_> = out.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(1, 20), d(2, 1)]);
    }

    #[test]
    fn selectors_combine_and_preserve_order() {
        let t = table();
        let criteria = FilterCriteria::covering(&t).with_product(Selector::Only(Product::Laptop));
        let out = filter(&t, &criteria).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0].region, Region::Europe);
        assert_eq!(out.rows()[1].region, Region::Africa);

        let criteria = criteria.with_region(Selector::Only(Region::Africa));
        assert_eq!(filter(&t, &criteria).unwrap().len(), 1);

        let criteria = criteria.with_category(Selector::Only(Category::Audio));
        assert!(filter(&t, &criteria).unwrap().is_empty());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = filter(&table(), &FilterCriteria::new(d(3, 1), d(2, 1))).unwrap_err();
        match err {
            PipelineError::InvalidFilterRange { start, end } => {
                assert_eq!(start, d(3, 1));
                assert_eq!(end, d(2, 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn single_day_range_is_valid() {
        let out = filter(&table(), &FilterCriteria::new(d(2, 1), d(2, 1))).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn options_are_sorted_and_prefixed_with_all() {
        let opts = filter_options(&table());
        assert_eq!(opts.date_bounds, Some((d(1, 5), d(3, 15))));
        assert_eq!(
            opts.regions,
            vec![
                Selector::All,
                Selector::Only(Region::Africa),
                Selector::Only(Region::Asia),
                Selector::Only(Region::Europe),
            ]
        );
        assert_eq!(
            opts.products,
            vec![
                Selector::All,
                Selector::Only(Product::Camera),
                Selector::Only(Product::Laptop),
                Selector::Only(Product::Mouse),
            ]
        );
        assert_eq!(opts.categories.len(), 4);
    }

    #[test]
    fn options_for_empty_table() {
        let opts = filter_options(&Table::default());
        assert_eq!(opts.date_bounds, None);
        assert_eq!(opts.regions, vec![Selector::All]);
    }
}
