//! KPIs and grouped views over a (filtered) table.
//!
//! Every function here is a pure, single pass over the rows followed by a sort
//! of the (small) grouped output. Groups only exist for keys that occur in the
//! data; nothing is zero-filled. Dimension groups are visited in ascending name
//! order, which is also the tie order for the stable "sort by revenue" views.
//!
//! Means are rounded to cents.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Category, Dimension, Product, Region, Table, Transaction};

/// Length of the product ranking.
pub const TOP_PRODUCTS: usize = 10;

/// Headline metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total_revenue: Decimal,
    /// Zero for an empty table.
    pub average_order_value: Decimal,
    pub total_units: u64,
    pub transactions: usize,
    pub distinct_products: usize,
    pub distinct_regions: usize,
}

pub fn kpis(table: &Table) -> Kpis {
    let mut totals = Totals::default();
    let mut products = BTreeSet::new();
    let mut regions = BTreeSet::new();
    for row in table {
        totals.add(row);
        products.insert(row.product);
        regions.insert(row.region);
    }

    Kpis {
        total_revenue: totals.revenue,
        average_order_value: totals.mean_revenue(),
        total_units: totals.units,
        transactions: totals.count,
        distinct_products: products.len(),
        distinct_regions: regions.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Decimal,
}

/// Revenue per month, oldest month first. Months without rows are absent.
pub fn monthly_revenue(table: &Table) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<&str, Decimal> = BTreeMap::new();
    for row in table {
        *months.entry(row.month.as_str()).or_default() += row.revenue;
    }
    months
        .into_iter()
        .map(|(month, revenue)| MonthlyRevenue {
            month: month.to_string(),
            revenue,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMonthRevenue {
    pub month: String,
    pub category: Category,
    pub revenue: Decimal,
}

/// Revenue per (month, category), ordered by month then category name.
pub fn category_monthly_revenue(table: &Table) -> Vec<CategoryMonthRevenue> {
    let mut cells: BTreeMap<(&str, &'static str), (Category, Decimal)> = BTreeMap::new();
    for row in table {
        let cell = cells
            .entry((row.month.as_str(), row.category.display_name()))
            .or_insert((row.category, Decimal::ZERO));
        cell.1 += row.revenue;
    }
    cells
        .into_iter()
        .map(|((month, _), (category, revenue))| CategoryMonthRevenue {
            month: month.to_string(),
            category,
            revenue,
        })
        .collect()
}

/// One line of a stacked/area chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySeries {
    pub category: Category,
    pub points: Vec<MonthlyRevenue>,
}

/// Pivot the (month, category) cells into one series per category.
///
/// Series are ordered by category name; points keep the month order of `cells`.
pub fn category_series(cells: &[CategoryMonthRevenue]) -> Vec<CategorySeries> {
    let mut series: BTreeMap<&'static str, CategorySeries> = BTreeMap::new();
    for cell in cells {
        series
            .entry(cell.category.display_name())
            .or_insert_with(|| CategorySeries {
                category: cell.category,
                points: Vec::new(),
            })
            .points
            .push(MonthlyRevenue {
                month: cell.month.clone(),
                revenue: cell.revenue,
            });
    }
    series.into_values().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub transactions: usize,
}

/// Transaction count per day, earliest first.
pub fn daily_volume(table: &Table) -> Vec<DailyVolume> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for row in table {
        *days.entry(row.date).or_default() += 1;
    }
    days.into_iter()
        .map(|(date, transactions)| DailyVolume { date, transactions })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionStats {
    pub region: Region,
    pub total_revenue: Decimal,
    pub avg_order_value: Decimal,
    pub total_units: u64,
    pub transactions: usize,
}

/// Per-region statistics, highest total revenue first.
pub fn regional_breakdown(table: &Table) -> Vec<RegionStats> {
    let mut out: Vec<RegionStats> = group_totals(table, |r| r.region)
        .into_iter()
        .map(|(region, t)| RegionStats {
            region,
            total_revenue: t.revenue,
            avg_order_value: t.mean_revenue(),
            total_units: t.units,
            transactions: t.count,
        })
        .collect();
    out.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionUnits {
    pub region: Region,
    pub units: u64,
}

/// Units sold per region, fewest first (horizontal bar chart order).
pub fn regional_units(table: &Table) -> Vec<RegionUnits> {
    let mut out: Vec<RegionUnits> = group_totals(table, |r| r.region)
        .into_iter()
        .map(|(region, t)| RegionUnits { region, units: t.units })
        .collect();
    out.sort_by_key(|r| r.units);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRevenue {
    pub product: Product,
    pub revenue: Decimal,
}

/// The `limit` best-selling products by revenue. Ties keep name order.
pub fn top_products(table: &Table, limit: usize) -> Vec<ProductRevenue> {
    let mut out: Vec<ProductRevenue> = group_totals(table, |r| r.product)
        .into_iter()
        .map(|(product, t)| ProductRevenue {
            product,
            revenue: t.revenue,
        })
        .collect();
    out.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    out.truncate(limit);
    out
}

/// Base of the price vs. quantity scatter chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPriceQuantity {
    pub product: Product,
    pub mean_price: Decimal,
    pub total_units: u64,
}

pub fn product_price_quantity(table: &Table) -> Vec<ProductPriceQuantity> {
    group_totals(table, |r| r.product)
        .into_iter()
        .map(|(product, t)| ProductPriceQuantity {
            product,
            mean_price: t.mean_price(),
            total_units: t.units,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub total_revenue: Decimal,
    pub total_units: u64,
    pub transactions: usize,
    pub avg_transaction_value: Decimal,
}

/// Per-category statistics, highest total revenue first.
pub fn category_breakdown(table: &Table) -> Vec<CategoryStats> {
    let mut out: Vec<CategoryStats> = group_totals(table, |r| r.category)
        .into_iter()
        .map(|(category, t)| CategoryStats {
            category,
            total_revenue: t.revenue,
            total_units: t.units,
            transactions: t.count,
            avg_transaction_value: t.mean_revenue(),
        })
        .collect();
    out.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    out
}

/// Running sums for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    revenue: Decimal,
    price: Decimal,
    units: u64,
    count: usize,
}

impl Totals {
    fn add(&mut self, row: &Transaction) {
        self.revenue += row.revenue;
        self.price += row.price;
        self.units += u64::from(row.quantity);
        self.count += 1;
    }

    fn mean_revenue(&self) -> Decimal {
        mean(self.revenue, self.count)
    }

    fn mean_price(&self) -> Decimal {
        mean(self.price, self.count)
    }
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (sum / Decimal::from(count)).round_dp(2)
}

/// Sum rows per dimension value, in ascending name order.
fn group_totals<K, F>(table: &Table, key: F) -> Vec<(K, Totals)>
where
    K: Dimension,
    F: Fn(&Transaction) -> K,
{
    let mut groups: BTreeMap<&'static str, (K, Totals)> = BTreeMap::new();
    for row in table {
        let k = key(row);
        groups
            .entry(k.display_name())
            .or_insert_with(|| (k, Totals::default()))
            .1
            .add(row);
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn cents(v: i64) -> Decimal {
        Decimal::new(v, 2)
    }

    fn row(date: NaiveDate, product: Product, region: Region, qty: u32, price_cents: i64) -> Transaction {
        Transaction::new(date, product, region, qty, cents(price_cents))
    }

    fn table() -> Table {
        Table::new(vec![
            row(d(1, 3), Product::Laptop, Region::Europe, 2, 1000_00),
            row(d(1, 3), Product::Mouse, Region::Asia, 4, 50_00),
            row(d(2, 10), Product::Tablet, Region::Europe, 1, 450_50),
            row(d(2, 11), Product::Laptop, Region::Africa, 1, 1300_00),
            row(d(3, 1), Product::Smartphone, Region::Asia, 3, 810_25),
        ])
    }

    #[test]
    fn kpis_over_rows() {
        let k = kpis(&table());
        // 2000 + 200 + 450.50 + 1300 + 2430.75
        assert_eq!(k.total_revenue, cents(6381_25));
        assert_eq!(k.average_order_value, cents(1276_25));
        assert_eq!(k.total_units, 11);
        assert_eq!(k.transactions, 5);
        assert_eq!(k.distinct_products, 4);
        assert_eq!(k.distinct_regions, 3);
    }

    #[test]
    fn kpis_of_empty_table_are_zero() {
        let k = kpis(&Table::default());
        assert_eq!(k.total_revenue, Decimal::ZERO);
        assert_eq!(k.average_order_value, Decimal::ZERO);
        assert_eq!(k.total_units, 0);
        assert_eq!(k.transactions, 0);
        assert_eq!(k.distinct_products, 0);
    }

    #[test]
    fn monthly_is_chronological_and_sparse() {
        let m = monthly_revenue(&table());
        let months: Vec<_> = m.iter().map(|x| x.month.as_str()).collect();
        assert_eq!(months, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(m[1].revenue, cents(1750_50));
    }

    #[test]
    fn category_month_cells_and_series() {
        let cells = category_monthly_revenue(&table());
        assert_eq!(
            cells
                .iter()
                .map(|c| (c.month.as_str(), c.category))
                .collect::<Vec<_>>(),
            vec![
                ("2025-01", Category::Accessories),
                ("2025-01", Category::Computers),
                ("2025-02", Category::Computers),
                ("2025-02", Category::Mobile),
                ("2025-03", Category::Mobile),
            ]
        );

        let series = category_series(&cells);
        assert_eq!(series.len(), 3);
        let mobile = series.iter().find(|s| s.category == Category::Mobile).unwrap();
        assert_eq!(mobile.points.len(), 2);
        assert_eq!(mobile.points[1].revenue, cents(2430_75));
    }

    #[test]
    fn daily_counts() {
        let v = daily_volume(&table());
        assert_eq!(v[0], DailyVolume { date: d(1, 3), transactions: 2 });
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn regional_sums_match_total() {
        let t = table();
        let regions = regional_breakdown(&t);
        assert_eq!(
            regions.iter().map(|r| r.region).collect::<Vec<_>>(),
            vec![Region::Asia, Region::Europe, Region::Africa]
        );
        let sum: Decimal = regions.iter().map(|r| r.total_revenue).sum();
        assert_eq!(sum, kpis(&t).total_revenue);

        let asia = &regions[0];
        assert_eq!(asia.transactions, 2);
        assert_eq!(asia.total_units, 7);
        assert_eq!(asia.avg_order_value, cents(1315_38));
    }

    #[test]
    fn regional_units_ascending() {
        let units = regional_units(&table());
        assert_eq!(
            units,
            vec![
                RegionUnits { region: Region::Africa, units: 1 },
                RegionUnits { region: Region::Europe, units: 3 },
                RegionUnits { region: Region::Asia, units: 7 },
            ]
        );
    }

    #[test]
    fn top_products_sorted_with_stable_ties() {
        // Camera and Headphones tie; name order puts Camera first.
        let t = Table::new(vec![
            row(d(1, 1), Product::Headphones, Region::Asia, 1, 100_00),
            row(d(1, 1), Product::Camera, Region::Asia, 1, 100_00),
            row(d(1, 1), Product::Laptop, Region::Asia, 1, 900_00),
        ]);
        let top = top_products(&t, TOP_PRODUCTS);
        assert_eq!(
            top.iter().map(|p| p.product).collect::<Vec<_>>(),
            vec![Product::Laptop, Product::Camera, Product::Headphones]
        );
        assert_eq!(top_products(&t, 1).len(), 1);
    }

    #[test]
    fn price_quantity_means() {
        let pq = product_price_quantity(&table());
        let laptop = pq.iter().find(|p| p.product == Product::Laptop).unwrap();
        assert_eq!(laptop.mean_price, cents(1150_00));
        assert_eq!(laptop.total_units, 3);
        // Name order.
        assert_eq!(pq[0].product, Product::Laptop);
        assert_eq!(pq[1].product, Product::Mouse);
    }

    #[test]
    fn category_breakdown_sorted() {
        let cats = category_breakdown(&table());
        assert_eq!(cats[0].category, Category::Computers);
        assert_eq!(cats[0].total_revenue, cents(3300_00));
        assert_eq!(cats[0].avg_transaction_value, cents(1650_00));
        assert_eq!(cats.last().unwrap().category, Category::Accessories);
    }

    #[test]
    fn empty_table_has_empty_views() {
        let t = Table::default();
        assert!(monthly_revenue(&t).is_empty());
        assert!(category_monthly_revenue(&t).is_empty());
        assert!(daily_volume(&t).is_empty());
        assert!(regional_breakdown(&t).is_empty());
        assert!(regional_units(&t).is_empty());
        assert!(top_products(&t, TOP_PRODUCTS).is_empty());
        assert!(product_price_quantity(&t).is_empty());
        assert!(category_breakdown(&t).is_empty());
    }
}
