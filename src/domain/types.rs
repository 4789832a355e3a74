//! Shared domain types.
//!
//! Everything here is a plain value: cheap to clone, serializable, never
//! mutated once a table is built.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Number of rows produced by one generation call unless configured otherwise.
pub const DEFAULT_ROW_COUNT: usize = 5000;

/// Largest table one generation call may produce.
pub const MAX_ROW_COUNT: usize = 1_000_000;

/// Length of the trailing generation window, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Seed used by the dashboard when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Terminal chart size, in character cells.
pub const DEFAULT_CHART_WIDTH: usize = 72;
pub const DEFAULT_CHART_HEIGHT: usize = 12;

/// A filterable, groupable dimension of a transaction (region, category, product).
pub trait Dimension: Copy + Eq + Ord + fmt::Display + 'static {
    /// Lowercase dimension label used in error messages.
    const NAME: &'static str;

    /// Every value, in catalog order.
    fn all() -> &'static [Self];

    fn display_name(self) -> &'static str;

    /// Look a value up by its display name (case-insensitive, surrounding whitespace ignored).
    fn parse_name(s: &str) -> Result<Self, PipelineError> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|v| v.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PipelineError::UnknownValue {
                dimension: Self::NAME,
                value: s.to_string(),
            })
    }
}

/// Product catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Product {
    Laptop,
    Smartphone,
    Tablet,
    Headphones,
    Smartwatch,
    Monitor,
    Keyboard,
    Mouse,
    Camera,
    Speakers,
}

impl Product {
    pub const ALL: [Product; 10] = [
        Product::Laptop,
        Product::Smartphone,
        Product::Tablet,
        Product::Headphones,
        Product::Smartwatch,
        Product::Monitor,
        Product::Keyboard,
        Product::Mouse,
        Product::Camera,
        Product::Speakers,
    ];

    /// The single category a product belongs to.
    pub fn category(self) -> Category {
        match self {
            Product::Laptop | Product::Monitor => Category::Computers,
            Product::Smartphone | Product::Tablet => Category::Mobile,
            Product::Headphones | Product::Speakers => Category::Audio,
            Product::Smartwatch => Category::Wearables,
            Product::Keyboard | Product::Mouse => Category::Accessories,
            Product::Camera => Category::Photography,
        }
    }

    /// List price before the per-transaction perturbation.
    pub fn base_price(self) -> Decimal {
        let units: i64 = match self {
            Product::Laptop => 1200,
            Product::Smartphone => 800,
            Product::Tablet => 500,
            Product::Headphones => 150,
            Product::Smartwatch => 300,
            Product::Monitor => 400,
            Product::Keyboard => 100,
            Product::Mouse => 50,
            Product::Camera => 900,
            Product::Speakers => 200,
        };
        Decimal::from(units)
    }
}

impl Dimension for Product {
    const NAME: &'static str = "product";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn display_name(self) -> &'static str {
        match self {
            Product::Laptop => "Laptop",
            Product::Smartphone => "Smartphone",
            Product::Tablet => "Tablet",
            Product::Headphones => "Headphones",
            Product::Smartwatch => "Smartwatch",
            Product::Monitor => "Monitor",
            Product::Keyboard => "Keyboard",
            Product::Mouse => "Mouse",
            Product::Camera => "Camera",
            Product::Speakers => "Speakers",
        }
    }
}

/// Product category. Always derived from [`Product::category`], never sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Accessories,
    Audio,
    Computers,
    Mobile,
    Photography,
    Wearables,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Accessories,
        Category::Audio,
        Category::Computers,
        Category::Mobile,
        Category::Photography,
        Category::Wearables,
    ];
}

impl Dimension for Category {
    const NAME: &'static str = "category";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn display_name(self) -> &'static str {
        match self {
            Category::Accessories => "Accessories",
            Category::Audio => "Audio",
            Category::Computers => "Computers",
            Category::Mobile => "Mobile",
            Category::Photography => "Photography",
            Category::Wearables => "Wearables",
        }
    }
}

/// Sales region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "North America")]
    NorthAmerica,
    Europe,
    Asia,
    #[serde(rename = "South America")]
    SouthAmerica,
    Africa,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::Asia,
        Region::SouthAmerica,
        Region::Africa,
    ];
}

impl Dimension for Region {
    const NAME: &'static str = "region";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn display_name(self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::SouthAmerica => "South America",
            Region::Africa => "Africa",
        }
    }
}

macro_rules! impl_dimension_text {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.display_name())
                }
            }

            impl FromStr for $ty {
                type Err = PipelineError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Dimension>::parse_name(s)
                }
            }
        )*
    };
}

impl_dimension_text!(Product, Category, Region);

/// One synthetic sale. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub date: NaiveDate,
    pub product: Product,
    pub category: Category,
    pub region: Region,
    pub quantity: u32,
    pub price: Decimal,
    pub revenue: Decimal,
    /// `YYYY-MM`, used as a grouping key.
    pub month: String,
    pub year: i32,
}

impl Transaction {
    /// Build a row, deriving category, revenue, month and year.
    ///
    /// `price` is rounded to cents; revenue is `round(price * quantity, 2)`.
    pub fn new(date: NaiveDate, product: Product, region: Region, quantity: u32, price: Decimal) -> Self {
        let price = price.round_dp(2);
        let revenue = (price * Decimal::from(quantity)).round_dp(2);
        Self {
            date,
            product,
            category: product.category(),
            region,
            quantity,
            price,
            revenue,
            month: month_key(date),
            year: date.year(),
        }
    }
}

/// Calendar-month grouping key (`YYYY-MM`).
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// An ordered, immutable set of transactions.
///
/// Filtering and aggregation never mutate a table; they build new values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    rows: Vec<Transaction>,
}

impl Table {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.rows.iter()
    }

    /// Earliest and latest transaction date, if any rows exist.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date;
        Some(self.rows.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Restriction on one dimension: either a concrete value or match-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selector<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selector<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

/// Label used for the match-all entry of a selector.
pub const MATCH_ALL_LABEL: &str = "All";

impl<T: Dimension> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str(MATCH_ALL_LABEL),
            Selector::Only(v) => f.write_str(v.display_name()),
        }
    }
}

impl<T: Dimension> FromStr for Selector<T> {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(MATCH_ALL_LABEL) {
            return Ok(Selector::All);
        }
        T::parse_name(s).map(Selector::Only)
    }
}

/// Which rows to keep. Both date bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub region: Selector<Region>,
    pub category: Selector<Category>,
    pub product: Selector<Product>,
}

impl FilterCriteria {
    /// Date range only; every dimension matches all.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            region: Selector::All,
            category: Selector::All,
            product: Selector::All,
        }
    }

    /// Criteria that keep every row of `table`.
    ///
    /// For an empty table the range is unbounded.
    pub fn covering(table: &Table) -> Self {
        let (start, end) = table.date_bounds().unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self::new(start, end)
    }

    pub fn with_region(mut self, region: Selector<Region>) -> Self {
        self.region = region;
        self
    }

    pub fn with_category(mut self, category: Selector<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_product(mut self, product: Selector<Product>) -> Self {
        self.product = product;
        self
    }

    pub fn matches(&self, row: &Transaction) -> bool {
        row.date >= self.start
            && row.date <= self.end
            && self.region.matches(&row.region)
            && self.category.matches(&row.category)
            && self.product.matches(&row.product)
    }
}

/// A column of the transaction table, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Date,
    Product,
    Category,
    Region,
    Quantity,
    Price,
    Revenue,
    Month,
    Year,
}

impl SortColumn {
    pub const ALL: [SortColumn; 9] = [
        SortColumn::Date,
        SortColumn::Product,
        SortColumn::Category,
        SortColumn::Region,
        SortColumn::Quantity,
        SortColumn::Price,
        SortColumn::Revenue,
        SortColumn::Month,
        SortColumn::Year,
    ];

    /// Column header as it appears in exports.
    pub fn name(self) -> &'static str {
        match self {
            SortColumn::Date => "Date",
            SortColumn::Product => "Product",
            SortColumn::Category => "Category",
            SortColumn::Region => "Region",
            SortColumn::Quantity => "Quantity",
            SortColumn::Price => "Price",
            SortColumn::Revenue => "Revenue",
            SortColumn::Month => "Month",
            SortColumn::Year => "Year",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortColumn {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortColumn::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PipelineError::UnknownColumn {
                column: s.to_string(),
                expected: SortColumn::ALL
                    .iter()
                    .map(|c| c.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// A product offered by the generator with its list price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub product: Product,
    pub base_price: Decimal,
}

/// Parameters of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub row_count: usize,
    /// Last day of the generation window.
    pub as_of: NaiveDate,
    pub window_days: u32,
    pub catalog: Vec<CatalogEntry>,
    pub regions: Vec<Region>,
}

impl GeneratorConfig {
    /// The dashboard defaults: 5000 rows over the trailing 365 days, full catalog.
    pub fn new(seed: u64, as_of: NaiveDate) -> Self {
        Self {
            seed,
            row_count: DEFAULT_ROW_COUNT,
            as_of,
            window_days: DEFAULT_WINDOW_DAYS,
            catalog: Product::ALL
                .iter()
                .map(|&product| CatalogEntry {
                    product,
                    base_price: product.base_price(),
                })
                .collect(),
            regions: Region::ALL.to_vec(),
        }
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = row_count;
        self
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub seed: u64,
    pub row_count: usize,
    pub as_of: NaiveDate,
    /// Re-analyse a previous CSV export instead of generating.
    pub input: Option<PathBuf>,

    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub region: Selector<Region>,
    pub category: Selector<Category>,
    pub product: Selector<Product>,

    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    pub limit: usize,

    pub chart_width: usize,
    pub chart_height: usize,
}

impl DashConfig {
    /// Resolve the filter criteria against `table`, defaulting open ends to its date bounds.
    pub fn criteria_for(&self, table: &Table) -> FilterCriteria {
        let covering = FilterCriteria::covering(table);
        FilterCriteria {
            start: self.start.unwrap_or(covering.start),
            end: self.end.unwrap_or(covering.end),
            region: self.region,
            category: self.category,
            product: self.product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn transaction_derives_revenue_and_keys() {
        let row = Transaction::new(d(2025, 2, 7), Product::Mouse, Region::Asia, 3, Decimal::new(49_995, 3));
        assert_eq!(row.price, Decimal::new(5000, 2));
        assert_eq!(row.revenue, Decimal::new(15000, 2));
        assert_eq!(row.category, Category::Accessories);
        assert_eq!(row.month, "2025-02");
        assert_eq!(row.year, 2025);
    }

    #[test]
    fn every_product_maps_into_the_category_list() {
        for p in Product::ALL {
            assert!(Category::ALL.contains(&p.category()), "{p} has no listed category");
            assert!(p.base_price() > Decimal::ZERO);
        }
    }

    #[test]
    fn selectors_parse_display_names() {
        let s: Selector<Region> = "north america".parse().unwrap();
        assert_eq!(s, Selector::Only(Region::NorthAmerica));
        let s: Selector<Product> = "ALL".parse().unwrap();
        assert_eq!(s, Selector::All);
        let err = "Atlantis".parse::<Selector<Region>>().unwrap_err();
        assert!(matches!(err, PipelineError::UnknownValue { dimension: "region", .. }));
    }

    #[test]
    fn sort_column_rejects_unknown_names() {
        assert_eq!("revenue".parse::<SortColumn>().unwrap(), SortColumn::Revenue);
        let err = "Discount".parse::<SortColumn>().unwrap_err();
        match err {
            PipelineError::UnknownColumn { column, expected } => {
                assert_eq!(column, "Discount");
                assert!(expected.starts_with("Date, Product"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn covering_criteria_span_the_table() {
        let table = Table::new(vec![
            Transaction::new(d(2025, 3, 4), Product::Tablet, Region::Europe, 1, Decimal::from(500)),
            Transaction::new(d(2025, 1, 9), Product::Tablet, Region::Europe, 1, Decimal::from(500)),
        ]);
        let c = FilterCriteria::covering(&table);
        assert_eq!((c.start, c.end), (d(2025, 1, 9), d(2025, 3, 4)));
        assert!(table.iter().all(|r| c.matches(r)));
    }
}
