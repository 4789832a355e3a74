//! Dashboard workflow shared by every subcommand:
//! load/generate -> filter -> KPIs + grouped views -> sorted grid.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::analysis::{
    self, CategoryMonthRevenue, CategorySeries, CategoryStats, DailyVolume, FilterOptions, Kpis,
    MonthlyRevenue, ProductPriceQuantity, ProductRevenue, RegionStats, RegionUnits, SummaryStats,
    TOP_PRODUCTS,
};
use crate::data::DatasetCache;
use crate::domain::{DashConfig, FilterCriteria, GeneratorConfig, SortColumn, SortDirection, Table};
use crate::error::PipelineError;
use crate::io::load_table_csv;

/// All computed outputs of a single dashboard run.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub criteria: FilterCriteria,
    pub options: FilterOptions,
    #[serde(skip)]
    pub filtered: Table,
    pub kpis: Kpis,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub category_monthly_revenue: Vec<CategoryMonthRevenue>,
    pub category_series: Vec<CategorySeries>,
    pub daily_volume: Vec<DailyVolume>,
    pub regions: Vec<RegionStats>,
    pub region_units: Vec<RegionUnits>,
    pub top_products: Vec<ProductRevenue>,
    pub product_price_quantity: Vec<ProductPriceQuantity>,
    pub categories: Vec<CategoryStats>,
    pub revenue_summary: SummaryStats,
    pub quantity_summary: SummaryStats,
    pub grid: Grid,
}

/// The sorted, truncated transaction grid.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    pub column: SortColumn,
    pub direction: SortDirection,
    pub limit: usize,
    pub rows: Table,
}

/// Resolve the source table for `config`: a CSV export when `input` is set,
/// otherwise the generated table from `cache`.
pub fn load_table(config: &DashConfig, cache: &mut DatasetCache) -> Result<Arc<Table>, PipelineError> {
    match &config.input {
        Some(path) => Ok(Arc::new(load_table_csv(path)?)),
        None => cache.get(config.seed, config.as_of),
    }
}

/// A cache primed with the generation parameters of `config`.
pub fn cache_for(config: &DashConfig) -> DatasetCache {
    DatasetCache::new(GeneratorConfig::new(config.seed, config.as_of).with_row_count(config.row_count))
}

/// Filter `source` per `config` and compute every dashboard view.
pub fn build_dashboard(source: &Table, config: &DashConfig) -> Result<Dashboard, PipelineError> {
    let criteria = config.criteria_for(source);
    let filtered = analysis::filter(source, &criteria)?;
    let grid = Grid {
        column: config.sort_column,
        direction: config.sort_direction,
        limit: config.limit,
        rows: analysis::sorted_view(&filtered, config.sort_column, config.sort_direction, config.limit),
    };

    let category_monthly_revenue = analysis::category_monthly_revenue(&filtered);
    let dashboard = Dashboard {
        options: analysis::filter_options(source),
        kpis: analysis::kpis(&filtered),
        monthly_revenue: analysis::monthly_revenue(&filtered),
        category_series: analysis::category_series(&category_monthly_revenue),
        category_monthly_revenue,
        daily_volume: analysis::daily_volume(&filtered),
        regions: analysis::regional_breakdown(&filtered),
        region_units: analysis::regional_units(&filtered),
        top_products: analysis::top_products(&filtered, TOP_PRODUCTS),
        product_price_quantity: analysis::product_price_quantity(&filtered),
        categories: analysis::category_breakdown(&filtered),
        revenue_summary: analysis::revenue_summary(&filtered),
        quantity_summary: analysis::quantity_summary(&filtered),
        grid,
        criteria,
        filtered,
    };

    info!(
        source_rows = source.len(),
        filtered_rows = dashboard.filtered.len(),
        "built dashboard"
    );
    Ok(dashboard)
}
