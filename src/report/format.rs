//! Formatted terminal output for the dashboard.

use rust_decimal::Decimal;

use crate::analysis::{CategoryStats, Kpis, ProductPriceQuantity, ProductRevenue, RegionStats, SummaryStats};
use crate::app::pipeline::Dashboard;
use crate::domain::{FilterCriteria, Table};
use crate::plot::{render_daily_volume, render_monthly_revenue};

/// Format the whole dashboard.
pub fn format_dashboard(dash: &Dashboard, chart_width: usize, chart_height: usize) -> String {
    let mut out = String::new();

    out.push_str("=== Sales Analytics Dashboard ===\n");
    out.push_str(&format_criteria(&dash.criteria));
    out.push('\n');
    out.push_str(&format_kpis(&dash.kpis));

    out.push_str("\nRevenue trends:\n");
    out.push_str(&render_monthly_revenue(&dash.monthly_revenue, chart_width, chart_height));
    out.push('\n');
    out.push_str(&render_daily_volume(&dash.daily_volume, chart_width, chart_height));

    out.push_str("\nRegional statistics:\n");
    out.push_str(&format_regions(&dash.regions));

    out.push_str("\nTop products by revenue:\n");
    out.push_str(&format_top_products(&dash.top_products));

    out.push_str("\nPrice vs quantity sold:\n");
    out.push_str(&format_price_quantity(&dash.product_price_quantity));

    out.push_str("\nCategory performance:\n");
    out.push_str(&format_categories(&dash.categories));

    out.push_str("\nSummary statistics:\n");
    out.push_str(&format_summary(&dash.revenue_summary, &dash.quantity_summary));

    out.push_str(&format!(
        "\nTransactions (sorted by {} {:?}, first {}):\n",
        dash.grid.column, dash.grid.direction, dash.grid.limit
    ));
    out.push_str(&format_grid(&dash.grid.rows));

    out
}

pub fn format_criteria(c: &FilterCriteria) -> String {
    format!(
        "Dates: {} .. {} | Region: {} | Category: {} | Product: {}\n",
        c.start, c.end, c.region, c.category, c.product
    )
}

pub fn format_kpis(k: &Kpis) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Total revenue:   ${} ({} transactions)\n",
        fmt_money(k.total_revenue, 0),
        fmt_thousands(k.transactions as u64)
    ));
    out.push_str(&format!("Avg order value: ${}\n", fmt_money(k.average_order_value, 2)));
    out.push_str(&format!("Units sold:      {}\n", fmt_thousands(k.total_units)));
    out.push_str(&format!(
        "Products:        {} ({} regions)\n",
        k.distinct_products, k.distinct_regions
    ));
    out
}

pub fn format_regions(rows: &[RegionStats]) -> String {
    let mut out = header_line(
        &format!(
            "{:<16} {:>16} {:>12} {:>10} {:>12}",
            "region", "total_revenue", "avg_order", "units", "transactions"
        ),
        &[16, 16, 12, 10, 12],
    );
    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<16} {:>16} {:>12} {:>10} {:>12}",
                r.region.to_string(),
                fmt_money(r.total_revenue, 2),
                fmt_money(r.avg_order_value, 2),
                fmt_thousands(r.total_units),
                r.transactions
            ),
        );
    }
    out
}

pub fn format_top_products(rows: &[ProductRevenue]) -> String {
    let mut out = header_line(&format!("{:<4} {:<12} {:>16}", "#", "product", "revenue"), &[4, 12, 16]);
    for (i, r) in rows.iter().enumerate() {
        push_line(
            &mut out,
            format!("{:<4} {:<12} {:>16}", i + 1, r.product.to_string(), fmt_money(r.revenue, 2)),
        );
    }
    out
}

pub fn format_price_quantity(rows: &[ProductPriceQuantity]) -> String {
    let mut out = header_line(&format!("{:<12} {:>12} {:>10}", "product", "mean_price", "units"), &[12, 12, 10]);
    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<12} {:>12} {:>10}",
                r.product.to_string(),
                fmt_money(r.mean_price, 2),
                fmt_thousands(r.total_units)
            ),
        );
    }
    out
}

pub fn format_categories(rows: &[CategoryStats]) -> String {
    let mut out = header_line(
        &format!(
            "{:<12} {:>16} {:>10} {:>12} {:>12}",
            "category", "total_revenue", "units", "transactions", "avg_value"
        ),
        &[12, 16, 10, 12, 12],
    );
    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<12} {:>16} {:>10} {:>12} {:>12}",
                r.category.to_string(),
                fmt_money(r.total_revenue, 2),
                fmt_thousands(r.total_units),
                r.transactions,
                fmt_money(r.avg_transaction_value, 2)
            ),
        );
    }
    out
}

pub fn format_summary(revenue: &SummaryStats, quantity: &SummaryStats) -> String {
    let mut out = header_line(&format!("{:<6} {:>12} {:>12}", "stat", "revenue", "quantity"), &[6, 12, 12]);
    push_line(
        &mut out,
        format!("{:<6} {:>12} {:>12}", "count", revenue.count, quantity.count),
    );
    let fields: [(&str, Option<f64>, Option<f64>); 7] = [
        ("mean", revenue.mean, quantity.mean),
        ("std", revenue.std, quantity.std),
        ("min", revenue.min, quantity.min),
        ("25%", revenue.p25, quantity.p25),
        ("50%", revenue.p50, quantity.p50),
        ("75%", revenue.p75, quantity.p75),
        ("max", revenue.max, quantity.max),
    ];
    for (label, r, q) in fields {
        push_line(&mut out, format!("{:<6} {:>12} {:>12}", label, fmt_opt(r), fmt_opt(q)));
    }
    out
}

/// The transaction grid, money shown with a dollar sign.
pub fn format_grid(table: &Table) -> String {
    let mut out = header_line(
        &format!(
            "{:<10} {:<12} {:<12} {:<14} {:>3} {:>10} {:>11} {:<7} {:>4}",
            "Date", "Product", "Category", "Region", "Qty", "Price", "Revenue", "Month", "Year"
        ),
        &[10, 12, 12, 14, 3, 10, 11, 7, 4],
    );
    for r in table {
        push_line(
            &mut out,
            format!(
                "{:<10} {:<12} {:<12} {:<14} {:>3} {:>10} {:>11} {:<7} {:>4}",
                r.date.format("%Y-%m-%d").to_string(),
                r.product.to_string(),
                r.category.to_string(),
                truncate(&r.region.to_string(), 14),
                r.quantity,
                format!("${:.2}", r.price),
                format!("${:.2}", r.revenue),
                r.month,
                r.year
            ),
        );
    }
    out
}

fn header_line(header: &str, widths: &[usize]) -> String {
    let mut out = String::new();
    push_line(&mut out, header.to_string());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.join(" "));
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

/// `1234567.891` with `dp = 2` -> `1,234,567.89`.
pub fn fmt_money(v: Decimal, dp: u32) -> String {
    let rounded = v.round_dp(dp);
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

fn fmt_thousands(v: u64) -> String {
    group_digits(&v.to_string())
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Region;

    #[test]
    fn money_grouping() {
        assert_eq!(fmt_money(Decimal::new(123456789, 2), 2), "1,234,567.89");
        assert_eq!(fmt_money(Decimal::new(123456789, 2), 0), "1,234,568");
        assert_eq!(fmt_money(Decimal::new(-5, 1), 2), "-0.50");
        assert_eq!(fmt_money(Decimal::ZERO, 2), "0.00");
        assert_eq!(fmt_thousands(999), "999");
        assert_eq!(fmt_thousands(1000), "1,000");
    }

    #[test]
    fn kpi_block() {
        let k = Kpis {
            total_revenue: Decimal::new(123456789, 2),
            average_order_value: Decimal::new(24691, 2),
            total_units: 25_000,
            transactions: 5000,
            distinct_products: 10,
            distinct_regions: 5,
        };
        let txt = format_kpis(&k);
        assert!(txt.contains("Total revenue:   $1,234,568 (5,000 transactions)"));
        assert!(txt.contains("Avg order value: $246.91"));
        assert!(txt.contains("Units sold:      25,000"));
        assert!(txt.contains("Products:        10 (5 regions)"));
    }

    #[test]
    fn region_table_rows() {
        let rows = vec![RegionStats {
            region: Region::NorthAmerica,
            total_revenue: Decimal::new(100050, 2),
            avg_order_value: Decimal::new(50025, 2),
            total_units: 7,
            transactions: 2,
        }];
        let txt = format_regions(&rows);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("North America"));
        assert!(lines[2].contains("1,000.50"));
        assert!(lines[2].ends_with('2'));
    }

    #[test]
    fn empty_summary_uses_dashes() {
        let txt = format_summary(&SummaryStats::default(), &SummaryStats::default());
        assert!(txt.contains("mean              -            -"));
    }
}
