//! Table rendering for command output

use comfy_table::{Cell, Color, Table};
use resample_stats_core::data::summary::Describe;
use resample_stats_core::diagnostics::{BreuschPaganResult, JarqueBeraResult};
use resample_stats_core::inference::{ChiSquareResult, ConfidenceInterval, TestResult};
use resample_stats_core::models::AnovaComparison;
use resample_stats_core::FitResult;

fn header(table: &mut Table, names: &[&str]) {
    table.set_header(
        names
            .iter()
            .map(|n| Cell::new(n).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

/// Format a p-value the way regression tables usually do
pub fn format_p(p: f64) -> String {
    if p < 1e-4 {
        "<0.0001".to_string()
    } else {
        format!("{:.4}", p)
    }
}

pub fn print_describe(rows: &[Describe]) {
    let mut table = Table::new();
    header(
        &mut table,
        &["Column", "N", "Mean", "Std Dev", "Min", "Q1", "Median", "Q3", "Max"],
    );
    for d in rows {
        table.add_row(vec![
            d.column.clone(),
            d.n.to_string(),
            format!("{:.3}", d.mean),
            format!("{:.3}", d.std_dev),
            format!("{:.3}", d.min),
            format!("{:.3}", d.q1),
            format!("{:.3}", d.median),
            format!("{:.3}", d.q3),
            format!("{:.3}", d.max),
        ]);
    }
    println!("{}", table);
}

pub fn print_counts(column: &str, counts: &[(String, usize)]) {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let mut table = Table::new();
    header(&mut table, &[column, "Count", "Share"]);
    for (level, count) in counts {
        let share = if total > 0 {
            *count as f64 / total as f64
        } else {
            0.0
        };
        table.add_row(vec![
            level.clone(),
            count.to_string(),
            format!("{:.1}%", 100.0 * share),
        ]);
    }
    println!("{}", table);
}

pub fn print_group_means(response: &str, group: &str, rows: &[(String, usize, f64)]) {
    let mut table = Table::new();
    let mean_header = format!("Mean {}", response);
    header(&mut table, &[group, "N", mean_header.as_str()]);
    for (level, n, mean) in rows {
        table.add_row(vec![level.clone(), n.to_string(), format!("{:.3}", mean)]);
    }
    println!("{}", table);
}

pub fn print_test(result: &TestResult, ci: Option<&ConfidenceInterval>) {
    println!("{}", result.method);
    let mut table = Table::new();
    header(&mut table, &["Metric", "Value"]);
    table.add_row(vec!["Observations".to_string(), result.n.to_string()]);
    table.add_row(vec![
        "Observed statistic".to_string(),
        format!("{:.4}", result.statistic),
    ]);
    table.add_row(vec!["Alternative".to_string(), result.direction.to_string()]);
    table.add_row(vec!["Replicates".to_string(), result.reps.to_string()]);
    table.add_row(vec![
        "Null mean".to_string(),
        format!("{:.4}", result.null_mean),
    ]);
    table.add_row(vec![
        "Null std dev".to_string(),
        format!("{:.4}", result.null_std_dev),
    ]);
    table.add_row(vec!["p-value".to_string(), format_p(result.p_value)]);
    if let Some(ci) = ci {
        table.add_row(vec![
            format!("{:.0}% bootstrap CI", 100.0 * ci.level),
            format!("[{:.4}, {:.4}]", ci.lower, ci.upper),
        ]);
    }
    println!("{}", table);
}

pub fn print_chisq(result: &ChiSquareResult) {
    println!("{}", result.method);
    let mut table = Table::new();
    header(&mut table, &["Statistic", "df", "p-value"]);
    table.add_row(vec![
        format!("{:.4}", result.statistic),
        result.df.to_string(),
        format_p(result.p_value),
    ]);
    println!("{}", table);
}

/// Coefficient table followed by fit statistics
pub fn print_fit(title: &str, fit: &FitResult) {
    println!("{}", title);
    let mut table = Table::new();
    header(
        &mut table,
        &["Term", "Estimate", "Std Error", "t", "p-value", "CI Lower", "CI Upper"],
    );

    let mut names = Vec::with_capacity(fit.core.n_parameters());
    let mut estimates = Vec::with_capacity(fit.core.n_parameters());
    if let Some(b0) = fit.core.intercept {
        names.push("Intercept".to_string());
        estimates.push(b0);
    }
    names.extend(fit.core.feature_names.iter().cloned());
    estimates.extend(fit.core.coefficients.iter().copied());

    for (i, (name, est)) in names.iter().zip(&estimates).enumerate() {
        let mut row = vec![name.clone(), format!("{:.5}", est)];
        match &fit.inference {
            Some(inf) => {
                row.push(format!("{:.5}", inf.std_errors[i]));
                row.push(format!("{:.3}", inf.t_values[i]));
                row.push(format_p(inf.p_values[i]));
                row.push(format!("{:.5}", inf.ci_lower[i]));
                row.push(format!("{:.5}", inf.ci_upper[i]));
            }
            None => row.extend(std::iter::repeat(String::from("-")).take(5)),
        }
        table.add_row(row);
    }
    println!("{}", table);

    let covariance = fit
        .inference
        .as_ref()
        .map_or("none", |inf| inf.covariance.name());
    println!(
        "n = {}, R² = {:.4}, adj. R² = {:.4}, residual SE = {:.4} on {} df, F = {:.3} (p {}), covariance: {}",
        fit.core.n_observations,
        fit.core.r_squared,
        fit.core.adj_r_squared,
        fit.core.residual_std_error,
        fit.core.df_residual,
        fit.core.f_statistic,
        format_p(fit.core.f_pvalue),
        covariance
    );
}

pub fn print_anova(rows: &[(String, AnovaComparison)]) {
    let mut table = Table::new();
    header(
        &mut table,
        &["Comparison", "Res. df", "RSS", "df", "Sum of Sq", "F", "p-value"],
    );
    for (label, a) in rows {
        table.add_row(vec![
            label.clone(),
            a.df_full.to_string(),
            format!("{:.4}", a.rss_full),
            a.df_diff.to_string(),
            format!("{:.4}", a.ss_diff),
            format!("{:.3}", a.f_statistic),
            format_p(a.p_value),
        ]);
    }
    println!("{}", table);
}

pub fn print_diagnostics(bp: &BreuschPaganResult, jb: &JarqueBeraResult) {
    let mut table = Table::new();
    header(&mut table, &["Test", "Statistic", "df", "p-value", "Notes"]);
    table.add_row(vec![
        "Breusch-Pagan".to_string(),
        format!("{:.4}", bp.lm_statistic),
        bp.df.to_string(),
        format_p(bp.p_value),
        format!("auxiliary R² = {:.4}", bp.auxiliary_r_squared),
    ]);
    table.add_row(vec![
        "Jarque-Bera".to_string(),
        format!("{:.4}", jb.statistic),
        "2".to_string(),
        format_p(jb.p_value),
        format!("skewness = {:.3}, kurtosis = {:.3}", jb.skewness, jb.kurtosis),
    ]);
    println!("{}", table);
}

pub fn print_vif(rows: &[(String, f64)]) {
    let mut table = Table::new();
    header(&mut table, &["Term", "VIF"]);
    for (name, vif) in rows {
        let value = if vif.is_finite() {
            format!("{:.3}", vif)
        } else {
            "inf".to_string()
        };
        table.add_row(vec![name.clone(), value]);
    }
    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_p() {
        assert_eq!(format_p(0.5), "0.5000");
        assert_eq!(format_p(0.00001), "<0.0001");
    }
}
