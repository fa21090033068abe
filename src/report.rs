use std::io::{self, Write};
use std::path::Path;

use crate::aggregator::CashflowRow;
use crate::summary::{CashflowSummary, StructureComparison};

/// Fixed-width, one line per period.
pub fn write_cashflow_table(w: &mut impl Write, rows: &[CashflowRow]) -> io::Result<()> {
    writeln!(
        w,
        "{:<10} | {:>13} | {:>13} | {:>13} | {:>13} | {:>12} | {:>12} | {:>13} | {:>7} | {:>14}",
        "Period", "Gross prem", "Ceded prem", "Gross claims", "Ceded claims", "Ceding comm",
        "Profit comm", "Reins net", "LossR%", "Cum ceded prem"
    )?;
    writeln!(w, "{}", "-".repeat(145))?;
    for r in rows {
        let marker = if r.is_new_annual_cycle { "*" } else { "" };
        writeln!(
            w,
            "{:<10} | {:>13.0} | {:>13.0} | {:>13.0} | {:>13.0} | {:>12.0} | {:>12.0} | {:>13.0} | {:>6.1}% | {:>14.0}",
            format!("{}{marker}", r.period_label),
            r.gross_premium,
            r.ceded_premium,
            r.gross_claims,
            r.ceded_claims,
            r.ceding_commission,
            r.profit_commission,
            r.reinsurer_net_position,
            r.loss_ratio * 100.0,
            r.cumulative_ceded_premium,
        )?;
    }
    Ok(())
}

/// Totals and loss ratios for a whole cashflow.
pub fn write_summary(w: &mut impl Write, s: &CashflowSummary) -> io::Result<()> {
    writeln!(w, "  Periods:                  {}", s.periods)?;
    writeln!(w, "  Total ceded premium:      {:>15.2}", s.ceded_premium)?;
    writeln!(w, "  Total ceded claims:       {:>15.2}", s.ceded_claims)?;
    writeln!(w, "  Total ceding commission:  {:>15.2}", s.ceding_commission)?;
    writeln!(w, "  Total profit commission:  {:>15.2}", s.profit_commission)?;
    if s.reinstatement_premium > 0.0 {
        writeln!(w, "  Reinstatement premium:    {:>15.2}", s.reinstatement_premium)?;
    }
    writeln!(w, "  Reinsurer net result:     {:>15.2}", s.reinsurer_net_result)?;
    writeln!(w, "  Overall loss ratio:       {:>14.1}%", s.loss_ratio() * 100.0)?;
    writeln!(w, "  Mean period loss ratio:   {:>14.1}%", s.mean_loss_ratio * 100.0)?;
    Ok(())
}

/// One line per structure, in the order given.
pub fn write_comparison(w: &mut impl Write, cmp: &[StructureComparison]) -> io::Result<()> {
    writeln!(
        w,
        "{:<32} | {:<14} | {:>13} | {:>13} | {:>8} | {:>7} | {:>13}",
        "Structure", "Type", "Ceded prem", "Ceded claims", "Cession%", "LossR%", "Reins net"
    )?;
    writeln!(w, "{}", "-".repeat(115))?;
    for c in cmp {
        let s = &c.summary;
        writeln!(
            w,
            "{:<32} | {:<14} | {:>13.0} | {:>13.0} | {:>7.1}% | {:>6.1}% | {:>13.0}",
            c.name,
            c.treaty_kind,
            s.ceded_premium,
            s.ceded_claims,
            s.cession_ratio() * 100.0,
            s.loss_ratio() * 100.0,
            s.reinsurer_net_result,
        )?;
    }
    Ok(())
}

/// One JSON object per row, newline-delimited.
pub fn write_ndjson(w: &mut impl Write, rows: &[CashflowRow]) -> io::Result<()> {
    for r in rows {
        serde_json::to_writer(&mut *w, r)?;
        writeln!(w)?;
    }
    Ok(())
}

/// Rows as CSV with a header line, written to `path`.
pub fn write_csv(path: impl AsRef<Path>, rows: &[CashflowRow]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_csv_rows(&mut writer, rows)
}

fn write_csv_rows<W: Write>(writer: &mut csv::Writer<W>, rows: &[CashflowRow]) -> csv::Result<()> {
    for r in rows {
        writer.serialize(r)?;
    }
    writer.flush()?;
    Ok(())
}
