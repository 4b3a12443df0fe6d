//! Two-bar crossover rules shared by the strategies.

use dogetrade_core::types::Signal;

/// Compare a line against a reference line on two consecutive bars.
///
/// BUY when the line moves from at-or-below to strictly above the
/// reference, SELL when it moves from at-or-above to strictly below.
#[inline]
pub(crate) fn line_cross(prev_line: f64, prev_ref: f64, line: f64, reference: f64) -> Signal {
    if prev_line <= prev_ref && line > reference {
        Signal::Buy
    } else if prev_line >= prev_ref && line < reference {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Crossover of two aligned columns between `index - 1` and `index`.
///
/// Any unavailable value, or `index == 0`, yields HOLD.
pub(crate) fn column_cross(line: &[Option<f64>], reference: &[Option<f64>], index: usize) -> Signal {
    if index == 0 {
        return Signal::Hold;
    }
    match (
        line.get(index - 1).copied().flatten(),
        reference.get(index - 1).copied().flatten(),
        line.get(index).copied().flatten(),
        reference.get(index).copied().flatten(),
    ) {
        (Some(pl), Some(pr), Some(l), Some(r)) => line_cross(pl, pr, l, r),
        _ => Signal::Hold,
    }
}

/// Threshold rule for an oscillator between `index - 1` and `index`.
///
/// BUY when the value drops below `lower` from at-or-above it, SELL when
/// it rises above `upper` from at-or-below it.
pub(crate) fn threshold_cross(values: &[Option<f64>], lower: f64, upper: f64, index: usize) -> Signal {
    if index == 0 {
        return Signal::Hold;
    }
    match (
        values.get(index - 1).copied().flatten(),
        values.get(index).copied().flatten(),
    ) {
        (Some(prev), Some(curr)) if prev >= lower && curr < lower => Signal::Buy,
        (Some(prev), Some(curr)) if prev <= upper && curr > upper => Signal::Sell,
        _ => Signal::Hold,
    }
}
