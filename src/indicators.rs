//! True range and volume-weighted ATR
//!
//! Decimal versions of the classic range indicators. The weighted ATR takes
//! any number of bar series (one per interval) and weights every bar's true
//! range by its own volume.

use rust_decimal::Decimal;

use crate::error::StrategyError;
use crate::OhlcvBar;

/// True range of a bar given the previous bar's close
///
/// Without a previous close only `high - low` is available.
pub fn bar_true_range(bar: &OhlcvBar, prev_close: Option<Decimal>) -> Decimal {
    let hl = bar.high - bar.low;
    match prev_close {
        Some(pc) => {
            let hc = (bar.high - pc).abs();
            let lc = (bar.low - pc).abs();
            hl.max(hc).max(lc)
        }
        None => hl,
    }
}

/// Calculate True Range for a series ordered oldest to newest
pub fn true_range(bars: &[OhlcvBar]) -> Vec<Decimal> {
    let mut tr = Vec::with_capacity(bars.len());
    let mut prev_close = None;

    for bar in bars {
        tr.push(bar_true_range(bar, prev_close));
        prev_close = Some(bar.close);
    }

    tr
}

/// Volume-weighted ATR over several bar series
///
/// `sum(tr_i * volume_i) / sum(volume_i)` across every bar of every series.
/// Each series is ranged independently, so the first bar of each one has no
/// previous close. A single bar with positive volume therefore yields exactly
/// `high - low`.
///
/// Returns [`StrategyError::VolumeUnavailable`] when the total volume is zero,
/// which keeps "no volume" distinct from a genuine zero-range reading, and
/// [`StrategyError::Overflow`] when a product or sum leaves the decimal range.
pub fn weighted_atr<'a, I>(series: I) -> Result<Decimal, StrategyError>
where
    I: IntoIterator<Item = &'a [OhlcvBar]>,
{
    let overflow = || StrategyError::overflow("atr");
    let mut weighted_sum = Decimal::ZERO;
    let mut total_volume = Decimal::ZERO;

    for bars in series {
        for (tr, bar) in true_range(bars).into_iter().zip(bars) {
            weighted_sum = tr
                .checked_mul(bar.volume)
                .and_then(|w| weighted_sum.checked_add(w))
                .ok_or_else(overflow)?;
            total_volume = total_volume
                .checked_add(bar.volume)
                .ok_or_else(overflow)?;
        }
    }

    if total_volume.is_zero() {
        return Err(StrategyError::VolumeUnavailable);
    }

    weighted_sum.checked_div(total_volume).ok_or_else(overflow)
}
