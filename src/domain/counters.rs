//! Per-trader daily counters.
//!
//! Thread-safe: entries live in a `DashMap`, so updates for one trader take
//! only that trader's entry lock. Each entry remembers the trading day it was
//! last written on and resets lazily when the store has rolled over to a
//! later day.

use crate::domain::trader::TraderId;
use chrono::{Datelike, NaiveDate};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI32, Ordering};

/// Counter values for one trader on one trading day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraderCounters {
    pub trades_today: u32,
    /// Realized loss today. Gains are recorded as negative losses.
    pub loss_today: f64,
}

#[derive(Debug)]
struct Entry {
    day: i32,
    counters: TraderCounters,
}

#[derive(Debug)]
pub struct DailyCounters {
    /// Current trading day as days since 0001-01-01.
    day: AtomicI32,
    entries: DashMap<TraderId, Entry>,
}

impl DailyCounters {
    pub fn new(trading_day: NaiveDate) -> Self {
        Self {
            day: AtomicI32::new(trading_day.num_days_from_ce()),
            entries: DashMap::new(),
        }
    }

    pub fn trading_day(&self) -> NaiveDate {
        NaiveDate::from_num_days_from_ce_opt(self.day.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Advances the store to `day`. Earlier or equal days are ignored.
    /// Returns true when the day changed.
    pub fn roll_over(&self, day: NaiveDate) -> bool {
        let next = day.num_days_from_ce();
        let prev = self.day.fetch_max(next, Ordering::AcqRel);
        if next > prev {
            tracing::info!(trading_day = %day, "daily counters rolled over");
            true
        } else {
            false
        }
    }

    /// Current counters for `trader`; zero when untouched today.
    pub fn snapshot(&self, trader: TraderId) -> TraderCounters {
        let day = self.day.load(Ordering::Acquire);
        self.entries
            .get(&trader)
            .filter(|e| e.day == day)
            .map(|e| e.counters)
            .unwrap_or_default()
    }

    pub fn trades_today(&self, trader: TraderId) -> u32 {
        self.snapshot(trader).trades_today
    }

    pub fn loss_today(&self, trader: TraderId) -> f64 {
        self.snapshot(trader).loss_today
    }

    /// Counts one executed trade. Returns the new trade count.
    pub fn record_trade(&self, trader: TraderId) -> u32 {
        self.update(trader, |c| {
            c.trades_today = c.trades_today.saturating_add(1);
            c.trades_today
        })
    }

    /// Adds `amount` to today's loss and returns the new cumulative loss.
    pub fn add_loss(&self, trader: TraderId, amount: f64) -> f64 {
        self.update(trader, |c| {
            c.loss_today += amount;
            c.loss_today
        })
    }

    /// Overwrites a trader's counters for the current day.
    pub fn seed(&self, trader: TraderId, counters: TraderCounters) {
        self.update(trader, |c| *c = counters);
    }

    pub fn reset_trader(&self, trader: TraderId) {
        self.entries.remove(&trader);
    }

    pub fn reset_all(&self) {
        self.entries.clear();
    }

    /// Traders with counters recorded on the current day.
    pub fn tracked_traders(&self) -> Vec<TraderId> {
        let day = self.day.load(Ordering::Acquire);
        let mut ids: Vec<TraderId> = self
            .entries
            .iter()
            .filter(|e| e.day == day)
            .map(|e| *e.key())
            .collect();
        ids.sort();
        ids
    }

    fn update<R>(&self, trader: TraderId, f: impl FnOnce(&mut TraderCounters) -> R) -> R {
        self.update_seen(trader, self.day.load(Ordering::Acquire), f)
    }

    /// Applies `f` to the trader's counters. `seen` is the day the caller
    /// observed before taking the entry lock; the store's day is re-read under
    /// the lock and the later of the two wins, so an entry never moves back.
    pub(crate) fn update_seen<R>(
        &self,
        trader: TraderId,
        seen: i32,
        f: impl FnOnce(&mut TraderCounters) -> R,
    ) -> R {
        let mut entry = self.entries.entry(trader).or_insert_with(|| Entry {
            day: seen,
            counters: TraderCounters::default(),
        });
        let day = seen.max(self.day.load(Ordering::Acquire));
        if entry.day < day {
            entry.day = day;
            entry.counters = TraderCounters::default();
        }
        f(&mut entry.counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use std::thread;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn untouched_trader_is_zero() {
        let counters = DailyCounters::new(day(1));
        assert_eq!(counters.snapshot(TraderId(1)), TraderCounters::default());
        assert!(counters.tracked_traders().is_empty());
    }

    #[test]
    fn trades_and_losses_accumulate() {
        let counters = DailyCounters::new(day(1));
        assert_eq!(counters.record_trade(TraderId(1)), 1);
        assert_eq!(counters.record_trade(TraderId(1)), 2);
        assert_relative_eq!(counters.add_loss(TraderId(1), 100_000.0), 100_000.0);
        assert_relative_eq!(counters.add_loss(TraderId(1), -25_000.0), 75_000.0);
        assert_eq!(counters.trades_today(TraderId(2)), 0);
        assert_eq!(counters.tracked_traders(), vec![TraderId(1)]);
    }

    #[test]
    fn roll_over_resets_lazily() {
        let counters = DailyCounters::new(day(1));
        counters.record_trade(TraderId(1));
        counters.add_loss(TraderId(1), 10.0);

        assert!(counters.roll_over(day(2)));
        assert_eq!(counters.trading_day(), day(2));
        assert_eq!(counters.snapshot(TraderId(1)), TraderCounters::default());
        assert!(counters.tracked_traders().is_empty());

        assert_eq!(counters.record_trade(TraderId(1)), 1);
        assert_relative_eq!(counters.loss_today(TraderId(1)), 0.0);
    }

    #[test]
    fn roll_over_never_goes_back() {
        let counters = DailyCounters::new(day(5));
        counters.record_trade(TraderId(1));
        assert!(!counters.roll_over(day(4)));
        assert!(!counters.roll_over(day(5)));
        assert_eq!(counters.trading_day(), day(5));
        assert_eq!(counters.trades_today(TraderId(1)), 1);
    }

    #[test]
    fn seed_and_reset() {
        let counters = DailyCounters::new(day(1));
        counters.seed(
            TraderId(3),
            TraderCounters {
                trades_today: 99,
                loss_today: 1_000.0,
            },
        );
        assert_eq!(counters.record_trade(TraderId(3)), 100);
        counters.reset_trader(TraderId(3));
        assert_eq!(counters.trades_today(TraderId(3)), 0);

        counters.record_trade(TraderId(4));
        counters.reset_all();
        assert!(counters.tracked_traders().is_empty());
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let counters = Arc::new(DailyCounters::new(day(1)));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let counters = Arc::clone(&counters);
                thread::spawn(move || {
                    for _ in 0..250 {
                        counters.record_trade(TraderId(i % 2));
                        counters.add_loss(TraderId(i % 2), 2.0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(counters.trades_today(TraderId(0)), 1_000);
        assert_eq!(counters.trades_today(TraderId(1)), 1_000);
        assert_relative_eq!(counters.loss_today(TraderId(0)), 2_000.0);
    }

    #[test]
    fn stale_day_writer_keeps_new_day_counts() {
        let counters = DailyCounters::new(day(1));
        let stale = day(1).num_days_from_ce();
        counters.roll_over(day(2));
        counters.record_trade(TraderId(1));
        counters.add_loss(TraderId(1), 50.0);

        // A writer that read day 1 before the rollover lands afterwards.
        let trades = counters.update_seen(TraderId(1), stale, |c| {
            c.trades_today += 1;
            c.trades_today
        });
        assert_eq!(trades, 2);
        assert_eq!(counters.trades_today(TraderId(1)), 2);
        assert_relative_eq!(counters.loss_today(TraderId(1)), 50.0);
        assert_eq!(counters.tracked_traders(), vec![TraderId(1)]);
    }

    #[test]
    fn stale_day_writer_on_fresh_entry_uses_current_day() {
        let counters = DailyCounters::new(day(1));
        let stale = day(1).num_days_from_ce();
        counters.roll_over(day(3));
        counters.update_seen(TraderId(7), stale, |c| c.trades_today += 1);
        assert_eq!(counters.trades_today(TraderId(7)), 1);
    }
}
