//! 月相節氣曆表數據
//!
//! 數據格式同[該 Github 項目](https://github.com/ytliu0/ChineseCalendar)之
//! `TDBtimes.txt`：首行為表頭，其後每行一歲，各欄以空白分隔：
//!
//! - 第 1 欄：歲序號（該歲大部分時段所在公元年）
//! - 第 2 欄：基準儒略日 `jd0`（TDB）
//! - 第 3–27 欄：自冬至起 25 個節氣相對 `jd0` 的日數，末項為次歲冬至
//! - 第 28–87 欄：15 個月的朔、上弦、望、下弦相對 `jd0` 的日數
//!
//! 曆表本身由 [`crate::loader`] 載入。

use std::num::{ParseFloatError, ParseIntError};
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

use super::{SolarTerm, SolarTermEvent};
use crate::error::{Error, Result};
use crate::provider::EphemerisProvider;
use crate::time_scales::{Tdb, Ut};

/// 保存一歲的曆表數據
#[derive(Debug, Clone)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在公元年
    pub annus: i32,
    /// 從冬至開始的各節氣時刻，亦含次歲冬至以便計算末日
    pub solar_term: [Tdb; 25],
    /// 月相時刻，列出從冬至前一朔開始的十五個月，內層 `0..=3` 分別為朔、上弦、望、下弦
    pub moon_phase: [[Tdb; 4]; 15],
}

impl Annus {
    /// 該歲各節氣及其時刻，自上一冬至起，至本歲冬至止。
    pub fn terms(&self) -> impl Iterator<Item = (SolarTerm, Tdb)> + '_ {
        self.solar_term.iter().enumerate().map(|(k, &tdb)| {
            let term = SolarTerm::ALL[(SolarTerm::WinterSolstice.index() + k) % 24];
            (term, tdb)
        })
    }
}

/// 整份曆表，按歲排序。
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    annuses: Vec<Annus>,
}

impl Dataset {
    /// 解析 `TDBtimes.txt` 格式文本。
    ///
    /// # 用例
    ///
    /// ```
    /// use jieqi::chinese::ephemeris::Dataset;
    ///
    /// assert!(Dataset::parse("header\n").is_err());
    /// ```
    ///
    /// 無任何一歲數據亦視為錯誤。
    pub fn parse(raw: &str) -> std::result::Result<Self, ParseError> {
        let mut annuses = Vec::new();
        for (line_num, line) in (1usize..).zip(raw.lines()).skip(1) {
            let mut it = line.split_whitespace();
            let annus: i32 = match it.next() {
                None => continue,
                Some(s) => s
                    .parse()
                    .map_err(|e| ParseError::new(line_num, 1, ErrorType::InvalidInt(e)))?,
            };
            let jd0 = require_next_f64(&mut it, line_num, 2)?;
            let mut annus_rec = Annus {
                annus,
                solar_term: [Tdb(0.0); 25],
                moon_phase: [[Tdb(0.0); 4]; 15],
            };
            for i in 0..25 {
                let jd_diff = require_next_f64(&mut it, line_num, 3 + i)?;
                annus_rec.solar_term[i] = Tdb(jd0 + jd_diff);
            }
            for i in 0..15 {
                for j in 0..4 {
                    let jd_diff = require_next_f64(&mut it, line_num, 28 + i * 4 + j)?;
                    annus_rec.moon_phase[i][j] = Tdb(jd0 + jd_diff);
                }
            }
            annuses.push((line_num, annus_rec));
        }
        if annuses.is_empty() {
            let line_num = raw.lines().count().max(1);
            return Err(ParseError::new(line_num, 1, ErrorType::NoData));
        }
        annuses.sort_by_key(|(_, an)| an.annus);
        if let Some(pair) = annuses.windows(2).find(|w| w[0].1.annus == w[1].1.annus) {
            let (line_num, an) = &pair[1];
            return Err(ParseError::new(
                *line_num,
                1,
                ErrorType::DuplicateAnnus(an.annus),
            ));
        }
        Ok(Self {
            annuses: annuses.into_iter().map(|(_, an)| an).collect(),
        })
    }

    /// 取得公元 `annus` 年對應的歳的曆表。
    ///
    /// 無數據則返回 `None`。
    pub fn get(&self, annus: i32) -> Option<&Annus> {
        self.annuses
            .binary_search_by_key(&annus, |an| an.annus)
            .ok()
            .map(|i| &self.annuses[i])
    }

    /// 曆表涵蓋的歲
    pub fn years(&self) -> Option<RangeInclusive<i32>> {
        Some(self.annuses.first()?.annus..=self.annuses.last()?.annus)
    }

    pub fn len(&self) -> usize {
        self.annuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annuses.is_empty()
    }
}

impl FromStr for Dataset {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl EphemerisProvider for Dataset {
    /// 窗口為半開區間 `[start, end)`。相鄰兩歲共有的冬至只報一次。
    fn find_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SolarTermEvent>> {
        if start >= end {
            return Ok(Vec::new());
        }
        // 歲 y 始於 y-1 年冬至，止於 y 年冬至
        let first = start.year();
        let last = end.year() + 1;
        let covered = self.years();
        if !covered
            .as_ref()
            .is_some_and(|years| years.contains(&first) && years.contains(&(last - 1)))
        {
            log::warn!(
                "ephemeris covers {:?}, window {} to {} may be incomplete",
                covered,
                start,
                end
            );
        }

        let mut events = Vec::with_capacity(26);
        for annus in (first..=last).filter_map(|y| self.get(y)) {
            for (term, tdb) in annus.terms() {
                let instant = Ut::convert(tdb).to_utc().ok_or_else(|| {
                    Error::Computation(format!(
                        "{:?} of annus {} (JD {}) is not a representable instant",
                        term, annus.annus, tdb.0
                    ))
                })?;
                if (start..end).contains(&instant) {
                    events.push(SolarTermEvent::new(term, instant));
                }
            }
        }
        events.sort_by_key(|ev| ev.instant);
        events.dedup_by(|b, a| {
            a.term == b.term && (b.instant - a.instant).num_seconds().abs() < 3600
        });
        Ok(events)
    }
}

fn require_next_f64<'a, I: Iterator<Item = &'a str>>(
    it: &mut I,
    line_num: usize,
    field_num: usize,
) -> std::result::Result<f64, ParseError> {
    use ErrorType::*;
    it.next()
        .ok_or_else(|| ParseError::new(line_num, field_num, MissingField))?
        .parse()
        .map_err(|e| ParseError::new(line_num, field_num, InvalidFloat(e)))
}

/// 曆表文本解析錯誤，指出行號與欄號（皆由 1 起）。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line_num}, field {field_num}: {reason}")]
pub struct ParseError {
    pub line_num: usize,
    pub field_num: usize,
    pub reason: ErrorType,
}

impl ParseError {
    fn new(line_num: usize, field_num: usize, reason: ErrorType) -> Self {
        Self {
            line_num,
            field_num,
            reason,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    #[error("invalid integer ({0})")]
    InvalidInt(ParseIntError),
    #[error("invalid number ({0})")]
    InvalidFloat(ParseFloatError),
    #[error("missing field")]
    MissingField,
    #[error("annus {0} listed twice")]
    DuplicateAnnus(i32),
    #[error("no annus records")]
    NoData,
}
