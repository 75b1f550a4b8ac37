//! 二十四節氣
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 節氣時刻取自預製好的天文曆表資料，見 [`ephemeris`]；名稱見 [`fmt`]。

use chrono::{DateTime, Utc};

pub mod ephemeris;
pub mod fmt;

pub use fmt::Labels;

/// 節氣，按太陽黃經排序：序號 `i` 對應黃經 `15 × i` 度，`0` 為春分。
///
/// # 用例
///
/// ```
/// use jieqi::chinese::{Labels, SolarTerm};
///
/// let term = SolarTerm::from_index(19).unwrap();
/// assert_eq!(SolarTerm::SlightCold, term);
/// assert_eq!(285, term.longitude());
/// assert_eq!("小寒", term.name(Labels::Simplified));
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum SolarTerm {
    SpringEquinox,
    PureBrightness,
    GrainRain,
    StartOfSummer,
    GrainFull,
    GrainInEar,
    SummerSolstice,
    SlightHeat,
    GreatHeat,
    StartOfAutumn,
    LimitOfHeat,
    WhiteDew,
    AutumnEquinox,
    ColdDew,
    FrostsDescent,
    StartOfWinter,
    SlightSnow,
    GreatSnow,
    WinterSolstice,
    SlightCold,
    GreatCold,
    StartOfSpring,
    RainWater,
    AwakeningOfInsects,
}

impl SolarTerm {
    /// 全部節氣，次序同序號。
    pub const ALL: [SolarTerm; 24] = {
        use SolarTerm::*;
        [
            SpringEquinox,
            PureBrightness,
            GrainRain,
            StartOfSummer,
            GrainFull,
            GrainInEar,
            SummerSolstice,
            SlightHeat,
            GreatHeat,
            StartOfAutumn,
            LimitOfHeat,
            WhiteDew,
            AutumnEquinox,
            ColdDew,
            FrostsDescent,
            StartOfWinter,
            SlightSnow,
            GreatSnow,
            WinterSolstice,
            SlightCold,
            GreatCold,
            StartOfSpring,
            RainWater,
            AwakeningOfInsects,
        ]
    };

    /// 依序號取得節氣，序號不在 `0..24` 則返回 `None`。
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
    /// 序號，`0..24`
    pub fn index(&self) -> usize {
        *self as usize
    }
    /// 太陽黃經（度）
    pub fn longitude(&self) -> u32 {
        self.index() as u32 * 15
    }
    /// 節氣名稱
    pub fn name(&self, labels: Labels) -> &'static str {
        fmt::solar_term(*self, labels)
    }
}

/// 一次交節：節氣及其時刻（UTC）。僅由曆表產生，不可變。
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarTermEvent {
    pub term: SolarTerm,
    pub instant: DateTime<Utc>,
}

impl SolarTermEvent {
    pub fn new(term: SolarTerm, instant: DateTime<Utc>) -> Self {
        Self { term, instant }
    }
    pub fn index(&self) -> usize {
        self.term.index()
    }
    pub fn label(&self, labels: Labels) -> &'static str {
        self.term.name(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices() {
        for (i, term) in SolarTerm::ALL.iter().enumerate() {
            assert_eq!(i, term.index());
            assert_eq!(Some(*term), SolarTerm::from_index(i));
        }
        assert_eq!(None, SolarTerm::from_index(24));
    }

    #[test]
    fn cardinal_points() {
        use SolarTerm::*;
        for (std, term) in [
            (0, SpringEquinox),
            (90, SummerSolstice),
            (180, AutumnEquinox),
            (270, WinterSolstice),
        ] {
            assert_eq!(std, term.longitude());
        }
    }
}
