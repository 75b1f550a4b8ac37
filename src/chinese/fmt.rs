//! 格式化節氣名稱

use std::str::FromStr;

use unicode_width::UnicodeWidthStr;

use super::SolarTerm;

/// 節氣名稱所用文字
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Labels {
    /// 简体中文
    #[default]
    Simplified,
    /// 正體中文
    Traditional,
    English,
}

impl FromStr for Labels {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zhs" | "zh-hans" | "simplified" => Ok(Self::Simplified),
            "zht" | "zh-hant" | "traditional" => Ok(Self::Traditional),
            "en" | "english" => Ok(Self::English),
            _ => Err(format!("unknown label set '{s}', expected zhs, zht or en")),
        }
    }
}

const NAMES_ZHS: [&str; 24] = [
    "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑", "大暑", "立秋", "处暑", "白露",
    "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒", "立春", "雨水", "惊蛰",
];
const NAMES_ZHT: [&str; 24] = [
    "春分", "清明", "穀雨", "立夏", "小滿", "芒種", "夏至", "小暑", "大暑", "立秋", "處暑", "白露",
    "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒", "立春", "雨水", "驚蟄",
];
const NAMES_EN: [&str; 24] = [
    "Spring Equinox",
    "Pure Brightness",
    "Grain Rain",
    "Start of Summer",
    "Grain Full",
    "Grain in Ear",
    "Summer Solstice",
    "Slight Heat",
    "Great Heat",
    "Start of Autumn",
    "Limit of Heat",
    "White Dew",
    "Autumn Equinox",
    "Cold Dew",
    "Frost's Descent",
    "Start of Winter",
    "Slight Snow",
    "Great Snow",
    "Winter Solstice",
    "Slight Cold",
    "Great Cold",
    "Start of Spring",
    "Rain Water",
    "Awakening of Insects",
];

fn names(labels: Labels) -> &'static [&'static str; 24] {
    match labels {
        Labels::Simplified => &NAMES_ZHS,
        Labels::Traditional => &NAMES_ZHT,
        Labels::English => &NAMES_EN,
    }
}

/// 節氣名稱
///
/// # 用例
///
/// ```
/// use jieqi::chinese::{self, Labels, SolarTerm};
///
/// assert_eq!("穀雨", chinese::fmt::solar_term(SolarTerm::GrainRain, Labels::Traditional));
/// assert_eq!("谷雨", chinese::fmt::solar_term(SolarTerm::GrainRain, Labels::Simplified));
/// ```
pub fn solar_term(term: SolarTerm, labels: Labels) -> &'static str {
    names(labels)[term.index()]
}

/// 最長名稱的顯示寬度，漢字計兩格。
pub fn max_width(labels: Labels) -> usize {
    names(labels)
        .iter()
        .map(|name| name.width())
        .max()
        .unwrap_or(0)
}

/// 以顯示寬度右補空格至 `width` 格；已超寬則原樣返回。
///
/// # 用例
///
/// ```
/// use jieqi::chinese::fmt::pad;
///
/// assert_eq!("小寒  ", pad("小寒", 6));
/// assert_eq!("Dew   ", pad("Dew", 6));
/// ```
pub fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(4, max_width(Labels::Simplified));
        assert_eq!(4, max_width(Labels::Traditional));
        assert_eq!("Awakening of Insects".len(), max_width(Labels::English));
    }

    #[test]
    fn parse_labels() {
        for (std, s) in [
            (Ok(Labels::Simplified), "zhs"),
            (Ok(Labels::Traditional), "ZHT"),
            (Ok(Labels::English), "en"),
        ] {
            assert_eq!(std, s.parse::<Labels>());
        }
        assert!("fr".parse::<Labels>().is_err());
    }

    #[test]
    fn winter_names() {
        use SolarTerm::*;
        for (std, term) in [("冬至", WinterSolstice), ("小寒", SlightCold), ("大寒", GreatCold)] {
            assert_eq!(std, solar_term(term, Labels::Simplified));
        }
        assert_eq!("Slight Cold", solar_term(SlightCold, Labels::English));
    }
}
