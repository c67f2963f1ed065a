// ==========================================
// BREEAM & LEED 认证看板 - 日期规范化器
// ==========================================
// 职责: 任意文本/数值 → 日历日期（或 None）
// 红线: 解析失败只返回 None,不向调用方抛错
// ==========================================
// 流程:
// 1. 空值/空白 → None
// 2. 整段文本模糊解析（跳过无关单词、时间、序数后缀）
// 3. 失败则截取第一个日期片段单独严格解析
// 4. 仍失败 → None
// ==========================================

use crate::domain::record::RawValue;
use crate::domain::types::DayMonthOrder;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

/// 可接受的年份范围（超出即视为非日期数字，如证书编号、Excel 序列号）
const MIN_YEAR: i64 = 1;
const MAX_YEAR: i64 = 9999;

/// 日期片段: YYYY-M-D | D-M-YY(YY) | YYYY-M（分隔符 - / .）
fn date_fragment_regex() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| {
        Regex::new(
            r"(\d{4}[-/.]\d{1,2}[-/.]\d{1,2})|(\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4})|(\d{4}[-/.]\d{1,2})",
        )
        .expect("日期片段正则非法")
    })
}

// ==========================================
// DateNormalizer
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    order: DayMonthOrder,
    /// 文本缺失的年/月/日从该日期补齐，两位年份也以它为世纪窗口中心
    reference: NaiveDate,
}

impl DateNormalizer {
    pub fn new(order: DayMonthOrder, reference: NaiveDate) -> Self {
        Self { order, reference }
    }

    pub fn order(&self) -> DayMonthOrder {
        self.order
    }

    /// 规范化任意输入值
    pub fn normalize(&self, value: &RawValue) -> Option<NaiveDate> {
        let text = match value {
            RawValue::Null => return None,
            RawValue::Text(s) => s.trim().to_string(),
            RawValue::Number(n) => {
                if !n.is_finite() {
                    return None;
                }
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        };
        if text.is_empty() {
            return None;
        }

        if let Some(date) = self.parse(&text, true) {
            return Some(date);
        }

        let fragment = date_fragment_regex().find(&text)?;
        let date = self.parse(fragment.as_str(), false);
        trace!(input = %text, fragment = fragment.as_str(), ?date, "日期片段回退解析");
        date
    }

    /// 规范化可选文本
    pub fn normalize_text(&self, value: Option<&str>) -> Option<NaiveDate> {
        self.normalize(&RawValue::from(value))
    }

    /// 解析整段文本
    ///
    /// fuzzy=true 时跳过不认识的单词，否则遇到即失败
    fn parse(&self, text: &str, fuzzy: bool) -> Option<NaiveDate> {
        let tokens = tokenize(text);
        let mut ymd = YmdParts::default();

        let mut i = 0;
        while i < tokens.len() {
            match &tokens[i] {
                Token::Num(digits) => {
                    // 时间 hh:mm[:ss] → 跳过
                    if matches!(tokens.get(i + 1), Some(Token::Colon)) {
                        i = skip_time(&tokens, i);
                        continue;
                    }
                    // 10 am / 3 pm → 小时
                    if let Some(Token::Word(w)) = tokens.get(i + 1) {
                        if is_meridiem(w) {
                            i += 2;
                            continue;
                        }
                    }
                    let followed_by_sep = matches!(tokens.get(i + 1), Some(Token::Sep(_)));
                    let preceded_by_sep = i > 0 && matches!(tokens.get(i - 1), Some(Token::Sep(_)));
                    let standalone = !followed_by_sep && !preceded_by_sep;

                    match digits.len() {
                        // YYYYMMDD[hhmm[ss]]
                        8 | 12 | 14 if standalone && ymd.is_empty() => {
                            ymd.push(&digits[0..4])?;
                            ymd.push(&digits[4..6])?;
                            ymd.push(&digits[6..8])?;
                        }
                        // YYMMDD
                        6 if standalone && ymd.is_empty() => {
                            ymd.push(&digits[0..2])?;
                            ymd.push(&digits[2..4])?;
                            ymd.push(&digits[4..6])?;
                        }
                        _ => ymd.push(digits)?,
                    }
                }
                Token::Word(word) => {
                    if let Some(month) = month_from_name(word) {
                        ymd.push_month(month)?;
                    } else if !fuzzy && !is_jump_word(word) {
                        return None;
                    }
                }
                Token::Sep(_) | Token::Colon => {}
                Token::Other => {
                    if !fuzzy {
                        return None;
                    }
                }
            }
            i += 1;
        }

        let (year, month, day) = ymd.resolve(self.order)?;
        self.build_date(year, month, day, ymd.century_specified)
    }

    /// 组合年月日，缺失部分由参考日期补齐
    fn build_date(
        &self,
        year: Option<i64>,
        month: Option<i64>,
        day: Option<i64>,
        century_specified: bool,
    ) -> Option<NaiveDate> {
        if year.is_none() && month.is_none() && day.is_none() {
            return None;
        }

        let year = match year {
            Some(y) if y < 100 && !century_specified => self.window_two_digit_year(y),
            Some(y) => y,
            None => self.reference.year() as i64,
        };
        let month = month.unwrap_or(self.reference.month() as i64);
        if !(1..=12).contains(&month) {
            return None;
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        let year = year as i32;
        let month = month as u32;

        let day = match day {
            Some(d) => u32::try_from(d).ok()?,
            None => self.reference.day().min(days_in_month(year, month)?),
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// 两位年份: 以参考年份为中心 ±50 年窗口
    fn window_two_digit_year(&self, yy: i64) -> i64 {
        let ref_year = self.reference.year() as i64;
        let mut year = yy + (ref_year / 100) * 100;
        if year >= ref_year + 50 {
            year -= 100;
        } else if year < ref_year - 50 {
            year += 100;
        }
        year
    }
}

// ==========================================
// 年月日候选收集与判定
// ==========================================
#[derive(Debug, Default)]
struct YmdParts {
    values: Vec<i64>,
    year_idx: Option<usize>,  // 超过两位数字的值只能是年
    month_idx: Option<usize>, // 英文月份名
    century_specified: bool,
}

impl YmdParts {
    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, digits: &str) -> Option<()> {
        let value: i64 = digits.parse().ok()?;
        if digits.len() > 2 {
            if self.year_idx.is_some() {
                return None;
            }
            self.century_specified = true;
            self.year_idx = Some(self.values.len());
        }
        self.values.push(value);
        Some(())
    }

    fn push_month(&mut self, month: i64) -> Option<()> {
        if self.month_idx.is_some() {
            return None;
        }
        self.month_idx = Some(self.values.len());
        self.values.push(month);
        Some(())
    }

    /// 判定 (年, 月, 日)
    ///
    /// 规则按常见通用日期解析器的约定:
    /// - 已标注(年/月名)的位置优先
    /// - >31 只能是年, >12 不能是月
    /// - 其余歧义由日月顺序策略决定
    /// - 以四位年份开头时总是 年-月-日
    fn resolve(&self, order: DayMonthOrder) -> Option<(Option<i64>, Option<i64>, Option<i64>)> {
        let v = &self.values;
        let len = v.len();
        let day_first = order == DayMonthOrder::DayFirst;

        if len > 3 {
            return None;
        }

        let labelled = self.year_idx.is_some() as usize + self.month_idx.is_some() as usize;
        if (len == labelled && len > 0) || (len == 3 && labelled == 2) {
            return Some(self.resolve_from_labels());
        }

        let (mut year, mut month, mut day) = (None, None, None);
        match len {
            0 => {}
            1 => {
                let other = v[0];
                if other > 31 {
                    year = Some(other);
                } else {
                    day = Some(other);
                }
            }
            2 if self.month_idx.is_some() => {
                let m_idx = self.month_idx.unwrap_or(0);
                month = Some(v[m_idx]);
                let other = v[1 - m_idx];
                if other > 31 {
                    year = Some(other);
                } else {
                    day = Some(other);
                }
            }
            2 => {
                if v[0] > 31 {
                    year = Some(v[0]);
                    month = Some(v[1]);
                } else if v[1] > 31 {
                    month = Some(v[0]);
                    year = Some(v[1]);
                } else if day_first && v[1] <= 12 {
                    day = Some(v[0]);
                    month = Some(v[1]);
                } else {
                    month = Some(v[0]);
                    day = Some(v[1]);
                }
            }
            _ => match self.month_idx {
                Some(0) => {
                    month = Some(v[0]);
                    if v[1] > 31 {
                        year = Some(v[1]);
                        day = Some(v[2]);
                    } else {
                        day = Some(v[1]);
                        year = Some(v[2]);
                    }
                }
                Some(1) => {
                    month = Some(v[1]);
                    if v[0] > 31 {
                        year = Some(v[0]);
                        day = Some(v[2]);
                    } else {
                        day = Some(v[0]);
                        year = Some(v[2]);
                    }
                }
                Some(_) => {
                    month = Some(v[2]);
                    if v[1] > 31 {
                        day = Some(v[0]);
                        year = Some(v[1]);
                    } else {
                        year = Some(v[0]);
                        day = Some(v[1]);
                    }
                }
                None => {
                    if v[0] > 31 || self.year_idx == Some(0) {
                        year = Some(v[0]);
                        month = Some(v[1]);
                        day = Some(v[2]);
                    } else if v[0] > 12 || (day_first && v[1] <= 12) {
                        day = Some(v[0]);
                        month = Some(v[1]);
                        year = Some(v[2]);
                    } else {
                        month = Some(v[0]);
                        day = Some(v[1]);
                        year = Some(v[2]);
                    }
                }
            },
        }
        Some((year, month, day))
    }

    /// 按标注位置取值，三值缺一个标注时剩下的位置即为缺失项
    fn resolve_from_labels(&self) -> (Option<i64>, Option<i64>, Option<i64>) {
        let v = &self.values;
        let year = self.year_idx.map(|i| v[i]);
        let month = self.month_idx.map(|i| v[i]);
        let mut day = None;

        if v.len() == 3 {
            let rest = (0..3).find(|i| Some(*i) != self.year_idx && Some(*i) != self.month_idx);
            day = rest.map(|i| v[i]);
        }
        (year, month, day)
    }
}

// ==========================================
// 词法切分
// ==========================================
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(String),
    Word(String),
    Sep(char), // - / .
    Colon,
    Other,
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut s = String::new();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                s.push(d);
                chars.next();
            }
            tokens.push(Token::Num(s));
        } else if c.is_alphabetic() {
            let mut s = String::new();
            while let Some(&a) = chars.peek() {
                if !a.is_alphabetic() {
                    break;
                }
                s.extend(a.to_lowercase());
                chars.next();
            }
            tokens.push(Token::Word(s));
        } else {
            chars.next();
            match c {
                '-' | '/' | '.' => tokens.push(Token::Sep(c)),
                ':' => tokens.push(Token::Colon),
                c if c.is_whitespace() || c == ',' || c == ';' || c == '\'' => {}
                _ => tokens.push(Token::Other),
            }
        }
    }
    tokens
}

/// 跳过 hh:mm[:ss[.fff]]，返回下一个待处理位置
fn skip_time(tokens: &[Token], start: usize) -> usize {
    let mut i = start + 1;
    while matches!(tokens.get(i), Some(Token::Colon)) && matches!(tokens.get(i + 1), Some(Token::Num(_))) {
        i += 2;
    }
    if matches!(tokens.get(i), Some(Token::Sep('.'))) && matches!(tokens.get(i + 1), Some(Token::Num(_))) {
        i += 2;
    }
    if let Some(Token::Word(w)) = tokens.get(i) {
        if is_meridiem(w) {
            i += 1;
        }
    }
    i
}

fn month_from_name(word: &str) -> Option<i64> {
    let month = match word {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn is_meridiem(word: &str) -> bool {
    matches!(word, "am" | "pm" | "a" | "p")
}

/// 严格模式下允许出现的连接词 / 序数后缀 / 星期
fn is_jump_word(word: &str) -> bool {
    matches!(
        word,
        "at" | "on" | "and" | "ad" | "m" | "t" | "of" | "st" | "nd" | "rd" | "th"
            | "mon" | "monday" | "tue" | "tues" | "tuesday" | "wed" | "wednesday"
            | "thu" | "thur" | "thurs" | "thursday" | "fri" | "friday"
            | "sat" | "saturday" | "sun" | "sunday"
    )
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}
