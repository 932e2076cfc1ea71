//! Timeline geometry: the bidirectional mapping between years and canvas
//! pixels.
//!
//! The axis runs top-down from the latest year to the earliest, so a later
//! year always has a strictly smaller `y`. All functions here are pure; the
//! store and session call into them, the render layer reuses them for axis
//! placement.

use regex::Regex;

use crate::config::CanvasConfig;
use crate::model::MindMap;

fn year_token_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((\d{4})\)").expect("valid regex"))
}

fn year_token_with_space_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(\d{4}\)").expect("valid regex"))
}

/// First `(YYYY)` token embedded in a label, if any.
pub fn parse_embedded_year(text: &str) -> Option<i32> {
    year_token_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Rewrites a label so it carries exactly one `(year)` token.
///
/// A single existing token is replaced in place, preserving surrounding
/// text. Labels that somehow accumulated several tokens are collapsed: all
/// tokens are stripped and one canonical token is appended. Labels without
/// a token get one appended. Re-embedding the same year is a no-op.
pub fn embed_year(text: &str, year: i32) -> String {
    let token_count = year_token_regex().find_iter(text).count();
    match token_count {
        0 => format!("{} ({year})", text.trim_end()),
        1 => year_token_regex()
            .replace(text, format!("({year})"))
            .into_owned(),
        _ => {
            let stripped = year_token_with_space_regex().replace_all(text, "");
            format!("{} ({year})", stripped.trim())
        }
    }
}

/// Inclusive year span shown on the timeline axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineRange {
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for TimelineRange {
    fn default() -> Self {
        Self {
            start_year: 1985,
            end_year: 1990,
        }
    }
}

impl TimelineRange {
    /// Builds a range, clamping a degenerate `end <= start` input to a
    /// one-year span so downstream pixel math stays well defined.
    pub fn new(start_year: i32, end_year: i32) -> Self {
        let end_year = if end_year <= start_year {
            start_year + 1
        } else {
            end_year
        };
        Self {
            start_year,
            end_year,
        }
    }

    pub fn span_years(&self) -> i32 {
        self.end_year - self.start_year
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    pub fn midpoint_year(&self) -> i32 {
        (self.start_year + self.end_year).div_euclid(2)
    }

    /// Years from the latest down to the earliest, matching the axis order
    /// on screen (latest at the top).
    pub fn years_desc(&self) -> impl DoubleEndedIterator<Item = i32> + use<> {
        (self.start_year..=self.end_year).rev()
    }

    /// Year parsed from a label, falling back to the range midpoint when the
    /// label carries no `(YYYY)` token.
    pub fn extract_year(&self, text: &str) -> i32 {
        parse_embedded_year(text).unwrap_or_else(|| self.midpoint_year())
    }

    /// Canvas `y` of a year line. Later years sit higher: the mapping is
    /// strictly decreasing in `year`.
    pub fn year_to_y(&self, config: &CanvasConfig, year: i32) -> f64 {
        config.top_offset + f64::from(self.end_year - year) * config.pixels_per_year
    }

    /// Nearest year line to a pixel position. Positions outside the axis
    /// clamp to the nearest endpoint year; an exact midpoint between two
    /// lines resolves to the later (higher-on-screen) year.
    pub fn y_to_closest_year(&self, config: &CanvasConfig, y: f64) -> i32 {
        let mut closest = self.end_year;
        let mut best = (y - self.year_to_y(config, closest)).abs();
        for year in self.years_desc().skip(1) {
            let d = (y - self.year_to_y(config, year)).abs();
            if d < best {
                best = d;
                closest = year;
            }
        }
        closest
    }

    /// Canvas height needed to show the whole axis plus the bottom margin.
    pub fn required_canvas_height(&self, config: &CanvasConfig) -> f64 {
        config.top_offset
            + f64::from(self.span_years()) * config.pixels_per_year
            + config.bottom_margin
    }
}

/// In-range years currently claimed by cause nodes; drives the axis
/// highlighting.
pub fn used_years(map: &MindMap, range: &TimelineRange) -> rustc_hash::FxHashSet<i32> {
    map.nodes
        .values()
        .filter(|n| !n.is_outcome())
        .filter_map(|n| n.year)
        .filter(|y| range.contains(*y))
        .collect()
}
