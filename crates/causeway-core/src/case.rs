//! Investigation case content: the outcome headline plus the evidence pool
//! users drag onto the canvas.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub text: String,
}

impl Evidence {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    /// Text of the fixed outcome node.
    pub headline: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    /// Year span the timeline opens with for this case.
    #[serde(rename = "startYear")]
    pub start_year: i32,
    #[serde(rename = "endYear")]
    pub end_year: i32,
}

/// Demo catalog so the engine is usable headlessly; deployments supply
/// their own case data in the same shape.
pub fn builtin_cases() -> Vec<Case> {
    vec![
        Case {
            id: "grain-exchange".to_string(),
            title: "The Grain Exchange Collapse".to_string(),
            description: "A regional grain exchange shut its doors overnight. \
                          Trace the chain of events that brought it down."
                .to_string(),
            difficulty: "Beginner".to_string(),
            headline: "Collapse of the Harwick Grain Exchange".to_string(),
            evidence: vec![
                Evidence::new("Severe drought ruins harvest (1987)"),
                Evidence::new("Export ban announced (1988)"),
                Evidence::new("Warehouse fire destroys reserves (1986)"),
                Evidence::new("Futures prices triple in one season (1988)"),
                Evidence::new("Exchange director resigns (1989)"),
                Evidence::new("Farmers switch to cash crops"),
            ],
            start_year: 1985,
            end_year: 1990,
        },
        Case {
            id: "harbor-blackout".to_string(),
            title: "The Harbor Blackout".to_string(),
            description: "The port city went dark for three days. Work out \
                          which failures cascaded into the blackout."
                .to_string(),
            difficulty: "Advanced".to_string(),
            headline: "Three-day blackout of Port Meridian".to_string(),
            evidence: vec![
                Evidence::new("Substation maintenance deferred (2003)"),
                Evidence::new("Record heatwave drives demand (2005)"),
                Evidence::new("Transmission line sags into tree (2005)"),
                Evidence::new("Backup generator fuel contaminated (2004)"),
                Evidence::new("Grid operator ignores alarm"),
                Evidence::new("Neighboring grid refuses load transfer (2005)"),
            ],
            start_year: 2001,
            end_year: 2006,
        },
    ]
}

/// Looks a case up by id in the built-in catalog.
pub fn find_builtin_case(id: &str) -> Option<Case> {
    builtin_cases().into_iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_well_formed() {
        let cases = builtin_cases();
        assert_eq!(cases.len(), 2);
        for case in &cases {
            assert!(!case.headline.is_empty());
            assert!(case.end_year > case.start_year);
            assert!(case.evidence.len() >= 3, "{} needs a usable pool", case.id);
        }
    }

    #[test]
    fn lookup_by_id() {
        assert!(find_builtin_case("grain-exchange").is_some());
        assert!(find_builtin_case("nope").is_none());
    }
}
