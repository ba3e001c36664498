//! Rule matching over free-text catalog conditions.
//!
//! Catalog rules carry their band as text ("CrCl 10-50 mL/min",
//! "Child-Pugh C"). Everything that reads that text goes through the bands
//! below, so a coded vocabulary can replace the parsing without the
//! adjuster or the engine changing.

/// Case-insensitive substring test. An empty needle never matches.
pub fn text_contains(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when either string contains the other, ignoring case.
pub fn text_overlaps(a: &str, b: &str) -> bool {
    text_contains(a, b) || text_contains(b, a)
}

/// Lowercase, strip whitespace and fold dash variants to '-'.
fn normalize_band_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Creatinine clearance buckets used by renal rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenalBand {
    /// CrCl > 50
    Normal,
    /// 10 <= CrCl <= 50
    Moderate,
    /// CrCl < 10
    Severe,
}

impl RenalBand {
    /// CrCl of exactly 50 falls in `Moderate`; exactly 10 also falls in `Moderate`.
    pub fn for_crcl(crcl: f64) -> Self {
        if crcl > 50.0 {
            RenalBand::Normal
        } else if crcl >= 10.0 {
            RenalBand::Moderate
        } else {
            RenalBand::Severe
        }
    }

    fn marker(self) -> &'static str {
        match self {
            RenalBand::Normal => ">50",
            RenalBand::Moderate => "10-50",
            RenalBand::Severe => "<10",
        }
    }

    /// Whether a rule's condition text names this band.
    pub fn matches(self, condition: &str) -> bool {
        normalize_band_text(condition).contains(self.marker())
    }
}

/// Child-Pugh buckets used by hepatic rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HepaticBand {
    /// Child-Pugh A-B
    MildModerate,
    /// Child-Pugh C
    Severe,
}

const HEPATIC_KEYWORDS: [&str; 3] = ["hepat", "liver", "cirrhosis"];

impl HepaticBand {
    /// Band implied by the patient's free-text conditions: any hepatic
    /// keyword selects `Severe`, otherwise `MildModerate`.
    pub fn from_conditions<S: AsRef<str>>(conditions: &[S]) -> Self {
        let hepatic = conditions.iter().any(|condition| {
            HEPATIC_KEYWORDS
                .iter()
                .any(|keyword| text_contains(condition.as_ref(), keyword))
        });

        if hepatic {
            HepaticBand::Severe
        } else {
            HepaticBand::MildModerate
        }
    }

    /// Whether a rule's condition text names this band. The Child-Pugh class
    /// letter must stand alone ("Child-Pugh C"), so the "c" of "child" does
    /// not count.
    pub fn matches(self, condition: &str) -> bool {
        let lower = condition.to_lowercase();
        match self {
            HepaticBand::MildModerate => {
                normalize_band_text(condition).contains("a-b") || lower.contains("mild")
            }
            HepaticBand::Severe => {
                lower.contains("severe")
                    || lower
                        .split(|c: char| !c.is_alphanumeric())
                        .any(|token| token == "c")
            }
        }
    }
}
