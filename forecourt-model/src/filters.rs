use std::fmt;

/// Fixed price brackets offered by the catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    UpTo4999,
    Mid5000To9999,
    From10000,
}

impl PriceBand {
    pub fn all() -> &'static [PriceBand] {
        use PriceBand::*;
        &[UpTo4999, Mid5000To9999, From10000]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceBand::UpTo4999 => "0-4999",
            PriceBand::Mid5000To9999 => "5000-9999",
            PriceBand::From10000 => "10000+",
        }
    }

    /// Permissive by policy: unrecognized values are treated as "no filter",
    /// never an error, so malformed query strings degrade gracefully.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "0-4999" => Some(PriceBand::UpTo4999),
            "5000-9999" => Some(PriceBand::Mid5000To9999),
            "10000+" => Some(PriceBand::From10000),
            _ => None,
        }
    }

    /// Inclusive bounds; `None` means the side is open.
    pub fn bounds(&self) -> (Option<i64>, Option<i64>) {
        match self {
            PriceBand::UpTo4999 => (None, Some(4999)),
            PriceBand::Mid5000To9999 => (Some(5000), Some(9999)),
            PriceBand::From10000 => (Some(10000), None),
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Fixed model-year brackets offered by the catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearBand {
    UpTo2005,
    Mid2006To2014,
    From2015,
}

impl YearBand {
    pub fn all() -> &'static [YearBand] {
        use YearBand::*;
        &[UpTo2005, Mid2006To2014, From2015]
    }

    pub fn label(&self) -> &'static str {
        match self {
            YearBand::UpTo2005 => "0-2005",
            YearBand::Mid2006To2014 => "2006-2014",
            YearBand::From2015 => "2015+",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "0-2005" => Some(YearBand::UpTo2005),
            "2006-2014" => Some(YearBand::Mid2006To2014),
            "2015+" => Some(YearBand::From2015),
            _ => None,
        }
    }

    /// Inclusive bounds; `None` means the side is open.
    pub fn bounds(&self) -> (Option<i64>, Option<i64>) {
        match self {
            YearBand::UpTo2005 => (None, Some(2005)),
            YearBand::Mid2006To2014 => (Some(2006), Some(2014)),
            YearBand::From2015 => (Some(2015), None),
        }
    }
}

impl fmt::Display for YearBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Independently-optional catalog filters. An all-empty set means the full
/// unfiltered catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Substring match against title, make, and model.
    pub text: Option<String>,
    pub price: Option<PriceBand>,
    pub year: Option<YearBand>,
    /// `None` means "any"; `Some(true)` only sold, `Some(false)` only unsold.
    pub sold: Option<bool>,
}

impl SearchFilters {
    /// Builds filters from raw query-string values.
    ///
    /// Blank text and unrecognized band or status values contribute no
    /// filter. Status uses the wire encoding `"0"` (available) / `"1"`
    /// (sold).
    pub fn from_raw(
        text: Option<&str>,
        price: Option<&str>,
        year: Option<&str>,
        status: Option<&str>,
    ) -> Self {
        let text = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let sold = match status {
            Some("0") => Some(false),
            Some("1") => Some(true),
            _ => None,
        };
        Self {
            text,
            price: price.and_then(PriceBand::parse),
            year: year.and_then(YearBand::parse),
            sold,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.price.is_none()
            && self.year.is_none()
            && self.sold.is_none()
    }
}
