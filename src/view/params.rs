use crate::types::records::columns;
use crate::view::error::ViewError;
use std::fmt;
use std::str::FromStr;

/// Which daily temperature the temperature view plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemperatureField {
    #[default]
    TempMax,
    TempMin,
}

impl TemperatureField {
    pub const ALL: [TemperatureField; 2] = [TemperatureField::TempMax, TemperatureField::TempMin];

    /// Column of the combined table holding this field.
    pub fn column(self) -> &'static str {
        match self {
            TemperatureField::TempMax => columns::TEMP_MAX,
            TemperatureField::TempMin => columns::TEMP_MIN,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemperatureField::TempMax => "Max temperature (°C)",
            TemperatureField::TempMin => "Min temperature (°C)",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TemperatureField::TempMax => TemperatureField::TempMin,
            TemperatureField::TempMin => TemperatureField::TempMax,
        }
    }
}

impl FromStr for TemperatureField {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemperatureField::ALL
            .into_iter()
            .find(|f| f.column() == s)
            .ok_or_else(|| {
                ViewError::InvalidParameter(format!(
                    "unknown temperature field '{s}' (expected temp_max or temp_min)"
                ))
            })
    }
}

impl fmt::Display for TemperatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Inclusive range of calendar months, `1 <= start <= end <= 12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthRange {
    start: u32,
    end: u32,
}

impl MonthRange {
    pub const FULL_YEAR: MonthRange = MonthRange { start: 1, end: 12 };

    pub fn new(start: u32, end: u32) -> Result<Self, ViewError> {
        for month in [start, end] {
            if !(1..=12).contains(&month) {
                return Err(ViewError::InvalidParameter(format!(
                    "month {month} is outside 1..=12"
                )));
            }
        }
        if start > end {
            return Err(ViewError::InvalidParameter(format!(
                "month range start {start} is after end {end}"
            )));
        }
        Ok(MonthRange { start, end })
    }

    pub fn start(self) -> u32 {
        self.start
    }

    pub fn end(self) -> u32 {
        self.end
    }

    pub fn contains(self, month: u32) -> bool {
        (self.start..=self.end).contains(&month)
    }

    /// Moves the start by `delta` months, clamped so the range stays valid.
    pub fn shift_start(self, delta: i32) -> Self {
        let start = (self.start as i32 + delta).clamp(1, self.end as i32) as u32;
        MonthRange { start, ..self }
    }

    /// Moves the end by `delta` months, clamped so the range stays valid.
    pub fn shift_end(self, delta: i32) -> Self {
        let end = (self.end as i32 + delta).clamp(self.start as i32, 12) as u32;
        MonthRange { end, ..self }
    }
}

impl Default for MonthRange {
    fn default() -> Self {
        MonthRange::FULL_YEAR
    }
}

/// Accepts `3-5`, `3..5`, `3..=5` or a single month `7`.
impl FromStr for MonthRange {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                ViewError::InvalidParameter(format!("cannot parse month range '{s}'"))
            })
        };
        let bounds = s
            .split_once("..=")
            .or_else(|| s.split_once(".."))
            .or_else(|| s.split_once('-'));
        match bounds {
            Some((start, end)) => MonthRange::new(parse(start)?, parse(end)?),
            None => {
                let month = parse(s)?;
                MonthRange::new(month, month)
            }
        }
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The two user inputs of the view engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewParams {
    pub field: TemperatureField,
    pub months: MonthRange,
}

impl ViewParams {
    /// Builds parameters from their textual form, e.g. `("temp_min", 3, 5)`.
    pub fn new(field: &str, start_month: u32, end_month: u32) -> Result<Self, ViewError> {
        Ok(ViewParams {
            field: field.parse()?,
            months: MonthRange::new(start_month, end_month)?,
        })
    }

    pub fn with_field(self, field: TemperatureField) -> Self {
        ViewParams { field, ..self }
    }

    pub fn with_months(self, months: MonthRange) -> Self {
        ViewParams { months, ..self }
    }

    pub(crate) fn validate(&self) -> Result<(), ViewError> {
        MonthRange::new(self.months.start, self.months.end).map(|_| ())
    }
}

impl fmt::Display for ViewParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for months {}", self.field, self.months)
    }
}
