use crate::error::OsaError;
use std::fmt;
use std::str::FromStr;

/// Sweep mode of the instrument: run once, repeatedly, or automatically.
///
/// Parses case-insensitively from the soft-key names or their numeric
/// aliases (SINGLE=1, REPEAT=2, AUTO=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    Auto,
    Repeat,
    Single,
}

impl SweepMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SweepMode::Auto => "AUTO",
            SweepMode::Repeat => "REPEAT",
            SweepMode::Single => "SINGLE",
        }
    }
}

impl FromStr for SweepMode {
    type Err = OsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AUTO" | "3" => Ok(SweepMode::Auto),
            "REPEAT" | "2" => Ok(SweepMode::Repeat),
            "SINGLE" | "1" => Ok(SweepMode::Single),
            _ => Err(OsaError::Validation(format!("unsuitable sweep mode: {s:?}"))),
        }
    }
}

impl fmt::Display for SweepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed-trace operation applied to channel C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMath {
    /// Leave channel C alone.
    #[default]
    None,
    /// C = A - B (LOG)
    AMinusB,
    /// C = B - A (LOG)
    BMinusA,
    /// C = A + B (LOG)
    APlusB,
}

impl TraceMath {
    /// Expression text as the `:CALCULATE:MATH:TRC` command expects it.
    pub fn expression(self) -> Option<&'static str> {
        match self {
            TraceMath::None => None,
            TraceMath::AMinusB => Some("A-B (LOG)"),
            TraceMath::BMinusA => Some("B-A (LOG)"),
            TraceMath::APlusB => Some("A+B (LOG)"),
        }
    }
}

/// On-instrument file format for stored traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Bin,
}

impl FileFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Bin => "BIN",
        }
    }
}

/// Storage target for stored traces: internal memory or external (USB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTarget {
    Internal,
    External,
}

impl MemoryTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            MemoryTarget::Internal => "INT",
            MemoryTarget::External => "EXT",
        }
    }
}

/// Vertical display scaling for the LEVEL soft key.
///
/// Real-valued fields are encoded exponentially on the wire. Defaults are
/// the instrument's documented ones: -10 dBm reference, 10 dB/D main
/// scale, 5 dB/D sub scale, zero offset, automatic sub scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    /// Reference level in dBm.
    pub ref_level: f64,
    /// Main log scale in dB per division.
    pub log_scale: f64,
    /// Track the marker maximum instead of using `ref_level`.
    pub auto_ref_level: bool,
    /// Sub-scale in dB per division.
    pub sub_log: f64,
    /// Sub-scale offset level, applied only with manual sub scale.
    pub offset_level: f64,
    pub auto_sub_scale: bool,
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self {
            ref_level: -10.0,
            log_scale: 10.0,
            auto_ref_level: false,
            sub_log: 5.0,
            offset_level: 0.0,
            auto_sub_scale: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_mode_parses_case_insensitively() {
        assert_eq!("repeat".parse::<SweepMode>().unwrap(), SweepMode::Repeat);
        assert_eq!("AUTO".parse::<SweepMode>().unwrap(), SweepMode::Auto);
        assert_eq!("Single".parse::<SweepMode>().unwrap(), SweepMode::Single);
    }

    #[test]
    fn sweep_mode_accepts_numeric_aliases() {
        assert_eq!("1".parse::<SweepMode>().unwrap(), SweepMode::Single);
        assert_eq!("2".parse::<SweepMode>().unwrap(), SweepMode::Repeat);
        assert_eq!("3".parse::<SweepMode>().unwrap(), SweepMode::Auto);
    }

    #[test]
    fn bogus_sweep_mode_is_a_validation_error() {
        assert!(matches!(
            "bogus".parse::<SweepMode>(),
            Err(OsaError::Validation(_))
        ));
    }

    #[test]
    fn trace_math_expressions() {
        assert_eq!(TraceMath::None.expression(), None);
        assert_eq!(TraceMath::AMinusB.expression(), Some("A-B (LOG)"));
        assert_eq!(TraceMath::BMinusA.expression(), Some("B-A (LOG)"));
        assert_eq!(TraceMath::APlusB.expression(), Some("A+B (LOG)"));
    }
}
