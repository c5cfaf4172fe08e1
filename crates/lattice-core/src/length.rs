//! Track sizing rules.

use std::fmt;
use std::str::FromStr;

use crate::errors::{LayoutError, LayoutResult};

/// How a row or column is sized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackLength {
    /// Sized by measuring content
    #[default]
    Auto,
    /// Fixed size in pixels
    Fixed(i32),
    /// Proportional share of the space left after fixed and auto tracks
    Weighted(f64),
}

/// Discriminant of a [`TrackLength`], used where only the mode matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthKind {
    Auto,
    Fixed,
    Weighted,
}

impl TrackLength {
    /// A fixed length. Fails if `pixels` is negative.
    pub fn fixed(pixels: i32) -> LayoutResult<Self> {
        if pixels < 0 {
            return Err(LayoutError::invalid_argument(format!(
                "fixed length must not be negative, got {pixels}"
            )));
        }
        Ok(Self::Fixed(pixels))
    }

    /// A weighted length. Fails unless `weight` is finite and positive.
    pub fn weighted(weight: f64) -> LayoutResult<Self> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(LayoutError::invalid_argument(format!(
                "weight must be a positive finite number, got {weight}"
            )));
        }
        Ok(Self::Weighted(weight))
    }

    pub fn kind(&self) -> LengthKind {
        match self {
            Self::Auto => LengthKind::Auto,
            Self::Fixed(_) => LengthKind::Fixed,
            Self::Weighted(_) => LengthKind::Weighted,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    pub fn is_weighted(&self) -> bool {
        matches!(self, Self::Weighted(_))
    }

    /// Pixel payload of a fixed length.
    pub fn pixels(&self) -> LayoutResult<i32> {
        match self {
            Self::Fixed(pixels) => Ok(*pixels),
            other => Err(LayoutError::invalid_state(format!(
                "{other} has no pixel value"
            ))),
        }
    }

    /// Weight payload of a weighted length.
    pub fn weight(&self) -> LayoutResult<f64> {
        match self {
            Self::Weighted(weight) => Ok(*weight),
            other => Err(LayoutError::invalid_state(format!("{other} has no weight"))),
        }
    }

    /// Check the payload of a length built directly from its variant.
    pub fn validate(&self) -> LayoutResult<()> {
        match *self {
            Self::Auto => Ok(()),
            Self::Fixed(pixels) => Self::fixed(pixels).map(|_| ()),
            Self::Weighted(weight) => Self::weighted(weight).map(|_| ()),
        }
    }
}

impl fmt::Display for TrackLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Fixed(pixels) => write!(f, "{pixels}"),
            Self::Weighted(weight) if *weight == 1.0 => write!(f, "*"),
            Self::Weighted(weight) => write!(f, "{weight}*"),
        }
    }
}

impl FromStr for TrackLength {
    type Err = LayoutError;

    /// Parse grid-definition syntax: `Auto`, `120`, `120px`, `*`, `2.5*`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }

        if let Some(weight) = s.strip_suffix('*') {
            let weight = weight.trim();
            if weight.is_empty() {
                return Ok(Self::Weighted(1.0));
            }
            let value: f64 = weight.parse().map_err(|_| {
                LayoutError::invalid_argument(format!("invalid weight '{weight}'"))
            })?;
            return Self::weighted(value);
        }

        let split = s
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.')))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let unit = unit.trim();
        if number.is_empty() {
            return Err(LayoutError::invalid_argument(format!(
                "invalid track length '{s}'"
            )));
        }
        if !unit.is_empty() && !unit.eq_ignore_ascii_case("px") {
            return Err(LayoutError::unsupported_variant(unit));
        }
        let pixels: i32 = number.parse().map_err(|_| {
            LayoutError::invalid_argument(format!("invalid pixel length '{number}'"))
        })?;
        Self::fixed(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_validate() {
        assert_eq!(TrackLength::fixed(25).unwrap(), TrackLength::Fixed(25));
        assert!(TrackLength::fixed(-1).is_err());
        assert_eq!(TrackLength::weighted(1.2).unwrap(), TrackLength::Weighted(1.2));
        assert!(TrackLength::weighted(0.0).is_err());
        assert!(TrackLength::weighted(f64::NAN).is_err());
        assert!(TrackLength::weighted(f64::INFINITY).is_err());
    }

    #[test]
    fn test_wrong_payload_is_invalid_state() {
        let err = TrackLength::Auto.weight().unwrap_err();
        assert!(matches!(err, LayoutError::InvalidState { .. }));
        assert!(TrackLength::Weighted(2.0).pixels().is_err());
        assert_eq!(TrackLength::Fixed(7).pixels().unwrap(), 7);
        assert_eq!(TrackLength::Weighted(2.0).weight().unwrap(), 2.0);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(TrackLength::Weighted(1.0), TrackLength::Weighted(1.0));
        assert_ne!(TrackLength::Fixed(1), TrackLength::Weighted(1.0));
        assert_ne!(TrackLength::Auto, TrackLength::Fixed(0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Auto".parse::<TrackLength>().unwrap(), TrackLength::Auto);
        assert_eq!("auto".parse::<TrackLength>().unwrap(), TrackLength::Auto);
        assert_eq!("120".parse::<TrackLength>().unwrap(), TrackLength::Fixed(120));
        assert_eq!("120px".parse::<TrackLength>().unwrap(), TrackLength::Fixed(120));
        assert_eq!("*".parse::<TrackLength>().unwrap(), TrackLength::Weighted(1.0));
        assert_eq!(" 2.5* ".parse::<TrackLength>().unwrap(), TrackLength::Weighted(2.5));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "12em".parse::<TrackLength>(),
            Err(LayoutError::UnsupportedVariant { .. })
        ));
        assert!(matches!(
            "0*".parse::<TrackLength>(),
            Err(LayoutError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "-4".parse::<TrackLength>(),
            Err(LayoutError::InvalidArgument { .. })
        ));
        assert!("abc".parse::<TrackLength>().is_err());
        assert!("".parse::<TrackLength>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for length in [
            TrackLength::Auto,
            TrackLength::Fixed(40),
            TrackLength::Weighted(1.0),
            TrackLength::Weighted(0.5),
        ] {
            assert_eq!(length.to_string().parse::<TrackLength>().unwrap(), length);
        }
    }
}
