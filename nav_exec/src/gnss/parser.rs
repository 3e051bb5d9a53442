//! # Sentence parsing
//!
//! Converts one line of receiver output into a [`RawSentence`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::gnss::{FixQuality, RawSentence};
use nmea0183::{GPSQuality, ParseResult, Parser};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Parses a single position report sentence.
pub trait SentenceParser {
    /// Parse one line, without its line terminator, into a raw sentence.
    fn parse(&mut self, line: &str) -> Result<RawSentence, ParseError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parser for NMEA 0183 GGA (fix data) sentences, including checksum validation.
pub struct GgaParser {
    parser: Parser,

    /// Scratch buffer holding the line plus its terminator.
    buffer: Vec<u8>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The sentence was malformed, for example a bad checksum or missing fields. The next line
    /// may still be valid.
    #[error("Malformed sentence: {0}")]
    Malformed(String),

    /// The parser itself can no longer be used.
    #[error("Parser fault: {0}")]
    Fault(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GgaParser {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            buffer: Vec::with_capacity(96),
        }
    }
}

impl Default for GgaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceParser for GgaParser {
    fn parse(&mut self, line: &str) -> Result<RawSentence, ParseError> {
        // The NMEA parser works on a byte stream and only completes a sentence on its terminator
        self.buffer.clear();
        self.buffer.extend_from_slice(line.trim_end().as_bytes());
        self.buffer.extend_from_slice(b"\r\n");

        let result = self.parser.parse_from_bytes(&self.buffer).last();

        // Don't let a half-consumed sentence leak into the next line
        if !matches!(result, Some(Ok(_))) {
            self.parser = Parser::new();
        }

        match result {
            Some(Ok(ParseResult::GGA(Some(gga)))) => Ok(RawSentence {
                quality: quality_from_nmea(&gga.gps_quality),
                latitude: gga.latitude.as_f64(),
                longitude: gga.longitude.as_f64(),
                satellites: Some(gga.sat_in_use),
                altitude_m: Some(gga.altitude.meters),
            }),
            // GGA sentences without a position are reported by the receiver before it has a fix
            Some(Ok(ParseResult::GGA(None))) => Ok(RawSentence {
                quality: FixQuality::NoFix,
                latitude: 0.0,
                longitude: 0.0,
                satellites: None,
                altitude_m: None,
            }),
            Some(Ok(_)) => Err(ParseError::Malformed(String::from(
                "expected a GGA sentence",
            ))),
            Some(Err(e)) => Err(ParseError::Malformed(String::from(e))),
            None => Err(ParseError::Malformed(String::from("incomplete sentence"))),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn quality_from_nmea(quality: &GPSQuality) -> FixQuality {
    match quality {
        GPSQuality::NoFix => FixQuality::NoFix,
        GPSQuality::GPS => FixQuality::GpsFix,
        GPSQuality::DGPS => FixQuality::DgpsFix,
        _ => FixQuality::Other,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_gps_fix() {
        let mut parser = GgaParser::new();

        let s = parser
            .parse("$GPGGA,123519,5600.000,N,05400.000,E,1,08,0.9,545.4,M,46.9,M,,*47")
            .unwrap();

        assert_eq!(s.quality, FixQuality::GpsFix);
        assert!((s.latitude - 56.0).abs() < 1e-6);
        assert!((s.longitude - 54.0).abs() < 1e-6);
        assert_eq!(s.satellites, Some(8));
        assert_eq!(s.altitude_m, Some(545.4));
        assert!(s.has_valid_fix());
    }

    #[test]
    fn test_parse_dgps_southern_hemisphere() {
        let mut parser = GgaParser::new();

        let s = parser
            .parse("$GPGGA,123522,5606.031,N,05414.022,E,2,10,0.8,120.0,M,10.0,M,,*4C")
            .unwrap();
        assert_eq!(s.quality, FixQuality::DgpsFix);
        assert!((s.latitude - 56.100517).abs() < 1e-5);
        assert!((s.longitude - 54.233700).abs() < 1e-5);

        let s = parser
            .parse("$GPGGA,123523,3356.000,S,15112.000,E,1,07,1.1,20.0,M,20.0,M,,*69")
            .unwrap();
        assert!((s.latitude + 33.933333).abs() < 1e-5);
        assert!((s.longitude - 151.2).abs() < 1e-5);
    }

    #[test]
    fn test_parse_no_fix() {
        let mut parser = GgaParser::new();

        let s = parser
            .parse("$GPGGA,123520,5600.000,N,05400.000,E,0,00,0.9,545.4,M,46.9,M,,*44")
            .unwrap();
        assert_eq!(s.quality, FixQuality::NoFix);
        assert!(!s.has_valid_fix());

        // Receivers without a fix may leave the position empty
        let s = parser.parse("$GPGGA,123521,,,,,0,00,99.99,,,,,,*4E").unwrap();
        assert_eq!(s.quality, FixQuality::NoFix);
        assert_eq!(s.latitude, 0.0);
        assert_eq!(s.longitude, 0.0);
        assert!(!s.has_valid_fix());
    }

    #[test]
    fn test_parse_errors_are_recoverable() {
        let mut parser = GgaParser::new();

        // Checksum mismatch
        assert!(matches!(
            parser.parse("$GPGGA,123519,5600.000,N,05400.000,E,1,08,0.9,545.4,M,46.9,M,,*00"),
            Err(ParseError::Malformed(_))
        ));

        // Not a GGA sentence
        assert!(matches!(
            parser.parse("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A"),
            Err(ParseError::Malformed(_))
        ));

        // Garbage
        assert!(matches!(
            parser.parse("$GPGGA,garbage"),
            Err(ParseError::Malformed(_))
        ));

        // The parser still works after errors
        assert!(parser
            .parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47")
            .is_ok());
    }
}
