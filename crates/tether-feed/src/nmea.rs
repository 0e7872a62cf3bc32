use time::OffsetDateTime;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use tether_geo::Coordinate;

use crate::{FeedConfig, FeedError};

/// One delivered fix: where, how good, and when.
#[derive(Debug, Clone)]
pub struct Position {
    pub coordinate: Coordinate,
    pub sats: u8,
    pub hdop: f32,
    pub ts: OffsetDateTime,
}

#[derive(Debug)]
enum LineReader {
    Serial(BufReader<SerialStream>),
    File(BufReader<File>),
}

/// NMEA position source. GGA carries sats/hdop, RMC carries lat/lon;
/// the last GGA is held until the next RMC completes a fix.
#[derive(Debug)]
pub struct NmeaSource {
    reader: LineReader,
    last_gga: Option<(u8, f32)>,
}

impl NmeaSource {
    /// Opens the configured source. This is the explicit permission step:
    /// an OS denial on the device node comes back as `PermissionDenied`
    /// and no reader is created.
    pub fn open(cfg: &FeedConfig) -> Result<Self, FeedError> {
        match cfg.source.as_str() {
            "nmea-serial" => {
                let dev = cfg
                    .nmea_device
                    .as_deref()
                    .ok_or_else(|| FeedError::UnsupportedSource("nmea_device missing".into()))?;
                Self::serial(dev)
            }
            "nmea-file" => {
                let path = cfg
                    .nmea_file
                    .as_deref()
                    .ok_or_else(|| FeedError::UnsupportedSource("nmea_file missing".into()))?;
                Self::file(path)
            }
            other => Err(FeedError::UnsupportedSource(other.to_string())),
        }
    }

    pub fn serial(dev: &str) -> Result<Self, FeedError> {
        match tokio_serial::new(dev, 115200).open_native_async() {
            Ok(port) => Ok(Self {
                reader: LineReader::Serial(BufReader::new(port)),
                last_gga: None,
            }),
            Err(e) => {
                if matches!(
                    e.kind(),
                    tokio_serial::ErrorKind::Io(std::io::ErrorKind::PermissionDenied)
                ) {
                    return Err(FeedError::PermissionDenied(dev.to_string()));
                }
                Err(FeedError::Serial(e))
            }
        }
    }

    pub fn file(path: &str) -> Result<Self, FeedError> {
        let f = std::fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                FeedError::PermissionDenied(path.to_string())
            } else {
                FeedError::Io(e)
            }
        })?;
        Ok(Self {
            reader: LineReader::File(BufReader::new(File::from_std(f))),
            last_gga: None,
        })
    }

    pub async fn next_position(&mut self) -> Result<Position, FeedError> {
        let mut line = String::new();
        loop {
            line.clear();
            match &mut self.reader {
                LineReader::Serial(r) => {
                    r.read_line(&mut line).await?;
                }
                LineReader::File(r) => {
                    let n = r.read_line(&mut line).await?;
                    if n == 0 {
                        // replay file: idle at EOF, then loop
                        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                        continue;
                    }
                }
            }
            match parse_sentence(line.trim()) {
                Some(Sentence::Gga { sats, hdop }) => {
                    self.last_gga = Some((sats, hdop));
                }
                Some(Sentence::Rmc { lat, lon }) => {
                    let (sats, hdop) = self.last_gga.unwrap_or((0, 99.9));
                    return Ok(Position {
                        coordinate: Coordinate::new(lat, lon),
                        sats,
                        hdop,
                        ts: OffsetDateTime::now_utc(),
                    });
                }
                None => {}
            }
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Sentence {
    Gga { sats: u8, hdop: f32 },
    Rmc { lat: f64, lon: f64 },
}

pub(crate) fn parse_sentence(s: &str) -> Option<Sentence> {
    if s.starts_with("$GNGGA") || s.starts_with("$GPGGA") {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() > 9 {
            let sats: u8 = parts[7].parse().unwrap_or(0);
            let hdop: f32 = parts[8].parse().unwrap_or(99.9);
            return Some(Sentence::Gga { sats, hdop });
        }
        return None;
    }

    if s.starts_with("$GNRMC") || s.starts_with("$GPRMC") {
        let parts: Vec<&str> = s.split(',').collect();
        // parts[2]=status A/V, parts[3]=lat ddmm.mmmm, parts[4]=N/S,
        // parts[5]=lon dddmm.mmmm, parts[6]=E/W
        if parts.len() > 6 {
            if parts[2] != "A" {
                return None;
            }
            let lat = parse_deg_min(parts[3], parts[4])?;
            let lon = parse_deg_min(parts[5], parts[6])?;
            return Some(Sentence::Rmc { lat, lon });
        }
    }

    None
}

fn parse_deg_min(v: &str, hemi: &str) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    // lat is ddmm.mmmm, lon is dddmm.mmmm
    let dot = v.find('.')?;
    let deg_len = if dot > 4 { 3 } else { 2 };
    let deg: f64 = v[..deg_len].parse().ok()?;
    let min: f64 = v[deg_len..].parse().ok()?;
    let mut out = deg + min / 60.0;
    if hemi == "S" || hemi == "W" {
        out = -out;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gga_quality() {
        let s = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
        assert_eq!(parse_sentence(s), Some(Sentence::Gga { sats: 8, hdop: 0.9 }));
    }

    #[test]
    fn parses_rmc_coordinates() {
        let s = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
        let Some(Sentence::Rmc { lat, lon }) = parse_sentence(s) else {
            panic!("expected RMC");
        };
        assert!((lat - 48.1173).abs() < 1e-4, "lat {lat}");
        assert!((lon - 11.5167).abs() < 1e-4, "lon {lon}");
    }

    #[test]
    fn southern_and_western_hemispheres_are_negative() {
        let s = "$GPRMC,081836,A,3751.650,S,14507.360,E,000.0,360.0,130998,011.3,E*62";
        let Some(Sentence::Rmc { lat, lon }) = parse_sentence(s) else {
            panic!("expected RMC");
        };
        assert!(lat < 0.0);
        assert!(lon > 0.0);

        let s = "$GPRMC,123519,A,3747.295,N,12226.094,W,0.0,0.0,230394,,*00";
        let Some(Sentence::Rmc { lon, .. }) = parse_sentence(s) else {
            panic!("expected RMC");
        };
        assert!(lon < 0.0);
    }

    #[test]
    fn unrelated_or_truncated_sentences_are_skipped() {
        assert_eq!(parse_sentence("$GPVTG,054.7,T,,M,005.5,N,010.2,K*48"), None);
        assert_eq!(parse_sentence("$GPRMC,123519,A"), None);
        assert_eq!(parse_sentence(""), None);
    }

    #[test]
    fn rmc_with_empty_fields_is_skipped() {
        // no fix yet: lat/lon fields empty
        assert_eq!(parse_sentence("$GPRMC,123519,V,,,,,,,230394,,*00"), None);
    }

    #[test]
    fn void_rmc_is_skipped_even_with_coordinates() {
        // status V: receiver flags the fix invalid, stale lat/lon may remain
        let s = "$GPRMC,123519,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
        assert_eq!(parse_sentence(s), None);
    }
}
