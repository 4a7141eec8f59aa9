//! Delta-encoded polyline codec.
//!
//! Routing providers return route geometry as a compact string: every
//! coordinate component is stored as the difference from the previous
//! point's value in the same channel, scaled to an integer and written as a
//! variable-length integer of 5-bit printable characters.
//!
//! # Wire Format
//!
//! Per point the channels appear in the order latitude, longitude and, for
//! 3-D polylines, elevation. Decoded points are returned as
//! `(lon, lat, elevation)` triples, matching GeoJSON axis order.
//!
//! | Channel   | Scale  |
//! |-----------|--------|
//! | latitude  | 1e-5   |
//! | longitude | 1e-5   |
//! | elevation | 1e-2   |
//!
//! A string that ends in the middle of a value or a point is not an error:
//! the incomplete trailing point is dropped.

use thiserror::Error;

use crate::coord::GeoPoint;

/// Scale of the latitude and longitude channels.
pub const COORD_SCALE: f64 = 1e-5;

/// Scale of the elevation channel.
pub const ELEVATION_SCALE: f64 = 1e-2;

/// Offset added to each 5-bit chunk to make it printable.
const CHAR_OFFSET: u8 = 63;

/// Continuation flag set on every chunk except the last of a value.
const CONTINUATION: i64 = 0x20;

/// Payload bits carried per character.
const CHUNK_MASK: i64 = 0x1f;

/// Longest shift accepted before a value is considered corrupt.
const MAX_SHIFT: u32 = 60;

/// Errors raised by the polyline codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylineError {
    /// A character outside the encoding alphabet was found.
    #[error("Invalid polyline character {character:?} at byte {position}")]
    InvalidCharacter { position: usize, character: char },

    /// A value, or a channel's running total, does not fit in an i64.
    #[error("Polyline value starting at byte {position} overflows")]
    Overflow { position: usize },

    /// A value cannot be represented at the channel's scale.
    #[error("Value {0} is not finite or exceeds the encodable range")]
    Unencodable(f64),
}

/// Decodes a 3-D polyline into `(lon, lat, elevation)` triples.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64, f64)>, PolylineError> {
    let totals = decode_channels::<3>(encoded)?;

    Ok(totals
        .into_iter()
        .map(|[lat, lon, ele]| {
            (
                lon as f64 * COORD_SCALE,
                lat as f64 * COORD_SCALE,
                ele as f64 * ELEVATION_SCALE,
            )
        })
        .collect())
}

/// Decodes a 2-D polyline into `(lon, lat)` pairs.
pub fn decode_2d(encoded: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let totals = decode_channels::<2>(encoded)?;

    Ok(totals
        .into_iter()
        .map(|[lat, lon]| (lon as f64 * COORD_SCALE, lat as f64 * COORD_SCALE))
        .collect())
}

/// Decodes a polyline straight into [`GeoPoint`]s.
///
/// When `has_elevation` is false the points carry no elevation.
pub fn decode_points(encoded: &str, has_elevation: bool) -> Result<Vec<GeoPoint>, PolylineError> {
    if has_elevation {
        Ok(decode(encoded)?
            .into_iter()
            .map(|(lon, lat, ele)| GeoPoint::new(lat, lon).with_elevation(ele))
            .collect())
    } else {
        Ok(decode_2d(encoded)?
            .into_iter()
            .map(|(lon, lat)| GeoPoint::new(lat, lon))
            .collect())
    }
}

/// Encodes `(lon, lat, elevation)` triples as a 3-D polyline.
pub fn encode(points: &[(f64, f64, f64)]) -> Result<String, PolylineError> {
    let mut out = String::new();
    let mut previous = [0i64; 3];

    for &(lon, lat, ele) in points {
        let current = [
            to_fixed(lat, COORD_SCALE)?,
            to_fixed(lon, COORD_SCALE)?,
            to_fixed(ele, ELEVATION_SCALE)?,
        ];
        for channel in 0..3 {
            write_value(current[channel] - previous[channel], &mut out);
        }
        previous = current;
    }

    Ok(out)
}

/// Encodes `(lon, lat)` pairs as a 2-D polyline.
pub fn encode_2d(points: &[(f64, f64)]) -> Result<String, PolylineError> {
    let mut out = String::new();
    let mut previous = [0i64; 2];

    for &(lon, lat) in points {
        let current = [to_fixed(lat, COORD_SCALE)?, to_fixed(lon, COORD_SCALE)?];
        for channel in 0..2 {
            write_value(current[channel] - previous[channel], &mut out);
        }
        previous = current;
    }

    Ok(out)
}

/// Reads complete points of `N` channels, returning each point's running
/// totals in wire order.
fn decode_channels<const N: usize>(encoded: &str) -> Result<Vec<[i64; N]>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut totals = [0i64; N];
    let mut points = Vec::with_capacity(bytes.len() / (N * 2));

    'points: while index < bytes.len() {
        let point_start = index;
        let mut deltas = [0i64; N];
        for delta in deltas.iter_mut() {
            match read_value(bytes, &mut index)? {
                Some(value) => *delta = value,
                None => break 'points,
            }
        }

        for (total, delta) in totals.iter_mut().zip(deltas) {
            *total = total
                .checked_add(delta)
                .ok_or(PolylineError::Overflow {
                    position: point_start,
                })?;
        }
        points.push(totals);
    }

    Ok(points)
}

/// Reads one signed varint starting at `index`.
///
/// Returns `Ok(None)` when the input ends before the value is complete.
fn read_value(bytes: &[u8], index: &mut usize) -> Result<Option<i64>, PolylineError> {
    let start = *index;
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Ok(None);
        };
        if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                position: *index,
                character: byte as char,
            });
        }
        *index += 1;

        let chunk = (byte - CHAR_OFFSET) as i64;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk < CONTINUATION {
            break;
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { position: start });
        }
    }

    // Odd values are one's-complemented negatives
    let value = if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok(Some(value))
}

/// Appends one signed varint to `out`.
fn write_value(value: i64, out: &mut String) {
    let mut bits = if value < 0 { !(value << 1) } else { value << 1 };

    while bits >= CONTINUATION {
        out.push(((CONTINUATION | (bits & CHUNK_MASK)) as u8 + CHAR_OFFSET) as char);
        bits >>= 5;
    }
    out.push((bits as u8 + CHAR_OFFSET) as char);
}

fn to_fixed(value: f64, scale: f64) -> Result<i64, PolylineError> {
    let scaled = (value / scale).round();
    // Keep well inside i64 so deltas between points cannot overflow
    if !scaled.is_finite() || scaled.abs() > (1i64 << 52) as f64 {
        return Err(PolylineError::Unencodable(value));
    }
    Ok(scaled as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_reference_2d_polyline() {
        // Well-known example: (38.5, -120.2), (40.7, -120.95), (43.252, -126.453)
        let points = decode_2d("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();

        assert_eq!(points.len(), 3);
        let expected = [(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)];
        for ((lon, lat), (exp_lon, exp_lat)) in points.iter().zip(expected) {
            assert!((lon - exp_lon).abs() < 1e-9);
            assert!((lat - exp_lat).abs() < 1e-9);
        }
    }

    #[test]
    fn test_encode_reference_2d_polyline() {
        let encoded =
            encode_2d(&[(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)]).unwrap();
        assert_eq!(encoded, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn test_channels_accumulate_independently() {
        let original = vec![
            (11.5820, 48.1351, 519.0),
            (11.5900, 48.1400, 530.25),
            (11.5850, 48.1300, 505.5),
        ];

        let decoded = decode(&encode(&original).unwrap()).unwrap();

        assert_eq!(decoded.len(), 3);
        // Third point is reached through two deltas per channel, not from zero
        assert!((decoded[2].0 - 11.5850).abs() < 1e-9);
        assert!((decoded[2].1 - 48.1300).abs() < 1e-9);
        assert!((decoded[2].2 - 505.5).abs() < 1e-9);
    }

    #[test]
    fn test_negative_elevation() {
        let original = vec![(35.5, 31.5, -420.37), (35.6, 31.6, -380.0)];
        let decoded = decode(&encode(&original).unwrap()).unwrap();

        assert!((decoded[0].2 - -420.37).abs() < 1e-9);
        assert!((decoded[1].2 - -380.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_decodes_to_nothing() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode_2d("").unwrap().is_empty());
    }

    #[test]
    fn test_truncated_value_drops_trailing_point() {
        let encoded = encode(&[(1.0, 2.0, 3.0), (4.0, 5.0, 6.0)]).unwrap();

        // Chop the final character: the last elevation value is incomplete
        let truncated = &encoded[..encoded.len() - 1];
        let decoded = decode(truncated).unwrap();

        assert_eq!(decoded.len(), 1);
        assert!((decoded[0].0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncated_point_drops_missing_channels() {
        let one_point = encode(&[(1.0, 2.0, 3.0)]).unwrap();
        let lat_lon_only = encode_2d(&[(7.0, 8.0)]).unwrap();

        // A full 3-D point followed by a point lacking its elevation
        let input = format!("{}{}", one_point, lat_lon_only);
        let decoded = decode(&input).unwrap();

        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn test_invalid_character() {
        let result = decode("_p~iF ~ps|U");
        assert_eq!(
            result,
            Err(PolylineError::InvalidCharacter {
                position: 5,
                character: ' '
            })
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        // Continuation characters only, never terminating within 64 bits
        let input = "~".repeat(20);
        assert_eq!(
            decode(&input),
            Err(PolylineError::Overflow { position: 0 })
        );
    }

    #[test]
    fn test_running_total_overflow_is_reported() {
        // Each 13-character value decodes to 2^61 - 1; the fifth point's
        // latitude total no longer fits
        let value = format!("}}{}B", "~".repeat(11));
        let input = value.repeat(15);

        assert_eq!(
            decode(&input),
            Err(PolylineError::Overflow { position: 4 * 3 * 13 })
        );
        assert!(matches!(
            decode_2d(&input),
            Err(PolylineError::Overflow { .. })
        ));
    }

    #[test]
    fn test_unencodable_value() {
        assert!(matches!(
            encode(&[(f64::NAN, 0.0, 0.0)]),
            Err(PolylineError::Unencodable(_))
        ));
    }

    #[test]
    fn test_decode_points_with_and_without_elevation() {
        let encoded_3d = encode(&[(11.0, 48.0, 500.0)]).unwrap();
        let points = decode_points(&encoded_3d, true).unwrap();
        assert_eq!(points[0].elevation, Some(500.0));
        assert!((points[0].lat - 48.0).abs() < 1e-9);

        let encoded_2d = encode_2d(&[(11.0, 48.0)]).unwrap();
        let points = decode_points(&encoded_2d, false).unwrap();
        assert_eq!(points[0].elevation, None);
        assert!((points[0].lon - 11.0).abs() < 1e-9);
    }

    proptest! {
        /// Property: decoding an encoded sequence recovers every value within
        /// its channel's scale.
        #[test]
        fn prop_round_trip_within_scale(
            points in prop::collection::vec(
                (-180.0f64..180.0, -90.0f64..90.0, -500.0f64..9000.0),
                0..64,
            )
        ) {
            let decoded = decode(&encode(&points).unwrap()).unwrap();

            prop_assert_eq!(decoded.len(), points.len());
            for (got, want) in decoded.iter().zip(points.iter()) {
                prop_assert!((got.0 - want.0).abs() <= 1e-5);
                prop_assert!((got.1 - want.1).abs() <= 1e-5);
                prop_assert!((got.2 - want.2).abs() <= 1e-2);
            }
        }
    }
}
