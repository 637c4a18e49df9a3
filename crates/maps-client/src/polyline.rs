//! Encoded polyline format
//!
//! Paths are encoded as deltas of coordinates scaled by 1e5, zig-zag signed,
//! split into 5-bit chunks and offset into printable ASCII.

use crate::{types::Coordinate, Error, Result};

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: i64 = 63;

/// Decode an encoded polyline into coordinates
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut latitude = 0i64;
    let mut longitude = 0i64;
    let mut path = Vec::new();

    while index < bytes.len() {
        latitude += next_value(bytes, &mut index)?;
        longitude += next_value(bytes, &mut index)?;
        path.push(Coordinate::new(
            latitude as f64 / PRECISION,
            longitude as f64 / PRECISION,
        ));
    }

    Ok(path)
}

/// Encode coordinates as a polyline
pub fn encode(path: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut previous = (0i64, 0i64);

    for point in path {
        let latitude = (point.latitude * PRECISION).round() as i64;
        let longitude = (point.longitude * PRECISION).round() as i64;
        push_value(&mut out, latitude - previous.0);
        push_value(&mut out, longitude - previous.1);
        previous = (latitude, longitude);
    }

    out
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| Error::InvalidInput("polyline ends mid-value".to_string()))?;
        *index += 1;

        let chunk = byte as i64 - ASCII_OFFSET;
        if !(0..64).contains(&chunk) || shift > 60 {
            return Err(Error::InvalidInput(format!(
                "invalid polyline byte {:?} at {}",
                byte as char,
                *index - 1
            )));
        }

        result |= (chunk & 0x1f) << shift;
        shift += CHUNK_BITS;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(out: &mut String, value: i64) {
    let mut v = value << 1;
    if value < 0 {
        v = !v;
    }
    while v >= CONTINUATION {
        out.push((((v & 0x1f) | CONTINUATION) + ASCII_OFFSET) as u8 as char);
        v >>= CHUNK_BITS;
    }
    out.push((v + ASCII_OFFSET) as u8 as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn close(a: Coordinate, lat: f64, lon: f64) -> bool {
        (a.latitude - lat).abs() < 1e-9 && (a.longitude - lon).abs() < 1e-9
    }

    #[test]
    fn test_decode_reference_polyline() {
        let path = decode(REFERENCE).unwrap();
        assert_eq!(path.len(), 3);
        assert!(close(path[0], 38.5, -120.2));
        assert!(close(path[1], 40.7, -120.95));
        assert!(close(path[2], 43.252, -126.453));
    }

    #[test]
    fn test_encode_reference_polyline() {
        let path = vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ];
        assert_eq!(encode(&path), REFERENCE);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        // Latitude without its longitude
        assert!(decode("_p~iF").is_err());
    }

    #[test]
    fn test_decode_rejects_control_bytes() {
        assert!(decode("\n\n").is_err());
    }
}
