//! Field validators for the reporting form.
//!
//! Every function here is pure: it looks at the raw submission (and, where a
//! rule needs it, a previously accepted field) and either returns the
//! normalized value to store or the reason for rejection. Nothing in this
//! module touches a session.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::errors::{DomainResult, ValidationError};
use super::models::{Coordinates, ImageInput, LocationFix, Period, PhotoEvidence};

/// Reference points that show up when a device reports a spoofed location.
pub const DENYLISTED_COORDINATES: [(f64, f64); 6] = [
    (0.0, 0.0),
    (-6.2088, 106.8456),   // Jakarta
    (-6.9175, 107.6191),   // Bandung
    (37.7749, -122.4194),  // San Francisco
    (40.7128, -74.0060),   // New York
    (51.5074, -0.1278),    // London
];
pub const DENYLIST_TOLERANCE: f64 = 0.0001;

pub const REGION_LATITUDE: (f64, f64) = (-11.0, 6.0);
pub const REGION_LONGITUDE: (f64, f64) = (95.0, 141.0);
pub const MIN_COORDINATE_DECIMALS: usize = 4;

pub const MIN_PHOTO_BYTES: u64 = 30_000;
/// 4:3, 3:4, 16:9 and 9:16 expressed as width / height.
pub const CAMERA_ASPECT_RATIOS: [f64; 4] = [0.75, 1.33, 1.78, 0.56];
pub const ASPECT_RATIO_TOLERANCE: f64 = 0.1;
pub const MAX_PHOTO_DELAY_SECS: i64 = 300;
pub const MIN_PHOTO_SIDE: u32 = 240;
pub const BYTES_PER_PIXEL_RANGE: (f64, f64) = (0.05, 8.0);

/// Accepts a full name written in title case, e.g. `Budi Santoso`.
pub fn validate_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if name.chars().count() < 3 {
        return Err(ValidationError::NameTooShort);
    }
    if !name.chars().all(|c| c == ' ' || c.is_alphabetic()) {
        return Err(ValidationError::NameInvalidCharacters);
    }
    // Scripts without letter case have neither and pass.
    let has_upper = name.chars().any(char::is_uppercase);
    let has_lower = name.chars().any(char::is_lowercase);
    if has_upper != has_lower {
        return Err(ValidationError::NameCase);
    }
    Ok(name.to_string())
}

/// Accepts an employee ID of 8 to 20 letters, digits and spaces.
pub fn validate_id_number(raw: &str) -> DomainResult<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ValidationError::IdNumberEmpty);
    }
    let len = id.chars().count();
    if !(8..=20).contains(&len) {
        return Err(ValidationError::IdNumberLength);
    }
    if !id.chars().filter(|c| *c != ' ').all(char::is_alphanumeric) {
        return Err(ValidationError::IdNumberInvalidCharacters);
    }
    Ok(id.to_string())
}

/// Accepts any non-blank free text (destination, agenda).
pub fn validate_free_text(raw: &str) -> DomainResult<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(text.to_string())
}

/// Closes the date range; `end` may equal `start` but not precede it.
pub fn validate_period_end(start: NaiveDate, end: NaiveDate) -> DomainResult<Period> {
    if end < start {
        return Err(ValidationError::EndBeforeStart { start });
    }
    Ok(Period { start, end })
}

/// Runs the anti-spoofing checks on a reported location. The first failing
/// rule wins.
pub fn validate_location(latitude: f64, longitude: f64, now: NaiveDateTime) -> DomainResult<LocationFix> {
    if latitude == 0.0 && longitude == 0.0 {
        return Err(ValidationError::NullIsland);
    }

    let denylisted = DENYLISTED_COORDINATES.iter().any(|(lat, lon)| {
        (latitude - lat).abs() < DENYLIST_TOLERANCE && (longitude - lon).abs() < DENYLIST_TOLERANCE
    });
    if denylisted {
        return Err(ValidationError::DenylistedCoordinate);
    }

    let in_region = (REGION_LATITUDE.0..=REGION_LATITUDE.1).contains(&latitude)
        && (REGION_LONGITUDE.0..=REGION_LONGITUDE.1).contains(&longitude);
    if !in_region {
        return Err(ValidationError::OutsideRegion);
    }

    if decimal_places(latitude) < MIN_COORDINATE_DECIMALS || decimal_places(longitude) < MIN_COORDINATE_DECIMALS {
        return Err(ValidationError::ImpreciseCoordinate);
    }

    Ok(LocationFix {
        coordinates: Coordinates::new(latitude, longitude),
        captured_at: now,
    })
}

/// Number of digits after the decimal point in the shortest round-trip
/// rendering of `value`.
pub fn decimal_places(value: f64) -> usize {
    value
        .to_string()
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}

/// Runs the anti-fraud checks on an inbound photo. `location_at` is the
/// moment the location was accepted.
pub fn validate_photo(image: &ImageInput, location_at: NaiveDateTime, now: NaiveDateTime) -> DomainResult<PhotoEvidence> {
    if image.is_document {
        return Err(ValidationError::PhotoIsDocument);
    }

    let size = image.size_bytes.filter(|s| *s > 0);
    let dimensions = match (image.width, image.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    };

    if let Some(size) = size {
        if size < MIN_PHOTO_BYTES {
            return Err(ValidationError::PhotoTooSmall { size });
        }
    }

    if let Some((w, h)) = dimensions {
        let ratio = w as f64 / h as f64;
        let camera_like = CAMERA_ASPECT_RATIOS
            .iter()
            .any(|reference| (ratio - reference).abs() < ASPECT_RATIO_TOLERANCE);
        if !camera_like {
            return Err(ValidationError::AspectRatio { ratio });
        }
    }

    let elapsed = now - location_at;
    if elapsed > Duration::seconds(MAX_PHOTO_DELAY_SECS) {
        // Rounded up so a late photo never reports the limit itself.
        let elapsed_secs = (elapsed.num_milliseconds() + 999).div_euclid(1000);
        return Err(ValidationError::PhotoStale { elapsed_secs });
    }

    if let Some((width, height)) = dimensions {
        if width < MIN_PHOTO_SIDE || height < MIN_PHOTO_SIDE {
            return Err(ValidationError::ResolutionTooLow { width, height });
        }
    }

    if let (Some(size), Some((w, h))) = (size, dimensions) {
        let bytes_per_pixel = size as f64 / (w as f64 * h as f64);
        let (floor, ceiling) = BYTES_PER_PIXEL_RANGE;
        if !(floor..=ceiling).contains(&bytes_per_pixel) {
            return Err(ValidationError::BytesPerPixel { bytes_per_pixel });
        }
    }

    Ok(PhotoEvidence {
        reference: image.reference.clone(),
        captured_at: now,
        size_bytes: size,
        width: dimensions.map(|(w, _)| w),
        height: dimensions.map(|(_, h)| h),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    fn camera_photo() -> ImageInput {
        ImageInput {
            reference: "AgACAgUAAxkBAAI".to_string(),
            size_bytes: Some(900_000),
            width: Some(1200),
            height: Some(1600),
            is_document: false,
        }
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("Budi Santoso"), Ok("Budi Santoso".to_string()));
        assert_eq!(validate_name("  Siti Aminah  "), Ok("Siti Aminah".to_string()));
        assert_eq!(validate_name("   "), Err(ValidationError::NameEmpty));
        assert_eq!(validate_name("bo"), Err(ValidationError::NameTooShort));
        assert_eq!(validate_name("Budi123"), Err(ValidationError::NameInvalidCharacters));
        assert_eq!(validate_name("Budi-Santoso"), Err(ValidationError::NameInvalidCharacters));
        assert_eq!(validate_name("BUDI"), Err(ValidationError::NameCase));
        assert_eq!(validate_name("budi santoso"), Err(ValidationError::NameCase));
        assert_eq!(validate_name("李小龍"), Ok("李小龍".to_string()));
        assert_eq!(validate_name("Ван Лі"), Ok("Ван Лі".to_string()));
        assert_eq!(validate_name("ВАН ЛІ"), Err(ValidationError::NameCase));
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        assert_eq!(validate_name("Zoë"), Ok("Zoë".to_string()));
        assert_eq!(validate_name("Éa"), Err(ValidationError::NameTooShort));
    }

    #[test]
    fn test_id_number_rules() {
        assert_eq!(validate_id_number("123456789012"), Ok("123456789012".to_string()));
        assert_eq!(validate_id_number("1980 0101 2005"), Ok("1980 0101 2005".to_string()));
        assert_eq!(validate_id_number("NRP12345"), Ok("NRP12345".to_string()));
        assert_eq!(validate_id_number(""), Err(ValidationError::IdNumberEmpty));
        assert_eq!(validate_id_number("1234567"), Err(ValidationError::IdNumberLength));
        assert_eq!(validate_id_number("123456789012345678901"), Err(ValidationError::IdNumberLength));
        assert_eq!(validate_id_number("1234-5678"), Err(ValidationError::IdNumberInvalidCharacters));
    }

    #[test]
    fn test_free_text_rejects_blank() {
        assert_eq!(validate_free_text(" Makassar "), Ok("Makassar".to_string()));
        assert_eq!(validate_free_text(" \n "), Err(ValidationError::EmptyText));
    }

    #[test]
    fn test_period_end_not_before_start() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        assert_eq!(validate_period_end(start, end).unwrap().days(), 3);
        assert_eq!(validate_period_end(start, start).unwrap().days(), 1);
        assert_eq!(
            validate_period_end(end, start),
            Err(ValidationError::EndBeforeStart { start: end })
        );
    }

    #[test]
    fn test_location_accepts_precise_in_region_fix() {
        let fix = validate_location(-6.512345, 110.045678, at(9, 0, 0)).unwrap();
        assert_eq!(fix.coordinates, Coordinates::new(-6.512345, 110.045678));
        assert_eq!(fix.captured_at, at(9, 0, 0));

        assert!(validate_location(-5.0001, 120.123456, at(9, 0, 0)).is_ok());
    }

    #[test]
    fn test_location_rule_order() {
        let now = at(9, 0, 0);
        assert_eq!(validate_location(0.0, 0.0, now), Err(ValidationError::NullIsland));
        assert_eq!(
            validate_location(-6.20885, 106.84555, now),
            Err(ValidationError::DenylistedCoordinate)
        );
        assert_eq!(
            validate_location(-6.2088, 106.8456, now),
            Err(ValidationError::DenylistedCoordinate)
        );
        // New York is denylisted, which is checked before the region.
        assert_eq!(
            validate_location(40.7128, -74.0060, now),
            Err(ValidationError::DenylistedCoordinate)
        );
        assert_eq!(validate_location(10.0, 120.0, now), Err(ValidationError::OutsideRegion));
        assert_eq!(validate_location(10.123456, 120.123456, now), Err(ValidationError::OutsideRegion));
        assert_eq!(validate_location(-6.5, 110.0, now), Err(ValidationError::ImpreciseCoordinate));
        assert_eq!(validate_location(-5.0, 120.123456, now), Err(ValidationError::ImpreciseCoordinate));
        assert_eq!(validate_location(-6.123, 110.4567, now), Err(ValidationError::ImpreciseCoordinate));
    }

    #[test]
    fn test_location_near_region_edges() {
        assert!(validate_location(5.9999, 140.9999, at(9, 0, 0)).is_ok());
        assert!(validate_location(-10.9999, 95.0001, at(9, 0, 0)).is_ok());
        assert_eq!(
            validate_location(6.0001, 120.1234, at(9, 0, 0)),
            Err(ValidationError::OutsideRegion)
        );
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places(110.0), 0);
        assert_eq!(decimal_places(-6.5), 1);
        assert_eq!(decimal_places(106.8456), 4);
        assert_eq!(decimal_places(-6.123456), 6);
    }

    #[test]
    fn test_photo_accepted_records_metadata() {
        let photo = validate_photo(&camera_photo(), at(9, 0, 0), at(9, 2, 0)).unwrap();
        assert_eq!(photo.reference, "AgACAgUAAxkBAAI");
        assert_eq!(photo.captured_at, at(9, 2, 0));
        assert_eq!(photo.size_bytes, Some(900_000));
        assert_eq!(photo.resolution(), Some("1200x1600".to_string()));
    }

    #[test]
    fn test_photo_rules() {
        let location_at = at(9, 0, 0);
        let now = at(9, 1, 0);

        let document = ImageInput { is_document: true, ..camera_photo() };
        assert_eq!(validate_photo(&document, location_at, now), Err(ValidationError::PhotoIsDocument));

        let tiny = ImageInput { size_bytes: Some(20_000), ..camera_photo() };
        assert_eq!(
            validate_photo(&tiny, location_at, now),
            Err(ValidationError::PhotoTooSmall { size: 20_000 })
        );

        let square = ImageInput { width: Some(1000), height: Some(1000), ..camera_photo() };
        assert!(matches!(
            validate_photo(&square, location_at, now),
            Err(ValidationError::AspectRatio { .. })
        ));

        let low_res = ImageInput { width: Some(180), height: Some(240), ..camera_photo() };
        assert_eq!(
            validate_photo(&low_res, location_at, now),
            Err(ValidationError::ResolutionTooLow { width: 180, height: 240 })
        );

        let oversized = ImageInput {
            size_bytes: Some(500_000),
            width: Some(3000),
            height: Some(4000),
            ..camera_photo()
        };
        assert!(matches!(
            validate_photo(&oversized, location_at, now),
            Err(ValidationError::BytesPerPixel { .. })
        ));
    }

    #[test]
    fn test_photo_must_follow_location_within_five_minutes() {
        let location_at = at(9, 0, 0);
        assert!(validate_photo(&camera_photo(), location_at, at(9, 5, 0)).is_ok());
        assert_eq!(
            validate_photo(&camera_photo(), location_at, at(9, 5, 1)),
            Err(ValidationError::PhotoStale { elapsed_secs: 301 })
        );
    }

    #[test]
    fn test_photo_delay_counts_fractions_of_a_second() {
        let location_at = at(9, 0, 0);
        let limit = at(9, 5, 0);
        assert!(validate_photo(&camera_photo(), location_at, limit).is_ok());
        assert_eq!(
            validate_photo(&camera_photo(), location_at, limit + Duration::milliseconds(1)),
            Err(ValidationError::PhotoStale { elapsed_secs: 301 })
        );
        assert_eq!(
            validate_photo(&camera_photo(), location_at, limit + Duration::milliseconds(900)),
            Err(ValidationError::PhotoStale { elapsed_secs: 301 })
        );
    }

    #[test]
    fn test_bytes_per_pixel_bounds_are_inclusive() {
        let location_at = at(9, 0, 0);
        let pixels: u64 = 1200 * 1600;
        let with_size = |size| ImageInput { size_bytes: Some(size), ..camera_photo() };

        assert!(validate_photo(&with_size(pixels / 20), location_at, location_at).is_ok());
        assert!(validate_photo(&with_size(pixels * 8), location_at, location_at).is_ok());
        assert!(validate_photo(&with_size(pixels * 8 + 1), location_at, location_at).is_err());
        assert!(validate_photo(&with_size(pixels / 20 - 1), location_at, location_at).is_err());
    }

    #[test]
    fn test_minimum_side_is_inclusive() {
        let location_at = at(9, 0, 0);
        let sized = |width, height| ImageInput {
            size_bytes: Some(100_000),
            width: Some(width),
            height: Some(height),
            ..camera_photo()
        };

        assert!(validate_photo(&sized(240, 320), location_at, location_at).is_ok());
        assert!(validate_photo(&sized(320, 240), location_at, location_at).is_ok());
        assert_eq!(
            validate_photo(&sized(239, 320), location_at, location_at),
            Err(ValidationError::ResolutionTooLow { width: 239, height: 320 })
        );
    }

    #[test]
    fn test_aspect_ratio_tolerance_is_strict() {
        let location_at = at(9, 0, 0);
        let sized = |width, height| ImageInput {
            width: Some(width),
            height: Some(height),
            ..camera_photo()
        };

        // 0.84 and 0.66 sit 0.09 from 3:4.
        assert!(validate_photo(&sized(840, 1000), location_at, location_at).is_ok());
        assert!(validate_photo(&sized(660, 1000), location_at, location_at).is_ok());
        // 0.86 sits 0.11 from 3:4 and further from every other format.
        assert!(matches!(
            validate_photo(&sized(860, 1000), location_at, location_at),
            Err(ValidationError::AspectRatio { .. })
        ));
        // A square frame is 0.25 from 3:4 and 0.33 from 4:3.
        assert!(matches!(
            validate_photo(&sized(1000, 1000), location_at, location_at),
            Err(ValidationError::AspectRatio { .. })
        ));
    }

    #[test]
    fn test_known_size_without_dimensions_skips_ratio_and_density() {
        let location_at = at(9, 0, 0);
        let sized_only = ImageInput {
            size_bytes: Some(50_000_000),
            width: None,
            height: None,
            ..camera_photo()
        };
        let photo = validate_photo(&sized_only, location_at, location_at).unwrap();
        assert_eq!(photo.size_bytes, Some(50_000_000));
        assert_eq!(photo.resolution(), None);

        let zero_sides = ImageInput {
            width: Some(0),
            height: Some(0),
            ..sized_only.clone()
        };
        assert!(validate_photo(&zero_sides, location_at, location_at).is_ok());

        // Size alone still has to clear the floor.
        let tiny = ImageInput {
            size_bytes: Some(29_999),
            ..sized_only
        };
        assert_eq!(
            validate_photo(&tiny, location_at, location_at),
            Err(ValidationError::PhotoTooSmall { size: 29_999 })
        );
    }

    #[test]
    fn test_unknown_metadata_skips_dependent_rules() {
        let bare = ImageInput {
            reference: "ref".to_string(),
            size_bytes: None,
            width: Some(0),
            height: None,
            is_document: false,
        };
        let photo = validate_photo(&bare, at(9, 0, 0), at(9, 0, 30)).unwrap();
        assert_eq!(photo.resolution(), None);
        assert_eq!(photo.size_bytes, None);
    }
}
