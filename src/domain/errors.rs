use chrono::NaiveDate;
use thiserror::Error;

/// Reason a field submission was rejected.
///
/// The `Display` text is shown to the user verbatim, so every variant reads
/// as a corrective message rather than a diagnostic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Name must not be empty.")]
    NameEmpty,
    #[error("Name is too short. It must be at least 3 characters.")]
    NameTooShort,
    #[error("Name may only contain letters and spaces. Digits and symbols are not allowed.")]
    NameInvalidCharacters,
    #[error("Name must be written in title case, for example \"Budi Santoso\".")]
    NameCase,

    #[error("ID number must not be empty.")]
    IdNumberEmpty,
    #[error("ID number must be between 8 and 20 characters long.")]
    IdNumberLength,
    #[error("ID number may only contain letters and digits.")]
    IdNumberInvalidCharacters,

    #[error("This field must not be empty.")]
    EmptyText,

    #[error("End date must not be before the start date ({}).", start.format("%d/%m/%Y"))]
    EndBeforeStart { start: NaiveDate },

    #[error("Coordinates 0,0 are not a real location.")]
    NullIsland,
    #[error("These coordinates are a well-known reference point commonly used for spoofing.")]
    DenylistedCoordinate,
    #[error("The location is outside the supported operating region.")]
    OutsideRegion,
    #[error("The coordinates are too round to be a live GPS fix.")]
    ImpreciseCoordinate,

    #[error("Photos sent as a file are not accepted. Take the photo directly with the camera.")]
    PhotoIsDocument,
    #[error("The photo is too small ({size} bytes) to be a camera capture.")]
    PhotoTooSmall { size: u64 },
    #[error("Photo aspect ratio {ratio:.2} does not match a camera format (4:3, 3:4, 16:9, 9:16).")]
    AspectRatio { ratio: f64 },
    #[error("The photo was sent {elapsed_secs} seconds after the location; it must follow within 5 minutes.")]
    PhotoStale { elapsed_secs: i64 },
    #[error("Photo resolution {width}x{height} is below the 240 pixel minimum.")]
    ResolutionTooLow { width: u32, height: u32 },
    #[error("Photo looks like a screenshot or an edited image (bytes per pixel {bytes_per_pixel:.3}).")]
    BytesPerPixel { bytes_per_pixel: f64 },
}

pub type DomainResult<T> = Result<T, ValidationError>;

/// Raised when a session is asked for a finished record before every field is set.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("session is missing field `{0}`")]
pub struct RecordError(pub &'static str);
