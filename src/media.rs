//! Upload path convention for photos
//!
//! Files themselves are stored by the upload service; records keep the
//! relative path `photos/<YYYY>/<MM>/<DD>/<file name>`.

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

/// Relative path of a photo uploaded on `date`. Only the final component
/// of `filename` is kept.
pub fn photo_upload_path(date: NaiveDate, filename: &str) -> AppResult<String> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::Validation(format!("Invalid photo file name: {:?}", filename)));
    }

    Ok(format!("photos/{}/{}", date.format("%Y/%m/%d"), name))
}

/// Resolve an optional uploaded file name into its stored path
pub fn photo_field(date: NaiveDate, filename: Option<&str>) -> AppResult<Option<String>> {
    filename.map(|f| photo_upload_path(date, f)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dated_directory_is_zero_padded() {
        assert_eq!(
            photo_upload_path(date(2022, 5, 7), "cover.jpg").unwrap(),
            "photos/2022/05/07/cover.jpg"
        );
    }

    #[test]
    fn test_directories_in_name_are_dropped() {
        assert_eq!(
            photo_upload_path(date(2024, 1, 10), "../../etc/passwd").unwrap(),
            "photos/2024/01/10/passwd"
        );
        assert_eq!(
            photo_upload_path(date(2024, 1, 10), "C:\\Users\\me\\portrait.png").unwrap(),
            "photos/2024/01/10/portrait.png"
        );
    }

    #[test]
    fn test_empty_names_rejected() {
        assert!(photo_upload_path(date(2024, 1, 10), "").is_err());
        assert!(photo_upload_path(date(2024, 1, 10), "photos/").is_err());
        assert!(photo_upload_path(date(2024, 1, 10), "..").is_err());
    }

    #[test]
    fn test_optional_field() {
        assert_eq!(photo_field(date(2024, 1, 10), None).unwrap(), None);
        assert_eq!(
            photo_field(date(2024, 1, 10), Some("a.png")).unwrap(),
            Some("photos/2024/01/10/a.png".to_string())
        );
    }
}
