use crate::error::Result;
use parcelmail_core::{DateWindow, RecorderSettings};
use url::Url;

/// Build the recorder search URL for one date window.
///
/// All query parameters except the recorded-date range are fixed by
/// configuration; the range is formatted as `YYYYMMDD,YYYYMMDD`.
pub fn build_search_url(settings: &RecorderSettings, window: &DateWindow) -> Result<String> {
    let url = Url::parse_with_params(
        &settings.base_url,
        &[
            ("department", settings.department.as_str()),
            ("limit", &settings.limit.to_string()),
            ("offset", &settings.offset.to_string()),
            (
                "recordedDateRange",
                &format!("{},{}", window.start_param(), window.end_param()),
            ),
            ("searchOcrText", &settings.search_ocr_text.to_string()),
            ("searchType", settings.search_type.as_str()),
            ("searchValue", settings.search_value.as_str()),
        ],
    )?;
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelmail_core::parse_input_date;

    fn window() -> DateWindow {
        DateWindow {
            start: parse_input_date("20230101").expect("valid date"),
            end: parse_input_date("20230131").expect("valid date"),
        }
    }

    #[test]
    fn test_search_url_query_parameters() {
        let url =
            build_search_url(&RecorderSettings::default(), &window()).expect("build search url");

        assert!(url.starts_with("https://franklin.oh.publicsearch.us/results?"));
        assert!(url.contains("department=RP"));
        assert!(url.contains("limit=250"));
        assert!(url.contains("offset=50"));
        assert!(url.contains("recordedDateRange=20230101%2C20230131"));
        assert!(url.contains("searchOcrText=false"));
        assert!(url.contains("searchType=quickSearch"));
        // Spaces in the search value use form encoding
        assert!(url.contains("searchValue=ENVIRONMENTAL+DIVISION"));
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let settings = RecorderSettings {
            base_url: "not a url".to_string(),
            ..RecorderSettings::default()
        };
        assert!(build_search_url(&settings, &window()).is_err());
    }
}
