// Unit tests for business rules

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::domain::errors::*;
    use crate::domain::model::*;
    use crate::domain::rules::*;

    fn date() -> DateKey {
        DateKey::parse("2021-05-23").unwrap()
    }

    fn dated(stem: &str) -> PathBuf {
        PathBuf::from(format!("/captures/Dated/2021-05-23/{}.jpg", stem))
    }

    #[test]
    fn test_output_naming_single_date() {
        let name = OutputNaming::video_name(&date(), InclusionMode::SingleDate, &TimeWindow::unbounded());
        assert_eq!(name, "2021-05-23");
    }

    #[test]
    fn test_output_naming_with_window() {
        let window = TimeWindow::parse(Some("07:00"), Some("19:00")).unwrap();
        let name = OutputNaming::video_name(&date(), InclusionMode::SingleDate, &window);
        assert_eq!(name, "2021-05-23_0700-1900");
    }

    #[test]
    fn test_output_naming_open_bounds_display_defaults() {
        let start_only = TimeWindow::parse(Some("06:30"), None).unwrap();
        assert_eq!(OutputNaming::window_suffix(&start_only), "0630-2359");

        let end_only = TimeWindow::parse(None, Some("18:45")).unwrap();
        assert_eq!(OutputNaming::window_suffix(&end_only), "0000-1845");
    }

    #[test]
    fn test_output_naming_all_dates_ignores_window() {
        let window = TimeWindow::parse(Some("07:00"), Some("19:00")).unwrap();
        let name = OutputNaming::video_name(&date(), InclusionMode::AllDates, &window);
        assert_eq!(name, "complete");
    }

    #[test]
    fn test_lexicographic_order_is_chronological() {
        let mut stems = Vec::new();
        for day in [9, 10, 23] {
            for hour in [0, 1, 9, 10, 12, 19, 23] {
                for minute in [0, 1, 9, 10, 30, 59] {
                    stems.push(format!("2105{:02}_{:02}{:02}", day, hour, minute));
                }
            }
        }

        let mut chronological: Vec<_> = stems
            .iter()
            .map(|s| (CaptureTimestamp::parse_stem(s).unwrap(), dated(s)))
            .collect();
        chronological.sort_by_key(|(ts, _)| *ts);
        let expected: Vec<PathBuf> = chronological.into_iter().map(|(_, p)| p).collect();

        let mut shuffled: Vec<PathBuf> = stems.iter().rev().map(|s| dated(s)).collect();
        shuffled.swap(0, 7);
        CandidateOrdering::sort(&mut shuffled);

        assert_eq!(shuffled, expected);
        assert_eq!(shuffled.first().unwrap(), &dated("210509_0000"));
        assert_eq!(shuffled.last().unwrap(), &dated("210523_2359"));
    }

    #[test]
    fn test_still_image_extension_match() {
        assert!(CandidateOrdering::is_still_image(Path::new("a/210523_0700.jpg")));
        assert!(CandidateOrdering::is_still_image(Path::new("a/210523_0700.JPG")));
        assert!(!CandidateOrdering::is_still_image(Path::new("a/210523_0700.png")));
        assert!(!CandidateOrdering::is_still_image(Path::new("a/notes")));
    }

    #[test]
    fn test_window_filter_boundaries() {
        let window = TimeWindow::parse(Some("07:00"), Some("19:00")).unwrap();
        let candidates = vec![
            dated("210523_0659"),
            dated("210523_0700"),
            dated("210523_1900"),
            dated("210523_1901"),
        ];
        let retained = WindowFilter::retain(candidates, &window).unwrap();
        assert_eq!(retained, vec![dated("210523_0700"), dated("210523_1900")]);
    }

    #[test]
    fn test_window_filter_preserves_order() {
        let window = TimeWindow::parse(None, Some("12:00")).unwrap();
        let candidates = vec![
            dated("210523_0000"),
            dated("210523_0700"),
            dated("210523_1200"),
            dated("210523_2000"),
        ];
        let retained = WindowFilter::retain(candidates, &window).unwrap();
        assert_eq!(
            retained,
            vec![dated("210523_0000"), dated("210523_0700"), dated("210523_1200")]
        );
    }

    #[test]
    fn test_window_filter_malformed_name_is_fatal() {
        let window = TimeWindow::parse(Some("07:00"), None).unwrap();
        let candidates = vec![dated("210523_0700"), dated("IMG_0001")];
        let err = WindowFilter::retain(candidates, &window).unwrap_err();
        assert!(matches!(err, DomainError::MalformedTimestamp(_)));
    }

    #[test]
    fn test_window_filter_unbounded_keeps_everything() {
        let candidates = vec![dated("IMG_0001"), dated("210523_0700")];
        let retained = WindowFilter::retain(candidates.clone(), &TimeWindow::unbounded()).unwrap();
        assert_eq!(retained, candidates);
    }

    #[test]
    fn test_encoder_policy_bit_rate() {
        assert_eq!(EncoderPolicy::bit_rate(30000), Some(30_000_000));
        assert_eq!(EncoderPolicy::bit_rate(1), Some(1000));
        assert_eq!(EncoderPolicy::bit_rate(0), None);
        assert_eq!(EncoderPolicy::bit_rate(-5), None);
    }

    #[test]
    fn test_encoder_policy_stream_spec() {
        let request = VideoAssemblyRequest {
            layout: FolderLayout {
                base_path: PathBuf::from("/captures"),
                raw_folder: "Raw".to_string(),
                dated_folder: "Dated".to_string(),
                video_folder: "Video".to_string(),
            },
            date: date(),
            inclusion: InclusionMode::SingleDate,
            fidelity: CodecFidelity::Lossy,
            bitrate_kbps: 2500,
            frame_rate: 15,
            window: TimeWindow::unbounded(),
        };
        let spec = EncoderPolicy::stream_spec(&request, FrameGeometry::new(1280, 720)).unwrap();
        assert_eq!(spec.path, PathBuf::from("/captures/Video/2021-05-23.mp4"));
        assert_eq!(spec.bit_rate, Some(2_500_000));
        assert_eq!(spec.frame_rate, 15);

        let zero_fps = VideoAssemblyRequest {
            frame_rate: 0,
            ..request
        };
        assert!(EncoderPolicy::stream_spec(&zero_fps, FrameGeometry::new(1280, 720)).is_err());
    }

    #[test]
    fn test_geometry_check() {
        let path = dated("210523_0700");
        assert!(GeometryCheck::ensure_matches(
            &path,
            FrameGeometry::new(1280, 720),
            FrameGeometry::new(1280, 720)
        )
        .is_ok());

        let err = GeometryCheck::ensure_matches(
            &path,
            FrameGeometry::new(1280, 720),
            FrameGeometry::new(1920, 1080),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }
}
