// src/presence_tests.rs

#[cfg(test)]
mod tests {
    use crate::presence::*;
    use crate::warehouse_access::{Role, UserProfile, Visibility};
    use chrono::NaiveDate;

    // Helper function to create a test event
    fn create_test_event(
        unit: &str,
        name: &str,
        company: &str,
        date: &str,
        time: &str,
    ) -> AttendanceEvent {
        AttendanceEvent {
            name: name.to_string(),
            company: company.to_string(),
            unit: unit.to_string(),
            date: parse_event_date(date),
            time: time.to_string(),
            access_point: None,
            event_type: None,
        }
    }

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    fn count_at(summary: &PresenceSummary, label: &str) -> usize {
        summary
            .hourly_histogram
            .iter()
            .find(|h| h.hour_label == label)
            .map(|h| h.count)
            .unwrap_or_else(|| panic!("missing hour slot {}", label))
    }

    fn sample_day() -> Vec<AttendanceEvent> {
        vec![
            create_test_event("A", "JOAO", "X", "2024-01-10", "08:15"),
            create_test_event("A", "JOAO", "X", "2024-01-10", "08:47"),
            create_test_event("A", "MARIA", "X", "2024-01-10", "09:02"),
        ]
    }

    #[test]
    fn test_duplicate_events_count_once_for_presence() {
        let summary =
            PresenceAggregator::default().aggregate(&sample_day(), &Visibility::Unrestricted, None);

        assert_eq!(summary.total_presence, 2);
        assert_eq!(summary.reporting_date, Some(d("2024-01-10")));
    }

    #[test]
    fn test_histogram_counts_raw_events() {
        let summary =
            PresenceAggregator::default().aggregate(&sample_day(), &Visibility::Unrestricted, None);

        assert_eq!(summary.hourly_histogram.len(), 24);
        assert_eq!(summary.hourly_histogram[0].hour_label, "00:00");
        assert_eq!(summary.hourly_histogram[23].hour_label, "23:00");
        assert_eq!(count_at(&summary, "08:00"), 2);
        assert_eq!(count_at(&summary, "09:00"), 1);
        let total: usize = summary.hourly_histogram.iter().map(|h| h.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_person_key_ignores_name_case_only() {
        let events = vec![
            create_test_event("A", "Joao", "X", "2024-01-10", "08:00"),
            create_test_event("A", "JOAO", "X", "2024-01-10", "08:00"),
            create_test_event("B", "JOAO", "X", "2024-01-10", "08:00"),
            create_test_event("A", "JOAO", "Y", "2024-01-10", "08:00"),
        ];
        assert_eq!(events[0].person_key(), "A-JOAO-X");

        let summary =
            PresenceAggregator::default().aggregate(&events, &Visibility::Unrestricted, None);
        assert_eq!(summary.total_presence, 3);
    }

    #[test]
    fn test_reporting_date_is_latest_known_date() {
        let events = vec![
            create_test_event("A", "OLD", "X", "2024-01-09", "10:00"),
            create_test_event("A", "NEW", "X", "2024-01-10", "11:00"),
            create_test_event("A", "NEW2", "X", "2024-01-10", "11:30"),
            create_test_event("A", "UNKNOWN", "X", "N/A", "12:00"),
        ];

        let summary =
            PresenceAggregator::default().aggregate(&events, &Visibility::Unrestricted, None);

        assert_eq!(summary.reporting_date, Some(d("2024-01-10")));
        assert_eq!(summary.total_presence, 2);
        assert_eq!(count_at(&summary, "11:00"), 2);
        assert_eq!(count_at(&summary, "12:00"), 0);
    }

    #[test]
    fn test_pinned_date_overrides_latest() {
        let events = vec![
            create_test_event("A", "OLD", "X", "2024-01-09", "10:00"),
            create_test_event("A", "NEW", "X", "2024-01-10", "11:00"),
        ];

        let summary = PresenceAggregator::default().aggregate(
            &events,
            &Visibility::Unrestricted,
            Some(d("2024-01-09")),
        );

        assert_eq!(summary.reporting_date, Some(d("2024-01-09")));
        assert_eq!(summary.total_presence, 1);
        assert_eq!(count_at(&summary, "10:00"), 1);
    }

    #[test]
    fn test_pinned_date_without_events_is_zero_not_error() {
        let summary = PresenceAggregator::default().aggregate(
            &sample_day(),
            &Visibility::Unrestricted,
            Some(d("2023-12-31")),
        );

        assert_eq!(summary.total_presence, 0);
        assert_eq!(summary.subgroup_presence, 0);
        assert!(summary.hourly_histogram.iter().all(|h| h.count == 0));
    }

    #[test]
    fn test_no_events_yields_zeros_and_no_date() {
        let summary = PresenceAggregator::default().aggregate(&[], &Visibility::Unrestricted, None);

        assert_eq!(summary.reporting_date, None);
        assert_eq!(summary.total_presence, 0);
        assert_eq!(summary.subgroup_presence, 0);
        assert_eq!(summary.hourly_histogram.len(), 24);
        assert!(summary.hourly_histogram.iter().all(|h| h.count == 0));
    }

    #[test]
    fn test_only_unknown_dates_yields_no_reporting_date() {
        let events = vec![create_test_event("A", "JOAO", "X", "N/A", "08:00")];

        let summary =
            PresenceAggregator::default().aggregate(&events, &Visibility::Unrestricted, None);

        assert_eq!(summary.reporting_date, None);
        assert_eq!(summary.total_presence, 0);
    }

    #[test]
    fn test_subgroup_counts_partner_companies_only() {
        let events = vec![
            create_test_event("A", "JOAO", "B11", "2024-01-10", "08:00"),
            create_test_event("A", "JOAO", "B11", "2024-01-10", "09:00"),
            create_test_event("A", "ANA", "SUPERA LOG", "2024-01-10", "08:00"),
            create_test_event("A", "RUI", "PROPRIO", "2024-01-10", "08:00"),
            create_test_event("A", "EVA", "b11", "2024-01-10", "08:00"),
        ];

        let summary =
            PresenceAggregator::default().aggregate(&events, &Visibility::Unrestricted, None);

        assert_eq!(summary.total_presence, 4);
        assert_eq!(summary.subgroup_presence, 2);
    }

    #[test]
    fn test_custom_partner_set() {
        let aggregator = PresenceAggregator::new(vec!["PROPRIO".to_string()]);
        let events = vec![
            create_test_event("A", "RUI", "PROPRIO", "2024-01-10", "08:00"),
            create_test_event("A", "JOAO", "B11", "2024-01-10", "08:00"),
        ];

        let summary = aggregator.aggregate(&events, &Visibility::Unrestricted, None);
        assert_eq!(summary.subgroup_presence, 1);
    }

    #[test]
    fn test_malformed_times_are_left_out_of_histogram_only() {
        let events = vec![
            create_test_event("A", "P1", "X", "2024-01-10", "8:05"),
            create_test_event("A", "P2", "X", "2024-01-10", "24:00"),
            create_test_event("A", "P3", "X", "2024-01-10", "abc"),
            create_test_event("A", "P4", "X", "2024-01-10", ""),
            create_test_event("A", "P5", "X", "2024-01-10", "0800"),
            create_test_event("A", "P6", "X", "2024-01-10", "23:59:59"),
        ];

        let summary =
            PresenceAggregator::default().aggregate(&events, &Visibility::Unrestricted, None);

        assert_eq!(summary.total_presence, 6);
        assert_eq!(count_at(&summary, "08:00"), 1);
        assert_eq!(count_at(&summary, "23:00"), 1);
        let total: usize = summary.hourly_histogram.iter().map(|h| h.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_restricted_visibility_filters_units_before_choosing_date() {
        let events = vec![
            create_test_event("4 ELOS RJ", "JOAO", "B11", "2024-01-09", "08:00"),
            create_test_event("CAJAMAR", "ANA", "B11", "2024-01-10", "08:00"),
        ];
        let visibility = Visibility::Restricted(vec!["4 ELOS".to_string()]);

        let summary = PresenceAggregator::default().aggregate(&events, &visibility, None);

        assert_eq!(summary.reporting_date, Some(d("2024-01-09")));
        assert_eq!(summary.total_presence, 1);
    }

    #[test]
    fn test_manager_without_warehouses_sees_no_presence() {
        let manager = UserProfile {
            role: Role::Manager,
            allowed_warehouses: None,
        };

        let summary =
            PresenceAggregator::default().aggregate(&sample_day(), &manager.visibility(), None);

        assert_eq!(summary.reporting_date, None);
        assert_eq!(summary.total_presence, 0);
    }

    #[test]
    fn test_available_dates_newest_first_without_unknown() {
        let events = vec![
            create_test_event("A", "P1", "X", "2024-01-09", "08:00"),
            create_test_event("A", "P2", "X", "N/A", "08:00"),
            create_test_event("A", "P3", "X", "2024-01-11", "08:00"),
            create_test_event("A", "P4", "X", "2024-01-09", "08:00"),
        ];

        let dates = available_dates(&events, &Visibility::Unrestricted);
        assert_eq!(dates, vec![d("2024-01-11"), d("2024-01-09")]);
    }

    #[test]
    fn test_hourly_histogram_for_chosen_date() {
        let events = vec![
            create_test_event("A", "P1", "X", "2024-01-09", "07:10"),
            create_test_event("A", "P1", "X", "2024-01-09", "07:20"),
            create_test_event("A", "P3", "X", "2024-01-11", "08:00"),
        ];

        let slots = hourly_histogram(&events, &Visibility::Unrestricted, d("2024-01-09"));
        assert_eq!(slots[7].count, 2);
        assert_eq!(slots[8].count, 0);
    }

    #[test]
    fn test_parse_event_date_formats() {
        assert_eq!(parse_event_date("2024-01-10"), Some(d("2024-01-10")));
        assert_eq!(parse_event_date("10/01/2024"), Some(d("2024-01-10")));
        assert_eq!(parse_event_date(" N/A "), None);
        assert_eq!(parse_event_date(""), None);
        assert_eq!(parse_event_date("2024-13-40"), None);
    }

    #[test]
    fn test_event_json_keeps_unknown_date_sentinel() {
        let json = r#"{"name":"JOAO","company":"B11","unit":"A","date":"N/A","time":"08:00"}"#;
        let event: AttendanceEvent = serde_json::from_str(json).expect("event should parse");
        assert_eq!(event.date, None);

        let back = serde_json::to_value(&event).expect("event should serialize");
        assert_eq!(back["date"], "N/A");

        let dated: AttendanceEvent = serde_json::from_str(
            r#"{"name":"JOAO","company":"B11","unit":"A","date":"2024-01-10"}"#,
        )
        .expect("event without time should parse");
        assert_eq!(dated.date, Some(d("2024-01-10")));
        assert_eq!(dated.time, "");
    }
}
