use chrono::NaiveDate;

use fitsync_core::normalize::{extract_weight_records, parse_diet_csv, parse_diet_date, split_csv_row};

const DIET_HEADER: &str = "Date,Calorie Goal,Calories Consumed,Calories Burned,Net Calories";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn diet_date_parses_regardless_of_weekday_prefix() {
    for prefix in ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"] {
        let raw = format!("{prefix}, January 2, 2012");
        assert_eq!(
            parse_diet_date(&raw),
            Some(date(2012, 1, 2)),
            "prefix {prefix} should strip cleanly"
        );
    }
}

#[test]
fn diet_date_without_prefix_fails_gracefully() {
    assert_eq!(parse_diet_date("not a date at all"), None);
}

#[test]
fn diet_row_parses_into_all_four_calorie_fields() {
    let body = format!(
        "{DIET_HEADER}\n\"Mo, January 2, 2012\",\"2000\",\"1800\",\"300\",\"1500\"\n"
    );
    let batch = parse_diet_csv(&body);

    assert_eq!(batch.updates.len(), 1);
    assert_eq!(batch.skipped, 0);
    assert_eq!(batch.defaulted_fields, 0);

    let update = &batch.updates[0];
    assert_eq!(update.date, date(2012, 1, 2));
    assert_eq!(update.calorie_goal, Some(2000.0));
    assert_eq!(update.calories_consumed, Some(1800.0));
    assert_eq!(update.calories_burned, Some(300.0));
    assert_eq!(update.net_calories, Some(1500.0));
    assert_eq!(update.weight, None, "diet feed never supplies weight");
}

#[test]
fn header_row_is_discarded_unconditionally() {
    // Even a header that happens to look like data must be dropped.
    let body = "\"Mo, January 2, 2012\",\"1\",\"2\",\"3\",\"4\"\n\
                \"Tu, January 3, 2012\",\"2100\",\"1900\",\"400\",\"1500\"\n";
    let batch = parse_diet_csv(body);
    assert_eq!(batch.updates.len(), 1);
    assert_eq!(batch.updates[0].date, date(2012, 1, 3));
}

#[test]
fn unparsable_numeric_field_defaults_to_zero_and_row_survives() {
    let body = format!(
        "{DIET_HEADER}\n\
         \"Mo, January 2, 2012\",\"bad\",\"1800\",\"300\",\"1500\"\n\
         \"Tu, January 3, 2012\",\"2100\",\"1900\",\"400\",\"1500\"\n"
    );
    let batch = parse_diet_csv(&body);

    assert_eq!(batch.updates.len(), 2, "the row after the bad one must still parse");
    assert_eq!(batch.defaulted_fields, 1);
    assert_eq!(batch.updates[0].calorie_goal, Some(0.0));
    assert_eq!(batch.updates[0].calories_consumed, Some(1800.0));
    assert_eq!(batch.updates[1].calorie_goal, Some(2100.0));
}

#[test]
fn malformed_row_is_skipped_without_aborting_the_batch() {
    let body = format!(
        "{DIET_HEADER}\n\
         this row has no commas at all and is junk\n\
         \"We, January 4, 2012\",\"2000\",\"1700\",\"250\",\"1450\"\n"
    );
    let batch = parse_diet_csv(&body);

    assert_eq!(batch.updates.len(), 1);
    assert_eq!(batch.skipped, 1);
    assert_eq!(batch.updates[0].date, date(2012, 1, 4));
}

#[test]
fn row_with_unparsable_date_is_skipped() {
    let body = format!(
        "{DIET_HEADER}\n\
         \"Mo, Veganuary 2, 2012\",\"2000\",\"1800\",\"300\",\"1500\"\n"
    );
    let batch = parse_diet_csv(&body);
    assert!(batch.updates.is_empty());
    assert_eq!(batch.skipped, 1);
}

#[test]
fn empty_export_yields_empty_batch() {
    let batch = parse_diet_csv(DIET_HEADER);
    assert!(batch.updates.is_empty());
    assert_eq!(batch.skipped, 0);
}

#[test]
fn csv_row_split_honors_quoted_commas() {
    let fields = split_csv_row("\"Mo, January 2, 2012\",\"2000\",plain,\"say \"\"hi\"\"\"");
    assert_eq!(
        fields,
        vec!["Mo, January 2, 2012", "2000", "plain", "say \"hi\""]
    );
}

#[test]
fn weight_records_extract_from_inline_script() {
    let html = r#"<html><body>
        <script type="text/javascript">
            var chart_opts = {};
            var weight_data = [{"weight": 150.5, "datestamp": "2012-01-02"},
                               {"weight": 149.0, "datestamp": "2012-01-05"}];
        </script>
    </body></html>"#;

    let batch = extract_weight_records(html);
    assert_eq!(batch.updates.len(), 2);
    assert_eq!(batch.updates[0].date, date(2012, 1, 2));
    assert_eq!(batch.updates[0].weight, Some(150.5));
    assert_eq!(batch.updates[0].calorie_goal, None, "weight feed never supplies diet fields");
    assert_eq!(batch.updates[1].weight, Some(149.0));
}

#[test]
fn weight_page_without_embedded_array_yields_empty_batch() {
    let html = "<html><body><p>No data for you.</p></body></html>";
    let batch = extract_weight_records(html);
    assert!(batch.updates.is_empty());
    assert_eq!(batch.skipped, 0);
}

#[test]
fn weight_record_with_bad_date_is_skipped_not_fatal() {
    let html = r#"var weight_data = [{"weight": 150.5, "datestamp": "someday"},
                                     {"weight": 148.2, "datestamp": "2012-01-09"}]"#;
    let batch = extract_weight_records(html);
    assert_eq!(batch.updates.len(), 1);
    assert_eq!(batch.updates[0].date, date(2012, 1, 9));
    assert_eq!(batch.skipped, 1);
}

#[test]
fn weight_array_with_invalid_json_is_treated_as_absent() {
    let html = "var weight_data = [{nonsense}]";
    let batch = extract_weight_records(html);
    assert!(batch.updates.is_empty());
}
