use scrape_core::{
    calculate_reading_time, format_bytes, format_date, get_domain_from_url, truncate,
    url_to_directory_name, DEFAULT_BYTE_DECIMALS,
};

#[test]
fn format_date_handles_empty_invalid_and_valid_input() {
    assert_eq!(format_date("", true), "N/A");
    assert_eq!(format_date("yesterday-ish", true), "Invalid Date");
    assert_eq!(
        format_date("2026-10-19T14:30:00Z", true),
        "Oct 19, 2026, 02:30 PM"
    );
    assert_eq!(format_date("2026-10-19T14:30:00+02:00", false), "Oct 19, 2026");
    assert_eq!(format_date("2026-01-05", false), "Jan 5, 2026");
    assert_eq!(
        format_date("2026-01-05T09:07:00.123456", true),
        "Jan 5, 2026, 09:07 AM"
    );
}

#[test]
fn format_bytes_picks_largest_unit() {
    assert_eq!(format_bytes(0, DEFAULT_BYTE_DECIMALS), "0 Bytes");
    assert_eq!(format_bytes(1, DEFAULT_BYTE_DECIMALS), "1 Bytes");
    assert_eq!(format_bytes(1023, DEFAULT_BYTE_DECIMALS), "1023 Bytes");
    assert_eq!(format_bytes(1024, DEFAULT_BYTE_DECIMALS), "1 KB");
    assert_eq!(format_bytes(1536, DEFAULT_BYTE_DECIMALS), "1.5 KB");
    assert_eq!(format_bytes(1_572_864, DEFAULT_BYTE_DECIMALS), "1.5 MB");
    assert_eq!(format_bytes(1234, 0), "1 KB");
    assert_eq!(format_bytes(1234, 3), "1.205 KB");
    assert_eq!(format_bytes(5 * 1024u64.pow(5), DEFAULT_BYTE_DECIMALS), "5120 TB");
}

#[test]
fn domain_strips_www_and_falls_back_to_input() {
    assert_eq!(get_domain_from_url("https://www.example.com/x"), "example.com");
    assert_eq!(get_domain_from_url("http://docs.example.com:8080/a?b=c"), "docs.example.com");
    assert_eq!(get_domain_from_url("not a url"), "not a url");
    assert_eq!(get_domain_from_url("mailto:someone@example.com"), "mailto:someone@example.com");
}

#[test]
fn truncate_counts_characters() {
    assert_eq!(truncate("", 10), "");
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("hello world", 5), "hello...");
    assert_eq!(truncate("åäöåäö", 3), "åäö...");
}

#[test]
fn reading_time_rounds_up() {
    assert_eq!(calculate_reading_time(""), 0);
    assert_eq!(calculate_reading_time("   "), 0);
    assert_eq!(calculate_reading_time("one two three"), 1);
    assert_eq!(calculate_reading_time(&"word ".repeat(200)), 1);
    assert_eq!(calculate_reading_time(&"word ".repeat(201)), 2);
}

#[test]
fn directory_name_is_filesystem_safe() {
    assert_eq!(url_to_directory_name("https://www.example.com/path"), "example.com");
    assert_eq!(url_to_directory_name("http://localhost:8080/"), "localhost_8080");
    assert_eq!(url_to_directory_name("not a url"), "not_a_url");
}
