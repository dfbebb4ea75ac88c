use super::*;

#[test]
fn test_format_created_drops_fraction() {
    assert_eq!(
        format_created("2023-05-01T12:30:00.123456Z").unwrap(),
        "2023-05-01 12:30:00"
    );
}

#[test]
fn test_format_created_with_nanoseconds() {
    assert_eq!(
        format_created("2024-01-31T23:59:59.999999999Z").unwrap(),
        "2024-01-31 23:59:59"
    );
}

#[test]
fn test_format_created_keeps_original_offset() {
    assert_eq!(
        format_created("2023-05-01T20:30:00+08:00").unwrap(),
        "2023-05-01 20:30:00"
    );
}

#[test]
fn test_format_created_rejects_garbage() {
    let result = format_created("not a time");
    assert!(matches!(result, Err(RegistryError::TimeParse { .. })));
}

#[test]
fn test_format_created_rejects_empty() {
    assert!(format_created("").is_err());
}

#[test]
fn test_sort_key_orders_across_offsets() {
    let utc = created_sort_key("2023-05-01T12:00:00Z");
    let plus_two = created_sort_key("2023-05-01T13:00:00+02:00");

    // 13:00+02:00 is 11:00Z
    assert!(utc > plus_two);
}

#[test]
fn test_sort_key_for_unparseable_is_oldest() {
    let bad = created_sort_key("garbage");
    let epoch = created_sort_key("1970-01-01T00:00:00Z");

    assert_eq!(bad, DateTime::<Utc>::MIN_UTC);
    assert!(bad < epoch);
}

#[test]
fn test_sort_key_respects_nanoseconds() {
    let earlier = created_sort_key("2023-05-01T12:30:00.000000001Z");
    let later = created_sort_key("2023-05-01T12:30:00.000000002Z");
    assert!(later > earlier);
}
