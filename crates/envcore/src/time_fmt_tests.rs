use super::format_duration_ms;

#[yare::parameterized(
    sub_second = { 480, "480ms" },
    exact_second = { 1000, "1.0s" },
    few_seconds = { 2500, "2.5s" },
    under_a_minute = { 59_000, "59.0s" },
    one_minute = { 60_000, "1m" },
    several_minutes = { 180_000, "3m" },
)]
fn formats(ms: u64, expected: &str) {
    assert_eq!(format_duration_ms(ms), expected);
}
