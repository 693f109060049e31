/// Current wall-clock time as Unix milliseconds, used to stamp cache records.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
