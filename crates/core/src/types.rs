/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Normalize a caller-supplied user id.
///
/// Zero and negative ids are treated as "no user" rather than rejected, so a
/// form field left at `0` degrades to an anonymous request.
pub fn normalize_user_id(user_id: Option<DbId>) -> Option<DbId> {
    user_id.filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_id_is_kept() {
        assert_eq!(normalize_user_id(Some(7)), Some(7));
    }

    #[test]
    fn zero_and_negative_ids_become_none() {
        assert_eq!(normalize_user_id(Some(0)), None);
        assert_eq!(normalize_user_id(Some(-3)), None);
        assert_eq!(normalize_user_id(None), None);
    }
}
