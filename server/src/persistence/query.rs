//! Dynamic SQL assembly for race listings.
//!
//! The builder collects predicate fragments and their positional arguments in
//! parallel, then joins them once. It never fails: anything it cannot make
//! sense of degrades to "no predicate".

use racing_proto::{ListRacesRequest, ListRacesRequestFilter, Visibility};

/// Base query for listing races. Column order is what the row mapper expects.
pub const LIST_RACES_QUERY: &str = "SELECT id, meeting_id, name, number, visible, \
     advertised_start_time FROM races";

/// A query ready to execute: SQL text plus positional arguments for its `?`
/// placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub sql: String,
    pub args: Vec<i64>,
}

/// Build the listing query for `request` on top of `base`.
///
/// Predicates are emitted meeting filter first, visibility second, so the
/// same request always yields the same SQL.
pub fn build_list_query(base: &str, request: &ListRacesRequest) -> QueryPlan {
    let (predicates, args) = match &request.filter {
        Some(filter) => filter_predicates(filter),
        None => (Vec::new(), Vec::new()),
    };

    let mut sql = base.to_string();
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    apply_order_by(&mut sql, &request.order_by);

    QueryPlan { sql, args }
}

fn filter_predicates(filter: &ListRacesRequestFilter) -> (Vec<String>, Vec<i64>) {
    let mut predicates = Vec::new();
    let mut args = Vec::with_capacity(filter.meeting_ids.len());

    if !filter.meeting_ids.is_empty() {
        predicates.push(format!(
            "meeting_id IN ({})",
            placeholders(filter.meeting_ids.len())
        ));
        args.extend_from_slice(&filter.meeting_ids);
    }

    if let Some(predicate) = visibility_predicate(filter.visibility) {
        predicates.push(predicate.to_string());
    }

    (predicates, args)
}

/// `?,?,...,?` with exactly `count` placeholders.
fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

/// Resolve the raw wire value of a visibility selector to a predicate.
///
/// | selector      | predicate         |
/// |---------------|-------------------|
/// | `Unspecified` | none              |
/// | `Hidden`      | `visible = false` |
/// | `Visible`     | `visible = true`  |
/// | `ShowAll`     | none              |
///
/// Values outside the enum are logged and treated as show-all, so a malformed
/// filter never hides results.
pub fn visibility_predicate(raw: i32) -> Option<&'static str> {
    match Visibility::try_from(raw) {
        Ok(Visibility::Unspecified) | Ok(Visibility::ShowAll) => None,
        Ok(Visibility::Hidden) => Some("visible = false"),
        Ok(Visibility::Visible) => Some("visible = true"),
        Err(_) => {
            tracing::warn!(visibility = raw, "Invalid value for filter visibility, ignoring");
            None
        }
    }
}

/// Append `ORDER BY` when the caller supplied a non-blank expression.
///
/// The expression is trusted: it must already have been restricted to known
/// columns and directions by the caller.
fn apply_order_by(sql: &mut String, order_by: &str) {
    if !order_by.trim().is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn request(meeting_ids: Vec<i64>, visibility: i32, order_by: &str) -> ListRacesRequest {
        ListRacesRequest {
            filter: Some(ListRacesRequestFilter {
                meeting_ids,
                visibility,
            }),
            order_by: order_by.to_string(),
        }
    }

    #[test]
    fn test_no_filter_no_order_returns_base() {
        let plan = build_list_query(LIST_RACES_QUERY, &ListRacesRequest::default());
        assert_eq!(plan.sql, LIST_RACES_QUERY);
        assert!(plan.args.is_empty());
    }

    #[test]
    fn test_empty_filter_default_visibility_has_no_where() {
        let plan = build_list_query(
            LIST_RACES_QUERY,
            &request(vec![], Visibility::Unspecified as i32, ""),
        );
        assert!(!plan.sql.contains("WHERE"));
        assert!(plan.args.is_empty());
    }

    #[test]
    fn test_meeting_ids_in_clause_matches_len_and_order() {
        for ids in [vec![5], vec![9, 1], vec![4, 4, 2, 8, 6]] {
            let plan = build_list_query(LIST_RACES_QUERY, &request(ids.clone(), 0, ""));
            let expected = format!(
                "{LIST_RACES_QUERY} WHERE meeting_id IN ({})",
                vec!["?"; ids.len()].join(",")
            );
            assert_eq!(plan.sql, expected);
            assert_eq!(plan.sql.matches('?').count(), ids.len());
            assert_eq!(plan.args, ids);
        }
    }

    #[test]
    fn test_visibility_decision_table() {
        assert_eq!(visibility_predicate(Visibility::Unspecified as i32), None);
        assert_eq!(
            visibility_predicate(Visibility::Hidden as i32),
            Some("visible = false")
        );
        assert_eq!(
            visibility_predicate(Visibility::Visible as i32),
            Some("visible = true")
        );
        assert_eq!(visibility_predicate(Visibility::ShowAll as i32), None);
    }

    #[test]
    fn test_out_of_range_visibility_is_non_restrictive() {
        for raw in [-1, 4, 99] {
            assert_eq!(visibility_predicate(raw), None);
            let plan = build_list_query(LIST_RACES_QUERY, &request(vec![], raw, ""));
            assert_eq!(plan.sql, LIST_RACES_QUERY);
        }
    }

    /// In-memory sink for formatted log output.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Resolve `raw` with a thread-local subscriber and return what it logged
    /// at WARN or above.
    fn warnings_for(raw: i32) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            visibility_predicate(raw);
        });
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_out_of_range_visibility_logs_warning() {
        for raw in [-1, 4, 99] {
            let output = warnings_for(raw);
            assert!(output.contains("WARN"), "no warning for {raw}: {output:?}");
            assert!(
                output.contains(&format!("visibility={raw}")),
                "warning for {raw} does not name the value: {output:?}"
            );
        }
    }

    #[test]
    fn test_known_visibility_logs_nothing() {
        for v in [
            Visibility::Unspecified,
            Visibility::Hidden,
            Visibility::Visible,
            Visibility::ShowAll,
        ] {
            let output = warnings_for(v as i32);
            assert!(output.is_empty(), "unexpected log for {v:?}: {output:?}");
        }
    }

    #[test]
    fn test_hidden_only_filter() {
        let plan = build_list_query(
            LIST_RACES_QUERY,
            &request(vec![], Visibility::Hidden as i32, ""),
        );
        assert_eq!(plan.sql, format!("{LIST_RACES_QUERY} WHERE visible = false"));
    }

    #[test]
    fn test_meetings_and_visibility_joined_with_and() {
        let plan = build_list_query(
            LIST_RACES_QUERY,
            &request(vec![3, 7], Visibility::Visible as i32, "advertised_start_time"),
        );
        assert!(plan.sql.ends_with(
            " WHERE meeting_id IN (?,?) AND visible = true ORDER BY advertised_start_time"
        ));
        assert_eq!(plan.args, vec![3, 7]);
    }

    #[test]
    fn test_order_by_appended_verbatim() {
        let plan = build_list_query(
            LIST_RACES_QUERY,
            &ListRacesRequest {
                filter: None,
                order_by: "number DESC".to_string(),
            },
        );
        assert_eq!(plan.sql, format!("{LIST_RACES_QUERY} ORDER BY number DESC"));
    }

    #[test]
    fn test_blank_order_by_is_ignored() {
        for order_by in ["", "   ", "\t\n"] {
            let plan = build_list_query(
                LIST_RACES_QUERY,
                &ListRacesRequest {
                    filter: None,
                    order_by: order_by.to_string(),
                },
            );
            assert!(!plan.sql.contains("ORDER BY"));
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let req = request(vec![2, 1, 3], Visibility::Hidden as i32, "name");
        let first = build_list_query(LIST_RACES_QUERY, &req);
        let second = build_list_query(LIST_RACES_QUERY, &req);
        assert_eq!(first, second);
    }
}
