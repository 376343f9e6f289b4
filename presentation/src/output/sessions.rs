//! Session list formatting

use colored::Colorize;
use parley_domain::Session;

/// Formats the session table for `parley sessions`
pub struct SessionListFormatter;

impl SessionListFormatter {
    pub fn format(sessions: &[Session]) -> String {
        if sessions.is_empty() {
            return format!("{}\n", "No sessions yet.".dimmed());
        }

        sessions
            .iter()
            .map(|session| {
                format!(
                    "{}  {}  {}\n",
                    session.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    session.id.as_str().cyan(),
                    session.title
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use parley_domain::{SessionId, SessionTitle};

    fn session(id: &str, title: &str, day: u32) -> Session {
        Session {
            id: SessionId::new(id).unwrap(),
            title: SessionTitle::new(title).unwrap(),
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_no_sessions() {
        colored::control::set_override(false);
        assert_eq!(SessionListFormatter::format(&[]), "No sessions yet.\n");
    }

    #[test]
    fn test_one_line_per_session_in_given_order() {
        colored::control::set_override(false);
        let text = SessionListFormatter::format(&[
            session("s-2", "Running plan", 2),
            session("s-1", "Water intake", 1),
        ]);
        assert_eq!(
            text,
            "2026-03-02 08:00  s-2  Running plan\n2026-03-01 08:00  s-1  Water intake\n"
        );
    }
}
