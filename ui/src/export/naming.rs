//! File names for exported charts.

use time::{macros::format_description, OffsetDateTime};

const SINGLE_PREFIX: &str = "feedback_radar_chart";

/// Lowercase, every run of characters outside `[a-z0-9]` collapsed into a
/// single `_`, no leading or trailing `_`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }
    out
}

/// `YYYY-MM-DD`
pub fn date_stamp(now: OffsetDateTime) -> String {
    now.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "export".into())
}

/// `HH-MM-SS`
pub fn time_stamp(now: OffsetDateTime) -> String {
    now.format(&format_description!("[hour]-[minute]-[second]"))
        .unwrap_or_else(|_| "000000".into())
}

/// Local wall-clock time, UTC when the offset cannot be determined.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `feedback_radar_chart_<slug>_<date>_<time>.<ext>`; the slug segment is
/// dropped when the name has no usable characters.
pub fn single_export_filename(person: &str, extension: &str, now: OffsetDateTime) -> String {
    let slug = slug(person);
    let date = date_stamp(now);
    let time = time_stamp(now);
    if slug.is_empty() {
        format!("{SINGLE_PREFIX}_{date}_{time}.{extension}")
    } else {
        format!("{SINGLE_PREFIX}_{slug}_{date}_{time}.{extension}")
    }
}

/// `<date>_<slug>.png`
pub fn batch_export_filename(person: &str, now: OffsetDateTime) -> String {
    format!("{}_{}.png", date_stamp(now), slug(person))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slug("Anna-Marie  de Vries"), "anna_marie_de_vries");
        assert_eq!(slug("  __Jan__ "), "jan");
        assert_eq!(slug("O'Brien, P."), "o_brien_p");
        assert_eq!(slug("Team 42"), "team_42");
    }

    #[test]
    fn slug_of_symbols_is_empty() {
        assert_eq!(slug("!!! ???"), "");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(slug("José Ümit"), "jos_mit");
    }

    #[test]
    fn single_filename_has_date_and_time() {
        let now = datetime!(2024-03-05 14:07:09 UTC);
        assert_eq!(
            single_export_filename("Jan Jansen", "svg", now),
            "feedback_radar_chart_jan_jansen_2024-03-05_14-07-09.svg"
        );
        assert_eq!(
            single_export_filename("***", "png", now),
            "feedback_radar_chart_2024-03-05_14-07-09.png"
        );
    }

    #[test]
    fn batch_filename_is_date_then_slug() {
        let now = datetime!(2024-11-30 08:00:00 UTC);
        assert_eq!(batch_export_filename("Piet Pietersen", now), "2024-11-30_piet_pietersen.png");
    }
}
