use catalog_core::{
    FetchPhase, ListViewModel, Notification, NotificationLevel, Record, RecordRowView,
};
use chrono::NaiveTime;

use super::constants::*;
use super::layout::{fit, row, sortable_label};

/// Lines to print for `view`, given what was last shown. The table is only
/// reprinted when its content or sort markers changed.
pub fn render(view: &ListViewModel, previous: Option<&ListViewModel>) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(prev) = previous {
        if prev.genre_options != view.genre_options && !view.genre_options.is_empty() {
            lines.push(format!("genres: {}", view.genre_options.join(", ")));
        }
    }

    let entered_flight = matches!(view.phase, FetchPhase::InFlight(_))
        && previous.map_or(true, |prev| prev.phase != view.phase);
    if entered_flight {
        lines.push("loading games…".to_string());
    }

    let table_changed = previous.map_or(true, |prev| {
        prev.rows != view.rows
            || prev.name_sort != view.name_sort
            || prev.release_date_sort != view.release_date_sort
    });
    if table_changed {
        lines.extend(table(view));
    }
    lines
}

pub fn table(view: &ListViewModel) -> Vec<String> {
    let mut lines = vec![summary(view)];
    let name = sortable_label("Name", view.name_sort);
    let released = sortable_label("Released", view.release_date_sort);
    let header = row(&[
        ("Id", ID_WIDTH),
        (name.as_str(), NAME_WIDTH),
        ("Genre", GENRE_WIDTH),
        (released.as_str(), RELEASE_WIDTH),
        ("Steam", STEAM_WIDTH),
        ("Status", STATUS_WIDTH),
        ("Description", DESCRIPTION_WIDTH),
    ]);
    lines.push(header.clone());
    lines.push("-".repeat(header.chars().count()));

    if view.rows.is_empty() {
        lines.push("(no games match)".to_string());
    }
    lines.extend(view.rows.iter().map(format_row));
    lines
}

fn summary(view: &ListViewModel) -> String {
    let count = view.rows.len();
    let noun = if count == 1 { "game" } else { "games" };
    format!(
        "{count} {noun} | search: '{}' | genre: {} | status: {}",
        view.search,
        or_all(&view.genre),
        or_all(&view.status)
    )
}

fn or_all(value: &str) -> &str {
    if value.is_empty() {
        "all"
    } else {
        value
    }
}

fn format_row(record: &RecordRowView) -> String {
    let id = record.id.to_string();
    let steam = record
        .steam_app_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    row(&[
        (id.as_str(), ID_WIDTH),
        (record.name.as_str(), NAME_WIDTH),
        (record.genre.as_str(), GENRE_WIDTH),
        (record.release_date.as_str(), RELEASE_WIDTH),
        (steam.as_str(), STEAM_WIDTH),
        (record.status.as_str(), STATUS_WIDTH),
        (record.description.as_str(), DESCRIPTION_WIDTH),
    ])
}

pub fn notification_line(notification: &Notification, at: NaiveTime) -> String {
    let marker = match notification.level {
        NotificationLevel::Success => "✔",
        NotificationLevel::Error => "✖",
    };
    format!(
        "[{}] {marker} {}",
        at.format("%H:%M:%S"),
        notification.message
    )
}

pub fn record_detail(record: &Record) -> Vec<String> {
    let mut lines = vec![format!("#{} {}", record.id, record.name)];
    let fields = [
        ("genre", record.genre.as_deref()),
        ("released", record.release_date.as_deref()),
        ("status", Some(record.enrichment_status.as_str())),
    ];
    for (label, value) in fields {
        lines.push(format!("  {}{}", fit(&format!("{label}:"), 10), value.unwrap_or("-")));
    }
    let steam = record
        .steam_app_id
        .map(|id| format!("https://store.steampowered.com/app/{id}"))
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("  {}{}", fit("steam:", 10), steam));
    if let Some(description) = &record.short_description {
        lines.push(format!("  {description}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{EnrichmentStatus, SortIcon};

    fn view_with(rows: Vec<RecordRowView>) -> ListViewModel {
        ListViewModel {
            rows,
            ..ListViewModel::default()
        }
    }

    fn halo_row() -> RecordRowView {
        RecordRowView {
            id: 1,
            name: "Halo".to_string(),
            genre: "Shooter".to_string(),
            release_date: "2001-11-15".to_string(),
            steam_app_id: Some(976730),
            status: EnrichmentStatus::Done,
            description: String::new(),
        }
    }

    #[test]
    fn first_render_prints_the_table() {
        let lines = render(&view_with(vec![halo_row()]), None);
        assert_eq!(lines[0], "1 game | search: '' | genre: all | status: all");
        assert!(lines[1].starts_with("Id"));
        assert!(lines[3].contains("Halo"));
        assert!(lines[3].contains("976730"));
    }

    #[test]
    fn unchanged_rows_are_not_reprinted() {
        let view = view_with(vec![halo_row()]);
        let mut next = view.clone();
        next.search = "hal".to_string();
        assert!(render(&next, Some(&view)).is_empty());
    }

    #[test]
    fn flight_and_sort_markers() {
        let view = view_with(Vec::new());
        let mut next = view.clone();
        next.phase = FetchPhase::InFlight(4);
        next.name_sort = SortIcon::Descending;

        let lines = render(&next, Some(&view));
        assert_eq!(lines[0], "loading games…");
        assert!(lines[2].contains("Name ▼"));
        assert_eq!(lines.last().map(String::as_str), Some("(no games match)"));
    }

    #[test]
    fn notifications_are_timestamped() {
        let at = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert_eq!(
            notification_line(&Notification::enriched("Halo"), at),
            "[09:05:07] ✔ ‘Halo’ has been enriched with the latest data."
        );
        assert_eq!(
            notification_line(&Notification::fetch_failed("timeout: timed out"), at),
            "[09:05:07] ✖ Failed to load games: timeout: timed out"
        );
    }

    #[test]
    fn detail_links_to_steam() {
        let record = Record {
            id: 2,
            name: "Portal".to_string(),
            steam_app_id: Some(400),
            genre: None,
            enrichment_status: EnrichmentStatus::Pending,
            release_date: None,
            short_description: None,
        };
        let lines = record_detail(&record);
        assert_eq!(lines[0], "#2 Portal");
        assert_eq!(lines[1], "  genre:    -");
        assert_eq!(lines[4], "  steam:    https://store.steampowered.com/app/400");
    }
}
