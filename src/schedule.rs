use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const SOURCE: &str = "YMCA Saint-Roch (Québec)";

pub const NOTES: &str = "The YMCA reserves the right to cancel classes if there are fewer than 10 participants. \
The instructor may be changed without notice. \
Lane Swim (City) sessions have no membership requirement and may be more crowded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Course tables list days left to right, Monday first.
    pub fn from_column(col: i32) -> Option<Day> {
        usize::try_from(col).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub activity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lanes: Option<u32>,
}

/// Fields collected for the table cell currently being read.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub activity: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub intensity: Option<String>,
    pub lanes: Option<u32>,
}

impl EventDraft {
    /// A cell without a title is not an event.
    pub fn finish(self) -> Option<Event> {
        let activity = self.activity.filter(|a| !a.is_empty())?;
        Some(Event {
            activity,
            start: self.start,
            end: self.end,
            location: self.location,
            instructor: self.instructor,
            intensity: self.intensity,
            lanes: self.lanes,
        })
    }
}

/// One ordered event list per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekEvents {
    days: [Vec<Event>; 7],
}

impl WeekEvents {
    pub fn push(&mut self, day: Day, event: Event) {
        self.days[day.index()].push(event);
    }

    pub fn day(&self, day: Day) -> &[Event] {
        &self.days[day.index()]
    }

    pub fn total(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    /// Stable sort by start time; events without a start go last.
    pub fn sort_by_start(&mut self) {
        for events in &mut self.days {
            events.sort_by(|a, b| match (&a.start, &b.start) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
        }
    }
}

impl Serialize for WeekEvents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Day::ALL.len()))?;
        for day in Day::ALL {
            map.serialize_entry(day.name(), self.day(day))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub season: String,
    pub start_date: String,
    pub end_date: String,
    pub source: String,
    pub notes: String,
}

impl Default for Meta {
    fn default() -> Self {
        Meta {
            season: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            source: SOURCE.to_string(),
            notes: NOTES.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub meta: Meta,
    pub events: WeekEvents,
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn event(activity: &str, start: Option<&str>) -> Event {
        Event {
            activity: activity.to_string(),
            start: start.map(str::to_string),
            end: None,
            location: None,
            instructor: None,
            intensity: None,
            lanes: None,
        }
    }

    #[test]
    fn column_to_day() {
        assert_eq!(Day::from_column(0), Some(Day::Monday));
        assert_eq!(Day::from_column(6), Some(Day::Sunday));
        assert_eq!(Day::from_column(7), None);
        assert_eq!(Day::from_column(-1), None);
    }

    #[test]
    fn draft_without_activity_is_dropped() {
        let draft = EventDraft {
            start: Some("09:00".into()),
            ..Default::default()
        };
        assert!(draft.finish().is_none());

        let empty = EventDraft {
            activity: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.finish().is_none());
    }

    #[test]
    fn sort_keeps_missing_start_last_and_stable() {
        let mut week = WeekEvents::default();
        week.push(Day::Monday, event("no time A", None));
        week.push(Day::Monday, event("late", Some("18:00")));
        week.push(Day::Monday, event("early 1", Some("07:00")));
        week.push(Day::Monday, event("no time B", None));
        week.push(Day::Monday, event("early 2", Some("07:00")));
        week.sort_by_start();

        let order: Vec<&str> = week.day(Day::Monday).iter().map(|e| e.activity.as_str()).collect();
        assert_eq!(order, ["early 1", "early 2", "late", "no time A", "no time B"]);
    }

    #[test]
    fn week_serializes_all_days_in_order() {
        let json = serde_json::to_string(&WeekEvents::default()).unwrap();
        assert_eq!(
            json,
            r#"{"Monday":[],"Tuesday":[],"Wednesday":[],"Thursday":[],"Friday":[],"Saturday":[],"Sunday":[]}"#
        );
    }

    #[test]
    fn unset_fields_are_omitted() {
        let json = serde_json::to_value(event("Aquafit", Some("09:00"))).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(!obj.contains_key("lanes"));
        assert!(!obj.contains_key("end"));
    }
}
