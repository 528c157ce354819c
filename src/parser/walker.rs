use tracing::{debug, trace};

use super::markup::MarkupEvent;
use super::normalize::{normalize, FieldKind};
use crate::schedule::{Day, EventDraft, WeekEvents};

const COURSE_TABLE_CLASS: &str = "programmation-panel-course-table";
const COURSE_TITLE_CLASS: &str = "course-title";
const COURSE_INFOS_CLASS: &str = "course-infos";
const PRINT_HEADER_CLASS: &str = "table-print-header";
const SECTION_MARKERS: &[&str] = &["Group lessons", "Lane swim"];

/// Where the walker stands in the course-table structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Outside,
    Table,
    Body,
    Row,
    Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Title,
    Info(Option<FieldKind>),
    Header,
}

/// A text-collecting element. Closes on the first `</tag>` seen at depth 0.
#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    tag: String,
    depth: u32,
    text: String,
}

impl Scope {
    fn new(kind: ScopeKind, tag: &str) -> Self {
        Scope {
            kind,
            tag: tag.to_string(),
            depth: 0,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub cells: usize,
    pub events: usize,
    pub empty_cells: usize,
    pub out_of_range: usize,
    pub sections: Vec<String>,
}

/// Stateful interpreter over `MarkupEvent`s. One walker per document.
#[derive(Debug)]
pub struct Walker {
    region: Region,
    nested_tables: u32,
    column: i32,
    draft: EventDraft,
    scope: Option<Scope>,
    /// Last "Group lessons" / "Lane swim" header seen. Not attached to events.
    section: Option<String>,
    events: WeekEvents,
    stats: WalkStats,
}

impl Walker {
    pub fn new() -> Self {
        Walker {
            region: Region::Outside,
            nested_tables: 0,
            column: -1,
            draft: EventDraft::default(),
            scope: None,
            section: None,
            events: WeekEvents::default(),
            stats: WalkStats::default(),
        }
    }

    pub fn handle(&mut self, event: MarkupEvent<'_>) {
        match event {
            MarkupEvent::Open { tag, classes } => self.open(&tag, &classes),
            MarkupEvent::Close { tag } => self.close(&tag),
            MarkupEvent::Text(text) => {
                if let Some(scope) = &mut self.scope {
                    scope.text.push_str(&text);
                }
            }
        }
    }

    pub fn finish(self) -> (WeekEvents, WalkStats) {
        if self.region == Region::Cell {
            debug!("Document ended inside a table cell, dropping it");
        }
        debug!(section = ?self.section, "Walk finished");
        (self.events, self.stats)
    }

    fn open(&mut self, tag: &str, classes: &[String]) {
        let has = |class: &str| classes.iter().any(|c| c == class);

        if let Some(scope) = self.scope.as_mut().filter(|s| s.tag == tag) {
            scope.depth += 1;
            if let ScopeKind::Info(kind) = &mut scope.kind {
                if kind.is_none() {
                    *kind = FieldKind::from_classes(classes);
                }
            }
            return;
        }

        match tag {
            "table" if self.region == Region::Outside => {
                if has(COURSE_TABLE_CLASS) {
                    self.region = Region::Table;
                    self.nested_tables = 0;
                }
            }
            "table" => self.nested_tables += 1,
            _ if self.nested_tables > 0 => {}
            "tbody" if self.region == Region::Table => self.region = Region::Body,
            "tr" if matches!(self.region, Region::Body | Region::Row | Region::Cell) => {
                self.reset_cell();
                self.region = Region::Row;
                self.column = -1;
            }
            "td" if matches!(self.region, Region::Row | Region::Cell) => {
                self.reset_cell();
                self.region = Region::Cell;
                self.column += 1;
                self.stats.cells += 1;
            }
            "th" if has(PRINT_HEADER_CLASS) && self.scope.is_none() => {
                self.scope = Some(Scope::new(ScopeKind::Header, tag));
            }
            _ if self.region == Region::Cell && self.scope.is_none() => {
                if has(COURSE_TITLE_CLASS) {
                    self.scope = Some(Scope::new(ScopeKind::Title, tag));
                } else if has(COURSE_INFOS_CLASS) {
                    self.scope = Some(Scope::new(ScopeKind::Info(None), tag));
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: &str) {
        if self.scope.as_ref().is_some_and(|s| s.tag == tag) {
            if let Some(scope) = self.scope.as_mut().filter(|s| s.depth > 0) {
                scope.depth -= 1;
            } else if let Some(scope) = self.scope.take() {
                self.close_scope(scope);
            }
            return;
        }

        match tag {
            "table" if self.nested_tables > 0 => self.nested_tables -= 1,
            "table" if self.region != Region::Outside => {
                self.reset_cell();
                self.region = Region::Outside;
            }
            _ if self.nested_tables > 0 => {}
            "td" if self.region == Region::Cell => {
                self.finish_cell();
                self.region = Region::Row;
            }
            "tr" if matches!(self.region, Region::Row | Region::Cell) => {
                self.reset_cell();
                self.region = Region::Body;
            }
            "tbody" if matches!(self.region, Region::Body | Region::Row | Region::Cell) => {
                self.reset_cell();
                self.region = Region::Table;
            }
            _ => {}
        }
    }

    fn close_scope(&mut self, scope: Scope) {
        let text = scope.text.trim();
        match scope.kind {
            ScopeKind::Title => {
                if !text.is_empty() {
                    self.draft.activity = Some(text.to_string());
                }
            }
            ScopeKind::Info(Some(kind)) => match normalize(kind, text) {
                Some(value) => value.apply(&mut self.draft),
                None => trace!("Ignoring {:?} text {:?}", kind, text),
            },
            ScopeKind::Info(None) => trace!("Ignoring info without icon: {:?}", text),
            ScopeKind::Header => {
                if SECTION_MARKERS.iter().any(|m| text.contains(m)) {
                    debug!("Entering section {:?}", text);
                    self.stats.sections.push(text.to_string());
                    self.section = Some(text.to_string());
                }
            }
        }
    }

    fn finish_cell(&mut self) {
        let draft = std::mem::take(&mut self.draft);
        self.scope = None;
        let Some(event) = draft.finish() else {
            self.stats.empty_cells += 1;
            return;
        };
        match Day::from_column(self.column) {
            Some(day) => {
                self.events.push(day, event);
                self.stats.events += 1;
            }
            None => {
                debug!("Dropping {:?} from column {}", event.activity, self.column);
                self.stats.out_of_range += 1;
            }
        }
    }

    /// Forget the cell in progress without emitting it.
    fn reset_cell(&mut self) {
        self.draft = EventDraft::default();
        self.scope = None;
    }
}

// ── Tests ──
