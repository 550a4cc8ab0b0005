use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    ReleaseDate,
}

impl SortColumn {
    pub const ALL: [SortColumn; 2] = [SortColumn::Name, SortColumn::ReleaseDate];

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::ReleaseDate => "release_date",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(SortColumn::Name),
            "release_date" => Some(SortColumn::ReleaseDate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortRule {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl fmt::Display for SortRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column.as_str(), self.direction.as_str())
    }
}

/// Marker shown next to a sortable column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortIcon {
    Ascending,
    Descending,
    #[default]
    None,
}

/// Ordered sort rules, at most one per column. Position is precedence: the first
/// rule is the primary sort key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortRuleSet {
    rules: Vec<SortRule>,
}

impl SortRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cycles `column` through none -> asc -> desc -> none. Other rules keep their
    /// position and direction.
    pub fn toggle(&mut self, column: SortColumn) {
        match self.rules.iter().position(|rule| rule.column == column) {
            None => self.rules.push(SortRule {
                column,
                direction: SortDirection::Asc,
            }),
            Some(index) => match self.rules[index].direction {
                SortDirection::Asc => self.rules[index].direction = SortDirection::Desc,
                SortDirection::Desc => {
                    self.rules.remove(index);
                }
            },
        }
    }

    pub fn icon_for(&self, column: SortColumn) -> SortIcon {
        match self.rule_for(column).map(|rule| rule.direction) {
            Some(SortDirection::Asc) => SortIcon::Ascending,
            Some(SortDirection::Desc) => SortIcon::Descending,
            None => SortIcon::None,
        }
    }

    pub fn rule_for(&self, column: SortColumn) -> Option<&SortRule> {
        self.rules.iter().find(|rule| rule.column == column)
    }

    pub fn rules(&self) -> &[SortRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// `column:direction` pairs joined by commas, in precedence order.
    pub fn to_sort_param(&self) -> String {
        self.rules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
