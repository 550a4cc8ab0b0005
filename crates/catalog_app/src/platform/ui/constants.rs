pub const ID_WIDTH: usize = 5;
pub const NAME_WIDTH: usize = 30;
pub const GENRE_WIDTH: usize = 14;
pub const RELEASE_WIDTH: usize = 14;
pub const STEAM_WIDTH: usize = 9;
pub const STATUS_WIDTH: usize = 11;
pub const DESCRIPTION_WIDTH: usize = 40;

pub const COLUMN_GAP: &str = "  ";
pub const ELLIPSIS: char = '…';

pub const SORT_ASCENDING: &str = "▲";
pub const SORT_DESCENDING: &str = "▼";
