use crate::domain::model::{keys, TrialRecord};
use crate::utils::error::{ConsoleError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// 空列表時的顯示文字
pub const NO_DATA: &str = "데이터가 없습니다.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub fn as_usize(&self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ConsoleError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            10 => Ok(PageSize::Ten),
            25 => Ok(PageSize::TwentyFive),
            50 => Ok(PageSize::Fifty),
            100 => Ok(PageSize::Hundred),
            other => Err(ConsoleError::InvalidConfigValueError {
                field: "page_size".to_string(),
                value: other.to_string(),
                reason: "Page size must be one of 10, 25, 50, 100".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    pub page_index: usize,
    pub page_size: PageSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub column: String,
    pub descending: bool,
}

/// 排序欄位，依優先順序排列；畫面上一次只會有一個
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub entries: Vec<SortEntry>,
}

impl SortState {
    pub fn by(column: impl Into<String>, descending: bool) -> Self {
        Self {
            entries: vec![SortEntry {
                column: column.into(),
                descending,
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Some(true) 表示遞減
    pub fn direction_of(&self, column: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.descending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub header: String,
}

impl Column {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
        }
    }

    pub fn same(key: &str) -> Self {
        Self::new(key, key)
    }
}

pub fn default_columns() -> Vec<Column> {
    vec![
        Column::same(keys::INFLOW_MONTH),
        Column::same(keys::SIGNUP_DATE),
        Column::same(keys::COMPANY),
        Column::same(keys::MARKETING_CONSENT),
        Column::same(keys::PHONE),
        Column::same(keys::MANAGER),
        Column::same(keys::EMAIL),
        Column::same(keys::TEST_FLAG),
        Column::same(keys::CONTACT_1),
        Column::same(keys::CONTACT_2),
        Column::same(keys::CONTACT_3),
        Column::new(keys::D7_1, "D7(1)"),
        Column::new(keys::M1_1, "M1(1)"),
        Column::new(keys::D7_2, "D7(2)"),
        Column::new(keys::M1_2, "M1(2)"),
        Column::same(keys::END_DATE),
        Column::new(keys::SHEET, "시트"),
    ]
}

/// 目前頁面的可見資料
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub rows: Vec<&'a TrialRecord>,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total: usize,
}

impl PageView<'_> {
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    /// 沒有資料時顯示 1，避免出現 "1 / 0"
    pub fn display_page_count(&self) -> usize {
        self.page_count.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// 排序用的值。缺值/空白不在這裡，一律排最後
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Date(NaiveDateTime),
    Number(f64),
    Text(String),
    Bool(bool),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Date(_) => 0,
            SortValue::Number(_) => 1,
            SortValue::Text(_) => 2,
            SortValue::Bool(_) => 3,
        }
    }

    fn classify(value: Option<&Value>) -> Option<SortValue> {
        match value? {
            Value::Null => None,
            Value::Bool(b) => Some(SortValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(SortValue::Number),
            Value::String(s) => Self::classify_text(s),
            other => Some(SortValue::Text(other.to_string())),
        }
    }

    fn classify_text(raw: &str) -> Option<SortValue> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if let Some(date) = parse_date(s) {
            return Some(SortValue::Date(date));
        }
        if let Some(number) = parse_number(s) {
            return Some(SortValue::Number(number));
        }
        Some(SortValue::Text(s.to_string()))
    }

    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// 不分大小寫，數字段依數值比；相同時再用原字串決定順序
fn compare_text(a: &str, b: &str) -> Ordering {
    natural_cmp(a, b).then_with(|| a.cmp(b))
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let (x, y) = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => (x, y),
        };

        let ord = if x.is_ascii_digit() && y.is_ascii_digit() {
            let l = take_digits(&mut left);
            let r = take_digits(&mut right);
            let l = l.trim_start_matches('0');
            let r = r.trim_start_matches('0');
            l.len().cmp(&r.len()).then_with(|| l.cmp(r))
        } else {
            left.next();
            right.next();
            x.to_lowercase().cmp(y.to_lowercase())
        };

        if ord != Ordering::Equal {
            return ord;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%m/%d/%Y"];

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// 數字或百分比（"12.5%"、"1,200"）
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim_end_matches('%').chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn compare_records(a: &TrialRecord, b: &TrialRecord, sort: &SortState) -> Ordering {
    for entry in &sort.entries {
        let val_a = SortValue::classify(a.get(&entry.column));
        let val_b = SortValue::classify(b.get(&entry.column));

        let cmp = match (val_a, val_b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let base = x.compare(&y);
                if entry.descending {
                    base.reverse()
                } else {
                    base
                }
            }
        };

        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    Ordering::Equal
}

/// 穩定排序後的完整結果
pub fn sorted<'a>(records: &'a [TrialRecord], sort: &SortState) -> Vec<&'a TrialRecord> {
    let mut rows: Vec<&TrialRecord> = records.iter().collect();
    if !sort.is_empty() {
        rows.sort_by(|a, b| compare_records(a, b, sort));
    }
    rows
}

/// (records, sort, page) -> 可見的那一頁
pub fn paginate<'a>(records: &'a [TrialRecord], sort: &SortState, page: &PageState) -> PageView<'a> {
    let page_size = page.page_size.as_usize();
    let total = records.len();
    let start = page.page_index.saturating_mul(page_size);

    let rows = if start >= total {
        Vec::new()
    } else {
        sorted(records, sort)
            .into_iter()
            .skip(start)
            .take(page_size)
            .collect()
    };

    PageView {
        rows,
        page_index: page.page_index,
        page_size,
        page_count: page_count(total, page_size),
        total,
    }
}

pub type RowClickHandler = Box<dyn FnMut(&TrialRecord) + Send>;

/// 列表表格：自己管分頁，排序狀態由上層持有
pub struct ResultTable {
    columns: Vec<Column>,
    page: PageState,
    on_row_click: Option<RowClickHandler>,
}

impl std::fmt::Debug for ResultTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultTable")
            .field("columns", &self.columns)
            .field("page", &self.page)
            .field("on_row_click", &self.on_row_click.is_some())
            .finish()
    }
}

impl Default for ResultTable {
    fn default() -> Self {
        Self::new(default_columns())
    }
}

impl ResultTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            page: PageState::default(),
            on_row_click: None,
        }
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page.page_size = page_size;
        self
    }

    pub fn with_row_click(mut self, handler: RowClickHandler) -> Self {
        self.on_row_click = Some(handler);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn view<'a>(&self, records: &'a [TrialRecord], sorting: &SortState) -> PageView<'a> {
        paginate(records, sorting, &self.page)
    }

    /// 資料換了就回第一頁
    pub fn records_changed(&mut self) {
        self.page.page_index = 0;
    }

    pub fn set_sorting(&mut self, sorting: &mut SortState, next: SortState) {
        *sorting = next;
        self.page.page_index = 0;
    }

    /// 點欄位標題：無 → 遞增 → 遞減 → 無；換欄位時取代原本的排序
    /// 第一次點一律遞增，不看欄位型別
    pub fn toggle_sort(&mut self, sorting: &mut SortState, column: &str) {
        let next = match sorting.direction_of(column) {
            None => SortState::by(column, false),
            Some(false) => SortState::by(column, true),
            Some(true) => SortState::default(),
        };
        tracing::debug!("Sort on '{}' changed to {:?}", column, next.entries.first());
        self.set_sorting(sorting, next);
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page.page_size = page_size;
        self.page.page_index = 0;
    }

    pub fn page_count(&self, total: usize) -> usize {
        page_count(total, self.page.page_size.as_usize())
    }

    pub fn first_page(&mut self) {
        self.page.page_index = 0;
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page.page_index == 0 {
            return false;
        }
        self.page.page_index -= 1;
        true
    }

    pub fn next_page(&mut self, total: usize) -> bool {
        if self.page.page_index + 1 >= self.page_count(total) {
            return false;
        }
        self.page.page_index += 1;
        true
    }

    pub fn last_page(&mut self, total: usize) -> bool {
        let count = self.page_count(total);
        if self.page.page_index + 1 >= count {
            return false;
        }
        self.page.page_index = count - 1;
        true
    }

    /// 跳到指定頁（0 起算），超出範圍時不動
    pub fn go_to_page(&mut self, page_index: usize, total: usize) -> bool {
        if page_index >= self.page_count(total) {
            return false;
        }
        self.page.page_index = page_index;
        true
    }

    /// 點選可見的第 n 列，通知 row-click handler 並回傳完整記錄
    pub fn activate_row(
        &mut self,
        records: &[TrialRecord],
        sorting: &SortState,
        visible_index: usize,
    ) -> Option<TrialRecord> {
        let record = paginate(records, sorting, &self.page)
            .rows
            .get(visible_index)
            .map(|r| (*r).clone())?;

        if let Some(handler) = self.on_row_click.as_mut() {
            handler(&record);
        }
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn records(n: usize) -> Vec<TrialRecord> {
        (0..n)
            .map(|i| TrialRecord::from(json!({"_id": format!("트라이얼(Y):{}", i + 2), "n": i})))
            .collect()
    }

    fn column_values<'a>(rows: &[&'a TrialRecord], key: &str) -> Vec<Option<&'a Value>> {
        rows.iter().copied().map(|r| r.get(key)).collect()
    }

    #[test]
    fn test_page_count_and_last_page_size() {
        let data = records(123);
        let mut table = ResultTable::default().with_page_size(PageSize::TwentyFive);
        let sorting = SortState::default();

        assert_eq!(table.view(&data, &sorting).page_count, 5);
        assert!(table.last_page(data.len()));

        let last = table.view(&data, &sorting);
        assert_eq!(last.page_index, 4);
        assert_eq!(last.rows.len(), 23);
        assert!(!last.can_next());
    }

    #[test]
    fn test_evenly_divisible_last_page_is_full() {
        let data = records(50);
        let mut table = ResultTable::default().with_page_size(PageSize::TwentyFive);
        table.last_page(data.len());

        let view = table.view(&data, &SortState::default());
        assert_eq!(view.page_count, 2);
        assert_eq!(view.rows.len(), 25);
    }

    #[test]
    fn test_empty_records_show_one_page() {
        let table = ResultTable::default();
        let view = table.view(&[], &SortState::default());

        assert!(view.is_empty());
        assert_eq!(view.page_count, 0);
        assert_eq!(view.display_page_count(), 1);
        assert!(!view.can_previous());
        assert!(!view.can_next());
    }

    #[test]
    fn test_next_is_noop_on_last_page() {
        let data = records(12);
        let mut table = ResultTable::default();

        assert!(table.next_page(data.len()));
        assert!(!table.next_page(data.len()));
        assert_eq!(table.page().page_index, 1);
        assert!(table.previous_page());
        assert!(!table.previous_page());
    }

    #[test]
    fn test_toggle_sort_cycles_and_resets_page() {
        let data = records(30);
        let mut table = ResultTable::default();
        let mut sorting = SortState::default();
        table.go_to_page(2, data.len());

        table.toggle_sort(&mut sorting, "n");
        assert_eq!(sorting, SortState::by("n", false));
        assert_eq!(table.page().page_index, 0);

        table.next_page(data.len());
        table.toggle_sort(&mut sorting, "n");
        assert_eq!(sorting, SortState::by("n", true));
        assert_eq!(table.page().page_index, 0);

        table.toggle_sort(&mut sorting, "n");
        assert!(sorting.is_empty());
    }

    #[test]
    fn test_toggle_other_column_replaces_sort() {
        let mut table = ResultTable::default();
        let mut sorting = SortState::by("회사명", true);

        table.toggle_sort(&mut sorting, "가입일");
        assert_eq!(sorting, SortState::by("가입일", false));
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let data = records(40);
        let mut table = ResultTable::default();
        table.go_to_page(3, data.len());

        table.set_page_size(PageSize::Fifty);
        assert_eq!(table.page().page_index, 0);
        assert_eq!(table.view(&data, &SortState::default()).rows.len(), 40);
    }

    #[test]
    fn test_records_changed_resets_page() {
        let mut table = ResultTable::default();
        table.go_to_page(1, 20);
        table.records_changed();
        assert_eq!(table.page().page_index, 0);
    }

    #[test]
    fn test_missing_and_blank_values_sort_last_both_directions() {
        let data = vec![
            TrialRecord::from(json!({"k": "b"})),
            TrialRecord::from(json!({})),
            TrialRecord::from(json!({"k": "  "})),
            TrialRecord::from(json!({"k": "a"})),
            TrialRecord::from(json!({"k": null})),
        ];

        let asc = sorted(&data, &SortState::by("k", false));
        let desc = sorted(&data, &SortState::by("k", true));

        assert_eq!(asc[0].get("k"), Some(&json!("a")));
        assert_eq!(asc[1].get("k"), Some(&json!("b")));
        assert_eq!(desc[0].get("k"), Some(&json!("b")));
        assert_eq!(desc[1].get("k"), Some(&json!("a")));
        // 缺值保持原本相對順序
        assert_eq!(asc[2].get("k"), None);
        assert_eq!(asc[3].get("k"), Some(&json!("  ")));
        assert_eq!(asc[4].get("k"), Some(&json!(null)));
    }

    #[test]
    fn test_dates_compare_chronologically_across_formats() {
        let data = vec![
            TrialRecord::from(json!({"가입일": "2024.03.01"})),
            TrialRecord::from(json!({"가입일": "2023-12-31"})),
            TrialRecord::from(json!({"가입일": "2024/01/15"})),
        ];

        let rows = sorted(&data, &SortState::by("가입일", false));
        assert_eq!(
            column_values(&rows, "가입일"),
            vec![
                Some(&json!("2023-12-31")),
                Some(&json!("2024/01/15")),
                Some(&json!("2024.03.01")),
            ]
        );
    }

    #[test]
    fn test_numeric_strings_and_percentages_compare_numerically() {
        let data = vec![
            TrialRecord::from(json!({"D7_1": "9%"})),
            TrialRecord::from(json!({"D7_1": "10%"})),
            TrialRecord::from(json!({"D7_1": 2})),
            TrialRecord::from(json!({"D7_1": "1,200"})),
        ];

        let rows = sorted(&data, &SortState::by("D7_1", false));
        assert_eq!(
            column_values(&rows, "D7_1"),
            vec![
                Some(&json!(2)),
                Some(&json!("9%")),
                Some(&json!("10%")),
                Some(&json!("1,200")),
            ]
        );
    }

    #[test]
    fn test_text_compares_digit_runs_by_value() {
        let data = vec![
            TrialRecord::from(json!({"k": "회사 10"})),
            TrialRecord::from(json!({"k": "회사 2"})),
            TrialRecord::from(json!({"k": "회사 1"})),
        ];

        let rows = sorted(&data, &SortState::by("k", false));
        assert_eq!(
            column_values(&rows, "k"),
            vec![Some(&json!("회사 1")), Some(&json!("회사 2")), Some(&json!("회사 10"))]
        );
    }

    #[test]
    fn test_text_ignores_case_with_stable_tie_break() {
        let data = vec![
            TrialRecord::from(json!({"k": "banana"})),
            TrialRecord::from(json!({"k": "apple"})),
            TrialRecord::from(json!({"k": "Apple"})),
            TrialRecord::from(json!({"k": "Cherry"})),
        ];

        let rows = sorted(&data, &SortState::by("k", false));
        assert_eq!(
            column_values(&rows, "k"),
            vec![
                Some(&json!("Apple")),
                Some(&json!("apple")),
                Some(&json!("banana")),
                Some(&json!("Cherry")),
            ]
        );

        let rows = sorted(&data, &SortState::by("k", true));
        assert_eq!(rows[0].get("k"), Some(&json!("Cherry")));
        assert_eq!(rows[3].get("k"), Some(&json!("Apple")));
    }

    #[test]
    fn test_leading_zeros_do_not_change_digit_order() {
        assert_eq!(natural_cmp("v007", "v7"), Ordering::Equal);
        assert_eq!(compare_text("v007", "v7"), Ordering::Less);
        assert_eq!(natural_cmp("a9b", "a10b"), Ordering::Less);
    }

    #[test]
    fn test_mixed_kinds_order_by_kind() {
        let data = vec![
            TrialRecord::from(json!({"v": "text"})),
            TrialRecord::from(json!({"v": 5})),
            TrialRecord::from(json!({"v": "2024-01-01"})),
        ];

        let rows = sorted(&data, &SortState::by("v", false));
        assert_eq!(
            column_values(&rows, "v"),
            vec![Some(&json!("2024-01-01")), Some(&json!(5)), Some(&json!("text"))]
        );
    }

    #[test]
    fn test_activate_row_notifies_with_full_record() {
        let clicked: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicked);
        let mut table = ResultTable::default().with_row_click(Box::new(move |record| {
            if let Some(id) = record.id() {
                sink.lock().unwrap().push(id.to_string());
            }
        }));

        let data = records(15);
        table.next_page(data.len());
        let record = table.activate_row(&data, &SortState::default(), 2).unwrap();

        assert_eq!(record.id(), Some("트라이얼(Y):14"));
        assert_eq!(*clicked.lock().unwrap(), vec!["트라이얼(Y):14".to_string()]);
        assert!(table.activate_row(&data, &SortState::default(), 9).is_none());
    }

    #[test]
    fn test_page_size_rejects_unknown_values() {
        assert_eq!(PageSize::try_from(25).unwrap(), PageSize::TwentyFive);
        assert!(PageSize::try_from(20).is_err());
        assert_eq!(PAGE_SIZES.map(|s| PageSize::try_from(s).unwrap().as_usize()), PAGE_SIZES);
    }
}
