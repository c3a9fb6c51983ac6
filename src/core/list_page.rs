use crate::core::filter_form::FilterForm;
use crate::core::notice::Notice;
use crate::core::table::{PageSize, PageView, ResultTable, SortState};
use crate::domain::filter::FilterParams;
use crate::domain::model::TrialRecord;
use crate::domain::ports::TrialApi;
use crate::utils::error::Result;
use std::sync::Arc;

/// 試用客戶列表：篩選 → 載入 → 表格
pub struct TrialListPage<A: TrialApi> {
    api: Arc<A>,
    form: FilterForm,
    items: Vec<TrialRecord>,
    sorting: SortState,
    table: ResultTable,
    notices: Vec<Notice>,
}

impl<A: TrialApi> TrialListPage<A> {
    pub fn new(api: Arc<A>, table: ResultTable) -> Self {
        Self {
            api,
            form: FilterForm::default(),
            items: Vec::new(),
            sorting: SortState::default(),
            table,
            notices: Vec::new(),
        }
    }

    /// 第一次進入頁面：不帶任何參數載入
    pub async fn load_initial(&mut self) -> Result<usize> {
        self.load(FilterParams::new()).await
    }

    /// 套用目前表單內容
    pub async fn apply_filters(&mut self) -> Result<usize> {
        let params = self.form.apply();
        self.load(params).await
    }

    /// 成功時整批取代 items；失敗時保留舊資料並記一則通知
    pub async fn load(&mut self, params: FilterParams) -> Result<usize> {
        tracing::debug!("Loading trial list with {} params", params.len());

        match self.api.list_trials(&params).await {
            Ok(list) => {
                self.items = list.items;
                self.table.records_changed();
                tracing::info!("📋 Loaded {} trial records", self.items.len());
                Ok(self.items.len())
            }
            Err(e) => {
                tracing::error!("❌ Failed to load trial list: {}", e);
                self.notices.push(Notice::error("데이터 로드 실패", e.to_string()));
                Err(e)
            }
        }
    }

    pub fn form(&self) -> &FilterForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FilterForm {
        &mut self.form
    }

    pub fn items(&self) -> &[TrialRecord] {
        &self.items
    }

    pub fn sorting(&self) -> &SortState {
        &self.sorting
    }

    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    pub fn view(&self) -> PageView<'_> {
        self.table.view(&self.items, &self.sorting)
    }

    pub fn toggle_sort(&mut self, column: &str) {
        self.table.toggle_sort(&mut self.sorting, column);
    }

    pub fn set_sorting(&mut self, sorting: SortState) {
        self.table.set_sorting(&mut self.sorting, sorting);
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.table.set_page_size(page_size);
    }

    pub fn first_page(&mut self) {
        self.table.first_page();
    }

    pub fn previous_page(&mut self) -> bool {
        self.table.previous_page()
    }

    pub fn next_page(&mut self) -> bool {
        self.table.next_page(self.items.len())
    }

    pub fn last_page(&mut self) -> bool {
        self.table.last_page(self.items.len())
    }

    pub fn go_to_page(&mut self, page_index: usize) -> bool {
        self.table.go_to_page(page_index, self.items.len())
    }

    /// 點選可見列，回傳該列完整記錄
    pub fn select_row(&mut self, visible_index: usize) -> Option<TrialRecord> {
        self.table
            .activate_row(&self.items, &self.sorting, visible_index)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
