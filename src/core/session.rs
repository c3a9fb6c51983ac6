use crate::core::detail_page::TrialDetailPage;
use crate::core::list_page::TrialListPage;
use crate::core::table::{Column, PageSize, ResultTable};
use crate::domain::ports::TrialApi;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(String),
}

enum View<A: TrialApi> {
    List(TrialListPage<A>),
    Detail(TrialDetailPage<A>),
}

/// 列表 ⇄ 詳細頁的切換。離開列表時狀態不保留，回來會重新載入。
pub struct ConsoleSession<A: TrialApi> {
    api: Arc<A>,
    columns: Vec<Column>,
    page_size: PageSize,
    view: View<A>,
}

impl<A: TrialApi> ConsoleSession<A> {
    pub async fn start(api: Arc<A>, columns: Vec<Column>, page_size: PageSize) -> Self {
        let list = Self::fresh_list(&api, &columns, page_size).await;
        Self {
            api,
            columns,
            page_size,
            view: View::List(list),
        }
    }

    async fn fresh_list(api: &Arc<A>, columns: &[Column], page_size: PageSize) -> TrialListPage<A> {
        let table = ResultTable::new(columns.to_vec()).with_page_size(page_size);
        let mut list = TrialListPage::new(Arc::clone(api), table);
        // 失敗已經記在頁面通知裡
        let _ = list.load_initial().await;
        list
    }

    pub fn route(&self) -> Route {
        match &self.view {
            View::List(_) => Route::List,
            View::Detail(detail) => Route::Detail(detail.id().to_string()),
        }
    }

    pub fn list(&self) -> Option<&TrialListPage<A>> {
        match &self.view {
            View::List(list) => Some(list),
            View::Detail(_) => None,
        }
    }

    pub fn list_mut(&mut self) -> Option<&mut TrialListPage<A>> {
        match &mut self.view {
            View::List(list) => Some(list),
            View::Detail(_) => None,
        }
    }

    pub fn detail(&self) -> Option<&TrialDetailPage<A>> {
        match &self.view {
            View::Detail(detail) => Some(detail),
            View::List(_) => None,
        }
    }

    pub fn detail_mut(&mut self) -> Option<&mut TrialDetailPage<A>> {
        match &mut self.view {
            View::Detail(detail) => Some(detail),
            View::List(_) => None,
        }
    }

    /// 點選列表中的列；沒有 `_id` 的列不會導頁
    pub async fn select_row(&mut self, visible_index: usize) -> bool {
        let id = match self.list_mut().and_then(|list| list.select_row(visible_index)) {
            Some(record) => match record.id() {
                Some(id) => id.to_string(),
                None => return false,
            },
            None => return false,
        };
        self.open_detail(&id).await;
        true
    }

    pub async fn open_detail(&mut self, id: &str) {
        tracing::debug!("Navigating to detail '{}'", id);
        let detail = TrialDetailPage::open(Arc::clone(&self.api), id).await;
        self.view = View::Detail(detail);
    }

    /// 回列表：新的表單、新的排序，重新載入
    pub async fn back(&mut self) {
        tracing::debug!("Navigating back to list");
        let list = Self::fresh_list(&self.api, &self.columns, self.page_size).await;
        self.view = View::List(list);
    }
}
