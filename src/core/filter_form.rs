use crate::domain::filter::{
    ConsentFilter, FilterCriteria, FilterParams, FlagFilter, MetaMode, Sheet,
};

/// 列表上方的篩選控制項。每個欄位各自獨立，只有 `apply` 會輸出。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    q: String,
    sheet: Sheet,
    test_flag: FlagFilter,
    marketing_consent: ConsentFilter,
    meta_mode: MetaMode,
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, q: impl Into<String>) {
        self.q = q.into();
    }

    pub fn set_sheet(&mut self, sheet: Sheet) {
        self.sheet = sheet;
    }

    pub fn set_test_flag(&mut self, flag: FlagFilter) {
        self.test_flag = flag;
    }

    pub fn clear_test_flag(&mut self) {
        self.test_flag = FlagFilter::Unset;
    }

    pub fn set_marketing_consent(&mut self, consent: ConsentFilter) {
        self.marketing_consent = consent;
    }

    pub fn clear_marketing_consent(&mut self) {
        self.marketing_consent = ConsentFilter::Unset;
    }

    pub fn set_meta_mode(&mut self, mode: MetaMode) {
        self.meta_mode = mode;
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            q: self.q.clone(),
            sheet: self.sheet,
            test_flag: self.test_flag,
            marketing_consent: self.marketing_consent,
            meta_mode: self.meta_mode,
        }
    }

    pub fn apply(&self) -> FilterParams {
        let params = self.criteria().to_params();
        tracing::debug!("Applying filters: {:?}", params);
        params
    }
}

impl From<FilterCriteria> for FilterForm {
    fn from(criteria: FilterCriteria) -> Self {
        Self {
            q: criteria.q,
            sheet: criteria.sheet,
            test_flag: criteria.test_flag,
            marketing_consent: criteria.marketing_consent,
            meta_mode: criteria.meta_mode,
        }
    }
}
