use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::client::{ClientError, ResourceClient};
use super::notice::Notice;
use super::request::Resource;
use super::transport::Transport;

/// Page cursor plus the free-text filter typed in the table's search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl PageQuery {
    pub fn first(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            search: None,
        }
    }

    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::first(10)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.per_page)
    }
}

fn page_count(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// List state for one table screen: current page, totals, loading/error
/// flags and the pending notice. CRUD calls reload the current page.
pub struct PaginatedResource<R: Resource, T: ?Sized> {
    client: ResourceClient<R, T>,
    query: PageQuery,
    items: Vec<R::Record>,
    total: u64,
    loading: bool,
    error: Option<String>,
    notice: Option<Notice>,
}

impl<R, T> PaginatedResource<R, T>
where
    R: Resource,
    T: Transport + ?Sized,
{
    pub fn new(client: ResourceClient<R, T>, per_page: u32) -> Self {
        Self {
            client,
            query: PageQuery::first(per_page),
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            notice: None,
        }
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.query.per_page)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Returns and clears the pending notice (snackbar dismissal).
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Fetches the current page. Failures are recorded, never returned.
    pub async fn load(&mut self) -> bool {
        self.loading = true;
        let result = self.client.list(&self.query).await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.error = None;
                true
            }
            Err(err) => {
                warn!(resource = R::LABEL, error = %err, "failed to load page");
                let notice = Notice::from_client_error("load", R::LABEL, &err);
                self.error = Some(notice.message.clone());
                self.notice = Some(notice);
                false
            }
        }
    }

    /// Applies a new search term and jumps back to the first page.
    pub async fn search(&mut self, term: &str) -> bool {
        let term = term.trim();
        self.query.search = (!term.is_empty()).then(|| term.to_string());
        self.query.page = 1;
        self.load().await
    }

    /// Moves to `page`, clamped to the known page range.
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        self.query.page = page.clamp(1, self.page_count());
        self.load().await
    }

    pub async fn set_page_size(&mut self, per_page: u32) -> bool {
        self.query.per_page = per_page.max(1);
        self.query.page = 1;
        self.load().await
    }

    pub async fn create(&mut self, draft: &R::Draft) -> Option<R::Record> {
        match self.client.create(draft).await {
            Ok(record) => {
                info!(resource = R::LABEL, id = %R::id(&record), "record created");
                self.notice = Some(Notice::success(format!("{} created.", capitalize(R::LABEL))));
                self.load().await;
                Some(record)
            }
            Err(err) => {
                self.fail("create", &err);
                None
            }
        }
    }

    pub async fn update(&mut self, id: &R::Id, draft: &R::Draft) -> Option<R::Record> {
        match self.client.update(id, draft).await {
            Ok(record) => {
                info!(resource = R::LABEL, %id, "record updated");
                self.notice = Some(Notice::success(format!("{} updated.", capitalize(R::LABEL))));
                self.load().await;
                Some(record)
            }
            Err(err) => {
                self.fail("update", &err);
                None
            }
        }
    }

    /// Deletes a record; steps back one page when the current page empties.
    pub async fn remove(&mut self, id: &R::Id) -> bool {
        if let Err(err) = self.client.delete(id).await {
            self.fail("delete", &err);
            return false;
        }

        info!(resource = R::LABEL, %id, "record deleted");
        self.notice = Some(Notice::success(format!("{} deleted.", capitalize(R::LABEL))));
        self.load().await;
        if self.items.is_empty() && self.query.page > 1 {
            self.query.page -= 1;
            self.load().await;
        }
        true
    }

    fn fail(&mut self, action: &str, err: &ClientError) {
        warn!(resource = R::LABEL, action, error = %err, "request failed");
        self.notice = Some(Notice::from_client_error(action, R::LABEL, err));
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
