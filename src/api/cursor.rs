use super::client::AdsApi;
use super::error::ApiError;
use super::types::{Campaign, CampaignQuery, PageRequest};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Paginated listing that fetches the next page only once the current one is drained
pub struct CampaignCursor<'a, A: ?Sized> {
    api: &'a A,
    account_id: String,
    query: CampaignQuery,
    page_size: usize,
    buffer: VecDeque<Campaign>,
    after: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<'a, A: AdsApi + ?Sized> CampaignCursor<'a, A> {
    pub fn new(api: &'a A, account_id: &str, query: CampaignQuery, page_size: usize) -> Self {
        Self {
            api,
            account_id: account_id.to_string(),
            query,
            page_size: page_size.max(1),
            buffer: VecDeque::new(),
            after: None,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    fn fetch_page(&mut self) -> Result<(), ApiError> {
        let request = PageRequest {
            limit: self.page_size,
            after: self.after.take(),
        };
        let page = self
            .api
            .list_campaigns(&self.account_id, &self.query, &request)?;
        self.pages_fetched += 1;

        tracing::debug!(
            account = %self.account_id,
            page = self.pages_fetched,
            records = page.data.len(),
            "fetched campaign page"
        );

        // An empty page ends the listing even if a cursor came back with it
        self.exhausted = page.after.is_none() || page.data.is_empty();
        self.after = page.after;
        self.buffer.extend(page.data);
        Ok(())
    }
}

impl<A: AdsApi + ?Sized> Iterator for CampaignCursor<'_, A> {
    type Item = Result<Campaign, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(campaign) = self.buffer.pop_front() {
                return Some(Ok(campaign));
            }
            if self.exhausted {
                return None;
            }
            if let Err(err) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(err));
            }
        }
    }
}

impl<A: AdsApi + ?Sized> FusedIterator for CampaignCursor<'_, A> {}
