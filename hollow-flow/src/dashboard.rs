//! View-state of the admin dashboard.

use hollow_model::{BlogPost, Fields, Message, Offering, Record};
use hollow_sync::{ContentService, PendingMutation, SyncController, SyncError};
use hollow_types::{Collection, RecordId, Timestamp};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

use crate::error::FlowResult;

/// The dashboard's tabs, one per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Blogs,
    Offerings,
    Messages,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Blogs, Tab::Offerings, Tab::Messages];

    pub fn collection(self) -> Collection {
        match self {
            Self::Blogs => Collection::Blogs,
            Self::Offerings => Collection::Offerings,
            Self::Messages => Collection::Messages,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Blogs => "Blogs",
            Self::Offerings => "Offerings",
            Self::Messages => "Messages",
        }
    }

    /// Question asked before a row of this tab is deleted.
    pub fn delete_prompt(self) -> String {
        format!(
            "Are you sure you want to delete this {}?",
            self.collection().item_noun()
        )
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the moderation list.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RecordId,
    pub headline: String,
    pub detail: Option<String>,
    pub timestamp: Option<Timestamp>,
    /// A mutation for this row has not been confirmed yet.
    pub pending: bool,
}

/// Outcome of [`Dashboard::load`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    pub loaded: Vec<(Collection, usize)>,
    pub failed: Vec<(Collection, SyncError)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Tab selection and moderation actions over the three collections.
#[derive(Debug, Clone)]
pub struct Dashboard {
    tab: Tab,
    blogs: SyncController,
    offerings: SyncController,
    messages: SyncController,
    loads_in_flight: Arc<AtomicUsize>,
}

impl Dashboard {
    pub fn new(blogs: SyncController, offerings: SyncController, messages: SyncController) -> Self {
        Self {
            tab: Tab::default(),
            blogs,
            offerings,
            messages,
            loads_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn for_service(service: &ContentService) -> Self {
        Self::new(
            service.controller(Collection::Blogs),
            service.controller(Collection::Offerings),
            service.controller(Collection::Messages),
        )
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn controller(&self, tab: Tab) -> &SyncController {
        match tab {
            Tab::Blogs => &self.blogs,
            Tab::Offerings => &self.offerings,
            Tab::Messages => &self.messages,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loads_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Loads all three collections concurrently. A failing collection keeps
    /// its previous rows and does not stop the others.
    pub async fn load(&self) -> LoadReport {
        self.loads_in_flight.fetch_add(1, Ordering::SeqCst);
        let (blogs, offerings, messages) =
            tokio::join!(self.blogs.load(), self.offerings.load(), self.messages.load());
        self.loads_in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut report = LoadReport::default();
        for (collection, result) in [
            (Collection::Blogs, blogs),
            (Collection::Offerings, offerings),
            (Collection::Messages, messages),
        ] {
            match result {
                Ok(count) => report.loaded.push((collection, count)),
                Err(err) => {
                    warn!("Dashboard could not load {}: {}", collection, err);
                    report.failed.push((collection, err));
                }
            }
        }
        info!(
            "Dashboard loaded {} of {} collections",
            report.loaded.len(),
            Tab::ALL.len()
        );
        report
    }

    /// Rows of the active tab, most recent first.
    pub fn rows(&self) -> Vec<Row> {
        self.rows_for(self.tab)
    }

    pub fn rows_for(&self, tab: Tab) -> Vec<Row> {
        let controller = self.controller(tab);
        controller
            .records()
            .iter()
            .map(|record| {
                let mut row = to_row(tab, record);
                row.pending = controller.is_pending(&record.id);
                row
            })
            .collect()
    }

    /// Removes a row now and deletes it from the store in the background.
    pub fn delete(&self, tab: Tab, id: &RecordId) -> FlowResult<PendingMutation> {
        Ok(self.controller(tab).delete_optimistic(id)?)
    }

    /// Applies a partial edit to a blog post.
    pub fn edit_blog(&self, id: &RecordId, partial: Fields) -> FlowResult<PendingMutation> {
        Ok(self.blogs.update_optimistic(id, partial)?)
    }
}

fn to_row(tab: Tab, record: &Record) -> Row {
    match tab {
        Tab::Blogs => {
            let post = BlogPost::from_record(record);
            Row {
                id: post.id,
                headline: post.title,
                detail: Some(post.text),
                timestamp: post.created_at,
                pending: false,
            }
        }
        Tab::Offerings => {
            let offering = Offering::from_record(record);
            Row {
                id: offering.id,
                headline: offering.offering,
                detail: None,
                timestamp: offering.created_at,
                pending: false,
            }
        }
        Tab::Messages => {
            let message = Message::from_record(record);
            Row {
                id: message.id,
                headline: message.message,
                detail: None,
                timestamp: message.created_at,
                pending: false,
            }
        }
    }
}
