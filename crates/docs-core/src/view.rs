//! # Page Views
//!
//! A `PageView` is one mounted documentation page: a sample selector per
//! code block plus one copy feedback controller keyed by block id. Views
//! share nothing with each other; dropping a view cancels its timers.

use crate::clipboard::BoxedClipboard;
use crate::controller::CopyFeedbackController;
use crate::error::{WidgetError, WidgetResult};
use crate::feedback::CopyStatus;
use crate::page::{DiagramBlock, DocPage};
use crate::sample::variant_label;
use crate::selector::{SampleSelector, Tab};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// One mounted code block
#[derive(Debug)]
struct BlockInstance {
    block_id: String,
    caption: Option<String>,
    selector: Mutex<SampleSelector>,
}

impl BlockInstance {
    fn selector(&self) -> MutexGuard<'_, SampleSelector> {
        self.selector.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Rendered state of one block
#[derive(Debug, Clone, Serialize)]
pub struct BlockSnapshot {
    pub block_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub active_key: String,
    pub active_label: String,
    pub body: String,
    pub tabs: Vec<Tab>,
    pub copy_status: CopyStatus,
}

/// Rendered state of a whole view
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub page_id: String,
    pub title: String,
    pub blocks: Vec<BlockSnapshot>,
    pub diagrams: Vec<DiagramBlock>,
}

/// A mounted page
pub struct PageView {
    page_id: String,
    title: String,
    blocks: Vec<BlockInstance>,
    diagrams: Vec<DiagramBlock>,
    feedback: CopyFeedbackController,
}

impl PageView {
    /// Mount every block of `page` with the default feedback window
    pub fn mount(page: &DocPage, clipboard: BoxedClipboard) -> Self {
        Self::mount_with_feedback(page, CopyFeedbackController::new(clipboard))
    }

    /// Mount every block of `page` with a custom feedback window
    pub fn mount_with_window(page: &DocPage, clipboard: BoxedClipboard, window: Duration) -> Self {
        Self::mount_with_feedback(
            page,
            CopyFeedbackController::new(clipboard).with_window(window),
        )
    }

    fn mount_with_feedback(page: &DocPage, feedback: CopyFeedbackController) -> Self {
        let blocks: Vec<BlockInstance> = page
            .blocks
            .iter()
            .map(|block| {
                feedback.mount(block.id.clone());
                BlockInstance {
                    block_id: block.id.clone(),
                    caption: block.caption.clone(),
                    selector: Mutex::new(SampleSelector::mount(block.samples.clone())),
                }
            })
            .collect();

        info!("Mounted page {} with {} blocks", page.id, blocks.len());

        Self {
            page_id: page.id.clone(),
            title: page.title.clone(),
            blocks,
            diagrams: page.diagrams.clone(),
            feedback,
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    fn instance(&self, block_id: &str) -> WidgetResult<&BlockInstance> {
        self.blocks
            .iter()
            .find(|b| b.block_id == block_id)
            .ok_or_else(|| WidgetError::UnknownInstance {
                instance_id: block_id.to_string(),
            })
    }

    /// Switch a block's variant; unknown keys leave it unchanged.
    ///
    /// Returns whether the key was accepted.
    pub fn select_variant(&self, block_id: &str, key: &str) -> WidgetResult<bool> {
        let accepted = self.instance(block_id)?.selector().select_variant(key);
        debug!(
            "select {} on {}/{}: accepted={}",
            key, self.page_id, block_id, accepted
        );
        Ok(accepted)
    }

    /// Key of the block's active variant
    pub fn active_key(&self, block_id: &str) -> WidgetResult<String> {
        Ok(self.instance(block_id)?.selector().active_key().to_string())
    }

    /// Body of the block's active variant
    pub fn active_body(&self, block_id: &str) -> WidgetResult<String> {
        Ok(self.instance(block_id)?.selector().active_body().to_string())
    }

    /// Copy the block's active body to the clipboard
    pub async fn copy(&self, block_id: &str) -> WidgetResult<CopyStatus> {
        let body = self.active_body(block_id)?;
        self.feedback.copy(block_id, &body).await
    }

    /// Copy status of a block
    pub fn copy_status(&self, block_id: &str) -> WidgetResult<CopyStatus> {
        self.instance(block_id)?;
        Ok(self.feedback.status(block_id).unwrap_or_default())
    }

    /// Feedback window of this view
    pub fn feedback_window(&self) -> Duration {
        self.feedback.window()
    }

    /// Snapshot of one block
    pub fn block_snapshot(&self, block_id: &str) -> WidgetResult<BlockSnapshot> {
        Ok(self.snapshot_of(self.instance(block_id)?))
    }

    fn snapshot_of(&self, block: &BlockInstance) -> BlockSnapshot {
        let selector = block.selector();
        BlockSnapshot {
            block_id: block.block_id.clone(),
            caption: block.caption.clone(),
            active_key: selector.active_key().to_string(),
            active_label: variant_label(selector.active_key()).into_owned(),
            body: selector.active_body().to_string(),
            tabs: selector.tabs(),
            copy_status: self.feedback.status(&block.block_id).unwrap_or_default(),
        }
    }

    /// Snapshot of the whole view
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            page_id: self.page_id.clone(),
            title: self.title.clone(),
            blocks: self.blocks.iter().map(|b| self.snapshot_of(b)).collect(),
            diagrams: self.diagrams.clone(),
        }
    }

    /// Unmount every block, cancelling pending reversions
    pub fn unmount(self) {
        info!("Unmounting page {}", self.page_id);
        self.feedback.unmount_all();
    }
}
