use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::{
    models::{
        announcement::{AnnouncementDraft, AnnouncementFields},
        day::DAY_ORDERS,
        notice::{EditableNotice, NoticeDefaults, SaveNoticeRequest, SavedNotice},
    },
    store::{NoticeStore, StoreError},
};

/// What a save does with a draft that was loaded from a stored row and then
/// blanked out before saving again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlankedDraftPolicy {
    /// Skip the draft and leave the stored row as it is.
    #[default]
    Retain,
    /// Skip the draft and delete the stored row.
    Delete,
}

impl FromStr for BlankedDraftPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "delete" => Ok(Self::Delete),
            other => anyhow::bail!("Unknown blanked announcement policy: {other}"),
        }
    }
}

/// A save stopped at its first failing write. Writes that happened before it
/// are kept.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to save day {date}: {source}")]
    Day {
        date: NaiveDate,
        #[source]
        source: StoreError,
    },
    /// `position` is 1-based, matching the draft list as shown in the form.
    #[error("failed to save announcement {position}: {source}")]
    Announcement {
        position: usize,
        #[source]
        source: StoreError,
    },
}

impl SaveError {
    pub fn stage(&self) -> &'static str {
        match self {
            SaveError::Day { .. } => "day",
            SaveError::Announcement { .. } => "announcement",
        }
    }

    pub fn store_error(&self) -> &StoreError {
        match self {
            SaveError::Day { source, .. } | SaveError::Announcement { source, .. } => source,
        }
    }
}

pub struct NoticeService;

impl NoticeService {
    /// Create or update the day row for `req.date`, then write every
    /// non-blank draft against it.
    ///
    /// Store calls run one after another: day lookup, day write, then one
    /// write per surviving draft in submission order.
    pub async fn save_notice(
        store: &dyn NoticeStore,
        req: SaveNoticeRequest,
        policy: BlankedDraftPolicy,
    ) -> Result<SavedNotice, SaveError> {
        let date = req.date;
        let day_fields = req.day_fields();
        let day_error = move |source: StoreError| SaveError::Day { date, source };

        let (day, created) = match store.find_day_by_date(date).await.map_err(day_error)? {
            Some(existing) => {
                let day = store
                    .update_day(existing.id, &day_fields)
                    .await
                    .map_err(day_error)?;
                (day, false)
            }
            None => {
                let day = store.insert_day(&day_fields).await.map_err(day_error)?;
                (day, true)
            }
        };

        let (kept, blank): (Vec<_>, Vec<_>) = req
            .announcements
            .into_iter()
            .enumerate()
            .partition(|(_, draft)| !draft.is_blank());

        let mut announcements = Vec::with_capacity(kept.len());
        for (index, draft) in kept {
            let AnnouncementDraft { id, title, message } = draft;
            let fields = AnnouncementFields { title, message };
            // An id that is not a row of this day (the form was loaded for
            // another date, or the row is gone) is written as a new row.
            let written = match id {
                Some(id) => match store.update_announcement(day.id, id, &fields).await {
                    Err(StoreError::NotFound(_)) => {
                        tracing::debug!(
                            "Announcement {} is not on day {}, inserting it",
                            id,
                            day.id
                        );
                        store.insert_announcement(day.id, &fields).await
                    }
                    other => other,
                },
                None => store.insert_announcement(day.id, &fields).await,
            };
            let announcement = written.map_err(|source| SaveError::Announcement {
                position: index + 1,
                source,
            })?;
            announcements.push(announcement);
        }

        let dropped = blank.len();
        let mut pruned = 0;
        if policy == BlankedDraftPolicy::Delete {
            for (index, draft) in blank {
                let Some(id) = draft.id else { continue };
                match store.delete_day_announcement(day.id, id).await {
                    Ok(()) => pruned += 1,
                    Err(StoreError::NotFound(_)) => {
                        tracing::debug!("Blanked announcement {} is not on day {}", id, day.id);
                    }
                    Err(source) => {
                        return Err(SaveError::Announcement {
                            position: index + 1,
                            source,
                        })
                    }
                }
            }
        }

        tracing::info!(
            "Saved notice board for {} (day {}, {}): {} written, {} dropped, {} pruned",
            date,
            day.id,
            if created { "created" } else { "updated" },
            announcements.len(),
            dropped,
            pruned
        );

        Ok(SavedNotice {
            day,
            created,
            announcements,
            dropped,
            pruned,
        })
    }

    /// Suggested day count for a new entry: one more than the most recent
    /// day's count, or 1 on an empty board.
    pub async fn next_day_count(store: &dyn NoticeStore) -> Result<i32, StoreError> {
        let latest = store.latest_day().await?;
        Ok(latest.map_or(1, |day| day.day_count.saturating_add(1).max(1)))
    }

    /// Values the entry form is pre-filled with at `now`.
    pub async fn draft_defaults(
        store: &dyn NoticeStore,
        now: DateTime<FixedOffset>,
    ) -> Result<NoticeDefaults, StoreError> {
        Ok(NoticeDefaults {
            date: now.date_naive(),
            day_name: now.format("%A").to_string(),
            day_count: Self::next_day_count(store).await?,
            day_orders: DAY_ORDERS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Load the stored notice for `date` with its announcements as drafts that
    /// carry their ids, so saving them again updates in place.
    pub async fn load_for_edit(
        store: &dyn NoticeStore,
        date: NaiveDate,
    ) -> Result<EditableNotice, StoreError> {
        let day = store
            .find_day_by_date(date)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("notice for {date}")))?;
        let announcements = store
            .list_announcements_by_day(day.id)
            .await?
            .into_iter()
            .map(AnnouncementDraft::from)
            .collect();
        Ok(EditableNotice { day, announcements })
    }
}
