use crate::CoreError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub type WorkId = u64;

/// Text fields that must be non-empty after trimming, in reporting order.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "description", "imageUrl", "clientUrl"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: WorkId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub client_url: String,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied fields of a work; id and timestamps are assigned by the store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewWork {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub client_url: String,
    pub is_visible: bool,
}

impl NewWork {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
        client_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
            client_url: client_url.into(),
            is_visible: true,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        check_required([
            &self.title,
            &self.description,
            &self.image_url,
            &self.client_url,
        ])
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub client_url: Option<String>,
    pub is_visible: Option<bool>,
}

impl WorkPatch {
    /// True when the patch sets any field covered by [`REQUIRED_FIELDS`].
    pub fn touches_required(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.image_url.is_some()
            || self.client_url.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.touches_required() && self.is_visible.is_none()
    }
}

impl Work {
    pub fn from_new(id: WorkId, new: NewWork, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            image_url: new.image_url,
            client_url: new.client_url,
            is_visible: new.is_visible,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of `self` with `patch` applied and `updated_at` advanced.
    /// `id` and `created_at` are never touched.
    pub fn merged(&self, patch: &WorkPatch, now: DateTime<Utc>) -> Work {
        let mut w = self.clone();
        if let Some(t) = &patch.title { w.title = t.clone(); }
        if let Some(d) = &patch.description { w.description = d.clone(); }
        if let Some(i) = &patch.image_url { w.image_url = i.clone(); }
        if let Some(c) = &patch.client_url { w.client_url = c.clone(); }
        if let Some(v) = patch.is_visible { w.is_visible = v; }
        // updated_at strictly advances even if the clock did not
        w.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
        w
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        check_required([
            &self.title,
            &self.description,
            &self.image_url,
            &self.client_url,
        ])
    }

    pub fn has_external_image(&self) -> bool {
        crate::assets::is_external(&self.image_url)
    }
}

fn check_required(values: [&str; 4]) -> Result<(), CoreError> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .zip(values)
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_blank_field_in_order() {
        let new = NewWork::new(" ", "d", "", "c");
        match new.validate() {
            Err(CoreError::Validation(fields)) => assert_eq!(fields, vec!["title", "imageUrl"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn merge_keeps_identity_and_advances_updated_at() {
        let now = Utc::now();
        let w = Work::from_new(7, NewWork::new("a", "b", "c", "d"), now);
        let patch = WorkPatch { title: Some("a2".into()), ..Default::default() };

        let m = w.merged(&patch, now);
        assert_eq!(m.id, 7);
        assert_eq!(m.title, "a2");
        assert_eq!(m.description, "b");
        assert_eq!(m.created_at, w.created_at);
        assert!(m.updated_at > w.updated_at);
    }

    #[test]
    fn visibility_only_patch_does_not_touch_required() {
        let patch = WorkPatch { is_visible: Some(false), ..Default::default() };
        assert!(!patch.touches_required());
        assert!(!patch.is_empty());
        assert!(WorkPatch::default().is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let w = Work::from_new(1, NewWork::new("a", "b", "/uploads/x.png", "https://x.test"), Utc::now());
        let v = serde_json::to_value(&w).unwrap();
        for key in ["id", "title", "description", "imageUrl", "clientUrl", "isVisible", "createdAt", "updatedAt"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
    }
}
