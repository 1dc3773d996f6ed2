use {
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

/// One outbound message unit, as handed to the delivery layer.
///
/// Produced by the agent side and reshaped by the reply normalizer before
/// dispatch. `channel_data` carries platform-specific structured fields
/// (quick replies, buttons, locations) keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplyPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<serde_json::Map<String, Value>>,
    pub is_error: bool,
}

impl ReplyPayload {
    /// Text-only payload.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// True when a single media URL or a non-empty media URL list is present.
    #[must_use]
    pub fn has_media(&self) -> bool {
        self.media_url.is_some() || !self.media_urls.is_empty()
    }

    /// True when the channel-data map exists and is non-empty.
    #[must_use]
    pub fn has_channel_data(&self) -> bool {
        self.channel_data
            .as_ref()
            .is_some_and(|data| !data.is_empty())
    }

    /// Channel-data map, created on first access.
    pub fn channel_data_mut(&mut self) -> &mut serde_json::Map<String, Value> {
        self.channel_data.get_or_insert_with(serde_json::Map::new)
    }
}
