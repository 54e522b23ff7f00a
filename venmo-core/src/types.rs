use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing value.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// One story from the feed, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Signed, currency-formatted, e.g. `"+$12.34"` or `"- $5.00"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: StoryNote,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: StoryTitle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryNote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// Peer-payment description attached to a story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryTitle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: TitlePayload,
    #[serde(default, deserialize_with = "null_as_default")]
    pub receiver: Party,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender: Party,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitlePayload {
    /// `standardTransfer` or `p2p`
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

impl Party {
    /// Display name, or the username when the display name is blank.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// One response from the stories feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Continuation token; empty means this is the last page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub next_id: String,
    /// Newest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stories: Vec<RawTransaction>,
}

/// Position in the feed. `first()` requests the newest page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(Option<String>);

impl Cursor {
    pub fn first() -> Self {
        Self(None)
    }

    /// The cursor for the page after one that returned `next_id`, or `None`
    /// when the feed has no more pages.
    pub fn from_next_id(next_id: &str) -> Option<Self> {
        if next_id.is_empty() {
            None
        } else {
            Some(Self(Some(next_id.to_string())))
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Transfer,
    Payment,
    /// Neither transfer-like nor an exact `payment`; emitted with empty fields.
    Unclassified,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Transfer => "Transfer",
            Classification::Payment => "Payment",
            Classification::Unclassified => "",
        }
    }
}

/// Normalized output row, one per accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub amount: Decimal,
    /// The feed's date string, unparsed.
    pub date: String,
    pub kind: Classification,
    pub note: String,
}

impl ExportRow {
    /// Fixed-point with exactly two fractional digits, never `-0.00`.
    pub fn amount_text(&self) -> String {
        let amount = self.amount.round_dp(2);
        if amount.is_zero() {
            return "0.00".to_string();
        }
        format!("{amount:.2}")
    }

    pub fn to_record(&self) -> [String; 4] {
        [
            self.amount_text(),
            self.date.clone(),
            self.kind.label().to_string(),
            self.note.clone(),
        ]
    }
}
