//! Wire model for the vendor classification API.
//!
//! Request structs serialize to the exact field names the vendor expects.
//! Response structs are lenient: missing or `null` lists decode as empty,
//! headings may be bare strings or `{code, desc}` objects.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::VendorProfile;

/// The fixed schedule requested at the start of every classification.
pub const SCHEDULE: &str = "import/export";

/// One selectable answer to an [`Interaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOption {
    /// Vendor option id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// An `(optionId, optionName)` pair, named the way the vendor names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerValue {
    /// Option id.
    pub first: String,
    /// Option name.
    pub second: String,
}

impl From<&InteractionOption> for AnswerValue {
    fn from(option: &InteractionOption) -> Self {
        Self { first: option.id.clone(), second: option.name.clone() }
    }
}

/// A single question-and-options turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Vendor interaction id.
    pub id: String,
    /// Short name, usually the question itself.
    #[serde(default)]
    pub name: String,
    /// Longer question text when the vendor supplies one.
    #[serde(rename = "question", default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    /// Options in vendor order.
    #[serde(rename = "attrs", default, deserialize_with = "null_as_empty")]
    pub options: Vec<InteractionOption>,
    /// Values already chosen, present on known interactions.
    #[serde(rename = "values", default, deserialize_with = "null_as_empty")]
    pub answered_values: Vec<AnswerValue>,
}

impl Interaction {
    /// Text to show when asking this question.
    #[must_use]
    pub fn prompt(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        match self.question_text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => "Please select an option:",
        }
    }

    /// Names of the answered values, for display.
    #[must_use]
    pub fn answered_names(&self) -> Vec<&str> {
        self.answered_values.iter().map(|v| v.second.as_str()).collect()
    }
}

/// An already-answered interaction. Display only, never re-submitted.
pub type KnownCharacteristic = Interaction;

/// A candidate code offered when the dialogue ends without one definitive code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawHeading")]
pub struct PotentialHeading {
    /// Heading code, possibly wildcard-suffixed with `x`.
    pub code: String,
    /// Heading description.
    #[serde(rename = "desc")]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHeading {
    Code(String),
    Full {
        #[serde(default)]
        code: Option<String>,
        #[serde(default, alias = "description")]
        desc: Option<String>,
    },
}

impl From<RawHeading> for PotentialHeading {
    fn from(raw: RawHeading) -> Self {
        match raw {
            RawHeading::Code(code) => Self { code, description: String::new() },
            RawHeading::Full { code, desc } => {
                Self { code: code.unwrap_or_default(), description: desc.unwrap_or_default() }
            }
        }
    }
}

/// Unwrapped body of a start or continue response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    /// Transaction id correlating the start with its continues.
    #[serde(rename = "txId", default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    /// Resolved HS code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hs_code: Option<String>,
    /// Next question to ask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_item_interaction: Option<Interaction>,
    /// Questions answered so far.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub known_interactions: Vec<KnownCharacteristic>,
    /// Candidate headings.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub potential_headings: Vec<PotentialHeading>,
}

impl ClassifyResponse {
    /// The resolved code, treating an empty string as absent.
    #[must_use]
    pub fn resolved_code(&self) -> Option<&str> {
        self.hs_code.as_deref().filter(|code| !code.is_empty())
    }

    /// Decodes a raw response body, unwrapping the `data` envelope.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the unwrapped value does not match.
    pub fn from_envelope(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(unwrap_envelope(value))
    }
}

/// Returns `value.data` when present and truthy, otherwise `value` itself.
#[must_use]
pub fn unwrap_envelope(mut value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    let truthy = match value.get("data") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    };
    if truthy {
        value["data"].take()
    } else {
        value
    }
}

/// Body of a `start` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    /// Always `"start"`.
    pub state: String,
    /// Product description.
    pub proddesc: String,
    /// Language code.
    pub lang: String,
    /// Requested schedule.
    pub schedule: String,
    /// Vendor profile fields.
    #[serde(flatten)]
    pub profile: VendorProfile,
}

impl StartRequest {
    /// Builds a start request for `description`.
    #[must_use]
    pub fn new(description: &str, lang: &str, profile: &VendorProfile) -> Self {
        Self {
            state: "start".into(),
            proddesc: description.to_string(),
            lang: lang.to_string(),
            schedule: SCHEDULE.into(),
            profile: profile.clone(),
        }
    }
}

/// Body of a `continue` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueRequest {
    /// Always `"continue"`.
    pub state: String,
    /// Id of the question being answered.
    pub interactionid: String,
    /// Transaction id from the start response.
    pub txid: String,
    /// Chosen values; a single entry in practice.
    pub values: Vec<AnswerValue>,
    /// Original product description.
    pub proddesc: String,
    /// Vendor profile fields.
    #[serde(flatten)]
    pub profile: VendorProfile,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
