use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An error/incident record with its monetary impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub nr: String,
    /// Error-type tags. A single tag is stored as a plain string.
    #[serde(rename = "tipo_erro", with = "tags")]
    pub error_types: Vec<String>,
    #[serde(rename = "funcionario")]
    pub employee: String,
    #[serde(rename = "valor", default)]
    pub value: f64,
    #[serde(rename = "desconto", default)]
    pub discounted: bool,
    #[serde(rename = "cobrado", default)]
    pub billed: bool,
    #[serde(rename = "observacao", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Who absorbed the cost of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IncidentStatus {
    Cobrado,
    Desconto,
    Pendente,
}

impl IncidentStatus {
    pub fn label(self) -> &'static str {
        match self {
            IncidentStatus::Cobrado => "Cobrado",
            IncidentStatus::Desconto => "Desconto",
            IncidentStatus::Pendente => "Pendente/Prejuízo",
        }
    }
}

impl IncidentRecord {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Billing wins over discount; neither means the loss is still open.
    pub fn status(&self) -> IncidentStatus {
        if self.billed {
            IncidentStatus::Cobrado
        } else if self.discounted {
            IncidentStatus::Desconto
        } else {
            IncidentStatus::Pendente
        }
    }
}

mod tags {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    pub fn serialize<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        match tags {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(tag) => vec![tag],
            OneOrMany::Many(tags) => tags,
        })
    }
}
